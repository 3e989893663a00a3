//! # Serde Tests
//!
//! Built only with the `serde` feature:
//!
//! ```bash
//! cargo test --features serde
//! ```

use redtree::compare::{NaturalOrder, NoneRejected, Reverse};
use redtree::{GenericTreeMap, TreeMap, TreeSet};

#[test]
fn map_serializes_in_key_order() {
	let map: TreeMap<String, u32> = [("b".to_string(), 2), ("a".to_string(), 1)].into_iter().collect();

	let json = serde_json::to_string(&map).unwrap();
	assert_eq!(json, r#"{"a":1,"b":2}"#);

	let back: TreeMap<String, u32> = serde_json::from_str(&json).unwrap();
	assert_eq!(back, map);
	back.assert_invariants();
}

#[test]
fn large_map_round_trip_is_balanced() {
	let map: TreeMap<u32, u32> = (0..5000).map(|k| (k, k * k % 97)).collect();

	let json = serde_json::to_string(&map).unwrap();
	let back: TreeMap<u32, u32> = serde_json::from_str(&json).unwrap();

	back.assert_invariants();
	assert_eq!(back, map);
	assert_eq!(back.height(), map.height());
}

#[test]
fn unsorted_input_still_deserializes() {
	let map: TreeMap<u8, char> = serde_json::from_str(r#"{"3":"c","1":"a","2":"b","1":"z"}"#).unwrap();

	map.assert_invariants();
	assert_eq!(map.len(), 3);
	assert_eq!(map.get(&1), Some(&'z'));
}

#[test]
fn comparator_applies_on_deserialize() {
	let map: GenericTreeMap<u8, (), Reverse<NaturalOrder>> =
		serde_json::from_str(r#"{"1":null,"3":null,"2":null}"#).unwrap();
	assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3, 2, 1]);
}

#[test]
fn rejected_key_fails_deserialize() {
	let result: Result<TreeSet<Option<u8>, NoneRejected>, _> = serde_json::from_str("[1, null]");
	assert!(result.is_err());
}

#[test]
fn set_round_trip() {
	let set: TreeSet<i32> = [5, -1, 3].into_iter().collect();
	let json = serde_json::to_string(&set).unwrap();
	assert_eq!(json, "[-1,3,5]");

	let back: TreeSet<i32> = serde_json::from_str(&json).unwrap();
	assert_eq!(back, set);
}
