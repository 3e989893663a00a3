//! Serde support, enabled by the `serde` feature.
//!
//! A map serializes as a map in key order and a set as a sequence in element
//! order. Deserialization rebuilds the tree with the default comparator and
//! fails on a key that comparator does not admit.

use std::fmt;
use std::marker::PhantomData;

use ::serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use ::serde::ser::{Serialize, Serializer};

use crate::compare::Comparator;
use crate::error::Error;
use crate::{GenericTreeMap, TreeSet};

impl<K, V, C> Serialize for GenericTreeMap<K, V, C>
where
	K: Serialize,
	V: Serialize,
{
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_map(self)
	}
}

impl<'de, K, V, C> Deserialize<'de> for GenericTreeMap<K, V, C>
where
	K: Deserialize<'de>,
	V: Deserialize<'de>,
	C: Comparator<K> + Default,
{
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_map(TreeMapVisitor {
			phantom: PhantomData,
		})
	}
}

struct TreeMapVisitor<K, V, C> {
	phantom: PhantomData<(K, V, C)>,
}

impl<'de, K, V, C> Visitor<'de> for TreeMapVisitor<K, V, C>
where
	K: Deserialize<'de>,
	V: Deserialize<'de>,
	C: Comparator<K> + Default,
{
	type Value = GenericTreeMap<K, V, C>;

	fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		formatter.write_str("a map")
	}

	fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
		let mut entries = Vec::new();
		while let Some(entry) = access.next_entry()? {
			entries.push(entry);
		}

		// Serialized maps arrive in key order, so the linear build is the
		// common case.
		let mut map = GenericTreeMap::default();
		match map.check_sorted(&entries) {
			Ok(()) => map.build_from_sorted(entries),
			Err(Error::Unsorted) => {
				for (k, v) in entries {
					map.put(k, v).map_err(de::Error::custom)?;
				}
			}
			Err(err) => return Err(de::Error::custom(err)),
		}
		Ok(map)
	}
}

impl<T: Serialize, C> Serialize for TreeSet<T, C> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_seq(self)
	}
}

impl<'de, T, C> Deserialize<'de> for TreeSet<T, C>
where
	T: Deserialize<'de>,
	C: Comparator<T> + Default,
{
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_seq(TreeSetVisitor {
			phantom: PhantomData,
		})
	}
}

struct TreeSetVisitor<T, C> {
	phantom: PhantomData<(T, C)>,
}

impl<'de, T, C> Visitor<'de> for TreeSetVisitor<T, C>
where
	T: Deserialize<'de>,
	C: Comparator<T> + Default,
{
	type Value = TreeSet<T, C>;

	fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		formatter.write_str("a sequence")
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
		let mut set = TreeSet::default();
		while let Some(value) = access.next_element()? {
			set.insert(value).map_err(de::Error::custom)?;
		}
		Ok(set)
	}
}
