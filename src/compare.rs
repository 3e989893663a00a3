//! Key ordering for the map.
//!
//! Every map is parameterized by a [`Comparator`]. The default is
//! [`NaturalOrder`], which defers to the key's [`Ord`] implementation. Custom
//! orders are supplied at construction time through
//! [`GenericTreeMap::with_comparator`](crate::GenericTreeMap::with_comparator).
//!
//! A comparator also decides which keys it can order at all (see
//! [`Comparator::admits`]). Rust keys are never null, so for plain key types
//! this is always `true`. The `Option` comparators in this module model keys
//! that may be absent: [`NoneRejected`] refuses the absent key and makes
//! `put` fail with [`Error::InvalidKey`](crate::error::Error::InvalidKey),
//! while [`NoneFirst`] and [`NoneLast`] give it a position in the order.

use std::cmp::Ordering;
use std::fmt;

/// A total order over keys of type `T`.
///
/// Implementations must be consistent: `compare(a, b)` must be the reverse
/// of `compare(b, a)` and transitive across all admitted keys. Keys that
/// compare `Equal` are the same key as far as the map is concerned.
pub trait Comparator<T: ?Sized> {
	/// Compares two admitted keys.
	fn compare(&self, a: &T, b: &T) -> Ordering;

	/// Returns `true` if this comparator can order `key`.
	///
	/// `compare` is never called with a key this method rejects.
	fn admits(&self, key: &T) -> bool {
		let _ = key;
		true
	}
}

/// The key type's own [`Ord`] implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
	#[inline]
	fn compare(&self, a: &T, b: &T) -> Ordering {
		a.cmp(b)
	}
}

/// Reverses another comparator.
///
/// Descending views display their keys in this order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reverse<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reverse<C> {
	#[inline]
	fn compare(&self, a: &T, b: &T) -> Ordering {
		self.0.compare(b, a)
	}

	#[inline]
	fn admits(&self, key: &T) -> bool {
		self.0.admits(key)
	}
}

/// A comparator built from a closure.
///
/// ```
/// use redtree::compare::FnOrder;
/// use redtree::GenericTreeMap;
///
/// // Order strings by length, then lexically.
/// let mut map = GenericTreeMap::with_comparator(FnOrder(|a: &String, b: &String| {
/// 	a.len().cmp(&b.len()).then_with(|| a.cmp(b))
/// }));
/// map.put("ccc".to_string(), 3).unwrap();
/// map.put("a".to_string(), 1).unwrap();
/// map.put("bb".to_string(), 2).unwrap();
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, ["a", "bb", "ccc"]);
/// ```
#[derive(Clone, Copy, Default)]
pub struct FnOrder<F>(pub F);

impl<F> fmt::Debug for FnOrder<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("FnOrder")
	}
}

impl<T: ?Sized, F: Fn(&T, &T) -> Ordering> Comparator<T> for FnOrder<F> {
	#[inline]
	fn compare(&self, a: &T, b: &T) -> Ordering {
		(self.0)(a, b)
	}
}

/// Orders `Option<T>` keys by the inner comparator and refuses `None`.
///
/// This is how a map reports an absent key: `put(None, _)` and
/// `remove(&None)` fail with [`Error::InvalidKey`](crate::error::Error::InvalidKey),
/// and lookups of `None` find nothing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoneRejected<C = NaturalOrder>(pub C);

impl<T, C: Comparator<T>> Comparator<Option<T>> for NoneRejected<C> {
	fn compare(&self, a: &Option<T>, b: &Option<T>) -> Ordering {
		match (a, b) {
			(Some(a), Some(b)) => self.0.compare(a, b),
			// Never consulted: `admits` refuses `None`.
			(None, None) => Ordering::Equal,
			(None, Some(_)) => Ordering::Less,
			(Some(_), None) => Ordering::Greater,
		}
	}

	fn admits(&self, key: &Option<T>) -> bool {
		match key {
			Some(inner) => self.0.admits(inner),
			None => false,
		}
	}
}

/// Orders `Option<T>` keys with `None` before every present key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoneFirst<C = NaturalOrder>(pub C);

impl<T, C: Comparator<T>> Comparator<Option<T>> for NoneFirst<C> {
	fn compare(&self, a: &Option<T>, b: &Option<T>) -> Ordering {
		match (a, b) {
			(Some(a), Some(b)) => self.0.compare(a, b),
			(None, None) => Ordering::Equal,
			(None, Some(_)) => Ordering::Less,
			(Some(_), None) => Ordering::Greater,
		}
	}

	fn admits(&self, key: &Option<T>) -> bool {
		key.as_ref().map_or(true, |inner| self.0.admits(inner))
	}
}

/// Orders `Option<T>` keys with `None` after every present key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoneLast<C = NaturalOrder>(pub C);

impl<T, C: Comparator<T>> Comparator<Option<T>> for NoneLast<C> {
	fn compare(&self, a: &Option<T>, b: &Option<T>) -> Ordering {
		match (a, b) {
			(Some(a), Some(b)) => self.0.compare(a, b),
			(None, None) => Ordering::Equal,
			(None, Some(_)) => Ordering::Greater,
			(Some(_), None) => Ordering::Less,
		}
	}

	fn admits(&self, key: &Option<T>) -> bool {
		key.as_ref().map_or(true, |inner| self.0.admits(inner))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn natural_and_reverse() {
		assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
		assert_eq!(Reverse(NaturalOrder).compare(&1, &2), Ordering::Greater);
		assert_eq!(Comparator::<str>::compare(&NaturalOrder, "b", "a"), Ordering::Greater);
	}

	#[test]
	fn none_rejected_refuses_absent_key() {
		let cmp = NoneRejected(NaturalOrder);
		assert!(!cmp.admits(&None::<i32>));
		assert!(cmp.admits(&Some(3)));
		assert_eq!(cmp.compare(&Some(1), &Some(3)), Ordering::Less);
	}

	#[test]
	fn none_first_and_last() {
		assert!(NoneFirst(NaturalOrder).admits(&None::<i32>));
		assert_eq!(NoneFirst(NaturalOrder).compare(&None, &Some(i32::MIN)), Ordering::Less);
		assert_eq!(NoneLast(NaturalOrder).compare(&None, &Some(i32::MAX)), Ordering::Greater);
	}
}
