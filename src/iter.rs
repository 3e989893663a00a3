//! Cursors and iterators for the `GenericTreeMap` data structure
//!
//! A [`Cursor`] does not borrow the map. It stores node ids plus a snapshot
//! of the map's modification counter and takes the map on every call, which
//! lets it remove the entry it just yielded and notice structural changes
//! made through any other path:
//!
//! ```text
//! let mut cursor = map.cursor();      snapshot = mod_count
//! cursor.next(&map)?;                 snapshot == mod_count ? yield : Err
//! map.put(new_key, v)?;               mod_count += 1
//! cursor.next(&map)                   Err(ConcurrentModification)
//! ```
//!
//! The borrowing iterators ([`Iter`], [`Keys`], [`Values`]) wrap a cursor and
//! a shared borrow of the map, so the borrow checker already rules out
//! concurrent mutation and they never observe an error.

use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::{Direction, GenericTreeMap};
use std::iter::FusedIterator;

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// A fail-fast position in a map or range view.
///
/// A cursor must only be used with the map it was created from. Handing it a
/// different map is detected on a best-effort basis and reported as
/// [`Error::ConcurrentModification`].
#[derive(Debug, Clone)]
pub struct Cursor {
	/// Node to yield next.
	next: Option<NodeId>,
	/// Node yielded by the last successful `next`, cleared by `remove`.
	last_returned: Option<NodeId>,
	/// One past the end of a bounded range.
	fence: Option<NodeId>,
	direction: Direction,
	expected_mod_count: u64,
}

impl Cursor {
	pub(crate) fn new<K, V, C>(
		map: &GenericTreeMap<K, V, C>,
		first: Option<NodeId>,
		fence: Option<NodeId>,
		direction: Direction,
	) -> Cursor {
		Cursor {
			next: first,
			last_returned: None,
			fence,
			direction,
			expected_mod_count: map.mod_count,
		}
	}

	/// Returns `true` if a call to [`next`](Self::next) would yield an entry,
	/// assuming the map has not been structurally modified.
	#[inline]
	pub fn has_next(&self) -> bool {
		self.next.is_some() && self.next != self.fence
	}

	fn check<K, V, C>(&self, map: &GenericTreeMap<K, V, C>) -> Result<()> {
		if map.mod_count != self.expected_mod_count {
			tracing::debug!(
				expected = self.expected_mod_count,
				actual = map.mod_count,
				"cursor snapshot is stale"
			);
			return Err(Error::ConcurrentModification);
		}
		Ok(())
	}

	/// Advances past the next node and returns its id.
	fn advance<K, V, C>(&mut self, map: &GenericTreeMap<K, V, C>) -> Result<NodeId> {
		let id = match self.next {
			Some(id) if self.has_next() => id,
			_ => return Err(Error::Exhausted),
		};
		self.check(map)?;
		if map.arena.get(id).is_none() {
			return Err(Error::ConcurrentModification);
		}
		self.next = match self.direction {
			Direction::Forward => map.successor(id),
			Direction::Reverse => map.predecessor(id),
		};
		self.last_returned = Some(id);
		Ok(id)
	}

	/// Returns the next entry and moves past it.
	///
	/// # Errors
	///
	/// - [`Error::Exhausted`] if no entries remain.
	/// - [`Error::ConcurrentModification`] if the map was structurally
	///   modified since this cursor was created or last removed an entry.
	#[inline]
	pub fn next<'m, K, V, C>(&mut self, map: &'m GenericTreeMap<K, V, C>) -> Result<(&'m K, &'m V)> {
		let id = self.advance(map)?;
		Ok(map.entry_of(id))
	}

	/// Removes the entry returned by the last call to [`next`](Self::next)
	/// and returns it.
	///
	/// Iteration continues with the entry that would have come next.
	///
	/// # Errors
	///
	/// - [`Error::InvalidCursorState`] if `next` has not yielded an entry
	///   since the last removal.
	/// - [`Error::ConcurrentModification`] if the snapshot is stale.
	pub fn remove<K, V, C>(&mut self, map: &mut GenericTreeMap<K, V, C>) -> Result<(K, V)> {
		let last = self.last_returned.ok_or(Error::InvalidCursorState)?;
		self.check(map)?;
		let node = map.arena.get(last).ok_or(Error::ConcurrentModification)?;

		// Deleting a node with two children moves its successor's entry into
		// its slot and frees the successor's slot instead.
		if node.has_two_children() && self.direction == Direction::Forward {
			if self.fence.is_some() && self.fence == map.successor(last) {
				self.fence = Some(last);
			}
			self.next = Some(last);
		}

		let entry = map.delete_node(last);
		self.last_returned = None;
		self.expected_mod_count = map.mod_count;
		Ok(entry)
	}

	/// Returns a mutable reference to the value of the entry returned by the
	/// last call to [`next`](Self::next).
	///
	/// Changing a value is not a structural modification.
	///
	/// # Errors
	///
	/// Same as [`remove`](Self::remove).
	pub fn value_mut<'m, K, V, C>(&self, map: &'m mut GenericTreeMap<K, V, C>) -> Result<&'m mut V> {
		let last = self.last_returned.ok_or(Error::InvalidCursorState)?;
		self.check(map)?;
		map.arena.get_mut(last).map(|node| &mut node.value).ok_or(Error::ConcurrentModification)
	}
}

// ---------------------------------------------------------------------------
// Borrowing Iterators
// ---------------------------------------------------------------------------

/// An iterator over the entries of a map or view.
///
/// Created by `iter()` on [`GenericTreeMap`] and the view types.
pub struct Iter<'a, K, V, C> {
	map: &'a GenericTreeMap<K, V, C>,
	cursor: Cursor,
}

impl<'a, K, V, C> Iter<'a, K, V, C> {
	pub(crate) fn new(map: &'a GenericTreeMap<K, V, C>, cursor: Cursor) -> Self {
		Iter {
			map,
			cursor,
		}
	}
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C> {
	type Item = (&'a K, &'a V);

	#[inline]
	fn next(&mut self) -> Option<Self::Item> {
		self.cursor.next(self.map).ok()
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		if self.cursor.has_next() {
			(1, Some(self.map.len()))
		} else {
			(0, Some(0))
		}
	}
}

impl<K, V, C> FusedIterator for Iter<'_, K, V, C> {}

impl<K, V, C> Clone for Iter<'_, K, V, C> {
	fn clone(&self) -> Self {
		Iter {
			map: self.map,
			cursor: self.cursor.clone(),
		}
	}
}

/// An iterator over the keys of a map or view.
pub struct Keys<'a, K, V, C> {
	inner: Iter<'a, K, V, C>,
}

impl<'a, K, V, C> Keys<'a, K, V, C> {
	pub(crate) fn new(inner: Iter<'a, K, V, C>) -> Self {
		Keys {
			inner,
		}
	}
}

impl<'a, K, V, C> Iterator for Keys<'a, K, V, C> {
	type Item = &'a K;

	#[inline]
	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|(k, _)| k)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<K, V, C> FusedIterator for Keys<'_, K, V, C> {}

/// An iterator over the values of a map or view, in key order.
pub struct Values<'a, K, V, C> {
	inner: Iter<'a, K, V, C>,
}

impl<'a, K, V, C> Values<'a, K, V, C> {
	pub(crate) fn new(inner: Iter<'a, K, V, C>) -> Self {
		Values {
			inner,
		}
	}
}

impl<'a, K, V, C> Iterator for Values<'a, K, V, C> {
	type Item = &'a V;

	#[inline]
	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|(_, v)| v)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<K, V, C> FusedIterator for Values<'_, K, V, C> {}

// ---------------------------------------------------------------------------
// Owning Iterator
// ---------------------------------------------------------------------------

/// An owning iterator over the entries of a map, in key order.
pub struct IntoIter<K, V, C> {
	map: GenericTreeMap<K, V, C>,
}

impl<K, V, C> IntoIter<K, V, C> {
	pub(crate) fn new(map: GenericTreeMap<K, V, C>) -> Self {
		IntoIter {
			map,
		}
	}
}

impl<K, V, C> Iterator for IntoIter<K, V, C> {
	type Item = (K, V);

	#[inline]
	fn next(&mut self) -> Option<Self::Item> {
		self.map.pop_first()
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.map.len(), Some(self.map.len()))
	}
}

impl<K, V, C> DoubleEndedIterator for IntoIter<K, V, C> {
	#[inline]
	fn next_back(&mut self) -> Option<Self::Item> {
		self.map.pop_last()
	}
}

impl<K, V, C> ExactSizeIterator for IntoIter<K, V, C> {}

impl<K, V, C> FusedIterator for IntoIter<K, V, C> {}

#[cfg(test)]
mod tests {
	use crate::error::Error;
	use crate::TreeMap;

	fn map_of(keys: impl IntoIterator<Item = i32>) -> TreeMap<i32, i32> {
		keys.into_iter().map(|k| (k, k * 10)).collect()
	}

	#[test]
	fn cursor_walks_in_order() {
		let map = map_of([3, 1, 2]);
		let mut cursor = map.cursor();

		assert_eq!(cursor.next(&map), Ok((&1, &10)));
		assert_eq!(cursor.next(&map), Ok((&2, &20)));
		assert_eq!(cursor.next(&map), Ok((&3, &30)));
		assert!(!cursor.has_next());
		assert_eq!(cursor.next(&map), Err(Error::Exhausted));
	}

	#[test]
	fn remove_requires_prior_next() {
		let mut map = map_of([1, 2]);
		let mut cursor = map.cursor();

		assert_eq!(cursor.remove(&mut map), Err(Error::InvalidCursorState));
		cursor.next(&map).unwrap();
		assert_eq!(cursor.remove(&mut map), Ok((1, 10)));
		assert_eq!(cursor.remove(&mut map), Err(Error::InvalidCursorState));
	}

	#[test]
	fn remove_two_child_node_keeps_position() {
		let mut map = map_of([50, 20, 70, 10, 30, 60, 80]);
		let mut cursor = map.cursor();

		assert_eq!(cursor.next(&map).map(|(k, _)| *k), Ok(10));
		assert_eq!(cursor.next(&map).map(|(k, _)| *k), Ok(20));
		// 20 has children 10 and 30.
		assert_eq!(cursor.remove(&mut map), Ok((20, 200)));

		let mut rest = Vec::new();
		while cursor.has_next() {
			rest.push(*cursor.next(&map).unwrap().0);
		}
		assert_eq!(rest, [30, 50, 60, 70, 80]);
		map.assert_invariants();
	}

	#[test]
	fn stale_cursor_fails_fast() {
		let mut map = map_of([1, 2, 3]);
		let mut cursor = map.cursor();
		cursor.next(&map).unwrap();

		map.put(4, 40).unwrap();

		assert_eq!(cursor.next(&map), Err(Error::ConcurrentModification));
		assert_eq!(cursor.remove(&mut map), Err(Error::ConcurrentModification));
	}

	#[test]
	fn value_mut_is_not_structural() {
		let mut map = map_of([1, 2]);
		let mut cursor = map.cursor();
		cursor.next(&map).unwrap();

		*cursor.value_mut(&mut map).unwrap() = 99;
		assert_eq!(cursor.next(&map), Ok((&2, &20)));
		assert_eq!(map.get(&1), Some(&99));
	}

	#[test]
	fn into_iter_from_both_ends() {
		let map = map_of(0..5);
		let mut iter = map.into_iter();

		assert_eq!(iter.len(), 5);
		assert_eq!(iter.next(), Some((0, 0)));
		assert_eq!(iter.next_back(), Some((4, 40)));
		assert_eq!(iter.map(|(k, _)| k).collect::<Vec<_>>(), [1, 2, 3]);
	}
}
