//! An ordered set built on [`GenericTreeMap`] with a unit value.

use std::borrow::Borrow;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::RangeBounds;

use crate::compare::{Comparator, NaturalOrder};
use crate::error::Result;
use crate::iter::{self, Keys};
use crate::view::SubMap;
use crate::GenericTreeMap;

/// An iterator over the elements of a [`TreeSet`] or [`SubSet`].
pub type SetIter<'a, T, C> = Keys<'a, T, (), C>;

/// An ordered set of `T`, ordered by `C`.
///
/// # Example
///
/// ```
/// use redtree::TreeSet;
///
/// let mut set = TreeSet::new();
/// assert_eq!(set.insert(3), Ok(true));
/// assert_eq!(set.insert(1), Ok(true));
/// assert_eq!(set.insert(3), Ok(false));
///
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3]);
/// assert_eq!(set.ceiling(&2), Some(&3));
/// ```
pub struct TreeSet<T, C = NaturalOrder> {
	map: GenericTreeMap<T, (), C>,
}

impl<T> TreeSet<T, NaturalOrder> {
	/// Creates an empty set using the elements' [`Ord`] implementation.
	pub const fn new() -> Self {
		TreeSet {
			map: GenericTreeMap::new(),
		}
	}
}

impl<T, C> TreeSet<T, C> {
	/// Creates an empty set ordered by `comparator`.
	pub const fn with_comparator(comparator: C) -> Self {
		TreeSet {
			map: GenericTreeMap::with_comparator(comparator),
		}
	}

	/// Builds a set in linear time from elements already in strictly
	/// ascending order. See [`GenericTreeMap::from_sorted_iter`].
	///
	/// # Errors
	///
	/// Same as [`GenericTreeMap::from_sorted_iter`].
	pub fn from_sorted_iter<I>(comparator: C, iter: I) -> Result<Self>
	where
		C: Comparator<T>,
		I: IntoIterator<Item = T>,
	{
		GenericTreeMap::from_sorted_iter(comparator, iter.into_iter().map(|t| (t, ()))).map(|map| TreeSet {
			map,
		})
	}

	/// Returns the number of elements in the set. O(1).
	pub fn len(&self) -> usize {
		self.map.len()
	}

	/// Returns `true` if the set contains no elements.
	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}

	/// Returns the comparator ordering this set.
	pub fn comparator(&self) -> &C {
		self.map.comparator()
	}

	/// Removes all elements. Outstanding cursors become stale.
	pub fn clear(&mut self) {
		self.map.clear()
	}

	/// Returns an iterator over the elements in ascending order.
	pub fn iter(&self) -> SetIter<'_, T, C> {
		self.map.keys()
	}

	/// Returns an iterator over the elements in descending order.
	pub fn descending_iter(&self) -> SetIter<'_, T, C> {
		Keys::new(self.map.descending_iter())
	}

	/// Removes and returns the lowest element.
	pub fn pop_first(&mut self) -> Option<T> {
		self.map.pop_first().map(|(t, ())| t)
	}

	/// Removes and returns the highest element.
	pub fn pop_last(&mut self) -> Option<T> {
		self.map.pop_last().map(|(t, ())| t)
	}

	/// Returns the lowest element.
	///
	/// # Errors
	///
	/// [`Error::Exhausted`](crate::error::Error::Exhausted) if the set is
	/// empty.
	pub fn first(&self) -> Result<&T> {
		self.map.first_key()
	}

	/// Returns the highest element.
	///
	/// # Errors
	///
	/// [`Error::Exhausted`](crate::error::Error::Exhausted) if the set is
	/// empty.
	pub fn last(&self) -> Result<&T> {
		self.map.last_key()
	}

	/// Adds `value`, returning `true` if it was not already present.
	///
	/// An equal element already in the set is kept.
	///
	/// # Errors
	///
	/// [`Error::InvalidKey`](crate::error::Error::InvalidKey) if the
	/// comparator does not admit `value`.
	pub fn insert(&mut self, value: T) -> Result<bool>
	where
		C: Comparator<T>,
	{
		self.map.put(value, ()).map(|previous| previous.is_none())
	}

	/// Removes `value`, returning `true` if it was present.
	///
	/// # Errors
	///
	/// [`Error::InvalidKey`](crate::error::Error::InvalidKey) if the
	/// comparator does not admit `value`.
	pub fn remove<Q>(&mut self, value: &Q) -> Result<bool>
	where
		T: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.map.remove(value).map(|previous| previous.is_some())
	}

	/// Returns `true` if the set contains `value`.
	pub fn contains<Q>(&self, value: &Q) -> bool
	where
		T: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.map.contains_key(value)
	}

	/// Returns the greatest element less than or equal to `value`.
	pub fn floor<Q>(&self, value: &Q) -> Option<&T>
	where
		T: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.map.floor_key(value)
	}

	/// Returns the least element greater than or equal to `value`.
	pub fn ceiling<Q>(&self, value: &Q) -> Option<&T>
	where
		T: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.map.ceiling_key(value)
	}

	/// Returns the greatest element strictly less than `value`.
	pub fn lower<Q>(&self, value: &Q) -> Option<&T>
	where
		T: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.map.lower_key(value)
	}

	/// Returns the least element strictly greater than `value`.
	pub fn higher<Q>(&self, value: &Q) -> Option<&T>
	where
		T: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.map.higher_key(value)
	}

	/// Returns a view of the elements between `from` and `to`.
	///
	/// # Errors
	///
	/// Same as [`GenericTreeMap::sub_map`].
	pub fn sub_set(&self, from: T, from_inclusive: bool, to: T, to_inclusive: bool) -> Result<SubSet<'_, T, C>>
	where
		C: Comparator<T>,
	{
		self.map.sub_map(from, from_inclusive, to, to_inclusive).map(SubSet::new)
	}

	/// Returns a view of the elements below `to`.
	///
	/// # Errors
	///
	/// Same as [`GenericTreeMap::head_map`].
	pub fn head_set(&self, to: T, inclusive: bool) -> Result<SubSet<'_, T, C>>
	where
		C: Comparator<T>,
	{
		self.map.head_map(to, inclusive).map(SubSet::new)
	}

	/// Returns a view of the elements above `from`.
	///
	/// # Errors
	///
	/// Same as [`GenericTreeMap::tail_map`].
	pub fn tail_set(&self, from: T, inclusive: bool) -> Result<SubSet<'_, T, C>>
	where
		C: Comparator<T>,
	{
		self.map.tail_map(from, inclusive).map(SubSet::new)
	}

	/// Returns a view over a Rust range of elements.
	///
	/// # Errors
	///
	/// Same as [`GenericTreeMap::range`].
	pub fn range<R>(&self, range: R) -> Result<SubSet<'_, T, C>>
	where
		R: RangeBounds<T>,
		T: Clone,
		C: Comparator<T>,
	{
		self.map.range(range).map(SubSet::new)
	}

	/// Returns a view of the whole set in descending order.
	pub fn descending_set(&self) -> SubSet<'_, T, C> {
		SubSet::new(self.map.descending_map())
	}
}

impl<T: fmt::Debug, C: Comparator<T>> TreeSet<T, C> {
	/// Validates the underlying tree. See
	/// [`GenericTreeMap::assert_invariants`].
	pub fn assert_invariants(&self) {
		self.map.assert_invariants()
	}
}

// ---------------------------------------------------------------------------
// SubSet
// ---------------------------------------------------------------------------

/// A read-only range view over a [`TreeSet`].
pub struct SubSet<'a, T, C = NaturalOrder> {
	inner: SubMap<'a, T, (), C>,
}

impl<'a, T, C> SubSet<'a, T, C> {
	fn new(inner: SubMap<'a, T, (), C>) -> Self {
		SubSet {
			inner,
		}
	}
}

impl<'a, T, C: Comparator<T>> SubSet<'a, T, C> {
	/// Returns the number of elements inside the view. Bounded views count by
	/// walking, so this is O(k).
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// Returns `true` if no element lies inside the view.
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	/// Returns `true` if `value` lies inside the view and is in the set.
	pub fn contains<Q>(&self, value: &Q) -> bool
	where
		T: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.inner.contains_key(value)
	}

	/// Returns the first element in view order.
	///
	/// # Errors
	///
	/// [`Error::Exhausted`](crate::error::Error::Exhausted) if the view is
	/// empty.
	pub fn first(&self) -> Result<&T> {
		self.inner.first_key()
	}

	/// Returns the last element in view order.
	///
	/// # Errors
	///
	/// [`Error::Exhausted`](crate::error::Error::Exhausted) if the view is
	/// empty.
	pub fn last(&self) -> Result<&T> {
		self.inner.last_key()
	}

	/// Returns the last element at or before `value` in view order.
	pub fn floor<Q>(&self, value: &Q) -> Option<&T>
	where
		T: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.inner.floor_key(value)
	}

	/// Returns the first element at or after `value` in view order.
	pub fn ceiling<Q>(&self, value: &Q) -> Option<&T>
	where
		T: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.inner.ceiling_key(value)
	}

	/// Returns the last element strictly before `value` in view order.
	pub fn lower<Q>(&self, value: &Q) -> Option<&T>
	where
		T: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.inner.lower_key(value)
	}

	/// Returns the first element strictly after `value` in view order.
	pub fn higher<Q>(&self, value: &Q) -> Option<&T>
	where
		T: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.inner.higher_key(value)
	}

	/// Returns an iterator over the elements in view order.
	pub fn iter(&self) -> SetIter<'_, T, C> {
		self.inner.keys()
	}
}

impl<'a, T: Clone, C: Comparator<T>> SubSet<'a, T, C> {
	/// Narrows this view. See [`SubMap::sub_map`].
	///
	/// # Errors
	///
	/// Same as [`SubMap::sub_map`].
	pub fn sub_set(&self, from: T, from_inclusive: bool, to: T, to_inclusive: bool) -> Result<SubSet<'a, T, C>> {
		self.inner.sub_map(from, from_inclusive, to, to_inclusive).map(SubSet::new)
	}

	/// Narrows this view. See [`SubMap::head_map`].
	///
	/// # Errors
	///
	/// Same as [`SubMap::head_map`].
	pub fn head_set(&self, to: T, inclusive: bool) -> Result<SubSet<'a, T, C>> {
		self.inner.head_map(to, inclusive).map(SubSet::new)
	}

	/// Narrows this view. See [`SubMap::tail_map`].
	///
	/// # Errors
	///
	/// Same as [`SubMap::tail_map`].
	pub fn tail_set(&self, from: T, inclusive: bool) -> Result<SubSet<'a, T, C>> {
		self.inner.tail_map(from, inclusive).map(SubSet::new)
	}

	/// Returns the same window in the opposite order.
	pub fn descending_set(&self) -> SubSet<'a, T, C> {
		SubSet::new(self.inner.descending_map())
	}
}

// ---------------------------------------------------------------------------
// Trait Implementations
// ---------------------------------------------------------------------------

impl<T, C: Default> Default for TreeSet<T, C> {
	fn default() -> Self {
		Self::with_comparator(C::default())
	}
}

impl<T: Clone, C: Clone> Clone for TreeSet<T, C> {
	fn clone(&self) -> Self {
		TreeSet {
			map: self.map.clone(),
		}
	}
}

impl<'a, T: fmt::Debug, C: Comparator<T>> fmt::Debug for SubSet<'a, T, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}

impl<T: fmt::Debug, C> fmt::Debug for TreeSet<T, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}

impl<T: PartialEq, C> PartialEq for TreeSet<T, C> {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len() && self.iter().eq(other.iter())
	}
}

impl<T: Eq, C> Eq for TreeSet<T, C> {}

/// Elements the comparator does not admit are skipped.
impl<T, C: Comparator<T> + Default> FromIterator<T> for TreeSet<T, C> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		TreeSet {
			map: iter.into_iter().map(|t| (t, ())).collect(),
		}
	}
}

/// Elements the comparator does not admit are skipped.
impl<T, C: Comparator<T>> Extend<T> for TreeSet<T, C> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		self.map.extend(iter.into_iter().map(|t| (t, ())));
	}
}

impl<'a, T, C> IntoIterator for &'a TreeSet<T, C> {
	type Item = &'a T;

	type IntoIter = SetIter<'a, T, C>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// An owning iterator over the elements of a [`TreeSet`].
pub struct IntoIter<T, C> {
	inner: iter::IntoIter<T, (), C>,
}

impl<T, C> Iterator for IntoIter<T, C> {
	type Item = T;

	fn next(&mut self) -> Option<T> {
		self.inner.next().map(|(t, ())| t)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<T, C> DoubleEndedIterator for IntoIter<T, C> {
	fn next_back(&mut self) -> Option<T> {
		self.inner.next_back().map(|(t, ())| t)
	}
}

impl<T, C> ExactSizeIterator for IntoIter<T, C> {}

impl<T, C> FusedIterator for IntoIter<T, C> {}

impl<T, C> IntoIterator for TreeSet<T, C> {
	type Item = T;

	type IntoIter = IntoIter<T, C>;

	fn into_iter(self) -> Self::IntoIter {
		IntoIter {
			inner: self.map.into_iter(),
		}
	}
}
