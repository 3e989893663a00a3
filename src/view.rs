//! Range views: bounded, optionally descending windows over a map.
//!
//! ## Design Overview
//!
//! A view is a pair of bounds and a direction. It owns no nodes. Every
//! operation clamps its result against the bounds and then asks the tree:
//!
//! ```text
//!   map keys:   10   20   30   40   50   60
//!                    [──────────────)            view: Included(20)..Excluded(50)
//!
//!   first  = ceiling(20)  -> 20
//!   last   = lower(50)    -> 40
//!   fence  = ceiling(50)  -> 50   (one past the end for ascending cursors)
//! ```
//!
//! The `abs_*` operations work in ascending key order. A descending view
//! swaps them (lowest for highest, ceiling for floor, higher for lower), so
//! no separate tree or reversed comparator is ever built.
//!
//! ## Handles
//!
//! - [`SubMap`] borrows the map shared and is read-only. It is `Copy`-cheap to
//!   narrow further.
//! - [`SubMapMut`] borrows the map exclusively and can insert and remove keys
//!   inside its window. Keys outside the window are refused with
//!   [`Error::OutOfRange`] before the tree is touched.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::ops::{Bound, RangeBounds};

use crate::compare::{Comparator, NaturalOrder};
use crate::error::{Error, Result};
use crate::iter::{Cursor, Iter, Keys, Values};
use crate::node::NodeId;
use crate::{Direction, GenericTreeMap};

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// The window of a view, in ascending key terms, plus its display direction.
#[derive(Debug, Clone)]
pub(crate) struct Bounds<K> {
	lo: Bound<K>,
	hi: Bound<K>,
	direction: Direction,
}

/// Splits a bound into its key and inclusivity.
fn endpoint<K>(bound: &Bound<K>) -> Option<(&K, bool)> {
	match bound {
		Bound::Included(k) => Some((k, true)),
		Bound::Excluded(k) => Some((k, false)),
		Bound::Unbounded => None,
	}
}

fn closed<K>((key, inclusive): (K, bool)) -> Bound<K> {
	if inclusive {
		Bound::Included(key)
	} else {
		Bound::Excluded(key)
	}
}

#[inline]
fn compare<Q, K, C>(cmp: &C, key: &Q, bound: &K) -> Ordering
where
	K: Borrow<Q>,
	Q: ?Sized,
	C: Comparator<Q>,
{
	<C as Comparator<Q>>::compare(cmp, key, bound.borrow())
}

impl<K> Bounds<K> {
	/// The whole key space.
	pub(crate) fn full(direction: Direction) -> Self {
		Bounds {
			lo: Bound::Unbounded,
			hi: Bound::Unbounded,
			direction,
		}
	}

	fn is_full(&self) -> bool {
		matches!((&self.lo, &self.hi), (Bound::Unbounded, Bound::Unbounded))
	}

	// -----------------------------------------------------------------------
	// Membership
	// -----------------------------------------------------------------------

	fn too_low<Q, C>(&self, cmp: &C, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		match &self.lo {
			Bound::Unbounded => false,
			Bound::Included(lo) => compare(cmp, key, lo) == Ordering::Less,
			Bound::Excluded(lo) => compare(cmp, key, lo) != Ordering::Greater,
		}
	}

	fn too_high<Q, C>(&self, cmp: &C, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		match &self.hi {
			Bound::Unbounded => false,
			Bound::Included(hi) => compare(cmp, key, hi) == Ordering::Greater,
			Bound::Excluded(hi) => compare(cmp, key, hi) != Ordering::Less,
		}
	}

	/// Whether `key` lies inside the window, respecting inclusivity.
	pub(crate) fn in_range<Q, C>(&self, cmp: &C, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		!self.too_low(cmp, key) && !self.too_high(cmp, key)
	}

	/// Whether `key` lies inside the window with both ends treated as
	/// inclusive.
	fn in_closed_range<C: Comparator<K>>(&self, cmp: &C, key: &K) -> bool {
		let above_lo = endpoint(&self.lo).map_or(true, |(lo, _)| cmp.compare(key, lo) != Ordering::Less);
		let below_hi = endpoint(&self.hi).map_or(true, |(hi, _)| cmp.compare(key, hi) != Ordering::Greater);
		above_lo && below_hi
	}

	/// Whether a new bound at `key` fits inside this window. An exclusive
	/// bound may sit on this window's own exclusive edge.
	fn in_range_with<C: Comparator<K>>(&self, cmp: &C, key: &K, inclusive: bool) -> bool {
		if inclusive {
			self.in_range(cmp, key)
		} else {
			self.in_closed_range(cmp, key)
		}
	}

	/// Admitted by the comparator and inside the window.
	pub(crate) fn contains<Q, C>(&self, cmp: &C, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		<C as Comparator<Q>>::admits(cmp, key) && self.in_range(cmp, key)
	}

	// -----------------------------------------------------------------------
	// Narrowing
	// -----------------------------------------------------------------------

	/// Intersects this window with `lo..hi` (ascending terms). An unbounded
	/// side keeps this window's bound on that side.
	pub(crate) fn narrow<C: Comparator<K>>(self, cmp: &C, lo: Bound<K>, hi: Bound<K>) -> Result<Self> {
		for (key, _) in [endpoint(&lo), endpoint(&hi)].into_iter().flatten() {
			if !cmp.admits(key) {
				return Err(Error::InvalidKey);
			}
		}
		if let (Some((l, _)), Some((h, _))) = (endpoint(&lo), endpoint(&hi)) {
			if cmp.compare(l, h) == Ordering::Greater {
				return Err(Error::InvalidRange);
			}
		}
		for (key, inclusive) in [endpoint(&lo), endpoint(&hi)].into_iter().flatten() {
			if !self.in_range_with(cmp, key, inclusive) {
				tracing::debug!("rejected sub-view bound outside the current window");
				return Err(Error::OutOfRange);
			}
		}
		Ok(Bounds {
			lo: match lo {
				Bound::Unbounded => self.lo,
				lo => lo,
			},
			hi: match hi {
				Bound::Unbounded => self.hi,
				hi => hi,
			},
			direction: self.direction,
		})
	}

	/// Keys from `from` to `to` in display order.
	pub(crate) fn sub<C: Comparator<K>>(self, cmp: &C, from: (K, bool), to: (K, bool)) -> Result<Self> {
		let (from, to) = (closed(from), closed(to));
		match self.direction {
			Direction::Forward => self.narrow(cmp, from, to),
			Direction::Reverse => self.narrow(cmp, to, from),
		}
	}

	/// Keys before `to` in display order.
	pub(crate) fn head<C: Comparator<K>>(self, cmp: &C, to: (K, bool)) -> Result<Self> {
		match self.direction {
			Direction::Forward => self.narrow(cmp, Bound::Unbounded, closed(to)),
			Direction::Reverse => self.narrow(cmp, closed(to), Bound::Unbounded),
		}
	}

	/// Keys after `from` in display order.
	pub(crate) fn tail<C: Comparator<K>>(self, cmp: &C, from: (K, bool)) -> Result<Self> {
		match self.direction {
			Direction::Forward => self.narrow(cmp, closed(from), Bound::Unbounded),
			Direction::Reverse => self.narrow(cmp, Bound::Unbounded, closed(from)),
		}
	}

	/// The same window read in the opposite order.
	pub(crate) fn descending(self) -> Self {
		Bounds {
			direction: self.direction.flip(),
			..self
		}
	}

	// -----------------------------------------------------------------------
	// Absolute (ascending) navigation
	// -----------------------------------------------------------------------

	fn keep_below<V, C: Comparator<K>>(&self, map: &GenericTreeMap<K, V, C>, id: Option<NodeId>) -> Option<NodeId> {
		id.filter(|&id| !self.too_high(&map.comparator, map.key_of(id)))
	}

	fn keep_above<V, C: Comparator<K>>(&self, map: &GenericTreeMap<K, V, C>, id: Option<NodeId>) -> Option<NodeId> {
		id.filter(|&id| !self.too_low(&map.comparator, map.key_of(id)))
	}

	fn abs_lowest<V, C: Comparator<K>>(&self, map: &GenericTreeMap<K, V, C>) -> Option<NodeId> {
		let id = match &self.lo {
			Bound::Unbounded => map.first_node(),
			Bound::Included(lo) => map.ceiling_node(lo),
			Bound::Excluded(lo) => map.higher_node(lo),
		};
		self.keep_below(map, id)
	}

	fn abs_highest<V, C: Comparator<K>>(&self, map: &GenericTreeMap<K, V, C>) -> Option<NodeId> {
		let id = match &self.hi {
			Bound::Unbounded => map.last_node(),
			Bound::Included(hi) => map.floor_node(hi),
			Bound::Excluded(hi) => map.lower_node(hi),
		};
		self.keep_above(map, id)
	}

	fn abs_ceiling<Q, V, C>(&self, map: &GenericTreeMap<K, V, C>, key: &Q) -> Option<NodeId>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<K> + Comparator<Q>,
	{
		if self.too_low(&map.comparator, key) {
			return self.abs_lowest(map);
		}
		self.keep_below(map, map.ceiling_node(key))
	}

	fn abs_higher<Q, V, C>(&self, map: &GenericTreeMap<K, V, C>, key: &Q) -> Option<NodeId>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<K> + Comparator<Q>,
	{
		if self.too_low(&map.comparator, key) {
			return self.abs_lowest(map);
		}
		self.keep_below(map, map.higher_node(key))
	}

	fn abs_floor<Q, V, C>(&self, map: &GenericTreeMap<K, V, C>, key: &Q) -> Option<NodeId>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<K> + Comparator<Q>,
	{
		if self.too_high(&map.comparator, key) {
			return self.abs_highest(map);
		}
		self.keep_above(map, map.floor_node(key))
	}

	fn abs_lower<Q, V, C>(&self, map: &GenericTreeMap<K, V, C>, key: &Q) -> Option<NodeId>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<K> + Comparator<Q>,
	{
		if self.too_high(&map.comparator, key) {
			return self.abs_highest(map);
		}
		self.keep_above(map, map.lower_node(key))
	}

	/// First node past the upper bound, where ascending cursors stop.
	fn abs_high_fence<V, C: Comparator<K>>(&self, map: &GenericTreeMap<K, V, C>) -> Option<NodeId> {
		match &self.hi {
			Bound::Unbounded => None,
			Bound::Included(hi) => map.higher_node(hi),
			Bound::Excluded(hi) => map.ceiling_node(hi),
		}
	}

	/// Last node below the lower bound, where descending cursors stop.
	fn abs_low_fence<V, C: Comparator<K>>(&self, map: &GenericTreeMap<K, V, C>) -> Option<NodeId> {
		match &self.lo {
			Bound::Unbounded => None,
			Bound::Included(lo) => map.lower_node(lo),
			Bound::Excluded(lo) => map.floor_node(lo),
		}
	}

	// -----------------------------------------------------------------------
	// Display-order navigation
	// -----------------------------------------------------------------------

	pub(crate) fn first<V, C: Comparator<K>>(&self, map: &GenericTreeMap<K, V, C>) -> Option<NodeId> {
		match self.direction {
			Direction::Forward => self.abs_lowest(map),
			Direction::Reverse => self.abs_highest(map),
		}
	}

	pub(crate) fn last<V, C: Comparator<K>>(&self, map: &GenericTreeMap<K, V, C>) -> Option<NodeId> {
		match self.direction {
			Direction::Forward => self.abs_highest(map),
			Direction::Reverse => self.abs_lowest(map),
		}
	}

	pub(crate) fn ceiling<Q, V, C>(&self, map: &GenericTreeMap<K, V, C>, key: &Q) -> Option<NodeId>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<K> + Comparator<Q>,
	{
		if !map.admits(key) {
			return None;
		}
		match self.direction {
			Direction::Forward => self.abs_ceiling(map, key),
			Direction::Reverse => self.abs_floor(map, key),
		}
	}

	pub(crate) fn higher<Q, V, C>(&self, map: &GenericTreeMap<K, V, C>, key: &Q) -> Option<NodeId>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<K> + Comparator<Q>,
	{
		if !map.admits(key) {
			return None;
		}
		match self.direction {
			Direction::Forward => self.abs_higher(map, key),
			Direction::Reverse => self.abs_lower(map, key),
		}
	}

	pub(crate) fn floor<Q, V, C>(&self, map: &GenericTreeMap<K, V, C>, key: &Q) -> Option<NodeId>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<K> + Comparator<Q>,
	{
		if !map.admits(key) {
			return None;
		}
		match self.direction {
			Direction::Forward => self.abs_floor(map, key),
			Direction::Reverse => self.abs_ceiling(map, key),
		}
	}

	pub(crate) fn lower<Q, V, C>(&self, map: &GenericTreeMap<K, V, C>, key: &Q) -> Option<NodeId>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<K> + Comparator<Q>,
	{
		if !map.admits(key) {
			return None;
		}
		match self.direction {
			Direction::Forward => self.abs_lower(map, key),
			Direction::Reverse => self.abs_higher(map, key),
		}
	}

	/// A cursor over the window in display order.
	pub(crate) fn cursor<V, C: Comparator<K>>(&self, map: &GenericTreeMap<K, V, C>) -> Cursor {
		match self.direction {
			Direction::Forward => Cursor::new(map, self.abs_lowest(map), self.abs_high_fence(map), Direction::Forward),
			Direction::Reverse => Cursor::new(map, self.abs_highest(map), self.abs_low_fence(map), Direction::Reverse),
		}
	}

	/// Number of entries in the window. Bounded windows are counted by
	/// walking them.
	pub(crate) fn count<V, C: Comparator<K>>(&self, map: &GenericTreeMap<K, V, C>) -> usize {
		if self.is_full() {
			return map.len();
		}
		Iter::new(map, self.cursor(map)).count()
	}
}

// ---------------------------------------------------------------------------
// View Handles
// ---------------------------------------------------------------------------

/// A read-only range view over a map.
///
/// Created by [`GenericTreeMap::sub_map`], [`head_map`](GenericTreeMap::head_map),
/// [`tail_map`](GenericTreeMap::tail_map), [`range`](GenericTreeMap::range) and
/// [`descending_map`](GenericTreeMap::descending_map).
pub struct SubMap<'a, K, V, C = NaturalOrder> {
	map: &'a GenericTreeMap<K, V, C>,
	bounds: Bounds<K>,
}

/// A read-write range view over a map.
///
/// Insertions and removals must fall inside the view's window.
pub struct SubMapMut<'a, K, V, C = NaturalOrder> {
	map: &'a mut GenericTreeMap<K, V, C>,
	bounds: Bounds<K>,
}

/// Read operations shared by both view handles.
macro_rules! view_reads {
	($view:ident) => {
		impl<'a, K, V, C: Comparator<K>> $view<'a, K, V, C> {
			/// Returns the number of entries inside the view.
			///
			/// O(1) for an unbounded view, otherwise O(k + log n) for k
			/// entries in range.
			pub fn len(&self) -> usize {
				self.bounds.count(self.map())
			}

			/// Returns `true` if no entry lies inside the view.
			pub fn is_empty(&self) -> bool {
				self.bounds.first(self.map()).is_none()
			}

			/// Returns the value for `key`, or `None` if it is absent or lies
			/// outside the view.
			pub fn get<Q>(&self, key: &Q) -> Option<&V>
			where
				K: Borrow<Q>,
				Q: ?Sized,
				C: Comparator<Q>,
			{
				self.get_key_value(key).map(|(_, v)| v)
			}

			/// Returns the stored key and value for `key` inside the view.
			pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
			where
				K: Borrow<Q>,
				Q: ?Sized,
				C: Comparator<Q>,
			{
				let map = self.map();
				if !self.bounds.contains(&map.comparator, key) {
					return None;
				}
				map.get_key_value(key)
			}

			/// Returns `true` if `key` is present inside the view.
			pub fn contains_key<Q>(&self, key: &Q) -> bool
			where
				K: Borrow<Q>,
				Q: ?Sized,
				C: Comparator<Q>,
			{
				self.get_key_value(key).is_some()
			}

			/// Returns the first key in view order.
			///
			/// # Errors
			///
			/// [`Error::Exhausted`] if the view is empty.
			pub fn first_key(&self) -> Result<&K> {
				self.first_key_value().map(|(k, _)| k).ok_or(Error::Exhausted)
			}

			/// Returns the last key in view order.
			///
			/// # Errors
			///
			/// [`Error::Exhausted`] if the view is empty.
			pub fn last_key(&self) -> Result<&K> {
				self.last_key_value().map(|(k, _)| k).ok_or(Error::Exhausted)
			}

			/// Returns the first entry in view order.
			pub fn first_key_value(&self) -> Option<(&K, &V)> {
				let map = self.map();
				self.bounds.first(map).map(|id| map.entry_of(id))
			}

			/// Returns the last entry in view order.
			pub fn last_key_value(&self) -> Option<(&K, &V)> {
				let map = self.map();
				self.bounds.last(map).map(|id| map.entry_of(id))
			}

			/// Returns the closest entry at or before `key` in view order.
			pub fn floor_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
			where
				K: Borrow<Q>,
				Q: ?Sized,
				C: Comparator<Q>,
			{
				let map = self.map();
				self.bounds.floor(map, key).map(|id| map.entry_of(id))
			}

			/// Returns the closest entry at or after `key` in view order.
			pub fn ceiling_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
			where
				K: Borrow<Q>,
				Q: ?Sized,
				C: Comparator<Q>,
			{
				let map = self.map();
				self.bounds.ceiling(map, key).map(|id| map.entry_of(id))
			}

			/// Returns the closest entry strictly before `key` in view order.
			pub fn lower_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
			where
				K: Borrow<Q>,
				Q: ?Sized,
				C: Comparator<Q>,
			{
				let map = self.map();
				self.bounds.lower(map, key).map(|id| map.entry_of(id))
			}

			/// Returns the closest entry strictly after `key` in view order.
			pub fn higher_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
			where
				K: Borrow<Q>,
				Q: ?Sized,
				C: Comparator<Q>,
			{
				let map = self.map();
				self.bounds.higher(map, key).map(|id| map.entry_of(id))
			}

			/// Returns the closest key at or before `key` in view order.
			pub fn floor_key<Q>(&self, key: &Q) -> Option<&K>
			where
				K: Borrow<Q>,
				Q: ?Sized,
				C: Comparator<Q>,
			{
				self.floor_key_value(key).map(|(k, _)| k)
			}

			/// Returns the closest key at or after `key` in view order.
			pub fn ceiling_key<Q>(&self, key: &Q) -> Option<&K>
			where
				K: Borrow<Q>,
				Q: ?Sized,
				C: Comparator<Q>,
			{
				self.ceiling_key_value(key).map(|(k, _)| k)
			}

			/// Returns the closest key strictly before `key` in view order.
			pub fn lower_key<Q>(&self, key: &Q) -> Option<&K>
			where
				K: Borrow<Q>,
				Q: ?Sized,
				C: Comparator<Q>,
			{
				self.lower_key_value(key).map(|(k, _)| k)
			}

			/// Returns the closest key strictly after `key` in view order.
			pub fn higher_key<Q>(&self, key: &Q) -> Option<&K>
			where
				K: Borrow<Q>,
				Q: ?Sized,
				C: Comparator<Q>,
			{
				self.higher_key_value(key).map(|(k, _)| k)
			}

			/// Returns an iterator over the entries in view order.
			pub fn iter(&self) -> Iter<'_, K, V, C> {
				let map = self.map();
				Iter::new(map, self.bounds.cursor(map))
			}

			/// Returns an iterator over the keys in view order.
			pub fn keys(&self) -> Keys<'_, K, V, C> {
				Keys::new(self.iter())
			}

			/// Returns an iterator over the values in view order.
			pub fn values(&self) -> Values<'_, K, V, C> {
				Values::new(self.iter())
			}

			/// Returns a detached cursor over the view, bounded by the view's
			/// fence.
			pub fn cursor(&self) -> Cursor {
				self.bounds.cursor(self.map())
			}
		}
	};
}

view_reads!(SubMap);
view_reads!(SubMapMut);

impl<'a, K, V, C> SubMap<'a, K, V, C> {
	pub(crate) fn new(map: &'a GenericTreeMap<K, V, C>, bounds: Bounds<K>) -> Self {
		SubMap {
			map,
			bounds,
		}
	}

	#[inline]
	fn map(&self) -> &'a GenericTreeMap<K, V, C> {
		self.map
	}
}

impl<'a, K: Clone, V, C: Comparator<K>> SubMap<'a, K, V, C> {
	/// Narrows this view to the keys from `from` to `to` in view order.
	///
	/// # Errors
	///
	/// - [`Error::InvalidKey`] if the comparator does not admit a bound.
	/// - [`Error::InvalidRange`] if `from` comes after `to`.
	/// - [`Error::OutOfRange`] if a bound lies outside this view.
	pub fn sub_map(&self, from: K, from_inclusive: bool, to: K, to_inclusive: bool) -> Result<SubMap<'a, K, V, C>> {
		let bounds = self.bounds.clone().sub(&self.map.comparator, (from, from_inclusive), (to, to_inclusive))?;
		Ok(SubMap::new(self.map, bounds))
	}

	/// Narrows this view to the keys before `to` in view order.
	///
	/// # Errors
	///
	/// [`Error::InvalidKey`] or [`Error::OutOfRange`] as for
	/// [`sub_map`](Self::sub_map).
	pub fn head_map(&self, to: K, inclusive: bool) -> Result<SubMap<'a, K, V, C>> {
		let bounds = self.bounds.clone().head(&self.map.comparator, (to, inclusive))?;
		Ok(SubMap::new(self.map, bounds))
	}

	/// Narrows this view to the keys after `from` in view order.
	///
	/// # Errors
	///
	/// [`Error::InvalidKey`] or [`Error::OutOfRange`] as for
	/// [`sub_map`](Self::sub_map).
	pub fn tail_map(&self, from: K, inclusive: bool) -> Result<SubMap<'a, K, V, C>> {
		let bounds = self.bounds.clone().tail(&self.map.comparator, (from, inclusive))?;
		Ok(SubMap::new(self.map, bounds))
	}

	/// Narrows this view to a Rust range, given in ascending key terms.
	///
	/// # Errors
	///
	/// Same as [`sub_map`](Self::sub_map).
	pub fn range<R: RangeBounds<K>>(&self, range: R) -> Result<SubMap<'a, K, V, C>> {
		let bounds =
			self.bounds.clone().narrow(&self.map.comparator, range.start_bound().cloned(), range.end_bound().cloned())?;
		Ok(SubMap::new(self.map, bounds))
	}

	/// Returns the same window read in the opposite order.
	pub fn descending_map(&self) -> SubMap<'a, K, V, C> {
		SubMap::new(self.map, self.bounds.clone().descending())
	}
}

impl<K: Clone, V, C> Clone for SubMap<'_, K, V, C> {
	fn clone(&self) -> Self {
		SubMap {
			map: self.map,
			bounds: self.bounds.clone(),
		}
	}
}

impl<'a, K, V, C> SubMapMut<'a, K, V, C> {
	pub(crate) fn new(map: &'a mut GenericTreeMap<K, V, C>, bounds: Bounds<K>) -> Self {
		SubMapMut {
			map,
			bounds,
		}
	}

	#[inline]
	fn map(&self) -> &GenericTreeMap<K, V, C> {
		&*self.map
	}
}

impl<'a, K, V, C: Comparator<K>> SubMapMut<'a, K, V, C> {
	// -----------------------------------------------------------------------
	// Write Operations
	// -----------------------------------------------------------------------

	/// Inserts a key-value pair inside the view.
	///
	/// # Errors
	///
	/// - [`Error::InvalidKey`] if the comparator does not admit `key`.
	/// - [`Error::OutOfRange`] if `key` lies outside the view. The map is
	///   left untouched.
	pub fn put(&mut self, key: K, value: V) -> Result<Option<V>> {
		if !self.map.admits(&key) {
			return Err(Error::InvalidKey);
		}
		if !self.bounds.in_range(&self.map.comparator, &key) {
			tracing::debug!("rejected put outside view bounds");
			return Err(Error::OutOfRange);
		}
		Ok(self.map.insert_entry(key, value))
	}

	/// Removes `key` from the map, returning its value if it was present.
	///
	/// # Errors
	///
	/// - [`Error::InvalidKey`] if the comparator does not admit `key`.
	/// - [`Error::OutOfRange`] if `key` lies outside the view.
	pub fn remove<Q>(&mut self, key: &Q) -> Result<Option<V>>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		if !self.map.admits(key) {
			return Err(Error::InvalidKey);
		}
		if !self.bounds.in_range(&self.map.comparator, key) {
			tracing::debug!("rejected remove outside view bounds");
			return Err(Error::OutOfRange);
		}
		self.map.remove(key)
	}

	/// Returns a mutable reference to the value for `key` inside the view.
	pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		if !self.bounds.contains(&self.map.comparator, key) {
			return None;
		}
		self.map.get_mut(key)
	}

	/// Removes and returns the first entry in view order.
	pub fn pop_first(&mut self) -> Option<(K, V)> {
		let id = self.bounds.first(self.map)?;
		Some(self.map.delete_node(id))
	}

	/// Removes and returns the last entry in view order.
	pub fn pop_last(&mut self) -> Option<(K, V)> {
		let id = self.bounds.last(self.map)?;
		Some(self.map.delete_node(id))
	}

	/// Removes every entry inside the view. Entries outside are kept.
	pub fn clear(&mut self) {
		if self.bounds.is_full() {
			self.map.clear();
			return;
		}
		while self.pop_first().is_some() {}
	}
}

impl<'a, K: Clone, V, C: Comparator<K>> SubMapMut<'a, K, V, C> {
	/// Reborrows this view as a read-only [`SubMap`].
	pub fn as_view(&self) -> SubMap<'_, K, V, C> {
		SubMap::new(self.map, self.bounds.clone())
	}

	/// Narrows this view to the keys from `from` to `to` in view order.
	///
	/// # Errors
	///
	/// Same as [`SubMap::sub_map`].
	pub fn sub_map_mut(
		&mut self,
		from: K,
		from_inclusive: bool,
		to: K,
		to_inclusive: bool,
	) -> Result<SubMapMut<'_, K, V, C>> {
		let bounds = self.bounds.clone().sub(&self.map.comparator, (from, from_inclusive), (to, to_inclusive))?;
		Ok(SubMapMut::new(self.map, bounds))
	}

	/// Narrows this view to the keys before `to` in view order.
	///
	/// # Errors
	///
	/// Same as [`SubMap::head_map`].
	pub fn head_map_mut(&mut self, to: K, inclusive: bool) -> Result<SubMapMut<'_, K, V, C>> {
		let bounds = self.bounds.clone().head(&self.map.comparator, (to, inclusive))?;
		Ok(SubMapMut::new(self.map, bounds))
	}

	/// Narrows this view to the keys after `from` in view order.
	///
	/// # Errors
	///
	/// Same as [`SubMap::tail_map`].
	pub fn tail_map_mut(&mut self, from: K, inclusive: bool) -> Result<SubMapMut<'_, K, V, C>> {
		let bounds = self.bounds.clone().tail(&self.map.comparator, (from, inclusive))?;
		Ok(SubMapMut::new(self.map, bounds))
	}

	/// Returns the same window read in the opposite order.
	pub fn descending_map_mut(&mut self) -> SubMapMut<'_, K, V, C> {
		SubMapMut::new(self.map, self.bounds.clone().descending())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::TreeMap;

	fn sample() -> TreeMap<i32, i32> {
		[10, 20, 30, 40, 50, 60].into_iter().map(|k| (k, k)).collect()
	}

	fn bounds(lo: Bound<i32>, hi: Bound<i32>) -> Bounds<i32> {
		Bounds::full(Direction::Forward).narrow(&NaturalOrder, lo, hi).unwrap()
	}

	#[test]
	fn membership_respects_inclusivity() {
		let b = bounds(Bound::Included(20), Bound::Excluded(50));
		assert!(b.in_range(&NaturalOrder, &20));
		assert!(b.in_range(&NaturalOrder, &49));
		assert!(!b.in_range(&NaturalOrder, &50));
		assert!(!b.in_range(&NaturalOrder, &19));
		assert!(b.in_closed_range(&NaturalOrder, &50));
	}

	#[test]
	fn fences_and_extremes() {
		let map = sample();
		let b = bounds(Bound::Excluded(20), Bound::Included(50));
		let key = |id: Option<NodeId>| id.map(|id| *map.key_of(id));

		assert_eq!(key(b.abs_lowest(&map)), Some(30));
		assert_eq!(key(b.abs_highest(&map)), Some(50));
		assert_eq!(key(b.abs_high_fence(&map)), Some(60));
		assert_eq!(key(b.abs_low_fence(&map)), Some(20));
		assert_eq!(key(b.abs_ceiling(&map, &5)), Some(30));
		assert_eq!(key(b.abs_floor(&map, &100)), Some(50));
		assert_eq!(key(b.abs_higher(&map, &50)), None);
	}

	#[test]
	fn empty_window_between_keys() {
		let map = sample();
		let b = bounds(Bound::Excluded(20), Bound::Excluded(30));
		assert_eq!(b.abs_lowest(&map), None);
		assert_eq!(b.count(&map), 0);
	}

	#[test]
	fn narrowing_validation() {
		let b = bounds(Bound::Included(20), Bound::Excluded(50));
		assert_eq!(
			b.clone().narrow(&NaturalOrder, Bound::Included(10), Bound::Unbounded).unwrap_err(),
			Error::OutOfRange
		);
		assert_eq!(
			b.clone().narrow(&NaturalOrder, Bound::Included(40), Bound::Included(30)).unwrap_err(),
			Error::InvalidRange
		);
		// An exclusive bound may sit on the window's own exclusive edge.
		assert!(b.clone().narrow(&NaturalOrder, Bound::Unbounded, Bound::Excluded(50)).is_ok());
		assert_eq!(
			b.narrow(&NaturalOrder, Bound::Unbounded, Bound::Included(50)).unwrap_err(),
			Error::OutOfRange
		);
	}

	#[test]
	fn descending_swaps_navigation() {
		let map = sample();
		let b = bounds(Bound::Included(20), Bound::Included(50)).descending();
		let key = |id: Option<NodeId>| id.map(|id| *map.key_of(id));

		assert_eq!(key(b.first(&map)), Some(50));
		assert_eq!(key(b.last(&map)), Some(20));
		assert_eq!(key(b.ceiling(&map, &35)), Some(30));
		assert_eq!(key(b.higher(&map, &30)), Some(20));
		assert_eq!(key(b.floor(&map, &35)), Some(40));
		assert_eq!(key(b.lower(&map, &50)), None);
	}
}
