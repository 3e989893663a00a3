//! # Redtree: An Ordered Map on a Red-Black Tree
//!
//! This crate provides an ordered key-value map backed by a red-black tree,
//! with sorted iteration, range views and navigation (floor, ceiling, higher,
//! lower) on top of the usual lookup, insert and remove.
//!
//! ## Design Overview
//!
//! ### Key Concepts
//!
//! **Red-Black Balancing**: Every node is coloured red or black. After each
//! insertion or deletion a fixup pass of rotations and recolourings restores
//! the invariants below, which bound the height by `2·log₂(n+1)`:
//!
//! 1. BST order: left subtree < node < right subtree.
//! 2. No red node has a red parent or child.
//! 3. Every path from a node to an absent child crosses the same number of
//!    black nodes (the black-height).
//! 4. The root is black.
//! 5. Keys are unique.
//!
//! **Arena Storage**: Nodes live in an arena and refer to each other by index.
//! Child links define the tree; the parent link is a non-owning lookup used
//! for upward traversal and fixup.
//!
//! **Range Views**: [`SubMap`] and [`SubMapMut`] are logical windows over the
//! tree, bounded below and above by inclusive or exclusive keys and read in
//! ascending or descending order. A view holds no nodes: it checks keys
//! against its bounds and forwards to the tree.
//!
//! **Fail-Fast Cursors**: A [`Cursor`](iter::Cursor) is detached from the map
//! and takes it as an argument on every step. It snapshots the map's
//! modification counter and reports
//! [`Error::ConcurrentModification`](error::Error::ConcurrentModification) if
//! the map was structurally changed behind its back.
//!
//! ### Tree Structure
//!
//! ```text
//!                 ┌──────────────┐
//!                 │  50 (black)  │  <- root, always black
//!                 └──────┬───────┘
//!              ┌─────────┴─────────┐
//!              ▼                   ▼
//!       ┌────────────┐      ┌────────────┐
//!       │ 20 (black) │      │ 70 (black) │
//!       └─────┬──────┘      └─────┬──────┘
//!          ┌──┴──┐             ┌──┴──┐
//!          ▼     ▼             ▼     ▼
//!        10(r) 30(r)         60(r) 80(r)
//! ```
//!
//! ## Basic Usage
//!
//! ```
//! use redtree::TreeMap;
//!
//! let mut map = TreeMap::new();
//!
//! // Insert key-value pairs
//! map.put(20, "twenty").unwrap();
//! map.put(10, "ten").unwrap();
//! map.put(30, "thirty").unwrap();
//!
//! assert_eq!(map.get(&10), Some(&"ten"));
//! assert_eq!(map.ceiling_key(&15), Some(&20));
//! assert_eq!(map.first_key(), Ok(&10));
//!
//! // A view over [10, 30)
//! let head = map.head_map(30, false).unwrap();
//! assert_eq!(head.keys().copied().collect::<Vec<_>>(), [10, 20]);
//!
//! map.remove(&10).unwrap();
//! assert_eq!(map.len(), 2);
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize` and `Deserialize` for [`GenericTreeMap`] and
//!   [`TreeSet`]. Its tests live in `tests/serde.rs` and run with
//!   `cargo test --features serde`.
//!
//! ## Ownership
//!
//! The map is a single-owner structure: no internal locking is performed.
//! Shared borrows allow any number of concurrent readers; mutation requires
//! exclusive access.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::ops::RangeBounds;

pub mod compare;
pub mod error;
pub mod iter;
pub mod set;
pub mod view;

mod engine;
mod navigate;
mod node;
#[cfg(feature = "serde")]
mod serde_impl;

use compare::{Comparator, NaturalOrder};
use error::{Error, Result};
use iter::{Cursor, IntoIter, Iter, Keys, Values};
use node::{Arena, Colour, NodeId};

pub use set::TreeSet;
pub use view::{SubMap, SubMapMut};

// ---------------------------------------------------------------------------
// Public Type Aliases
// ---------------------------------------------------------------------------

/// An ordered map using the keys' natural ordering.
///
/// This is the recommended type for most use cases. If you need a custom
/// order, use [`GenericTreeMap::with_comparator`].
pub type TreeMap<K, V> = GenericTreeMap<K, V, NaturalOrder>;

// ---------------------------------------------------------------------------
// Core Tree Structure
// ---------------------------------------------------------------------------

/// An ordered map backed by a red-black tree, ordered by a [`Comparator`].
///
/// # Type Parameters
///
/// - `K`: The key type.
/// - `V`: The value type.
/// - `C`: The comparator. Defaults to [`NaturalOrder`].
///
/// # Internal Structure
///
/// - An **arena** owning every node; nodes link to each other by index.
/// - The **root** id, or `None` when empty.
/// - The element count, so `len()` is O(1).
/// - A **modification counter** bumped on every structural change (a node
///   created, a node destroyed, the map cleared). Cursors compare against it
///   to fail fast.
pub struct GenericTreeMap<K, V, C = NaturalOrder> {
	pub(crate) arena: Arena<K, V>,
	pub(crate) root: Option<NodeId>,
	pub(crate) len: usize,
	pub(crate) comparator: C,
	pub(crate) mod_count: u64,
}

/// Direction for traversal, and the display order of a view.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub(crate) enum Direction {
	/// Toward higher keys.
	Forward,
	/// Toward lower keys.
	Reverse,
}

impl Direction {
	#[inline]
	pub(crate) fn flip(self) -> Direction {
		match self {
			Direction::Forward => Direction::Reverse,
			Direction::Reverse => Direction::Forward,
		}
	}
}

impl<K, V, C: Default> Default for GenericTreeMap<K, V, C> {
	fn default() -> Self {
		Self::with_comparator(C::default())
	}
}

// ---------------------------------------------------------------------------
// GenericTreeMap Implementation
// ---------------------------------------------------------------------------

impl<K, V> GenericTreeMap<K, V, NaturalOrder> {
	/// Creates a new, empty map ordered by the keys' [`Ord`] implementation.
	///
	/// Does not allocate until the first insertion.
	///
	/// # Example
	///
	/// ```
	/// use redtree::TreeMap;
	///
	/// let map: TreeMap<String, i32> = TreeMap::new();
	/// assert!(map.is_empty());
	/// ```
	pub const fn new() -> Self {
		Self::with_comparator(NaturalOrder)
	}
}

impl<K, V, C> GenericTreeMap<K, V, C> {
	// -----------------------------------------------------------------------
	// Construction
	// -----------------------------------------------------------------------

	/// Creates a new, empty map ordered by `comparator`.
	///
	/// # Example
	///
	/// ```
	/// use redtree::compare::{NaturalOrder, Reverse};
	/// use redtree::GenericTreeMap;
	///
	/// let mut map = GenericTreeMap::with_comparator(Reverse(NaturalOrder));
	/// map.put(1, "one").unwrap();
	/// map.put(2, "two").unwrap();
	/// assert_eq!(map.first_key(), Ok(&2));
	/// ```
	pub const fn with_comparator(comparator: C) -> Self {
		GenericTreeMap {
			arena: Arena::new(),
			root: None,
			len: 0,
			comparator,
			mod_count: 0,
		}
	}

	/// Builds a map in linear time from entries already in strictly
	/// ascending order under `comparator`.
	///
	/// Collecting into a map or extending an empty one takes the same path
	/// automatically when its input turns out to be sorted.
	///
	/// # Errors
	///
	/// - [`Error::InvalidKey`] if the comparator does not admit some key.
	/// - [`Error::Unsorted`] if two neighbouring keys are out of order or
	///   equal.
	///
	/// # Example
	///
	/// ```
	/// use redtree::compare::NaturalOrder;
	/// use redtree::error::Error;
	/// use redtree::GenericTreeMap;
	///
	/// let map = GenericTreeMap::from_sorted_iter(NaturalOrder, (0..1000).map(|k| (k, k * 2))).unwrap();
	/// assert_eq!(map.len(), 1000);
	/// assert_eq!(map.get(&500), Some(&1000));
	///
	/// let err = GenericTreeMap::from_sorted_iter(NaturalOrder, [(2, ()), (1, ())]);
	/// assert_eq!(err.err(), Some(Error::Unsorted));
	/// ```
	pub fn from_sorted_iter<I>(comparator: C, iter: I) -> Result<Self>
	where
		C: Comparator<K>,
		I: IntoIterator<Item = (K, V)>,
	{
		let entries: Vec<(K, V)> = iter.into_iter().collect();
		let mut map = Self::with_comparator(comparator);
		map.check_sorted(&entries)?;
		map.build_from_sorted(entries);
		Ok(map)
	}

	// -----------------------------------------------------------------------
	// Tree Metadata
	// -----------------------------------------------------------------------

	/// Returns the number of entries in the map. O(1).
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns `true` if the map contains no entries.
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Returns the comparator ordering this map.
	pub fn comparator(&self) -> &C {
		&self.comparator
	}

	/// Returns the height of the tree: the number of nodes on the longest
	/// root-to-leaf path, `0` when empty.
	///
	/// Red-black balancing keeps this at most `2·log₂(len + 1)`.
	pub fn height(&self) -> usize {
		let mut height = 0;
		let mut level = Vec::from_iter(self.root);
		while !level.is_empty() {
			height += 1;
			level = level.iter().flat_map(|&id| self.arena[id].child.into_iter().flatten()).collect();
		}
		height
	}

	/// Returns the key stored at the root, if any.
	pub fn root_key(&self) -> Option<&K> {
		self.root.map(|id| &self.arena[id].key)
	}

	/// Removes all entries from the map.
	///
	/// This is a structural change: outstanding cursors become stale.
	pub fn clear(&mut self) {
		tracing::trace!(len = self.len, "clearing map");
		self.arena.clear();
		self.root = None;
		self.len = 0;
		self.mod_count += 1;
	}

	// -----------------------------------------------------------------------
	// Comparator Helpers
	// -----------------------------------------------------------------------

	#[inline]
	pub(crate) fn admits<Q>(&self, key: &Q) -> bool
	where
		Q: ?Sized,
		C: Comparator<Q>,
	{
		<C as Comparator<Q>>::admits(&self.comparator, key)
	}

	/// Compares a lookup key against a stored key.
	#[inline]
	pub(crate) fn cmp_key<Q>(&self, key: &Q, stored: &K) -> Ordering
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		<C as Comparator<Q>>::compare(&self.comparator, key, stored.borrow())
	}

	/// Checks that every key is admitted and each key orders strictly before
	/// the next.
	pub(crate) fn check_sorted(&self, entries: &[(K, V)]) -> Result<()>
	where
		C: Comparator<K>,
	{
		if entries.iter().any(|(k, _)| !self.admits(k)) {
			return Err(Error::InvalidKey);
		}
		let ascending =
			entries.windows(2).all(|pair| self.comparator.compare(&pair[0].0, &pair[1].0) == Ordering::Less);
		if ascending {
			Ok(())
		} else {
			Err(Error::Unsorted)
		}
	}

	/// Inserts each entry, skipping keys the comparator does not admit.
	fn put_all(&mut self, entries: impl Iterator<Item = (K, V)>)
	where
		C: Comparator<K>,
	{
		for (k, v) in entries {
			if self.admits(&k) {
				self.insert_entry(k, v);
			} else {
				tracing::debug!("skipping key not admitted by the comparator");
			}
		}
	}

	#[inline]
	pub(crate) fn key_of(&self, id: NodeId) -> &K {
		&self.arena[id].key
	}

	#[inline]
	pub(crate) fn entry_of(&self, id: NodeId) -> (&K, &V) {
		let node = &self.arena[id];
		(&node.key, &node.value)
	}

	// -----------------------------------------------------------------------
	// Public API: Read Operations
	// -----------------------------------------------------------------------

	/// Returns a reference to the value for `key`.
	///
	/// A key the comparator does not admit is never present.
	///
	/// # Example
	///
	/// ```
	/// use redtree::TreeMap;
	///
	/// let mut map = TreeMap::new();
	/// map.put("a".to_string(), 1).unwrap();
	///
	/// assert_eq!(map.get("a"), Some(&1));
	/// assert_eq!(map.get("b"), None);
	/// ```
	pub fn get<Q>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.find_node(key).map(|id| &self.arena[id].value)
	}

	/// Returns the stored key and the value for `key`.
	pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.find_node(key).map(|id| self.entry_of(id))
	}

	/// Returns a mutable reference to the value for `key`.
	///
	/// Replacing a value is not a structural change; cursors stay valid.
	pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		let id = self.find_node(key)?;
		Some(&mut self.arena[id].value)
	}

	/// Returns `true` if the map contains `key`.
	pub fn contains_key<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.find_node(key).is_some()
	}

	/// Returns `true` if any entry holds `value`.
	///
	/// This walks the map in key order, so it is O(n).
	pub fn contains_value(&self, value: &V) -> bool
	where
		V: PartialEq,
	{
		let mut cur = self.first_node();
		while let Some(id) = cur {
			if self.arena[id].value == *value {
				return true;
			}
			cur = self.successor(id);
		}
		false
	}

	/// Returns the lowest key.
	///
	/// # Errors
	///
	/// [`Error::Exhausted`] if the map is empty.
	pub fn first_key(&self) -> Result<&K> {
		self.first_node().map(|id| self.key_of(id)).ok_or(Error::Exhausted)
	}

	/// Returns the highest key.
	///
	/// # Errors
	///
	/// [`Error::Exhausted`] if the map is empty.
	pub fn last_key(&self) -> Result<&K> {
		self.last_node().map(|id| self.key_of(id)).ok_or(Error::Exhausted)
	}

	/// Returns the entry with the lowest key, or `None` if empty.
	pub fn first_key_value(&self) -> Option<(&K, &V)> {
		self.first_node().map(|id| self.entry_of(id))
	}

	/// Returns the entry with the highest key, or `None` if empty.
	pub fn last_key_value(&self) -> Option<(&K, &V)> {
		self.last_node().map(|id| self.entry_of(id))
	}

	// -----------------------------------------------------------------------
	// Public API: Navigation
	// -----------------------------------------------------------------------

	/// Returns the greatest key less than or equal to `key`.
	///
	/// # Example
	///
	/// ```
	/// use redtree::TreeMap;
	///
	/// let map: TreeMap<i32, ()> = [10, 20, 30].into_iter().map(|k| (k, ())).collect();
	///
	/// assert_eq!(map.floor_key(&25), Some(&20));
	/// assert_eq!(map.floor_key(&20), Some(&20));
	/// assert_eq!(map.lower_key(&20), Some(&10));
	/// assert_eq!(map.ceiling_key(&25), Some(&30));
	/// assert_eq!(map.higher_key(&30), None);
	/// ```
	pub fn floor_key<Q>(&self, key: &Q) -> Option<&K>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.floor_node(key).map(|id| self.key_of(id))
	}

	/// Returns the least key greater than or equal to `key`.
	pub fn ceiling_key<Q>(&self, key: &Q) -> Option<&K>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.ceiling_node(key).map(|id| self.key_of(id))
	}

	/// Returns the greatest key strictly less than `key`.
	pub fn lower_key<Q>(&self, key: &Q) -> Option<&K>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.lower_node(key).map(|id| self.key_of(id))
	}

	/// Returns the least key strictly greater than `key`.
	pub fn higher_key<Q>(&self, key: &Q) -> Option<&K>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.higher_node(key).map(|id| self.key_of(id))
	}

	/// Returns the entry with the greatest key less than or equal to `key`.
	pub fn floor_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.floor_node(key).map(|id| self.entry_of(id))
	}

	/// Returns the entry with the least key greater than or equal to `key`.
	pub fn ceiling_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.ceiling_node(key).map(|id| self.entry_of(id))
	}

	/// Returns the entry with the greatest key strictly less than `key`.
	pub fn lower_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.lower_node(key).map(|id| self.entry_of(id))
	}

	/// Returns the entry with the least key strictly greater than `key`.
	pub fn higher_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.higher_node(key).map(|id| self.entry_of(id))
	}

	// -----------------------------------------------------------------------
	// Public API: Write Operations
	// -----------------------------------------------------------------------

	/// Inserts a key-value pair into the map.
	///
	/// If the key already exists its value is replaced in place and the old
	/// value is returned; the stored key is kept and the tree shape does not
	/// change. Otherwise a node is created and `Ok(None)` is returned.
	///
	/// # Errors
	///
	/// [`Error::InvalidKey`] if the comparator does not admit `key`. The map
	/// is left untouched.
	///
	/// # Example
	///
	/// ```
	/// use redtree::TreeMap;
	///
	/// let mut map = TreeMap::new();
	///
	/// assert_eq!(map.put(1, "one"), Ok(None));        // New key
	/// assert_eq!(map.put(1, "uno"), Ok(Some("one"))); // Update existing
	/// assert_eq!(map.len(), 1);
	/// ```
	pub fn put(&mut self, key: K, value: V) -> Result<Option<V>>
	where
		C: Comparator<K>,
	{
		if !self.admits(&key) {
			return Err(Error::InvalidKey);
		}
		Ok(self.insert_entry(key, value))
	}

	/// Removes `key` from the map, returning its value if it was present.
	///
	/// # Errors
	///
	/// [`Error::InvalidKey`] if the comparator does not admit `key`.
	///
	/// # Example
	///
	/// ```
	/// use redtree::TreeMap;
	///
	/// let mut map = TreeMap::new();
	/// map.put(1, "one").unwrap();
	///
	/// assert_eq!(map.remove(&1), Ok(Some("one")));
	/// assert_eq!(map.remove(&1), Ok(None)); // Already removed
	/// ```
	pub fn remove<Q>(&mut self, key: &Q) -> Result<Option<V>>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.remove_entry(key).map(|entry| entry.map(|(_, v)| v))
	}

	/// Removes `key` from the map, returning the stored key and value.
	///
	/// # Errors
	///
	/// [`Error::InvalidKey`] if the comparator does not admit `key`.
	pub fn remove_entry<Q>(&mut self, key: &Q) -> Result<Option<(K, V)>>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		if !self.admits(key) {
			return Err(Error::InvalidKey);
		}
		Ok(self.find_node(key).map(|id| self.delete_node(id)))
	}

	/// Removes and returns the entry with the lowest key.
	pub fn pop_first(&mut self) -> Option<(K, V)> {
		let id = self.first_node()?;
		Some(self.delete_node(id))
	}

	/// Removes and returns the entry with the highest key.
	pub fn pop_last(&mut self) -> Option<(K, V)> {
		let id = self.last_node()?;
		Some(self.delete_node(id))
	}

	// -----------------------------------------------------------------------
	// Public API: Range Views
	// -----------------------------------------------------------------------

	/// Returns a read-only view of the keys between `from` and `to`.
	///
	/// # Errors
	///
	/// - [`Error::InvalidKey`] if the comparator does not admit a bound.
	/// - [`Error::InvalidRange`] if `from` is greater than `to`.
	pub fn sub_map(&self, from: K, from_inclusive: bool, to: K, to_inclusive: bool) -> Result<SubMap<'_, K, V, C>>
	where
		C: Comparator<K>,
	{
		let bounds = view::Bounds::full(Direction::Forward).sub(
			&self.comparator,
			(from, from_inclusive),
			(to, to_inclusive),
		)?;
		Ok(SubMap::new(self, bounds))
	}

	/// Returns a read-only view of the keys below `to` (or equal, if
	/// `inclusive`).
	///
	/// # Errors
	///
	/// [`Error::InvalidKey`] if the comparator does not admit `to`.
	///
	/// # Example
	///
	/// ```
	/// use redtree::TreeMap;
	/// use redtree::error::Error;
	///
	/// let mut map: TreeMap<i32, &str> = [(10, "a"), (20, "b"), (30, "c")].into_iter().collect();
	///
	/// let head = map.head_map(30, false).unwrap();
	/// assert_eq!(head.len(), 2);
	/// assert_eq!(head.get(&30), None);
	///
	/// let mut head = map.head_map_mut(30, false).unwrap();
	/// assert_eq!(head.put(25, "x"), Ok(None));
	/// assert_eq!(head.put(40, "y"), Err(Error::OutOfRange));
	/// ```
	pub fn head_map(&self, to: K, inclusive: bool) -> Result<SubMap<'_, K, V, C>>
	where
		C: Comparator<K>,
	{
		let bounds = view::Bounds::full(Direction::Forward).head(&self.comparator, (to, inclusive))?;
		Ok(SubMap::new(self, bounds))
	}

	/// Returns a read-only view of the keys above `from` (or equal, if
	/// `inclusive`).
	///
	/// # Errors
	///
	/// [`Error::InvalidKey`] if the comparator does not admit `from`.
	pub fn tail_map(&self, from: K, inclusive: bool) -> Result<SubMap<'_, K, V, C>>
	where
		C: Comparator<K>,
	{
		let bounds = view::Bounds::full(Direction::Forward).tail(&self.comparator, (from, inclusive))?;
		Ok(SubMap::new(self, bounds))
	}

	/// Returns a read-only view over a Rust range of keys.
	///
	/// ```
	/// use redtree::TreeMap;
	///
	/// let map: TreeMap<i32, i32> = (0..10).map(|k| (k, k * k)).collect();
	/// let squares: Vec<_> = map.range(3..=5).unwrap().values().copied().collect();
	/// assert_eq!(squares, [9, 16, 25]);
	/// ```
	///
	/// # Errors
	///
	/// Same as [`sub_map`](Self::sub_map).
	pub fn range<R>(&self, range: R) -> Result<SubMap<'_, K, V, C>>
	where
		R: RangeBounds<K>,
		K: Clone,
		C: Comparator<K>,
	{
		let bounds = view::Bounds::full(Direction::Forward).narrow(
			&self.comparator,
			range.start_bound().cloned(),
			range.end_bound().cloned(),
		)?;
		Ok(SubMap::new(self, bounds))
	}

	/// Returns a read-only view of the whole map in descending order.
	///
	/// ```
	/// use redtree::TreeMap;
	///
	/// let map: TreeMap<i32, ()> = (1..=3).map(|k| (k, ())).collect();
	/// let desc = map.descending_map();
	/// assert_eq!(desc.keys().copied().collect::<Vec<_>>(), [3, 2, 1]);
	/// assert_eq!(desc.first_key(), Ok(&3));
	/// assert_eq!(desc.ceiling_key(&2), Some(&2));
	/// assert_eq!(desc.higher_key(&2), Some(&1));
	/// ```
	pub fn descending_map(&self) -> SubMap<'_, K, V, C> {
		SubMap::new(self, view::Bounds::full(Direction::Reverse))
	}

	/// Returns a read-write view of the keys between `from` and `to`.
	///
	/// # Errors
	///
	/// Same as [`sub_map`](Self::sub_map).
	pub fn sub_map_mut(
		&mut self,
		from: K,
		from_inclusive: bool,
		to: K,
		to_inclusive: bool,
	) -> Result<SubMapMut<'_, K, V, C>>
	where
		C: Comparator<K>,
	{
		let bounds = view::Bounds::full(Direction::Forward).sub(
			&self.comparator,
			(from, from_inclusive),
			(to, to_inclusive),
		)?;
		Ok(SubMapMut::new(self, bounds))
	}

	/// Returns a read-write view of the keys below `to`.
	///
	/// # Errors
	///
	/// Same as [`head_map`](Self::head_map).
	pub fn head_map_mut(&mut self, to: K, inclusive: bool) -> Result<SubMapMut<'_, K, V, C>>
	where
		C: Comparator<K>,
	{
		let bounds = view::Bounds::full(Direction::Forward).head(&self.comparator, (to, inclusive))?;
		Ok(SubMapMut::new(self, bounds))
	}

	/// Returns a read-write view of the keys above `from`.
	///
	/// # Errors
	///
	/// Same as [`tail_map`](Self::tail_map).
	pub fn tail_map_mut(&mut self, from: K, inclusive: bool) -> Result<SubMapMut<'_, K, V, C>>
	where
		C: Comparator<K>,
	{
		let bounds = view::Bounds::full(Direction::Forward).tail(&self.comparator, (from, inclusive))?;
		Ok(SubMapMut::new(self, bounds))
	}

	/// Returns a read-write view over a Rust range of keys.
	///
	/// # Errors
	///
	/// Same as [`sub_map`](Self::sub_map).
	pub fn range_mut<R>(&mut self, range: R) -> Result<SubMapMut<'_, K, V, C>>
	where
		R: RangeBounds<K>,
		K: Clone,
		C: Comparator<K>,
	{
		let bounds = view::Bounds::full(Direction::Forward).narrow(
			&self.comparator,
			range.start_bound().cloned(),
			range.end_bound().cloned(),
		)?;
		Ok(SubMapMut::new(self, bounds))
	}

	/// Returns a read-write view of the whole map in descending order.
	pub fn descending_map_mut(&mut self) -> SubMapMut<'_, K, V, C> {
		SubMapMut::new(self, view::Bounds::full(Direction::Reverse))
	}

	// -----------------------------------------------------------------------
	// Public API: Iteration
	// -----------------------------------------------------------------------

	/// Returns an iterator over the entries in ascending key order.
	///
	/// # Example
	///
	/// ```
	/// use redtree::TreeMap;
	///
	/// let mut map = TreeMap::new();
	/// map.put(2, "two").unwrap();
	/// map.put(1, "one").unwrap();
	///
	/// let mut iter = map.iter();
	/// assert_eq!(iter.next(), Some((&1, &"one")));
	/// assert_eq!(iter.next(), Some((&2, &"two")));
	/// assert_eq!(iter.next(), None);
	/// ```
	pub fn iter(&self) -> Iter<'_, K, V, C> {
		Iter::new(self, self.cursor())
	}

	/// Returns an iterator over the entries in descending key order.
	pub fn descending_iter(&self) -> Iter<'_, K, V, C> {
		Iter::new(self, self.descending_cursor())
	}

	/// Returns an iterator over the keys in ascending order.
	pub fn keys(&self) -> Keys<'_, K, V, C> {
		Keys::new(self.iter())
	}

	/// Returns an iterator over the values in ascending key order.
	pub fn values(&self) -> Values<'_, K, V, C> {
		Values::new(self.iter())
	}

	/// Returns a detached ascending cursor positioned before the first entry.
	///
	/// Unlike [`iter`](Self::iter), a cursor does not borrow the map, so it
	/// can remove entries as it goes and detects structural changes made
	/// behind its back.
	///
	/// # Example
	///
	/// ```
	/// use redtree::TreeMap;
	///
	/// let mut map: TreeMap<i32, i32> = (0..10).map(|k| (k, k)).collect();
	///
	/// // Drop every odd key.
	/// let mut cursor = map.cursor();
	/// while cursor.has_next() {
	/// 	let (k, _) = cursor.next(&map).unwrap();
	/// 	if k % 2 == 1 {
	/// 		cursor.remove(&mut map).unwrap();
	/// 	}
	/// }
	/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [0, 2, 4, 6, 8]);
	/// ```
	pub fn cursor(&self) -> Cursor {
		Cursor::new(self, self.first_node(), None, Direction::Forward)
	}

	/// Returns a detached descending cursor positioned after the last entry.
	pub fn descending_cursor(&self) -> Cursor {
		Cursor::new(self, self.last_node(), None, Direction::Reverse)
	}
}

// ===========================================================================
// Diagnostics
// ===========================================================================

impl<K: fmt::Debug, V, C: Comparator<K>> GenericTreeMap<K, V, C> {
	/// Validates all tree invariants. Panics with diagnostic info if any
	/// invariant is violated.
	///
	/// Meant to be called from tests after operations to verify the tree
	/// kept its structure. O(n).
	///
	/// # Invariants Checked
	///
	/// 1. BST order: keys strictly increase in-order (which also gives key
	///    uniqueness)
	/// 2. No red node has a red child
	/// 3. Uniform black-height on every path to an absent child
	/// 4. The root is black and has no parent
	/// 5. Parent links agree with child links
	/// 6. Length consistency: `len` matches the reachable node count and the
	///    arena's occupied slot count
	pub fn assert_invariants(&self) {
		let Some(root) = self.root else {
			assert_eq!(self.len, 0, "Empty tree has len {}", self.len);
			assert_eq!(self.arena.occupied(), 0, "Empty tree still holds {} nodes", self.arena.occupied());
			return;
		};

		// Invariant 4: Root colour and parent
		assert_eq!(self.arena[root].colour, Colour::Black, "Root {:?} is red", self.arena[root].key);
		assert!(self.arena[root].parent.is_none(), "Root {:?} has a parent", self.arena[root].key);

		let mut count = 0;
		let mut prev: Option<&K> = None;
		self.validate_node_recursive(root, &mut count, &mut prev);

		// Invariant 6: Length consistency
		assert_eq!(count, self.len, "Reachable node count {} != len {}", count, self.len);
		assert_eq!(
			self.arena.occupied(),
			self.len,
			"Arena holds {} nodes but len is {}",
			self.arena.occupied(),
			self.len
		);
	}

	/// Validates the subtree at `id` in-order and returns its black-height.
	fn validate_node_recursive<'a>(&'a self, id: NodeId, count: &mut usize, prev: &mut Option<&'a K>) -> usize {
		let node = &self.arena[id];

		// Invariant 5: Parent links
		for child in node.child.into_iter().flatten() {
			assert_eq!(
				self.arena[child].parent,
				Some(id),
				"Child {:?} of {:?} has the wrong parent link",
				self.arena[child].key,
				node.key
			);
		}

		// Invariant 2: No red-red adjacency
		if node.colour == Colour::Red {
			for child in node.child.into_iter().flatten() {
				assert_eq!(
					self.arena[child].colour,
					Colour::Black,
					"Red node {:?} has red child {:?}",
					node.key,
					self.arena[child].key
				);
			}
		}

		let left_height = match node.left() {
			Some(left) => self.validate_node_recursive(left, count, prev),
			None => 1,
		};

		// Invariant 1: Key ordering
		if let Some(prev) = *prev {
			assert_eq!(
				self.comparator.compare(prev, &node.key),
				Ordering::Less,
				"Keys not sorted: {:?} >= {:?}",
				prev,
				node.key
			);
		}
		*prev = Some(&node.key);
		*count += 1;

		let right_height = match node.right() {
			Some(right) => self.validate_node_recursive(right, count, prev),
			None => 1,
		};

		// Invariant 3: Black-height uniformity
		assert_eq!(
			left_height, right_height,
			"Black-height mismatch under {:?}: left {} != right {}",
			node.key, left_height, right_height
		);

		left_height + usize::from(node.colour == Colour::Black)
	}
}

impl<K, V, C> GenericTreeMap<K, V, C> {
	/// Returns the number of black nodes on the path from the root to the
	/// left-most absent child, counting the absent child itself. `1` when
	/// empty.
	pub fn black_height(&self) -> usize {
		let mut height = 1;
		let mut cur = self.root;
		while let Some(id) = cur {
			height += usize::from(self.arena[id].colour == Colour::Black);
			cur = self.arena[id].left();
		}
		height
	}
}

// ===========================================================================
// Trait Implementations
// ===========================================================================

impl<K: Clone, V: Clone, C: Clone> Clone for GenericTreeMap<K, V, C> {
	fn clone(&self) -> Self {
		GenericTreeMap {
			arena: self.arena.clone(),
			root: self.root,
			len: self.len,
			comparator: self.comparator.clone(),
			mod_count: 0,
		}
	}
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for GenericTreeMap<K, V, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for GenericTreeMap<K, V, C> {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len() && self.iter().eq(other.iter())
	}
}

impl<K: Eq, V: Eq, C> Eq for GenericTreeMap<K, V, C> {}

/// Keys the comparator does not admit are skipped.
impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for GenericTreeMap<K, V, C> {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		let mut map = GenericTreeMap::default();
		map.extend(iter);
		map
	}
}

/// Keys the comparator does not admit are skipped. Extending an empty map
/// with strictly ascending input builds the tree in linear time.
impl<K, V, C: Comparator<K>> Extend<(K, V)> for GenericTreeMap<K, V, C> {
	fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
		if !self.is_empty() {
			self.put_all(iter.into_iter());
			return;
		}
		let entries: Vec<(K, V)> = iter.into_iter().collect();
		if self.check_sorted(&entries).is_ok() {
			self.build_from_sorted(entries);
		} else {
			self.put_all(entries.into_iter());
		}
	}
}

impl<'a, K, V, C> IntoIterator for &'a GenericTreeMap<K, V, C> {
	type Item = (&'a K, &'a V);

	type IntoIter = Iter<'a, K, V, C>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<K, V, C> IntoIterator for GenericTreeMap<K, V, C> {
	type Item = (K, V);

	type IntoIter = IntoIter<K, V, C>;

	fn into_iter(self) -> Self::IntoIter {
		IntoIter::new(self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::compare::{FnOrder, NoneFirst, NoneRejected, Reverse};

	// -----------------------------------------------------------------------
	// Basic Tree Operation Tests
	// -----------------------------------------------------------------------

	#[test]
	fn basic_insert_and_lookup() {
		let mut map: TreeMap<i32, &str> = TreeMap::new();

		assert_eq!(map.put(1, "one"), Ok(None));
		assert_eq!(map.put(2, "two"), Ok(None));
		assert_eq!(map.put(3, "three"), Ok(None));

		map.assert_invariants();

		assert_eq!(map.get(&1), Some(&"one"));
		assert_eq!(map.get(&2), Some(&"two"));
		assert_eq!(map.get(&3), Some(&"three"));
		assert_eq!(map.get(&4), None);
	}

	#[test]
	fn insert_update() {
		let mut map: TreeMap<i32, &str> = TreeMap::new();

		assert_eq!(map.put(1, "one"), Ok(None));
		assert_eq!(map.put(1, "uno"), Ok(Some("one")));
		assert_eq!(map.get(&1), Some(&"uno"));
		assert_eq!(map.len(), 1);

		map.assert_invariants();
	}

	#[test]
	fn update_keeps_modification_count() {
		let mut map: TreeMap<i32, i32> = TreeMap::new();
		map.put(1, 1).unwrap();
		let before = map.mod_count;

		map.put(1, 2).unwrap();
		*map.get_mut(&1).unwrap() += 1;
		assert_eq!(map.mod_count, before);

		map.put(2, 2).unwrap();
		assert_eq!(map.mod_count, before + 1);
		map.remove(&2).unwrap();
		assert_eq!(map.mod_count, before + 2);
	}

	#[test]
	fn remove() {
		let mut map: TreeMap<i32, &str> = TreeMap::new();

		map.put(1, "one").unwrap();
		map.put(2, "two").unwrap();

		map.assert_invariants();

		assert_eq!(map.remove(&1), Ok(Some("one")));
		assert_eq!(map.get(&1), None);
		assert_eq!(map.get(&2), Some(&"two"));

		map.assert_invariants();
	}

	#[test]
	fn iter_and_descending_iter() {
		let map: TreeMap<i32, i32> = (0..100).rev().map(|i| (i, i * 10)).collect();

		map.assert_invariants();

		for (expected, (k, v)) in map.iter().enumerate() {
			assert_eq!(*k, expected as i32);
			assert_eq!(*v, *k * 10);
		}

		let desc: Vec<i32> = map.descending_iter().map(|(k, _)| *k).collect();
		assert_eq!(desc, (0..100).rev().collect::<Vec<_>>());
	}

	#[test]
	fn len_and_is_empty() {
		let mut map: TreeMap<i32, i32> = TreeMap::new();

		assert!(map.is_empty());
		assert_eq!(map.len(), 0);
		assert_eq!(map.height(), 0);
		assert_eq!(map.black_height(), 1);

		map.put(1, 10).unwrap();
		assert!(!map.is_empty());
		assert_eq!(map.len(), 1);

		map.put(2, 20).unwrap();
		assert_eq!(map.len(), 2);

		map.assert_invariants();

		map.remove(&1).unwrap();
		assert_eq!(map.len(), 1);

		map.assert_invariants();
	}

	#[test]
	fn first_and_last_on_empty_map() {
		let map: TreeMap<i32, i32> = TreeMap::new();
		assert_eq!(map.first_key(), Err(Error::Exhausted));
		assert_eq!(map.last_key(), Err(Error::Exhausted));
		assert_eq!(map.first_key_value(), None);
	}

	#[test]
	fn pop_first_and_last() {
		let mut map: TreeMap<i32, char> = [(2, 'b'), (1, 'a'), (3, 'c')].into_iter().collect();

		assert_eq!(map.pop_first(), Some((1, 'a')));
		assert_eq!(map.pop_last(), Some((3, 'c')));
		assert_eq!(map.pop_last(), Some((2, 'b')));
		assert_eq!(map.pop_first(), None);

		map.assert_invariants();
	}

	#[test]
	fn clear_resets_everything() {
		let mut map: TreeMap<i32, i32> = (0..50).map(|i| (i, i)).collect();
		let before = map.mod_count;

		map.clear();

		assert!(map.is_empty());
		assert!(map.root.is_none());
		assert!(map.mod_count > before);
		map.assert_invariants();

		map.put(7, 7).unwrap();
		assert_eq!(map.first_key(), Ok(&7));
	}

	#[test]
	fn borrowed_lookups() {
		let mut map: TreeMap<String, usize> = TreeMap::new();
		for word in ["pear", "apple", "fig"] {
			map.put(word.to_string(), word.len()).unwrap();
		}

		assert_eq!(map.get("fig"), Some(&3));
		assert!(map.contains_key("apple"));
		assert_eq!(map.ceiling_key("b").map(String::as_str), Some("fig"));
		assert_eq!(map.remove("pear"), Ok(Some(4)));
	}

	// -----------------------------------------------------------------------
	// Comparator Tests
	// -----------------------------------------------------------------------

	#[test]
	fn reverse_comparator_orders_descending() {
		let mut map = GenericTreeMap::with_comparator(Reverse(NaturalOrder));
		for i in 0..20 {
			map.put(i, ()).unwrap();
		}
		map.assert_invariants();

		assert_eq!(map.first_key(), Ok(&19));
		assert_eq!(map.ceiling_key(&5), Some(&5));
		assert_eq!(map.higher_key(&5), Some(&4));
	}

	#[test]
	fn closure_comparator() {
		let mut map = GenericTreeMap::with_comparator(FnOrder(|a: &i32, b: &i32| {
			(a % 10).cmp(&(b % 10)).then(a.cmp(b))
		}));
		for k in [31, 12, 21, 3] {
			map.put(k, ()).unwrap();
		}
		let keys: Vec<i32> = map.keys().copied().collect();
		assert_eq!(keys, [21, 31, 12, 3]);
	}

	#[test]
	fn absent_key_rejected_by_default_order() {
		let mut map = GenericTreeMap::with_comparator(NoneRejected(NaturalOrder));

		assert_eq!(map.put(None, 0), Err(Error::InvalidKey));
		assert_eq!(map.remove(&None), Err(Error::InvalidKey));
		assert_eq!(map.get(&None), None);
		assert!(map.is_empty());

		map.put(Some(1), 1).unwrap();
		assert_eq!(map.floor_key(&None), None);
		assert_eq!(map.get(&Some(1)), Some(&1));
	}

	#[test]
	fn absent_key_admitted_by_comparator() {
		let mut map = GenericTreeMap::with_comparator(NoneFirst(NaturalOrder));

		map.put(Some(5), "five").unwrap();
		assert_eq!(map.put(None, "none"), Ok(None));

		assert_eq!(map.first_key(), Ok(&None));
		assert_eq!(map.remove(&None), Ok(Some("none")));
		map.assert_invariants();
	}

	#[test]
	fn contains_value_scans_in_order() {
		let mut map: TreeMap<i32, &str> = TreeMap::new();
		assert!(!map.contains_value(&"x"));

		for (k, v) in [(5, "e"), (1, "a"), (9, "i"), (3, "a")] {
			map.put(k, v).unwrap();
		}
		assert!(map.contains_value(&"a"));
		assert!(map.contains_value(&"i"));
		assert!(!map.contains_value(&"z"));

		map.remove(&9).unwrap();
		assert!(!map.contains_value(&"i"));
	}

	#[test]
	fn extend_with_custom_comparator() {
		let mut map = GenericTreeMap::with_comparator(NoneFirst(NaturalOrder));
		map.put(Some(10), 10).unwrap();
		map.extend([(Some(3), 3), (None, 0), (Some(7), 7)]);

		map.assert_invariants();
		assert_eq!(map.keys().copied().collect::<Vec<_>>(), [None, Some(3), Some(7), Some(10)]);
	}

	#[test]
	fn extend_skips_keys_the_comparator_rejects() {
		let mut map = GenericTreeMap::with_comparator(NoneRejected(NaturalOrder));
		map.extend([(Some(2), 'b'), (None, '?'), (Some(1), 'a')]);
		assert_eq!(map.len(), 2);
		assert_eq!(map.first_key(), Ok(&Some(1)));

		// The sorted fast path applies the same admission check.
		let mut sorted = GenericTreeMap::with_comparator(NoneRejected(NaturalOrder));
		sorted.extend([(None, '?'), (Some(1), 'a'), (Some(2), 'b')]);
		sorted.assert_invariants();
		assert_eq!(sorted.len(), 2);

		let collected: GenericTreeMap<Option<i32>, char, NoneRejected> =
			[(Some(1), 'a'), (None, '?')].into_iter().collect();
		assert_eq!(collected.len(), 1);
	}

	#[test]
	fn extend_empty_map_with_sorted_input_invalidates_cursors() {
		let mut map: TreeMap<i32, i32> = (0..4).map(|k| (k, k)).collect();
		let mut cursor = map.cursor();
		cursor.next(&map).unwrap();

		while map.pop_first().is_some() {}
		let before = map.mod_count;
		map.extend((0..100).map(|k| (k, k)));

		assert!(map.mod_count > before);
		assert_eq!(map.height(), 7);
		assert_eq!(cursor.next(&map), Err(Error::ConcurrentModification));
	}

	// -----------------------------------------------------------------------
	// Trait Tests
	// -----------------------------------------------------------------------

	#[test]
	fn traits() {
		let map: TreeMap<i32, i32> = (0..100).map(|x| (x, x)).collect();

		let mut map2 = TreeMap::new();
		for x in (0..100).rev() {
			map2.put(x, x).unwrap();
		}
		assert_eq!(map, map2);

		let clone = map.clone();
		clone.assert_invariants();
		assert_eq!(clone, map);

		let owned: Vec<(i32, i32)> = map2.into_iter().collect();
		assert_eq!(owned.len(), 100);
		assert!(owned.windows(2).all(|w| w[0].0 < w[1].0));

		assert_eq!(format!("{:?}", TreeMap::from_iter([(2, 'b'), (1, 'a')])), "{1: 'a', 2: 'b'}");
	}
}
