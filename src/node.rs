//! Tree vertices and the arena that owns them.
//!
//! ## Ownership Model
//!
//! ```text
//!   Arena (Vec of slots) ── owns ──► every Node
//!
//!          ┌──────────┐
//!          │  Node 0  │ parent: None
//!          │  (root)  │ child: [Some(1), Some(2)]
//!          └──┬────┬──┘
//!     child   │    │   child
//!             ▼    ▼
//!      ┌────────┐ ┌────────┐
//!      │ Node 1 │ │ Node 2 │  parent: Some(0)  (lookup only)
//!      └────────┘ └────────┘
//! ```
//!
//! Storage belongs to the arena. The child links define the tree relation:
//! each node is the child of exactly one parent (or is the root). The parent
//! link is a non-owning back-reference used for upward traversal and fixup,
//! and is kept consistent with the child links after every rotation and
//! splice.
//!
//! Freed slots are recycled through a free list, so a [`NodeId`] can name a
//! different entry after a deletion. Anything holding a `NodeId` across a
//! structural change must revalidate it (cursors do this through the map's
//! modification counter).

use std::ops::{Index, IndexMut};

/// Index of a node slot in the [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// The colour of a node. See the crate documentation for the invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Colour {
	Red,
	Black,
}

/// Which child of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
	Left,
	Right,
}

impl Side {
	/// Get the opposite side.
	#[inline]
	pub(crate) fn opposite(self) -> Side {
		match self {
			Side::Left => Side::Right,
			Side::Right => Side::Left,
		}
	}
}

/// A tree vertex: one key-value pair plus its links and colour.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
	pub(crate) key: K,
	pub(crate) value: V,
	pub(crate) colour: Colour,
	/// `None` iff this node is the root.
	pub(crate) parent: Option<NodeId>,
	pub(crate) child: [Option<NodeId>; 2],
}

impl<K, V> Node<K, V> {
	/// A fresh red leaf hanging off `parent`.
	pub(crate) fn leaf(key: K, value: V, parent: Option<NodeId>) -> Self {
		Node {
			key,
			value,
			colour: Colour::Red,
			parent,
			child: [None, None],
		}
	}

	#[inline]
	pub(crate) fn left(&self) -> Option<NodeId> {
		self.child[0]
	}

	#[inline]
	pub(crate) fn right(&self) -> Option<NodeId> {
		self.child[1]
	}

	#[inline]
	pub(crate) fn has_two_children(&self) -> bool {
		self.child[0].is_some() && self.child[1].is_some()
	}
}

impl<K, V> Index<Side> for Node<K, V> {
	type Output = Option<NodeId>;

	fn index(&self, side: Side) -> &Self::Output {
		match side {
			Side::Left => &self.child[0],
			Side::Right => &self.child[1],
		}
	}
}

impl<K, V> IndexMut<Side> for Node<K, V> {
	fn index_mut(&mut self, side: Side) -> &mut Self::Output {
		match side {
			Side::Left => &mut self.child[0],
			Side::Right => &mut self.child[1],
		}
	}
}

/// Slot storage for nodes with a LIFO free list.
#[derive(Debug, Clone)]
pub(crate) struct Arena<K, V> {
	slots: Vec<Option<Node<K, V>>>,
	free: Vec<usize>,
}

impl<K, V> Arena<K, V> {
	pub(crate) const fn new() -> Self {
		Arena {
			slots: Vec::new(),
			free: Vec::new(),
		}
	}

	/// Stores `node`, reusing a freed slot when one is available.
	pub(crate) fn alloc(&mut self, node: Node<K, V>) -> NodeId {
		match self.free.pop() {
			Some(idx) => {
				debug_assert!(self.slots[idx].is_none());
				self.slots[idx] = Some(node);
				NodeId(idx)
			}
			None => {
				self.slots.push(Some(node));
				NodeId(self.slots.len() - 1)
			}
		}
	}

	/// Takes the node out of its slot and puts the slot on the free list.
	///
	/// The caller must already have unlinked the node from the tree.
	pub(crate) fn free(&mut self, id: NodeId) -> Node<K, V> {
		match self.slots.get_mut(id.0).and_then(Option::take) {
			Some(node) => {
				self.free.push(id.0);
				node
			}
			None => unreachable!("freed vacant arena slot {}", id.0),
		}
	}

	/// Returns the node in slot `id`, or `None` if the slot is vacant or out
	/// of bounds. Used wherever the id comes from outside the engine.
	#[inline]
	pub(crate) fn get(&self, id: NodeId) -> Option<&Node<K, V>> {
		self.slots.get(id.0).and_then(Option::as_ref)
	}

	#[inline]
	pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<K, V>> {
		self.slots.get_mut(id.0).and_then(Option::as_mut)
	}

	/// Mutable access to two distinct nodes at once.
	pub(crate) fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut Node<K, V>, &mut Node<K, V>) {
		debug_assert_ne!(a, b, "pair_mut needs distinct slots");
		let (first, second, swapped) = if a.0 < b.0 {
			(a.0, b.0, false)
		} else {
			(b.0, a.0, true)
		};
		let (lo, hi) = self.slots.split_at_mut(second);
		match (lo[first].as_mut(), hi[0].as_mut()) {
			(Some(x), Some(y)) if swapped => (y, x),
			(Some(x), Some(y)) => (x, y),
			_ => unreachable!("pair_mut on vacant arena slot"),
		}
	}

	/// Number of occupied slots.
	pub(crate) fn occupied(&self) -> usize {
		self.slots.len() - self.free.len()
	}

	/// Drops every node and releases the slot storage.
	pub(crate) fn clear(&mut self) {
		self.slots.clear();
		self.free.clear();
	}
}

impl<K, V> Index<NodeId> for Arena<K, V> {
	type Output = Node<K, V>;

	#[inline]
	fn index(&self, id: NodeId) -> &Self::Output {
		match self.get(id) {
			Some(node) => node,
			None => unreachable!("dangling node id {}", id.0),
		}
	}
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
	#[inline]
	fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
		match self.get_mut(id) {
			Some(node) => node,
			None => unreachable!("dangling node id {}", id.0),
		}
	}
}
