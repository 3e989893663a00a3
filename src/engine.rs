//! The balancing engine: rotations, insertion and deletion with their
//! red-black fixups.
//!
//! ## Rotation
//!
//! `rotate(x, Side::Left)` lifts x's right child into x's place:
//!
//! ```text
//!       x                 y
//!      / \               / \
//!     a   y     ──►     x   c
//!        / \           / \
//!       b   c         a   b
//! ```
//!
//! In-order sequence is preserved; only parent/child links change.
//!
//! ## Deleting a Node with Two Children
//!
//! The in-order successor's entry is swapped into the doomed node's slot and
//! the successor's vertex (which has at most one child) is unlinked instead.
//! The successor's slot is the one that is freed. Cursors rely on this: after
//! such a removal the successor's entry lives in the slot they last returned.

use std::cmp::Ordering;
use std::mem;

use crate::compare::Comparator;
use crate::node::{Colour, Node, NodeId, Side};
use crate::GenericTreeMap;

impl<K, V, C> GenericTreeMap<K, V, C> {
	// -----------------------------------------------------------------------
	// Link Helpers
	// -----------------------------------------------------------------------

	/// Colour of a possibly absent node. Absent children are black.
	#[inline]
	fn colour_of(&self, id: Option<NodeId>) -> Colour {
		id.map_or(Colour::Black, |id| self.arena[id].colour)
	}

	#[inline]
	fn set_colour(&mut self, id: Option<NodeId>, colour: Colour) {
		if let Some(id) = id {
			self.arena[id].colour = colour;
		}
	}

	#[inline]
	fn child_of(&self, id: Option<NodeId>, side: Side) -> Option<NodeId> {
		id.and_then(|id| self.arena[id][side])
	}

	/// Which child of `parent` the node `id` is.
	#[inline]
	fn side_in(&self, parent: NodeId, id: NodeId) -> Side {
		if self.arena[parent].left() == Some(id) {
			Side::Left
		} else {
			Side::Right
		}
	}

	/// Points whatever referenced `old` (its parent's child slot, or the
	/// root) at `new`.
	fn replace_in_parent(&mut self, old: NodeId, new: Option<NodeId>) {
		let parent = self.arena[old].parent;
		if let Some(new) = new {
			self.arena[new].parent = parent;
		}
		match parent {
			None => self.root = new,
			Some(p) => {
				let side = self.side_in(p, old);
				self.arena[p][side] = new;
			}
		}
	}

	// -----------------------------------------------------------------------
	// Rotation
	// -----------------------------------------------------------------------

	/// Rotates the subtree at `x` toward `dir`: x's child on the opposite
	/// side takes x's place and x becomes its `dir` child.
	pub(crate) fn rotate(&mut self, x: NodeId, dir: Side) {
		let opp = dir.opposite();
		let Some(y) = self.arena[x][opp] else {
			unreachable!("rotation without a child to lift");
		};

		let middle = self.arena[y][dir];
		self.arena[x][opp] = middle;
		if let Some(m) = middle {
			self.arena[m].parent = Some(x);
		}

		self.replace_in_parent(x, Some(y));

		self.arena[y][dir] = Some(x);
		self.arena[x].parent = Some(y);
	}

	// -----------------------------------------------------------------------
	// Lookup
	// -----------------------------------------------------------------------

	/// Finds the node holding `key`.
	pub(crate) fn find_node<Q>(&self, key: &Q) -> Option<NodeId>
	where
		K: std::borrow::Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		if !self.admits(key) {
			return None;
		}
		let mut cur = self.root;
		while let Some(id) = cur {
			let node = &self.arena[id];
			match self.cmp_key(key, &node.key) {
				Ordering::Less => cur = node.left(),
				Ordering::Greater => cur = node.right(),
				Ordering::Equal => return Some(id),
			}
		}
		None
	}

	// -----------------------------------------------------------------------
	// Insertion
	// -----------------------------------------------------------------------

	/// Inserts or replaces without validating the key.
	///
	/// Replacing an existing key's value keeps the stored key and the tree
	/// shape, and is not counted as a modification.
	pub(crate) fn insert_entry(&mut self, key: K, value: V) -> Option<V>
	where
		C: Comparator<K>,
	{
		let mut parent = None;
		let mut side = Side::Left;
		let mut cur = self.root;

		while let Some(id) = cur {
			parent = Some(id);
			match self.comparator.compare(&key, &self.arena[id].key) {
				Ordering::Less => side = Side::Left,
				Ordering::Greater => side = Side::Right,
				Ordering::Equal => return Some(mem::replace(&mut self.arena[id].value, value)),
			}
			cur = self.arena[id][side];
		}

		let id = self.arena.alloc(Node::leaf(key, value, parent));
		self.len += 1;
		self.mod_count += 1;

		match parent {
			None => {
				self.arena[id].colour = Colour::Black;
				self.root = Some(id);
			}
			Some(p) => {
				self.arena[p][side] = Some(id);
				self.fix_after_insertion(id);
			}
		}
		None
	}

	/// Restores the red-black invariants after linking the red node `x`.
	fn fix_after_insertion(&mut self, mut x: NodeId) {
		while let Some(parent) = self.arena[x].parent {
			if self.arena[parent].colour == Colour::Black {
				break;
			}
			// A red parent is never the root.
			let Some(grand) = self.arena[parent].parent else {
				break;
			};
			let side = self.side_in(grand, parent);
			let uncle = self.arena[grand][side.opposite()];

			if self.colour_of(uncle) == Colour::Red {
				// Push the blackness down from the grandparent and retry there.
				self.arena[parent].colour = Colour::Black;
				self.set_colour(uncle, Colour::Black);
				self.arena[grand].colour = Colour::Red;
				x = grand;
			} else {
				let mut top = parent;
				if self.arena[parent][side.opposite()] == Some(x) {
					// Inner grandchild: straighten into an outer one first.
					self.rotate(parent, side);
					top = x;
				}
				self.arena[top].colour = Colour::Black;
				self.arena[grand].colour = Colour::Red;
				self.rotate(grand, side.opposite());
				break;
			}
		}

		if let Some(root) = self.root {
			self.arena[root].colour = Colour::Black;
		}
	}

	// -----------------------------------------------------------------------
	// Bulk Construction
	// -----------------------------------------------------------------------

	/// Builds the tree in linear time from entries already in strictly
	/// ascending comparator order. The map must be empty.
	///
	/// Each subtree takes the middle entry of its slice as its root, so every
	/// level above the deepest is full. Nodes on the deepest incomplete level
	/// are coloured red and all others black, which balances black heights
	/// without any rotation.
	pub(crate) fn build_from_sorted(&mut self, entries: Vec<(K, V)>) {
		debug_assert!(self.root.is_none());
		let size = entries.len();
		if size == 0 {
			return;
		}
		let red_level = red_level(size);
		let mut entries = entries.into_iter();
		self.root = self.build_subtree(0, 0, size, red_level, &mut entries);
		self.len = size;
		self.mod_count += 1;
		tracing::trace!(len = size, red_level, "built tree from sorted entries");
	}

	/// Builds the subtree over slice positions `lo..hi`, pulling entries from
	/// `entries` in order. The returned root has no parent yet.
	fn build_subtree(
		&mut self,
		level: usize,
		lo: usize,
		hi: usize,
		red_level: usize,
		entries: &mut impl Iterator<Item = (K, V)>,
	) -> Option<NodeId> {
		if lo >= hi {
			return None;
		}
		let mid = lo + (hi - lo - 1) / 2;

		let left = self.build_subtree(level + 1, lo, mid, red_level, entries);
		let (key, value) = entries.next()?;
		let mut node = Node::leaf(key, value, None);
		if level != red_level {
			node.colour = Colour::Black;
		}
		node.child[0] = left;
		let id = self.arena.alloc(node);
		if let Some(left) = left {
			self.arena[left].parent = Some(id);
		}

		let right = self.build_subtree(level + 1, mid + 1, hi, red_level, entries);
		if let Some(right) = right {
			self.arena[right].parent = Some(id);
			self.arena[id].child[1] = Some(right);
		}
		Some(id)
	}

	// -----------------------------------------------------------------------
	// Deletion
	// -----------------------------------------------------------------------

	/// Unlinks the entry at `id` from the tree and returns it.
	///
	/// When `id` has two children the successor's entry moves into `id`'s
	/// slot and the successor's slot is freed instead.
	pub(crate) fn delete_node(&mut self, id: NodeId) -> (K, V) {
		self.len -= 1;
		self.mod_count += 1;

		let mut doomed = id;
		if self.arena[id].has_two_children() {
			let Some(succ) = self.successor(id) else {
				unreachable!("node with a right child has no successor");
			};
			tracing::trace!("relocating successor entry before structural removal");
			let (target, source) = self.arena.pair_mut(id, succ);
			mem::swap(&mut target.key, &mut source.key);
			mem::swap(&mut target.value, &mut source.value);
			doomed = succ;
		}

		let replacement = self.arena[doomed].left().or(self.arena[doomed].right());
		match replacement {
			Some(r) => {
				self.replace_in_parent(doomed, Some(r));
				if self.arena[doomed].colour == Colour::Black {
					self.fix_after_deletion(r);
				}
			}
			None if self.arena[doomed].parent.is_none() => {
				self.root = None;
			}
			None => {
				// Fix up while the doomed leaf stands in as the phantom child,
				// then detach it.
				if self.arena[doomed].colour == Colour::Black {
					self.fix_after_deletion(doomed);
				}
				self.replace_in_parent(doomed, None);
			}
		}

		let node = self.arena.free(doomed);
		(node.key, node.value)
	}

	/// Restores the red-black invariants after a black node above `x` was
	/// removed, leaving `x`'s path one black short.
	fn fix_after_deletion(&mut self, mut x: NodeId) {
		while Some(x) != self.root && self.arena[x].colour == Colour::Black {
			let Some(parent) = self.arena[x].parent else {
				break;
			};
			let side = self.side_in(parent, x);
			let opp = side.opposite();
			let mut sibling = self.arena[parent][opp];

			if self.colour_of(sibling) == Colour::Red {
				self.set_colour(sibling, Colour::Black);
				self.arena[parent].colour = Colour::Red;
				self.rotate(parent, side);
				sibling = self.arena[parent][opp];
			}

			if self.colour_of(self.child_of(sibling, Side::Left)) == Colour::Black
				&& self.colour_of(self.child_of(sibling, Side::Right)) == Colour::Black
			{
				self.set_colour(sibling, Colour::Red);
				x = parent;
			} else {
				if self.colour_of(self.child_of(sibling, opp)) == Colour::Black {
					let near = self.child_of(sibling, side);
					self.set_colour(near, Colour::Black);
					self.set_colour(sibling, Colour::Red);
					if let Some(s) = sibling {
						self.rotate(s, opp);
					}
					sibling = self.arena[parent][opp];
				}
				let parent_colour = self.arena[parent].colour;
				self.set_colour(sibling, parent_colour);
				self.arena[parent].colour = Colour::Black;
				let far = self.child_of(sibling, opp);
				self.set_colour(far, Colour::Black);
				self.rotate(parent, side);
				break;
			}
		}

		self.arena[x].colour = Colour::Black;
		if let Some(root) = self.root {
			self.arena[root].colour = Colour::Black;
		}
	}
}

/// The level whose nodes are red in a tree built by
/// [`GenericTreeMap::build_from_sorted`]: `floor(log2(size + 1))`, counting
/// the root as level 0. A complete tree has no node on that level.
fn red_level(size: usize) -> usize {
	let mut level = 0;
	let mut m = size + 1;
	while m > 1 {
		level += 1;
		m /= 2;
	}
	level
}
