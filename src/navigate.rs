//! In-order stepping and closest-key descents.
//!
//! All of these are O(log n) and return node ids; the public API in the crate
//! root and in the views turns them into references.

use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::compare::Comparator;
use crate::node::{NodeId, Side};
use crate::GenericTreeMap;

impl<K, V, C> GenericTreeMap<K, V, C> {
	/// The left-most node, holding the lowest key.
	pub(crate) fn first_node(&self) -> Option<NodeId> {
		self.root.map(|id| self.extreme(id, Side::Left))
	}

	/// The right-most node, holding the highest key.
	pub(crate) fn last_node(&self) -> Option<NodeId> {
		self.root.map(|id| self.extreme(id, Side::Right))
	}

	/// Follows `side` links from `id` as far as they go.
	fn extreme(&self, mut id: NodeId, side: Side) -> NodeId {
		while let Some(next) = self.arena[id][side] {
			id = next;
		}
		id
	}

	/// The in-order successor of `id`.
	pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
		self.step(id, Side::Right)
	}

	/// The in-order predecessor of `id`.
	pub(crate) fn predecessor(&self, id: NodeId) -> Option<NodeId> {
		self.step(id, Side::Left)
	}

	/// One in-order step toward `side`: the nearest node of the `side`
	/// subtree if there is one, otherwise the first ancestor reached from its
	/// opposite side.
	fn step(&self, id: NodeId, side: Side) -> Option<NodeId> {
		if let Some(child) = self.arena[id][side] {
			return Some(self.extreme(child, side.opposite()));
		}
		let mut cur = id;
		let mut parent = self.arena[id].parent;
		while let Some(p) = parent {
			if self.arena[p][side] != Some(cur) {
				return Some(p);
			}
			cur = p;
			parent = self.arena[p].parent;
		}
		None
	}

	/// Least node with key >= `key`.
	pub(crate) fn ceiling_node<Q>(&self, key: &Q) -> Option<NodeId>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.closest(key, true, true)
	}

	/// Greatest node with key <= `key`.
	pub(crate) fn floor_node<Q>(&self, key: &Q) -> Option<NodeId>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.closest(key, false, true)
	}

	/// Least node with key > `key`.
	pub(crate) fn higher_node<Q>(&self, key: &Q) -> Option<NodeId>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.closest(key, true, false)
	}

	/// Greatest node with key < `key`.
	pub(crate) fn lower_node<Q>(&self, key: &Q) -> Option<NodeId>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		self.closest(key, false, false)
	}

	/// Single descent from the root remembering the best candidate seen on
	/// the wanted side of `key`.
	fn closest<Q>(&self, key: &Q, above: bool, inclusive: bool) -> Option<NodeId>
	where
		K: Borrow<Q>,
		Q: ?Sized,
		C: Comparator<Q>,
	{
		if !self.admits(key) {
			return None;
		}
		let mut best = None;
		let mut cur = self.root;
		while let Some(id) = cur {
			let node = &self.arena[id];
			cur = match self.cmp_key(key, &node.key) {
				Ordering::Equal if inclusive => return Some(id),
				Ordering::Less => {
					if above {
						best = Some(id);
					}
					node.left()
				}
				Ordering::Greater => {
					if !above {
						best = Some(id);
					}
					node.right()
				}
				Ordering::Equal if above => node.right(),
				Ordering::Equal => node.left(),
			};
		}
		best
	}
}

#[cfg(test)]
mod tests {
	use crate::TreeMap;

	#[test]
	fn step_through_every_node() {
		let map: TreeMap<i32, ()> = (0..64).map(|k| (k * 2, ())).collect();

		let mut cur = map.first_node();
		let mut seen = Vec::new();
		while let Some(id) = cur {
			seen.push(*map.key_of(id));
			cur = map.successor(id);
		}
		assert_eq!(seen, (0..64).map(|k| k * 2).collect::<Vec<_>>());

		let mut cur = map.last_node();
		let mut count = 0;
		while let Some(id) = cur {
			count += 1;
			cur = map.predecessor(id);
		}
		assert_eq!(count, 64);
	}

	#[test]
	fn closest_key_descents() {
		let map: TreeMap<i32, ()> = [10, 20, 30].into_iter().map(|k| (k, ())).collect();
		let key = |id: Option<_>| id.map(|id| *map.key_of(id));

		assert_eq!(key(map.ceiling_node(&15)), Some(20));
		assert_eq!(key(map.ceiling_node(&20)), Some(20));
		assert_eq!(key(map.higher_node(&20)), Some(30));
		assert_eq!(key(map.higher_node(&30)), None);
		assert_eq!(key(map.floor_node(&25)), Some(20));
		assert_eq!(key(map.floor_node(&5)), None);
		assert_eq!(key(map.lower_node(&20)), Some(10));
		assert_eq!(key(map.lower_node(&10)), None);
	}
}
