//! The unbalanced binary search tree shared by every container.
//!
//! The tree keeps a root handle into its [`NodeArena`]; each node knows its
//! parent, left and right neighbours. All navigation (minimum, maximum,
//! successor, predecessor) follows those links directly, without a stack.
//!
//! Two orderings are supported over the same nodes:
//! - unique keys (`left < node < right`), used by the set and the map;
//! - repeated keys (`left <= node <= right`), used by the multiset. A new key
//!   equal to an existing one always descends to the left, so it lands in
//!   front of the equal keys already encountered on its path.
//!
//! No balancing is performed. Sorted insertion degrades the tree to a list and
//! every operation to O(n); `height` makes that observable.
//!
//! Deletion relinks nodes structurally (transplant). The node holding the
//! erased key is released; its in-order successor, if relinked into the vacated
//! position, keeps its handle.

use super::node::{Node, NodeArena, NodeId, Side};
use crate::error::{Error, Result};
use core::borrow::Borrow;
use core::cmp::Ordering;

/// Position where a missing key would be linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Vacancy {
    parent: Option<NodeId>,
    side: Side,
}

pub(crate) struct RawTree<K, V> {
    arena: NodeArena<K, V>,
    root: Option<NodeId>,
}

impl<K, V> RawTree<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            root: None,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn max_size() -> usize {
        NodeArena::<K, V>::max_size()
    }

    /// Rejects an initial sequence longer than the arena can address.
    pub(crate) fn check_capacity(requested: usize) -> Result<()> {
        let max = Self::max_size();
        if requested > max {
            warn_event!(requested, max, "rejecting oversized initial sequence");
            return Err(Error::CapacityExceeded { requested, max });
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        &self.arena[id]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        &mut self.arena[id]
    }

    /// Live node behind `id`, or `None` for a vacated slot.
    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.arena.get(id)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<K, V>> {
        self.arena.get_mut(id)
    }

    #[inline]
    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id)
    }

    fn extreme(&self, mut id: NodeId, side: Side) -> NodeId {
        while let Some(child) = self.arena[id].child(side) {
            id = child;
        }
        id
    }

    /// Leftmost node of the subtree rooted at `id`.
    pub(crate) fn minimum(&self, id: NodeId) -> NodeId {
        self.extreme(id, Side::Left)
    }

    /// Rightmost node of the subtree rooted at `id`.
    pub(crate) fn maximum(&self, id: NodeId) -> NodeId {
        self.extreme(id, Side::Right)
    }

    pub(crate) fn first(&self) -> Option<NodeId> {
        self.root.map(|root| self.minimum(root))
    }

    pub(crate) fn last(&self) -> Option<NodeId> {
        self.root.map(|root| self.maximum(root))
    }

    // One in-order step towards `side`. Descends into the `side` subtree when
    // there is one, otherwise climbs until arriving from the opposite side.
    fn step(&self, id: NodeId, side: Side) -> Option<NodeId> {
        if let Some(child) = self.arena[id].child(side) {
            return Some(self.extreme(child, side.opposite()));
        }
        let mut current = id;
        let mut parent = self.arena[id].parent;
        while let Some(p) = parent {
            if self.arena[p].child(side) != Some(current) {
                break;
            }
            current = p;
            parent = self.arena[p].parent;
        }
        parent
    }

    /// In-order successor, `None` after the maximum.
    pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
        self.step(id, Side::Right)
    }

    /// In-order predecessor, `None` before the minimum.
    pub(crate) fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        self.step(id, Side::Left)
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.arena[id];
            stack.extend(node.left.map(|l| (l, depth + 1)));
            stack.extend(node.right.map(|r| (r, depth + 1)));
        }
        height
    }

    /// Allocates a node at `vacancy` and links it to its parent.
    pub(crate) fn link(&mut self, vacancy: Vacancy, key: K, value: V) -> NodeId {
        let id = self.arena.alloc(key, value, vacancy.parent);
        match vacancy.parent {
            None => self.root = Some(id),
            Some(parent) => *self.arena[parent].child_mut(vacancy.side) = Some(id),
        }
        trace_event!(node = ?id, parent = ?vacancy.parent, len = self.len(), "linked node");
        id
    }

    // Replaces the subtree rooted at `u` with the one rooted at `v` in `u`'s
    // parent. `u` keeps its own stale links.
    fn transplant(&mut self, u: NodeId, v: Option<NodeId>) {
        let parent = self.arena[u].parent;
        match parent {
            None => self.root = v,
            Some(p) => {
                let node = &mut self.arena[p];
                if node.left == Some(u) {
                    node.left = v;
                } else {
                    node.right = v;
                }
            }
        }
        if let Some(v) = v {
            self.arena[v].parent = parent;
        }
    }

    /// Unlinks `id` and returns its entry.
    ///
    /// With two children the in-order successor is relinked into the vacated
    /// position; every other node keeps its handle.
    pub(crate) fn erase(&mut self, id: NodeId) -> (K, V) {
        let (left, right) = {
            let node = &self.arena[id];
            (node.left, node.right)
        };
        match (left, right) {
            (None, _) => self.transplant(id, right),
            (Some(_), None) => self.transplant(id, left),
            (Some(left), Some(right)) => {
                let successor = self.minimum(right);
                if self.arena[successor].parent != Some(id) {
                    let successor_right = self.arena[successor].right;
                    self.transplant(successor, successor_right);
                    self.arena[successor].right = Some(right);
                    self.arena[right].parent = Some(successor);
                }
                self.transplant(id, Some(successor));
                self.arena[successor].left = Some(left);
                self.arena[left].parent = Some(successor);
            }
        }

        let node = match self.arena.release(id) {
            Some(node) => node,
            None => unreachable!("erased node {id:?} was linked but vacant"),
        };
        trace_event!(node = ?id, len = self.len(), "unlinked node");
        (node.key, node.value)
    }

    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        self.first().map(|id| self.erase(id))
    }

    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        self.last().map(|id| self.erase(id))
    }

    /// Drops every node.
    pub(crate) fn clear(&mut self) {
        debug_event!(len = self.len(), "clearing tree");
        self.arena.clear();
        self.root = None;
    }
}

impl<K: Ord, V> RawTree<K, V> {
    /// Node holding a key equal to `key`, if any.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            current = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Unique-key descent: the node holding `key`, or where it would go.
    pub(crate) fn find_slot<Q>(&self, key: &Q) -> core::result::Result<NodeId, Vacancy>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut vacancy = Vacancy {
            parent: None,
            side: Side::Left,
        };
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            let side = match key.cmp(node.key.borrow()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Ok(id),
            };
            vacancy = Vacancy {
                parent: Some(id),
                side,
            };
            current = node.child(side);
        }
        Err(vacancy)
    }

    /// Links a new node unless an equal key exists.
    ///
    /// On a hit the existing node is returned untouched and `key`/`value` are
    /// dropped.
    pub(crate) fn insert_unique(&mut self, key: K, value: V) -> (NodeId, bool) {
        match self.find_slot(&key) {
            Ok(id) => (id, false),
            Err(vacancy) => (self.link(vacancy, key, value), true),
        }
    }

    /// Always links a new node; keys equal to a visited node go left.
    pub(crate) fn insert_multi(&mut self, key: K, value: V) -> NodeId {
        let mut vacancy = Vacancy {
            parent: None,
            side: Side::Left,
        };
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            let side = if key <= node.key { Side::Left } else { Side::Right };
            vacancy = Vacancy {
                parent: Some(id),
                side,
            };
            current = node.child(side);
        }
        self.link(vacancy, key, value)
    }

    /// First node in order whose key is not less than `key`.
    pub(crate) fn lower_bound<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut found = None;
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            if node.key.borrow() < key {
                current = node.right;
            } else {
                found = Some(id);
                current = node.left;
            }
        }
        found
    }

    /// First node in order whose key is greater than `key`.
    pub(crate) fn upper_bound<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut found = None;
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            if node.key.borrow() > key {
                found = Some(id);
                current = node.left;
            } else {
                current = node.right;
            }
        }
        found
    }

    /// Verifies the structural invariants, walking the tree in order.
    ///
    /// With `unique` set, equal adjacent keys are rejected as well.
    pub(crate) fn check_invariants(&self, unique: bool) -> core::result::Result<(), &'static str> {
        match self.root {
            None if self.len() != 0 => return Err("empty root with nonzero length"),
            Some(root) => match self.arena.get(root) {
                None => return Err("root handle is vacant"),
                Some(node) if node.parent.is_some() => return Err("root node has a parent link"),
                Some(_) => {}
            },
            None => {}
        }

        let mut count = 0;
        let mut prev: Option<NodeId> = None;
        let mut current = self.first();
        while let Some(id) = current {
            count += 1;
            if count > self.len() {
                return Err("in-order walk visits more nodes than len");
            }
            let node = &self.arena[id];
            for child in [node.left, node.right].into_iter().flatten() {
                match self.arena.get(child) {
                    None => return Err("child handle is vacant"),
                    Some(c) if c.parent != Some(id) => {
                        return Err("child does not point back to its parent")
                    }
                    Some(_) => {}
                }
            }
            if let Some(prev) = prev {
                match self.arena[prev].key.cmp(&node.key) {
                    Ordering::Greater => return Err("keys out of order"),
                    Ordering::Equal if unique => return Err("duplicate key in unique tree"),
                    _ => {}
                }
            }
            prev = Some(id);
            current = self.successor(id);
        }

        if count != self.len() {
            return Err("len does not match reachable node count");
        }
        Ok(())
    }
}

impl<K, V> Default for RawTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for RawTree<K, V> {
    /// Copies the tree shape node by node into a densely packed arena.
    fn clone(&self) -> Self {
        let mut out = Self {
            arena: NodeArena::with_capacity(self.len()),
            root: None,
        };
        let mut stack: Vec<(NodeId, Vacancy)> = Vec::new();
        if let Some(root) = self.root {
            stack.push((
                root,
                Vacancy {
                    parent: None,
                    side: Side::Left,
                },
            ));
        }
        while let Some((source, vacancy)) = stack.pop() {
            let node = &self.arena[source];
            let id = out.link(vacancy, node.key.clone(), node.value.clone());
            for (side, child) in [(Side::Right, node.right), (Side::Left, node.left)] {
                if let Some(child) = child {
                    let vacancy = Vacancy {
                        parent: Some(id),
                        side,
                    };
                    stack.push((child, vacancy));
                }
            }
        }
        out
    }
}
