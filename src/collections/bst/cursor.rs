//! Cursors and in-order iteration over a `RawTree`.
//!
//! A [`Cursor`] is a detached position: it names a node (or the end position)
//! without borrowing the container, so it can be kept across mutations and
//! handed back for positional erase. Every move goes through the container,
//! which follows the parent/child links of the current node.
//!
//! Invalidation:
//! - erasing an element invalidates cursors to that element only;
//! - `clear` invalidates every cursor except `end()`;
//! - an invalidated cursor dereferences to [`Error::InvalidCursor`] until its
//!   slot is reused by a later insertion, after which it names the new element.

use super::node::NodeId;
use super::raw::RawTree;
use crate::error::{Error, Result};
use core::fmt;
use core::iter::FusedIterator;

/// A position inside a tree container, or the end position.
///
/// Two cursors are equal when they name the same node, or are both at the end.
/// Cursors are only meaningful for the container that produced them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cursor {
    node: Option<NodeId>,
}

impl Cursor {
    /// The end position shared by every container.
    pub const END: Cursor = Cursor { node: None };

    #[inline]
    pub(crate) fn new(node: Option<NodeId>) -> Self {
        Self { node }
    }

    #[inline]
    pub(crate) fn at(node: NodeId) -> Self {
        Self { node: Some(node) }
    }

    /// Returns `true` at the end position.
    #[inline]
    pub fn is_end(self) -> bool {
        self.node.is_none()
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            Some(id) => write!(f, "Cursor({})", id.index()),
            None => f.write_str("Cursor(end)"),
        }
    }
}

impl<K, V> RawTree<K, V> {
    // Node behind a cursor, if it is still live.
    #[inline]
    fn live(&self, cursor: Cursor) -> Option<NodeId> {
        cursor.node.filter(|&id| self.contains(id))
    }

    pub(crate) fn begin(&self) -> Cursor {
        Cursor::new(self.first())
    }

    /// Successor position. The end position and dead cursors move to the end.
    pub(crate) fn advance(&self, cursor: Cursor) -> Cursor {
        match self.live(cursor) {
            Some(id) => Cursor::new(self.successor(id)),
            None => Cursor::END,
        }
    }

    /// Predecessor position. The end position moves to the maximum.
    pub(crate) fn retreat(&self, cursor: Cursor) -> Cursor {
        match cursor.node {
            None => Cursor::new(self.last()),
            Some(id) if self.contains(id) => Cursor::new(self.predecessor(id)),
            Some(_) => Cursor::END,
        }
    }

    pub(crate) fn entry(&self, cursor: Cursor) -> Result<(&K, &V)> {
        cursor
            .node
            .and_then(|id| self.get(id))
            .map(|node| (&node.key, &node.value))
            .ok_or(Error::InvalidCursor)
    }

    pub(crate) fn value_mut(&mut self, cursor: Cursor) -> Result<&mut V> {
        cursor
            .node
            .and_then(|id| self.get_mut(id))
            .map(|node| &mut node.value)
            .ok_or(Error::InvalidCursor)
    }

    /// Erases the element under `cursor` and returns the position after it.
    ///
    /// The end position and dead cursors are a no-op yielding `(END, None)`.
    pub(crate) fn erase_at(&mut self, cursor: Cursor) -> (Cursor, Option<(K, V)>) {
        match self.live(cursor) {
            Some(id) => {
                let next = Cursor::new(self.successor(id));
                (next, Some(self.erase(id)))
            }
            None => (Cursor::END, None),
        }
    }

    pub(crate) fn iter(&self) -> RawIter<'_, K, V> {
        RawIter {
            tree: self,
            front: self.first(),
            back: self.last(),
            remaining: self.len(),
        }
    }

    /// In-order iterator over the run `[lower, upper)`.
    pub(crate) fn iter_between(&self, lower: Option<NodeId>, upper: Option<NodeId>) -> RawIter<'_, K, V> {
        let back = match upper {
            Some(id) => self.predecessor(id),
            None => self.last(),
        };
        let mut remaining = 0;
        let mut current = lower;
        while current.is_some() && current != upper {
            remaining += 1;
            current = current.and_then(|id| self.successor(id));
        }
        RawIter {
            tree: self,
            front: lower,
            back,
            remaining,
        }
    }
}

/// Borrowing in-order iterator over a `RawTree`.
pub(crate) struct RawIter<'a, K, V> {
    tree: &'a RawTree<K, V>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for RawIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.remaining -= 1;
        self.front = self.tree.successor(id);
        let node = self.tree.node(id);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for RawIter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.remaining -= 1;
        self.back = self.tree.predecessor(id);
        let node = self.tree.node(id);
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for RawIter<'_, K, V> {}

impl<K, V> FusedIterator for RawIter<'_, K, V> {}

impl<K, V> Clone for RawIter<'_, K, V> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

/// Owning in-order iterator; unlinks each node as it is yielded.
pub(crate) struct RawIntoIter<K, V> {
    tree: RawTree<K, V>,
    front: Option<NodeId>,
    back: Option<NodeId>,
}

impl<K, V> RawIntoIter<K, V> {
    pub(crate) fn new(tree: RawTree<K, V>) -> Self {
        let front = tree.first();
        let back = tree.last();
        Self { tree, front, back }
    }
}

impl<K, V> Iterator for RawIntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        if self.tree.is_empty() {
            return None;
        }
        // `front` is the current minimum, so it has no left child: the next
        // minimum is the leftmost node of its right subtree, else its parent.
        let id = self.front?;
        let node = self.tree.node(id);
        self.front = match node.right {
            Some(right) => Some(self.tree.minimum(right)),
            None => node.parent,
        };
        Some(self.tree.erase(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

impl<K, V> DoubleEndedIterator for RawIntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        if self.tree.is_empty() {
            return None;
        }
        let id = self.back?;
        let node = self.tree.node(id);
        self.back = match node.left {
            Some(left) => Some(self.tree.maximum(left)),
            None => node.parent,
        };
        Some(self.tree.erase(id))
    }
}

impl<K, V> ExactSizeIterator for RawIntoIter<K, V> {}

impl<K, V> FusedIterator for RawIntoIter<K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(keys: &[i32]) -> RawTree<i32, ()> {
        let mut tree = RawTree::new();
        for &k in keys {
            tree.insert_unique(k, ());
        }
        tree
    }

    fn key_at(tree: &RawTree<i32, ()>, cursor: Cursor) -> Option<i32> {
        tree.entry(cursor).ok().map(|(k, _)| *k)
    }

    #[test]
    fn test_cursor_walk_forward_and_back() {
        let tree = tree(&[5, 3, 8, 1, 4]);
        let mut cursor = tree.begin();
        let mut forward = Vec::new();
        while !cursor.is_end() {
            forward.push(key_at(&tree, cursor).unwrap());
            cursor = tree.advance(cursor);
        }
        assert_eq!(forward, vec![1, 3, 4, 5, 8]);

        let mut backward = Vec::new();
        let mut cursor = tree.retreat(Cursor::END);
        while !cursor.is_end() {
            backward.push(key_at(&tree, cursor).unwrap());
            cursor = tree.retreat(cursor);
        }
        assert_eq!(backward, vec![8, 5, 4, 3, 1]);
    }

    #[test]
    fn test_end_positions() {
        let empty = RawTree::<i32, ()>::new();
        assert_eq!(empty.begin(), Cursor::END);
        assert_eq!(empty.retreat(Cursor::END), Cursor::END);
        assert_eq!(empty.advance(Cursor::END), Cursor::END);
        assert_eq!(empty.entry(Cursor::END).unwrap_err(), Error::InvalidCursor);

        let tree = tree(&[2, 1]);
        assert_eq!(tree.advance(Cursor::END), Cursor::END);
        assert_eq!(tree.retreat(tree.begin()), Cursor::END);
    }

    #[test]
    fn test_erase_at_returns_successor() {
        let mut tree = tree(&[2, 1, 3]);
        let cursor = Cursor::new(tree.search(&2));
        let (next, entry) = tree.erase_at(cursor);
        assert_eq!(entry, Some((2, ())));
        assert_eq!(key_at(&tree, next), Some(3));

        // Dead cursor.
        assert_eq!(tree.erase_at(cursor), (Cursor::END, None));
        assert_eq!(tree.entry(cursor).unwrap_err(), Error::InvalidCursor);
        assert_eq!(tree.advance(cursor), Cursor::END);
        assert_eq!(tree.erase_at(Cursor::END), (Cursor::END, None));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_dead_cursor_on_every_accessor() {
        let mut tree: RawTree<i32, u8> = RawTree::new();
        for k in [2, 1, 3] {
            tree.insert_unique(k, 0);
        }
        let one = Cursor::new(tree.search(&1));
        tree.erase_at(one);

        assert_eq!(tree.retreat(one), Cursor::END);
        assert_eq!(tree.advance(one), Cursor::END);
        assert_eq!(tree.entry(one).unwrap_err(), Error::InvalidCursor);
        assert_eq!(tree.value_mut(one).unwrap_err(), Error::InvalidCursor);

        let three = Cursor::new(tree.search(&3));
        *tree.value_mut(three).unwrap() = 7;
        assert_eq!(tree.entry(three).unwrap(), (&3, &7));
    }

    #[test]
    fn test_iter_both_ends() {
        let tree = tree(&[4, 2, 6, 1, 3, 5, 7]);
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 7);
        assert_eq!(iter.next().map(|(k, _)| *k), Some(1));
        assert_eq!(iter.next_back().map(|(k, _)| *k), Some(7));
        let middle: Vec<_> = iter.map(|(k, _)| *k).collect();
        assert_eq!(middle, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_iter_meets_in_the_middle() {
        let tree = tree(&[1, 2]);
        let mut iter = tree.iter();
        assert!(iter.next().is_some());
        assert!(iter.next_back().is_some());
        assert!(iter.next().is_none());
        assert!(iter.next_back().is_none());
    }

    #[test]
    fn test_iter_between() {
        let mut tree = RawTree::new();
        for k in [1, 2, 2, 3, 3, 3, 5] {
            tree.insert_multi(k, ());
        }
        let run: Vec<_> = tree
            .iter_between(tree.lower_bound(&3), tree.upper_bound(&3))
            .map(|(k, _)| *k)
            .collect();
        assert_eq!(run, vec![3, 3, 3]);
        assert_eq!(tree.iter_between(tree.lower_bound(&4), tree.upper_bound(&4)).len(), 0);
        assert_eq!(
            tree.iter_between(tree.lower_bound(&5), tree.upper_bound(&5)).rev().count(),
            1
        );
    }

    #[test]
    fn test_into_iter_drains_in_order() {
        let tree = tree(&[50, 30, 70, 20, 40, 60, 80, 35, 45]);
        let keys: Vec<_> = RawIntoIter::new(tree).map(|(k, _)| k).collect();
        assert_eq!(keys, vec![20, 30, 35, 40, 45, 50, 60, 70, 80]);
    }

    #[test]
    fn test_into_iter_alternating_ends() {
        let source = tree(&[50, 30, 70, 20, 40, 60, 80, 35, 45, 65]);
        let mut iter = RawIntoIter::new(source);
        let mut out = Vec::new();
        loop {
            match iter.next() {
                Some((k, _)) => out.push(k),
                None => break,
            }
            match iter.next_back() {
                Some((k, _)) => out.push(k),
                None => break,
            }
        }
        assert_eq!(out, vec![20, 80, 30, 70, 35, 65, 40, 60, 45, 50]);
        assert_eq!(iter.len(), 0);
    }

    #[test]
    fn test_into_iter_reverse_chain() {
        let mut chain = RawTree::new();
        for k in (0..1_000).rev() {
            chain.insert_unique(k, ());
        }
        let keys: Vec<_> = RawIntoIter::new(chain).map(|(k, _)| k).collect();
        assert_eq!(keys, (0..1_000).collect::<Vec<_>>());
    }
}
