//! An ordered collection that keeps repeated keys.
//!
//! A new key equal to keys already present is placed in front of every equal
//! key on its insertion path, so duplicates cluster in the left subtree of
//! their first occurrence. Range queries descend the tree once for each bound
//! and then walk the run, costing O(height + k) for k matches.

use super::cursor::{Cursor, RawIntoIter, RawIter};
use super::raw::RawTree;
use crate::error::Result;
use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;
use core::mem;

/// An ordered multiset.
///
/// ```
/// use treekit::TreeMultiset;
///
/// let bag = TreeMultiset::from([1, 2, 2, 3, 3, 3]);
/// assert_eq!(bag.count(&3), 3);
/// assert_eq!(bag.count(&4), 0);
///
/// let (lower, upper) = bag.equal_range(&2);
/// assert_eq!(bag.get(lower), Ok(&2));
/// assert_eq!(bag.get(upper), Ok(&3));
/// ```
#[derive(Clone)]
pub struct TreeMultiset<K> {
    tree: RawTree<K, ()>,
}

impl<K> TreeMultiset<K> {
    /// Creates an empty multiset.
    pub const fn new() -> Self {
        Self { tree: RawTree::new() }
    }

    /// Returns the number of elements, counting repeats.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the multiset holds no elements.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Largest number of elements a multiset of this key type can hold.
    pub fn max_size() -> usize {
        RawTree::<K, ()>::max_size()
    }

    /// Removes every element. Invalidates all cursors except `end()`.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Cursor to the smallest element, or `end()`.
    pub fn begin(&self) -> Cursor {
        self.tree.begin()
    }

    /// The end position.
    pub fn end(&self) -> Cursor {
        Cursor::END
    }

    /// Position after `cursor`; `end()` stays at `end()`.
    pub fn advance(&self, cursor: Cursor) -> Cursor {
        self.tree.advance(cursor)
    }

    /// Position before `cursor`; from `end()` this is the largest element.
    pub fn retreat(&self, cursor: Cursor) -> Cursor {
        self.tree.retreat(cursor)
    }

    /// Element under `cursor`.
    ///
    /// # Errors
    /// [`Error::InvalidCursor`](crate::Error::InvalidCursor) at `end()` or for
    /// an erased element.
    pub fn get(&self, cursor: Cursor) -> Result<&K> {
        self.tree.entry(cursor).map(|(key, ())| key)
    }

    /// Erases exactly the element under `cursor`, leaving equal elements in
    /// place, and returns the position after it.
    ///
    /// Erasing `end()` or an already erased element does nothing and returns
    /// `end()`.
    pub fn erase(&mut self, cursor: Cursor) -> Cursor {
        self.tree.erase_at(cursor).0
    }

    /// Smallest element.
    pub fn first(&self) -> Option<&K> {
        self.tree.first().map(|id| &self.tree.node(id).key)
    }

    /// Largest element.
    pub fn last(&self) -> Option<&K> {
        self.tree.last().map(|id| &self.tree.node(id).key)
    }

    /// Removes and returns one smallest element.
    pub fn pop_first(&mut self) -> Option<K> {
        self.tree.pop_first().map(|(key, ())| key)
    }

    /// Removes and returns one largest element.
    pub fn pop_last(&mut self) -> Option<K> {
        self.tree.pop_last().map(|(key, ())| key)
    }

    /// In-order iterator; equal elements appear once per occurrence.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.tree.iter(),
        }
    }
}

impl<K: Ord> TreeMultiset<K> {
    /// Builds a multiset from an initial sequence, checking its length first.
    ///
    /// # Errors
    /// [`Error::CapacityExceeded`](crate::Error::CapacityExceeded) when the
    /// sequence is longer than [`max_size`](Self::max_size). Nothing is
    /// allocated in that case.
    pub fn try_from_items<I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        I::IntoIter: ExactSizeIterator,
    {
        let items = items.into_iter();
        RawTree::<K, ()>::check_capacity(items.len())?;
        Ok(items.collect())
    }

    /// Inserts `key`, always adding a new element.
    pub fn insert(&mut self, key: K) -> Cursor {
        Cursor::at(self.tree.insert_multi(key, ()))
    }

    /// Inserts every key. Each result is `(cursor, true)`.
    pub fn insert_many<I>(&mut self, keys: I) -> Vec<(Cursor, bool)>
    where
        I: IntoIterator<Item = K>,
    {
        keys.into_iter().map(|key| (self.insert(key), true)).collect()
    }

    /// Number of elements equal to `key`.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.range_of(key).len()
    }

    /// Cursor to some element equal to `key`, or `end()`.
    pub fn find<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor::new(self.tree.search(key))
    }

    /// Returns `true` if an element equal to `key` is present.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.search(key).is_some()
    }

    /// Cursor to the first element not less than `key`, or `end()`.
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor::new(self.tree.lower_bound(key))
    }

    /// Cursor to the first element greater than `key`, or `end()`.
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor::new(self.tree.upper_bound(key))
    }

    /// `(lower_bound(key), upper_bound(key))`: the half-open run of elements
    /// equal to `key`. Both cursors are equal when there is none.
    pub fn equal_range<Q>(&self, key: &Q) -> (Cursor, Cursor)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// In-order iterator over the elements equal to `key`.
    pub fn range_of<Q>(&self, key: &Q) -> Iter<'_, K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Iter {
            inner: self
                .tree
                .iter_between(self.tree.lower_bound(key), self.tree.upper_bound(key)),
        }
    }

    /// Moves every element of `other` into `self`, leaving `other` empty.
    pub fn merge(&mut self, other: &mut Self) {
        debug_event!(incoming = other.len(), len = self.len(), "merging tree multiset");
        for key in mem::take(other) {
            self.tree.insert_multi(key, ());
        }
    }

    #[doc(hidden)]
    pub fn check_invariants(&self) -> core::result::Result<(), &'static str> {
        self.tree.check_invariants(false)
    }
}

impl<K> Default for TreeMultiset<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for TreeMultiset<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K: PartialEq> PartialEq for TreeMultiset<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq> Eq for TreeMultiset<K> {}

impl<K: Ord> FromIterator<K> for TreeMultiset<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut bag = Self::new();
        bag.extend(iter);
        bag
    }
}

impl<K: Ord> Extend<K> for TreeMultiset<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for TreeMultiset<K> {
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

/// Borrowing in-order iterator over a [`TreeMultiset`].
pub struct Iter<'a, K> {
    inner: RawIter<'a, K, ()>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(key, ())| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> DoubleEndedIterator for Iter<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, ())| key)
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Owning in-order iterator over a [`TreeMultiset`].
pub struct IntoIter<K> {
    inner: RawIntoIter<K, ()>,
}

impl<K> Iterator for IntoIter<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(key, ())| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> DoubleEndedIterator for IntoIter<K> {
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back().map(|(key, ())| key)
    }
}

impl<K> ExactSizeIterator for IntoIter<K> {}

impl<K> FusedIterator for IntoIter<K> {}

impl<K> IntoIterator for TreeMultiset<K> {
    type Item = K;
    type IntoIter = IntoIter<K>;

    fn into_iter(self) -> IntoIter<K> {
        IntoIter {
            inner: RawIntoIter::new(self.tree),
        }
    }
}

impl<'a, K> IntoIterator for &'a TreeMultiset<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}
