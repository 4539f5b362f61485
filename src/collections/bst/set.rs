//! An ordered set of unique keys.
//!
//! Built on the unbalanced `RawTree`: lookups, insertion and erase cost
//! O(height), which is O(log n) for random input and O(n) for sorted input.

use super::cursor::{Cursor, RawIntoIter, RawIter};
use super::raw::RawTree;
use crate::error::Result;
use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;
use core::mem;

/// An ordered set of unique keys.
///
/// ```
/// use treekit::TreeSet;
///
/// let mut set = TreeSet::from([5, 3, 8, 1, 4]);
/// assert!(set.insert(6).1);
/// assert!(!set.insert(3).1);
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 6, 8]);
/// ```
#[derive(Clone)]
pub struct TreeSet<K> {
    tree: RawTree<K, ()>,
}

impl<K> TreeSet<K> {
    /// Creates an empty set.
    pub const fn new() -> Self {
        Self { tree: RawTree::new() }
    }

    /// Returns the number of keys in the set.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set holds no keys.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Largest number of keys a set of this key type can hold.
    pub fn max_size() -> usize {
        RawTree::<K, ()>::max_size()
    }

    /// Removes every key. Invalidates all cursors except `end()`.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Cursor to the smallest key, or `end()` if the set is empty.
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

    /// Position before `cursor`; from `end()` this is the largest key.
    pub fn retreat(&self, cursor: Cursor) -> Cursor {
        self.tree.retreat(cursor)
    }

    /// Key under `cursor`.
    ///
    /// # Errors
    /// [`Error::InvalidCursor`](crate::Error::InvalidCursor) at `end()` or for
    /// an erased element.
    pub fn get(&self, cursor: Cursor) -> Result<&K> {
        self.tree.entry(cursor).map(|(key, ())| key)
    }

    /// Erases the key under `cursor` and returns the position after it.
    ///
    /// Erasing `end()` or an already erased element does nothing and returns
    /// `end()`.
    pub fn erase(&mut self, cursor: Cursor) -> Cursor {
        self.tree.erase_at(cursor).0
    }

    /// Smallest key.
    pub fn first(&self) -> Option<&K> {
        self.tree.first().map(|id| &self.tree.node(id).key)
    }

    /// Largest key.
    pub fn last(&self) -> Option<&K> {
        self.tree.last().map(|id| &self.tree.node(id).key)
    }

    /// Removes and returns the smallest key.
    pub fn pop_first(&mut self) -> Option<K> {
        self.tree.pop_first().map(|(key, ())| key)
    }

    /// Removes and returns the largest key.
    pub fn pop_last(&mut self) -> Option<K> {
        self.tree.pop_last().map(|(key, ())| key)
    }

    /// In-order iterator over the keys.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.tree.iter(),
        }
    }
}

impl<K: Ord> TreeSet<K> {
    /// Builds a set from an initial sequence, checking its length first.
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

    /// Inserts `key` unless an equal key is present.
    ///
    /// Returns the cursor to the key now in the set and whether it was newly
    /// inserted.
    pub fn insert(&mut self, key: K) -> (Cursor, bool) {
        let (id, inserted) = self.tree.insert_unique(key, ());
        (Cursor::at(id), inserted)
    }

    /// Inserts every key, reporting one `(cursor, inserted)` pair per input.
    pub fn insert_many<I>(&mut self, keys: I) -> Vec<(Cursor, bool)>
    where
        I: IntoIterator<Item = K>,
    {
        keys.into_iter().map(|key| self.insert(key)).collect()
    }

    /// Cursor to the key equal to `key`, or `end()`.
    pub fn find<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor::new(self.tree.search(key))
    }

    /// Returns `true` if a key equal to `key` is present.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.search(key).is_some()
    }

    /// Moves every key of `other` into `self`, leaving `other` empty.
    ///
    /// Keys already present in `self` are dropped. Returns how many keys were
    /// newly inserted.
    pub fn merge(&mut self, other: &mut Self) -> usize {
        debug_event!(incoming = other.len(), len = self.len(), "merging tree set");
        let mut inserted = 0;
        for key in mem::take(other) {
            if self.insert(key).1 {
                inserted += 1;
            }
        }
        debug_event!(inserted, "merged tree set");
        inserted
    }

    #[doc(hidden)]
    pub fn check_invariants(&self) -> core::result::Result<(), &'static str> {
        self.tree.check_invariants(true)
    }
}

impl<K> Default for TreeSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for TreeSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: PartialEq> PartialEq for TreeSet<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq> Eq for TreeSet<K> {}

impl<K: Ord> FromIterator<K> for TreeSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K: Ord> Extend<K> for TreeSet<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for TreeSet<K> {
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

/// Borrowing in-order iterator over a [`TreeSet`].
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

/// Owning in-order iterator over a [`TreeSet`].
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

impl<K> IntoIterator for TreeSet<K> {
    type Item = K;
    type IntoIter = IntoIter<K>;

    fn into_iter(self) -> IntoIter<K> {
        IntoIter {
            inner: RawIntoIter::new(self.tree),
        }
    }
}

impl<'a, K> IntoIterator for &'a TreeSet<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_insert_reports_duplicates() {
        let mut set = TreeSet::new();
        let (first, inserted) = set.insert(4);
        assert!(inserted);
        let (again, inserted) = set.insert(4);
        assert!(!inserted);
        assert_eq!(first, again);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_find_and_get() {
        let set = TreeSet::from([3, 1, 2]);
        let cursor = set.find(&2);
        assert_eq!(set.get(cursor), Ok(&2));
        assert_eq!(set.find(&9), set.end());
        assert_eq!(set.get(set.end()), Err(Error::InvalidCursor));
    }

    #[test]
    fn test_borrowed_lookup() {
        let set: TreeSet<String> = ["pear", "apple"].iter().map(|s| s.to_string()).collect();
        assert!(set.contains("pear"));
        assert_eq!(set.find("plum"), set.end());
    }

    #[test]
    fn test_merge_drains_other() {
        let mut a = TreeSet::from([1, 3, 5]);
        let mut b = TreeSet::from([1, 3, 7]);
        assert_eq!(a.merge(&mut b), 1);
        assert!(b.is_empty());
        assert_eq!(a.iter().copied().collect::<Vec<_>>(), [1, 3, 5, 7]);
        a.check_invariants().unwrap();
    }

    #[test]
    fn test_pop_ends() {
        let mut set = TreeSet::from([2, 9, 4]);
        assert_eq!(set.first(), Some(&2));
        assert_eq!(set.last(), Some(&9));
        assert_eq!(set.pop_first(), Some(2));
        assert_eq!(set.pop_last(), Some(9));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_set_size_is_independent_of_key_type() {
        assert_eq!(core::mem::size_of::<TreeSet<u64>>(), core::mem::size_of::<usize>() * 4 + 8);
        assert_eq!(core::mem::size_of::<TreeSet<String>>(), core::mem::size_of::<TreeSet<u8>>());
    }

    #[test]
    fn test_debug_lists_in_order() {
        let set = TreeSet::from([2, 1, 3]);
        assert_eq!(format!("{set:?}"), "{1, 2, 3}");
    }
}
