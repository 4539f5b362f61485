//! An ordered map with unique keys.
//!
//! Entries are stored as key/value nodes of an unbalanced binary search tree.
//! Besides key lookups the map hands out [`Cursor`]s for positional access and
//! erase; see the `cursor` module for their invalidation rules.

use super::cursor::{Cursor, RawIntoIter, RawIter};
use super::raw::RawTree;
use crate::error::{Error, Result};
use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;
use core::mem;

/// An ordered map with unique keys.
///
/// ```
/// use treekit::{Error, TreeMap};
///
/// let mut map = TreeMap::from([(2, "two"), (1, "one")]);
/// assert_eq!(map.at(&1), Ok(&"one"));
/// assert_eq!(map.at(&9), Err(Error::NotFound));
///
/// let (_, inserted) = map.insert_or_assign(2, "deux");
/// assert!(!inserted);
/// assert_eq!(map.find(&2), Some(&"deux"));
/// ```
#[derive(Clone)]
pub struct TreeMap<K, V> {
    tree: RawTree<K, V>,
}

impl<K, V> TreeMap<K, V> {
    /// Creates an empty map.
    pub const fn new() -> Self {
        Self { tree: RawTree::new() }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Largest number of entries a map of these types can hold.
    pub fn max_size() -> usize {
        RawTree::<K, V>::max_size()
    }

    /// Removes every entry. Invalidates all cursors except `end()`.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Cursor to the entry with the smallest key, or `end()`.
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

    /// Entry under `cursor`.
    ///
    /// # Errors
    /// [`Error::InvalidCursor`] at `end()` or for an erased entry.
    pub fn get(&self, cursor: Cursor) -> Result<(&K, &V)> {
        self.tree.entry(cursor)
    }

    /// Mutable value under `cursor`.
    ///
    /// # Errors
    /// [`Error::InvalidCursor`] at `end()` or for an erased entry.
    pub fn get_value_mut(&mut self, cursor: Cursor) -> Result<&mut V> {
        self.tree.value_mut(cursor)
    }

    /// Erases the entry under `cursor` and returns the position after it.
    ///
    /// Erasing `end()` or an already erased entry does nothing and returns
    /// `end()`.
    pub fn erase(&mut self, cursor: Cursor) -> Cursor {
        self.tree.erase_at(cursor).0
    }

    /// Entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|id| {
            let node = self.tree.node(id);
            (&node.key, &node.value)
        })
    }

    /// Entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|id| {
            let node = self.tree.node(id);
            (&node.key, &node.value)
        })
    }

    /// Removes and returns the entry with the smallest key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.tree.pop_first()
    }

    /// Removes and returns the entry with the largest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.tree.pop_last()
    }

    /// In-order iterator over the entries.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.tree.iter(),
        }
    }

    /// In-order iterator over the keys.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Values in key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.iter().map(|(_, value)| value)
    }
}

impl<K: Ord, V> TreeMap<K, V> {
    /// Builds a map from an initial sequence of pairs, checking its length
    /// first. Later duplicates of a key are ignored.
    ///
    /// # Errors
    /// [`Error::CapacityExceeded`] when the sequence is longer than
    /// [`max_size`](Self::max_size). Nothing is allocated in that case.
    pub fn try_from_items<I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: ExactSizeIterator,
    {
        let items = items.into_iter();
        RawTree::<K, V>::check_capacity(items.len())?;
        Ok(items.collect())
    }

    /// Value for `key`, if present.
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.search(key).map(|id| &self.tree.node(id).value)
    }

    /// Mutable value for `key`, if present.
    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.tree.search(key)?;
        Some(&mut self.tree.node_mut(id).value)
    }

    /// Cursor to the entry for `key`, or `end()`.
    pub fn position<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor::new(self.tree.search(key))
    }

    /// Value for `key`.
    ///
    /// # Errors
    /// [`Error::NotFound`] if the key is absent.
    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).ok_or(Error::NotFound)
    }

    /// Mutable value for `key`.
    ///
    /// # Errors
    /// [`Error::NotFound`] if the key is absent.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_mut(key).ok_or(Error::NotFound)
    }

    /// Value for `key`, inserting `V::default()` first if the key is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let id = match self.tree.find_slot(&key) {
            Ok(id) => id,
            Err(vacancy) => self.tree.link(vacancy, key, V::default()),
        };
        &mut self.tree.node_mut(id).value
    }

    /// Returns `true` if the map has an entry for `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.search(key).is_some()
    }

    /// Inserts the entry unless the key is present; an existing value is left
    /// untouched.
    ///
    /// Returns the cursor to the entry for `key` and whether it was newly
    /// inserted.
    pub fn insert(&mut self, key: K, value: V) -> (Cursor, bool) {
        let (id, inserted) = self.tree.insert_unique(key, value);
        (Cursor::at(id), inserted)
    }

    /// Inserts the entry, or overwrites the value of an existing key.
    ///
    /// The flag is `true` for an insertion and `false` for an assignment.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (Cursor, bool) {
        match self.tree.find_slot(&key) {
            Ok(id) => {
                self.tree.node_mut(id).value = value;
                (Cursor::at(id), false)
            }
            Err(vacancy) => (Cursor::at(self.tree.link(vacancy, key, value)), true),
        }
    }

    /// Inserts every pair, reporting one `(cursor, inserted)` result per input.
    pub fn insert_many<I>(&mut self, entries: I) -> Vec<(Cursor, bool)>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        entries
            .into_iter()
            .map(|(key, value)| self.insert(key, value))
            .collect()
    }

    /// Moves every entry of `other` into `self`, leaving `other` empty.
    ///
    /// For keys present in both maps `self`'s value is kept and `other`'s entry
    /// is dropped. Returns how many entries were newly inserted.
    pub fn merge(&mut self, other: &mut Self) -> usize {
        debug_event!(incoming = other.len(), len = self.len(), "merging tree map");
        let mut inserted = 0;
        for (key, value) in mem::take(other) {
            if self.insert(key, value).1 {
                inserted += 1;
            }
        }
        debug_event!(inserted, "merged tree map");
        inserted
    }

    #[doc(hidden)]
    pub fn check_invariants(&self) -> core::result::Result<(), &'static str> {
        self.tree.check_invariants(true)
    }
}

impl<K, V> Default for TreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for TreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for TreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for TreeMap<K, V> {}

impl<K: Ord, V> FromIterator<(K, V)> for TreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for TreeMap<K, V> {
    /// Inserts each pair; keys already present keep their value.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for TreeMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Borrowing in-order iterator over a [`TreeMap`].
pub struct Iter<'a, K, V> {
    inner: RawIter<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Owning in-order iterator over a [`TreeMap`].
pub struct IntoIter<K, V> {
    inner: RawIntoIter<K, V>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> IntoIterator for TreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            inner: RawIntoIter::new(self.tree),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a TreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_existing_value() {
        let mut map = TreeMap::new();
        assert!(map.insert(1, "a").1);
        let (cursor, inserted) = map.insert(1, "b");
        assert!(!inserted);
        assert_eq!(map.get(cursor), Ok((&1, &"a")));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_insert_or_assign() {
        let mut map = TreeMap::new();
        let (first, inserted) = map.insert_or_assign("k", 1);
        assert!(inserted);
        let (second, inserted) = map.insert_or_assign("k", 2);
        assert!(!inserted);
        assert_eq!(first, second);
        assert_eq!(map.find("k"), Some(&2));
    }

    #[test]
    fn test_get_or_insert_default() {
        let mut map: TreeMap<&str, u32> = TreeMap::new();
        *map.get_or_insert_default("hits") += 1;
        *map.get_or_insert_default("hits") += 1;
        assert_eq!(map.at("hits"), Ok(&2));
        assert_eq!(map.get_or_insert_default("misses"), &mut 0);
        assert_eq!(map.len(), 2);
        map.check_invariants().unwrap();
    }

    #[test]
    fn test_at_missing() {
        let mut map = TreeMap::from([(1, 10)]);
        assert_eq!(map.at(&2), Err(Error::NotFound));
        assert_eq!(map.at_mut(&2), Err(Error::NotFound));
        *map.at_mut(&1).unwrap() = 11;
        assert_eq!(map.at(&1), Ok(&11));
    }

    #[test]
    fn test_value_mut_through_cursor() {
        let mut map = TreeMap::from([(1, 'a'), (2, 'b')]);
        let cursor = map.position(&2);
        *map.get_value_mut(cursor).unwrap() = 'z';
        assert_eq!(map.find(&2), Some(&'z'));
        assert_eq!(map.get_value_mut(map.end()), Err(Error::InvalidCursor));
    }

    #[test]
    fn test_merge_keeps_own_values() {
        let mut a = TreeMap::from([(1, "a1"), (2, "a2")]);
        let mut b = TreeMap::from([(2, "b2"), (3, "b3")]);
        assert_eq!(a.merge(&mut b), 1);
        assert!(b.is_empty());
        assert_eq!(
            a.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
            [(1, "a1"), (2, "a2"), (3, "b3")]
        );
    }

    #[test]
    fn test_keys_and_values() {
        let map = TreeMap::from([(3, 'c'), (1, 'a'), (2, 'b')]);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(map.values().rev().copied().collect::<String>(), "cba");
    }

    #[test]
    fn test_debug() {
        let map = TreeMap::from([(2, 'b'), (1, 'a')]);
        assert_eq!(format!("{map:?}"), "{1: 'a', 2: 'b'}");
    }
}
