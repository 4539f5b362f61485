//! `proptest` strategies producing populated trees.
//!
//! Random keys give shallow, bushy trees; the `sorted_*` strategies feed keys
//! in ascending order and so produce the degenerate right-leaning chain.

use super::{TreeMap, TreeMultiset, TreeSet};
use proptest::collection::{vec, SizeRange};
use proptest::prelude::*;

/// Sets built from keys drawn from `keys`, inserted in generation order.
pub fn tree_set<S>(keys: S, size: impl Into<SizeRange>) -> impl Strategy<Value = TreeSet<S::Value>>
where
    S: Strategy,
    S::Value: Ord,
{
    vec(keys, size).prop_map(TreeSet::from_iter)
}

/// Maps built from generated entries. Later duplicates of a key are dropped.
pub fn tree_map<KS, VS>(
    keys: KS,
    values: VS,
    size: impl Into<SizeRange>,
) -> impl Strategy<Value = TreeMap<KS::Value, VS::Value>>
where
    KS: Strategy,
    KS::Value: Ord,
    VS: Strategy,
{
    vec((keys, values), size).prop_map(TreeMap::from_iter)
}

/// Multisets built from keys drawn from `keys`, duplicates kept.
pub fn tree_multiset<S>(keys: S, size: impl Into<SizeRange>) -> impl Strategy<Value = TreeMultiset<S::Value>>
where
    S: Strategy,
    S::Value: Ord,
{
    vec(keys, size).prop_map(TreeMultiset::from_iter)
}

/// Sets whose keys were inserted in ascending order.
pub fn sorted_tree_set<S>(keys: S, size: impl Into<SizeRange>) -> impl Strategy<Value = TreeSet<S::Value>>
where
    S: Strategy,
    S::Value: Ord,
{
    vec(keys, size).prop_map(|mut keys| {
        keys.sort();
        keys.into_iter().collect()
    })
}

/// Multisets whose keys were inserted in ascending order.
pub fn sorted_tree_multiset<S>(
    keys: S,
    size: impl Into<SizeRange>,
) -> impl Strategy<Value = TreeMultiset<S::Value>>
where
    S: Strategy,
    S::Value: Ord,
{
    vec(keys, size).prop_map(|mut keys| {
        keys.sort();
        keys.into_iter().collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_sets_hold_invariants(set in tree_set(any::<u16>(), 0..64)) {
            prop_assert!(set.check_invariants().is_ok());
        }

        #[test]
        fn sorted_sets_degenerate(set in sorted_tree_set(any::<u32>(), 1..64)) {
            prop_assert_eq!(set.height(), set.len());
        }

        #[test]
        fn generated_multisets_keep_duplicates(keys in vec(0u8..8, 0..64)) {
            let bag: TreeMultiset<u8> = keys.iter().copied().collect();
            prop_assert_eq!(bag.len(), keys.len());
            prop_assert!(bag.check_invariants().is_ok());
        }

        #[test]
        fn generated_maps_hold_invariants(map in tree_map(0u8..32, any::<i32>(), 0..64)) {
            prop_assert!(map.check_invariants().is_ok());
        }
    }
}
