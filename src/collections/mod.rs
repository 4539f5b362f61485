//! Ordered collections.
//!
//! - `bst`: unbalanced binary search trees (set, map and multiset)

pub mod bst;

pub use bst::{Cursor, TreeMap, TreeMultiset, TreeSet};
