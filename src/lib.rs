//! # `treekit` - Unbalanced Binary Search Trees
//!
//! Ordered set, map and multiset containers built on one plain binary search
//! tree whose nodes know their parent. The tree is never rebalanced: its shape
//! is exactly the one produced by the insertion order, and `height()` exposes it.
//!
//! ## Containers
//!
//! - [`TreeSet`]: unique keys.
//! - [`TreeMap`]: unique keys, each with a value.
//! - [`TreeMultiset`]: repeated keys with `count`, `lower_bound`,
//!   `upper_bound` and `equal_range`.
//!
//! ## Architecture
//!
//! Nodes are owned by a slot arena and refer to each other by index. Parent
//! links are plain back-references, so they never own or free a node, and
//! dropping a container drops its arena in one pass no matter how deep the tree
//! has grown.
//!
//! Positions are [`Cursor`]s: small `Copy` handles that do not borrow the
//! container. They move through the container (`advance`, `retreat`) and are
//! accepted by positional `erase`. A cursor stays valid until the element it
//! names is erased; the end position is always valid.
//!
//! ### Complexity
//!
//! | operation            | cost            |
//! |----------------------|-----------------|
//! | insert, find, erase  | O(height)       |
//! | advance, retreat     | O(height) worst, O(1) amortized over a full walk |
//! | iteration            | O(n)            |
//! | clone                | O(n)            |
//!
//! `height` is O(log n) for random insertion order and n for sorted input.
//!
//! ## Features
//!
//! - `tracing`: emit structured events for structural changes.
//! - `proptest`: export strategies generating populated trees.
//!
//! ## Example
//!
//! ```rust
//! use treekit::{TreeMap, TreeSet};
//!
//! let mut set = TreeSet::new();
//! for key in [5, 3, 8, 1, 4] {
//!     set.insert(key);
//! }
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 8]);
//!
//! // Erase through a cursor; the returned cursor is the next position.
//! let next = set.erase(set.find(&3));
//! assert_eq!(set.get(next), Ok(&4));
//!
//! let mut map: TreeMap<&str, u32> = TreeMap::new();
//! *map.get_or_insert_default("hits") += 1;
//! assert_eq!(map.at(&"hits"), Ok(&1));
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

#[macro_use]
mod trace;

pub mod collections;
pub mod error;

pub use collections::{Cursor, TreeMap, TreeMultiset, TreeSet};
pub use error::{Error, Result};

// Compile-time assertions for memory layout
const _: () = {
    use core::mem;

    // A cursor is a single niche-packed node index.
    assert!(mem::size_of::<Cursor>() == mem::size_of::<u32>());

    // A container is the arena's vector header, then a u32 length and two u32
    // node indices.
    assert!(mem::size_of::<TreeSet<u64>>() == mem::size_of::<usize>() * 4 + 8);
};
