//! Unbalanced binary search trees with parent back-references.
//!
//! Nodes live in a slot arena and link to their parent and children by index,
//! so a tree can walk in both directions without a stack. Three containers
//! share one engine:
//! - [`TreeSet`]: unique keys;
//! - [`TreeMap`]: unique keys with an associated value;
//! - [`TreeMultiset`]: repeated keys, stored as contiguous runs in key order.
//!
//! Positions are expressed as [`Cursor`]s, which do not borrow the container.

mod node;
mod raw;

pub mod cursor;
pub mod map;
pub mod multiset;
pub mod set;
#[cfg(feature = "proptest")]
pub mod strategy;

pub use cursor::Cursor;
pub use map::TreeMap;
pub use multiset::TreeMultiset;
pub use set::TreeSet;
