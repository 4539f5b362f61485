//! Error types shared by the tree containers.

use thiserror::Error;

/// Failures reported by the tree containers.
///
/// Lookups that can legitimately miss (`find`, `contains`, `count`, the bound
/// queries) report absence through their return value instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// `at` was called with a key that has no entry.
    #[error("key not found")]
    NotFound,

    /// An initial item sequence is longer than the container can address.
    ///
    /// Raised before any node is allocated.
    #[error("cannot hold {requested} items, maximum is {max}")]
    CapacityExceeded {
        /// Number of items offered.
        requested: usize,
        /// The container's `max_size()`.
        max: usize,
    },

    /// A cursor was dereferenced at the end position, or its node has been
    /// erased.
    #[error("cursor does not reference a live element")]
    InvalidCursor,
}

/// Result alias defaulting to [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Error::NotFound.to_string(), "key not found");
        assert_eq!(
            Error::CapacityExceeded { requested: 10, max: 4 }.to_string(),
            "cannot hold 10 items, maximum is 4"
        );
        assert_eq!(
            Error::InvalidCursor.to_string(),
            "cursor does not reference a live element"
        );
    }

    #[test]
    fn test_is_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<Error>();
    }
}
