//! Error type shared by the bucket engine and its facades

use thiserror::Error;

/// Failures reported by the chained tables.
///
/// A missing key is never an error: lookups and removals report absence through
/// `Option` or `bool`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A table parameter or a bucket count is unusable
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Human readable description of the rejected parameter
        reason: String,
    },
    /// Memory for the bucket array or one of its chains could not be allocated
    #[error("could not allocate {requested_buckets} buckets while growing the table")]
    ResourceExhausted {
        /// Bucket count of the array being populated when allocation failed
        requested_buckets: usize,
    },
    /// A cursor was used after its table was structurally modified, or with a
    /// table other than the one that created it
    #[error("cursor invalidated: {cause}")]
    IteratorInvalidated {
        /// What made the cursor unusable
        cause: Invalidation,
    },
}

/// Why a [`Cursor`](crate::Cursor) can no longer be advanced
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// The table gained or lost entries, was resized or was cleared
    #[error("created at generation {expected}, table is at {found}")]
    Modified {
        /// Generation captured when the cursor was created
        expected: u64,
        /// Generation of the table when the cursor was used
        found: u64,
    },
    /// The cursor was created by a different table
    #[error("created by table {expected}, used with table {found}")]
    ForeignTable {
        /// Identity of the table that created the cursor
        expected: u64,
        /// Identity of the table the cursor was passed to
        found: u64,
    },
}

impl TableError {
    /// Shorthand for building an [`TableError::InvalidArgument`]
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument { reason: reason.into() }
    }
}
