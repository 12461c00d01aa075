//! # Book Error Types
//!
//! Error types for container lookups and path resolution.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Book Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Lookup       │  │     Paths       │  │     Storage             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  IndexOutOfRange│  │  InvalidSegment │  │  Core (decimal/table)   │ │
//! │  │  NotFound       │  │  UnexpectedKind │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use ledger_core::{CoreError, DecimalError, TableError};
use thiserror::Error;

use crate::item::ObjectKind;

/// Result type alias for book operations.
pub type BookResult<T> = Result<T, BookError>;

/// Failures of book-level operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookError {
    // =========================================================================
    // Lookup Errors
    // =========================================================================
    /// Positional access past the end of a container.
    #[error("{kind} index {index} out of range ({count} present)")]
    IndexOutOfRange {
        kind: ObjectKind,
        index: usize,
        count: usize,
    },

    /// No object matched a path segment.
    #[error("{kind} not found: {key}")]
    NotFound { kind: ObjectKind, key: String },

    // =========================================================================
    // Path Errors
    // =========================================================================
    /// A path segment that is not `.`, `..` or `kind:NAME|#ID|@INDEX`.
    #[error("invalid path segment '{0}'")]
    InvalidSegment(String),

    /// A segment names a kind that cannot live at that point of the tree.
    #[error("no {kind} objects under {parent}")]
    UnexpectedKind { kind: ObjectKind, parent: String },

    // =========================================================================
    // Storage Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<TableError> for BookError {
    fn from(err: TableError) -> Self {
        BookError::Core(err.into())
    }
}

impl From<DecimalError> for BookError {
    fn from(err: DecimalError) -> Self {
        BookError::Core(err.into())
    }
}
