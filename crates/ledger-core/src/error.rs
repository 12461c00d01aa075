//! # Error Types
//!
//! Error types for ledger-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ledger-core errors (this file)                                        │
//! │  ├── DecimalError  - capacity, parsing, rendering, range failures      │
//! │  ├── TableError    - schema, position, type and lifetime failures      │
//! │  └── CoreError     - either of the above (aggregation results)         │
//! │                                                                         │
//! │  ledger-book errors (separate crate)                                   │
//! │  └── BookError     - container lookups, wraps CoreError                │
//! │                                                                         │
//! │  Flow: DecimalError → TableError → CoreError → BookError → CLI         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every failure is recoverable: the operation had no effect
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::table::ColumnType;

// =============================================================================
// Decimal Error
// =============================================================================

/// Failures of [`Decimal`](crate::Decimal) operations.
///
/// A failed operation always leaves the decimal exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecimalError {
    /// Requested more fractional digits than total digits.
    #[error("scale {scale} exceeds digit capacity {capacity}")]
    ScaleExceedsCapacity { scale: usize, capacity: usize },

    /// Text contained no digit at all.
    #[error("no digits found in decimal text")]
    NoDigits,

    /// Text had characters after the numeric prefix (strict parsing only).
    #[error("unexpected character at byte {position}")]
    TrailingCharacters { position: usize },

    /// The integer part does not fit the requested native integer type.
    #[error("decimal value does not fit in a 64-bit integer")]
    OutOfRange,

    /// Output buffer cannot hold the rendered text.
    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Digit storage could not be grown.
    #[error("could not allocate {digits} digits")]
    AllocationFailed { digits: usize },
}

// =============================================================================
// Table Error
// =============================================================================

/// Failures of [`Table`](crate::Table) and [`Mark`](crate::Mark) operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A column type code outside the known set.
    #[error("invalid column type code {0}")]
    InvalidColumnType(i32),

    /// The schema cannot change while rows exist.
    ///
    /// ## When This Occurs
    /// - `set_column_types` on a table that already holds rows
    #[error("cannot change columns of a table holding {rows} rows")]
    SchemaLocked { rows: usize },

    /// Rows cannot be added before columns are configured.
    #[error("table has no columns")]
    NoColumns,

    /// The mark does not address a row (or an insertion point for `add_row`).
    #[error("mark position {position} does not address a row")]
    InvalidPosition { position: isize },

    /// Column index past the end of the schema.
    #[error("column {column} out of range (table has {count} columns)")]
    ColumnOutOfRange { column: usize, count: usize },

    /// A typed accessor was used on a column of another type.
    #[error("column {column} holds {found} values, not {expected}")]
    TypeMismatch {
        column: usize,
        expected: ColumnType,
        found: ColumnType,
    },

    /// Output buffer cannot hold the rendered cell.
    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Mutation attempted through a read-only mark.
    #[error("mark is read-only")]
    ReadOnlyMark,

    /// Every handle to the table was released before the mark was used.
    #[error("table behind this mark has been released")]
    TableReleased,

    /// The table is already borrowed by an operation in progress.
    ///
    /// ## When This Occurs
    /// - Writing through one mark from inside a `with_decimal` callback of another
    #[error("table is busy")]
    Busy,

    /// Row storage could not be grown.
    #[error("could not allocate table storage")]
    AllocationFailed,

    /// A decimal cell operation failed.
    #[error(transparent)]
    Decimal(#[from] DecimalError),
}

// =============================================================================
// Core Error
// =============================================================================

/// Any ledger-core failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("decimal error: {0}")]
    Decimal(#[from] DecimalError),

    #[error("table error: {0}")]
    Table(#[from] TableError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

pub type DecimalResult<T> = Result<T, DecimalError>;

pub type TableResult<T> = Result<T, TableError>;

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
