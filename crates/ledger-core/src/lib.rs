//! # ledger-core: Storage & Numeric Primitives
//!
//! This crate is the **heart** of the ledger toolkit. It holds the two data
//! structures that make exact bookkeeping possible without floating point,
//! plus the routine that sums one into the other.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ledger Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    ledger-cli (navigator)                       │   │
//! │  │    list ──► enter ──► post ──► balance                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          ledger-book (Book, Ledger, Account, Journal, Entry)   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ledger-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────────┐  ┌───────────┐              │   │
//! │  │   │  decimal  │  │     table     │  │    sum    │              │   │
//! │  │   │  Decimal  │◄─│  Table, Mark  │◄─│ sum_column│              │   │
//! │  │   └───────────┘  └───────────────┘  └───────────┘              │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOGGING • SINGLE-THREADED • TYPED ERRORS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`decimal`] - Arbitrary-precision fixed-scale decimal numbers
//! - [`table`] - Typed row store and cursor marks
//! - [`sum`] - Column aggregation
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use ledger_core::{sum_column, ColumnType, Decimal, Table};
//!
//! let table = Table::new();
//! table
//!     .set_column_types(&[ColumnType::Decimal, ColumnType::Text])
//!     .unwrap();
//!
//! let mark = table.end();
//! mark.add_row().unwrap();
//! mark.put_decimal(0, &"19.99".parse().unwrap()).unwrap();
//! mark.put_text(1, "lunch").unwrap();
//!
//! let mut balance = Decimal::new();
//! sum_column(&mut balance, &table, 0).unwrap();
//! assert_eq!(format!("{:+}", balance), "+19.99");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod decimal;
pub mod error;
pub mod sum;
pub mod table;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use decimal::{Decimal, DEFAULT_TEXT_SCALE};
pub use error::{CoreError, CoreResult, DecimalError, DecimalResult, TableError, TableResult};
pub use sum::{column_total, sum_column};
pub use table::{ColumnType, Mark, Table};
