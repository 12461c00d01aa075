//! # ledger-book: Accounting Containers
//!
//! Books, ledgers, accounts, journals and entries built on the
//! [`ledger_core`] primitives, plus [`ObjectPath`] for addressing them.
//!
//! ## Modules
//!
//! - [`account`] - Accounts and their transaction tables
//! - [`book`] - The root container
//! - [`entry`] - Journal entries
//! - [`journal`] - Ordered entry lists
//! - [`ledger`] - Ordered account lists
//! - [`item`] - Shared name/description/id handling and labels
//! - [`path`] - Path resolution and rendering
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use ledger_book::{Account, Book, Ledger, ObjectPath, TransactionLine};
//!
//! let mut book = Book::new();
//! let mut ledger = Ledger::with_name("Main");
//! ledger.add_account(Account::with_name("Cash").unwrap());
//! book.add_ledger(ledger);
//!
//! let path = ObjectPath::compute(&book, "/ledger:Main/account:Cash", ObjectPath::Book).unwrap();
//! let ObjectPath::Account(l, a) = path else { unreachable!() };
//! let cash = book.ledger(l).unwrap().account(a).unwrap();
//! cash.post_line(&TransactionLine::new("42.10".parse().unwrap(), "float"))
//!     .unwrap();
//!
//! assert_eq!(format!("{:+}", cash.balance().unwrap()), "+42.10");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod account;
pub mod book;
pub mod entry;
pub mod error;
pub mod item;
pub mod journal;
pub mod ledger;
pub mod path;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use account::{Account, TransactionLine, AMOUNT_COLUMN, TRANSACTION_COLUMNS};
pub use book::Book;
pub use entry::Entry;
pub use error::{BookError, BookResult};
pub use item::{Header, Item, ObjectKind, NO_ID};
pub use journal::Journal;
pub use ledger::Ledger;
pub use path::ObjectPath;
