//! # Book Module
//!
//! The root object: ledgers on one side, journals on the other.
//!
//! ## Example
//! ```rust
//! use ledger_book::{Account, Book, Ledger};
//!
//! let mut book = Book::new();
//! let l = book.add_ledger(Ledger::with_name("Main"));
//! book.ledger_mut(l)
//!     .unwrap()
//!     .add_account(Account::with_name("Cash").unwrap());
//!
//! assert_eq!(book.find_ledger("Main"), Some(0));
//! assert_eq!(book.ledger(0).unwrap().account_count(), 1);
//! ```

use tracing::debug;

use crate::error::{BookError, BookResult};
use crate::item::{position_by_id, position_by_name, ObjectKind};
use crate::journal::Journal;
use crate::ledger::Ledger;

#[derive(Debug, Default, PartialEq)]
pub struct Book {
    name: Option<String>,
    description: Option<String>,
    ledgers: Vec<Ledger>,
    journals: Vec<Journal>,
}

impl Book {
    pub fn new() -> Self {
        Book::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<&str>) {
        self.description = description.map(str::to_string);
    }

    // =========================================================================
    // Ledgers
    // =========================================================================

    pub fn ledger_count(&self) -> usize {
        self.ledgers.len()
    }

    pub fn ledger(&self, index: usize) -> Option<&Ledger> {
        self.ledgers.get(index)
    }

    pub fn ledger_mut(&mut self, index: usize) -> Option<&mut Ledger> {
        self.ledgers.get_mut(index)
    }

    pub fn ledgers(&self) -> &[Ledger] {
        &self.ledgers
    }

    pub fn add_ledger(&mut self, ledger: Ledger) -> usize {
        self.ledgers.push(ledger);
        let index = self.ledgers.len() - 1;
        debug!(index, "Ledger added");
        index
    }

    pub fn remove_ledger(&mut self, index: usize) -> BookResult<Ledger> {
        if index >= self.ledgers.len() {
            return Err(BookError::IndexOutOfRange {
                kind: ObjectKind::Ledger,
                index,
                count: self.ledgers.len(),
            });
        }
        Ok(self.ledgers.remove(index))
    }

    pub fn find_ledger(&self, name: &str) -> Option<usize> {
        position_by_name(&self.ledgers, name)
    }

    pub fn find_ledger_by_id(&self, id: i64) -> Option<usize> {
        position_by_id(&self.ledgers, id)
    }

    // =========================================================================
    // Journals
    // =========================================================================

    pub fn journal_count(&self) -> usize {
        self.journals.len()
    }

    pub fn journal(&self, index: usize) -> Option<&Journal> {
        self.journals.get(index)
    }

    pub fn journal_mut(&mut self, index: usize) -> Option<&mut Journal> {
        self.journals.get_mut(index)
    }

    pub fn journals(&self) -> &[Journal] {
        &self.journals
    }

    pub fn add_journal(&mut self, journal: Journal) -> usize {
        self.journals.push(journal);
        let index = self.journals.len() - 1;
        debug!(index, "Journal added");
        index
    }

    pub fn remove_journal(&mut self, index: usize) -> BookResult<Journal> {
        if index >= self.journals.len() {
            return Err(BookError::IndexOutOfRange {
                kind: ObjectKind::Journal,
                index,
                count: self.journals.len(),
            });
        }
        Ok(self.journals.remove(index))
    }

    pub fn find_journal(&self, name: &str) -> Option<usize> {
        position_by_name(&self.journals, name)
    }

    pub fn find_journal_by_id(&self, id: i64) -> Option<usize> {
        position_by_id(&self.journals, id)
    }
}
