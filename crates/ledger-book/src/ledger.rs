//! # Ledger Module
//!
//! A ledger groups accounts. Each account owns its own transaction table.

use ledger_core::Decimal;
use tracing::debug;

use crate::account::Account;
use crate::error::{BookError, BookResult};
use crate::item::{position_by_id, position_by_name, Header, Item, ObjectKind};

#[derive(Debug, Default, PartialEq)]
pub struct Ledger {
    header: Header,
    accounts: Vec<Account>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    pub fn with_name(name: &str) -> Self {
        Ledger {
            header: Header::named(name),
            accounts: Vec::new(),
        }
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn account(&self, index: usize) -> Option<&Account> {
        self.accounts.get(index)
    }

    pub fn account_mut(&mut self, index: usize) -> Option<&mut Account> {
        self.accounts.get_mut(index)
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Appends an account and returns its index.
    pub fn add_account(&mut self, account: Account) -> usize {
        self.accounts.push(account);
        let index = self.accounts.len() - 1;
        debug!(ledger = ?self.name(), index, "Account added");
        index
    }

    pub fn remove_account(&mut self, index: usize) -> BookResult<Account> {
        if index >= self.accounts.len() {
            return Err(BookError::IndexOutOfRange {
                kind: ObjectKind::Account,
                index,
                count: self.accounts.len(),
            });
        }
        Ok(self.accounts.remove(index))
    }

    pub fn find_account(&self, name: &str) -> Option<usize> {
        position_by_name(&self.accounts, name)
    }

    pub fn find_account_by_id(&self, id: i64) -> Option<usize> {
        position_by_id(&self.accounts, id)
    }

    /// Sum of every account balance in this ledger.
    pub fn total(&self) -> BookResult<Decimal> {
        let mut total = Decimal::new();
        for account in &self.accounts {
            total.add(&account.balance()?)?;
        }
        Ok(total)
    }
}

impl Item for Ledger {
    const KIND: ObjectKind = ObjectKind::Ledger;

    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }
}
