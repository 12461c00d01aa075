//! # Account Module
//!
//! An account is a named table of transaction lines. Its balance is the sum
//! of the amount column.
//!
//! ## Transaction Table Layout
//! ```text
//! ┌────────────┬──────────┬────────────┬─────────┬──────────────┐
//! │ 0 journal  │ 1 entry  │ 2 amount   │ 3 check │ 4 memo       │
//! │ Identifier │Identifier│ Decimal    │ Text    │ Text         │
//! ├────────────┼──────────┼────────────┼─────────┼──────────────┤
//! │ 3          │ 14       │ -120.00    │ 1042    │ electricity  │
//! │ 3          │ 15       │ 2500.00    │         │ salary       │
//! └────────────┴──────────┴────────────┴─────────┴──────────────┘
//! ```

use ledger_core::{column_total, ColumnType, Decimal, Table};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{BookError, BookResult};
use crate::item::{Header, Item, ObjectKind};

pub const JOURNAL_COLUMN: usize = 0;
pub const ENTRY_COLUMN: usize = 1;
pub const AMOUNT_COLUMN: usize = 2;
pub const CHECK_COLUMN: usize = 3;
pub const MEMO_COLUMN: usize = 4;

/// Schema of every account table.
pub const TRANSACTION_COLUMNS: [ColumnType; 5] = [
    ColumnType::Identifier,
    ColumnType::Identifier,
    ColumnType::Decimal,
    ColumnType::Text,
    ColumnType::Text,
];

// =============================================================================
// Transaction Line
// =============================================================================

/// One row of an account table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLine {
    pub journal_id: i64,
    pub entry_id: i64,
    pub amount: Decimal,
    #[serde(default)]
    pub check: String,
    #[serde(default)]
    pub memo: String,
}

impl TransactionLine {
    /// A line not yet tied to any journal entry.
    pub fn new(amount: Decimal, memo: &str) -> Self {
        TransactionLine {
            journal_id: -1,
            entry_id: -1,
            amount,
            check: String::new(),
            memo: memo.to_string(),
        }
    }
}

// =============================================================================
// Account
// =============================================================================

/// A named account backed by a transaction table.
///
/// ## Example
/// ```rust
/// use ledger_book::{Account, TransactionLine};
///
/// let account = Account::new().unwrap();
/// account
///     .post_line(&TransactionLine::new("-12.50".parse().unwrap(), "lunch"))
///     .unwrap();
/// account
///     .post_line(&TransactionLine::new("100".parse().unwrap(), "deposit"))
///     .unwrap();
///
/// assert_eq!(account.line_count(), 2);
/// assert_eq!(account.balance().unwrap().to_string(), "87.50");
/// ```
#[derive(Debug)]
pub struct Account {
    header: Header,
    table: Table,
}

impl Account {
    /// Creates an account with an empty transaction table.
    pub fn new() -> BookResult<Self> {
        let table = Table::new();
        table.set_column_types(&TRANSACTION_COLUMNS)?;
        Ok(Account {
            header: Header::default(),
            table,
        })
    }

    pub fn with_name(name: &str) -> BookResult<Self> {
        let mut account = Account::new()?;
        account.set_name(Some(name));
        Ok(account)
    }

    /// Shares the transaction table. The handle outlives the account.
    pub fn table(&self) -> Table {
        self.table.acquire()
    }

    pub fn line_count(&self) -> usize {
        self.table.row_count()
    }

    /// Appends a line and returns its row index.
    ///
    /// A line that cannot be stored completely is removed again.
    pub fn post_line(&self, line: &TransactionLine) -> BookResult<usize> {
        let mark = self.table.end();
        let row = mark.position();
        mark.add_row()?;

        let filled = mark
            .put_id(JOURNAL_COLUMN, line.journal_id)
            .and_then(|_| mark.put_id(ENTRY_COLUMN, line.entry_id))
            .and_then(|_| mark.put_decimal(AMOUNT_COLUMN, &line.amount))
            .and_then(|_| mark.put_text(CHECK_COLUMN, &line.check))
            .and_then(|_| mark.put_text(MEMO_COLUMN, &line.memo));
        if let Err(err) = filled {
            if let Err(rollback) = mark.drop_row() {
                warn!(
                    account = ?self.name(),
                    row,
                    error = %rollback,
                    "Partially written line left in table"
                );
            }
            return Err(err.into());
        }

        debug!(
            account = ?self.name(),
            row,
            amount = %line.amount,
            "Transaction line posted"
        );
        Ok(row as usize)
    }

    /// Reads the line at `index`.
    pub fn line(&self, index: usize) -> BookResult<TransactionLine> {
        let count = self.line_count();
        if index >= count {
            return Err(BookError::IndexOutOfRange {
                kind: ObjectKind::Account,
                index,
                count,
            });
        }
        let mark = self.table.begin_read();
        mark.move_by(index as isize);
        Ok(TransactionLine {
            journal_id: mark.fetch_id(JOURNAL_COLUMN)?,
            entry_id: mark.fetch_id(ENTRY_COLUMN)?,
            amount: mark.fetch_decimal(AMOUNT_COLUMN)?,
            check: mark.fetch_text_value(CHECK_COLUMN)?,
            memo: mark.fetch_text_value(MEMO_COLUMN)?,
        })
    }

    /// All lines in table order.
    pub fn lines(&self) -> BookResult<Vec<TransactionLine>> {
        (0..self.line_count()).map(|i| self.line(i)).collect()
    }

    /// Removes the line at `index`.
    pub fn drop_line(&self, index: usize) -> BookResult<()> {
        let count = self.line_count();
        if index >= count {
            return Err(BookError::IndexOutOfRange {
                kind: ObjectKind::Account,
                index,
                count,
            });
        }
        let mark = self.table.begin();
        mark.move_by(index as isize);
        mark.drop_row()?;
        debug!(account = ?self.name(), index, "Transaction line dropped");
        Ok(())
    }

    /// Sum of the amount column.
    pub fn balance(&self) -> BookResult<Decimal> {
        Ok(column_total(&self.table, AMOUNT_COLUMN)?)
    }

    /// Equality over optional accounts: absent equals only absent.
    pub fn is_equal(a: Option<&Account>, b: Option<&Account>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Accounts are equal when names, descriptions, ids and table contents match.
impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header && self.table == other.table
    }
}

impl Item for Account {
    const KIND: ObjectKind = ObjectKind::Account;

    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::{CoreError, TableError};

    fn dec(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    fn assert_transaction_schema(table: &Table) {
        assert_eq!(table.column_count(), 5);
        let codes: Vec<i32> = table.column_types().iter().map(|ty| ty.code()).collect();
        assert_eq!(codes, vec![1, 1, 2, 3, 3]);
    }

    #[test]
    fn test_table_preallocated() {
        let account = Account::new().unwrap();
        assert_transaction_schema(&account.table());
        assert_eq!(account.line_count(), 0);
    }

    #[test]
    fn test_table_outlives_account() {
        let account = Account::new().unwrap();
        let table = account.table();
        assert_eq!(table.share_count(), 2);

        drop(account);
        assert_eq!(table.share_count(), 1);
        assert_transaction_schema(&table);
    }

    #[test]
    fn test_description() {
        let mut account = Account::new().unwrap();
        assert_eq!(account.description(), None);
        assert_eq!(account.name(), None);

        account.set_description(Some("new description"));
        assert_eq!(account.description(), Some("new description"));
        assert_eq!(account.name(), None);

        account.set_description(None);
        assert_eq!(account.description(), None);
    }

    #[test]
    fn test_name() {
        let mut account = Account::new().unwrap();
        account.set_name(Some("new name"));
        assert_eq!(account.name(), Some("new name"));
        assert_eq!(account.description(), None);

        account.set_name(None);
        assert_eq!(account.name(), None);
    }

    #[test]
    fn test_id() {
        let mut account = Account::new().unwrap();
        assert_eq!(account.id(), -1);
        account.set_id(80);
        assert_eq!(account.id(), 80);
        assert_eq!(account.name(), None);
        assert_eq!(account.description(), None);
    }

    #[test]
    fn test_equal() {
        let mut a = Account::new().unwrap();
        let mut b = Account::new().unwrap();

        a.set_description(Some("new description"));
        b.set_description(Some("other description"));
        assert_ne!(a, b);
        assert_ne!(b, a);

        b.set_description(Some("new description"));
        assert_eq!(a, b);

        b.set_name(Some("new description"));
        assert_ne!(a, b);

        a.set_name(Some("other description"));
        assert_ne!(a, b);

        b.set_name(Some("other description"));
        assert_eq!(a, b);
        assert_eq!(b, a);

        // an extra (blank) row breaks equality
        a.table().begin().add_row().unwrap();
        assert_ne!(a, b);
        assert_ne!(b, a);
    }

    #[test]
    fn test_trivial_equal() {
        let account = Account::new().unwrap();
        assert!(!Account::is_equal(Some(&account), None));
        assert!(Account::is_equal(None, None));
        assert!(Account::is_equal(Some(&account), Some(&account)));
        assert!(!Account::is_equal(None, Some(&account)));
    }

    #[test]
    fn test_post_and_read_lines() {
        let account = Account::with_name("Cash").unwrap();
        let mut line = TransactionLine::new(dec("-120.00"), "electricity");
        line.journal_id = 3;
        line.entry_id = 14;
        line.check = "1042".into();

        assert_eq!(account.post_line(&line).unwrap(), 0);
        assert_eq!(
            account
                .post_line(&TransactionLine::new(dec("2500"), "salary"))
                .unwrap(),
            1
        );

        assert_eq!(account.line(0).unwrap(), line);
        let lines = account.lines().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].memo, "salary");
        assert_eq!(lines[1].journal_id, -1);
        assert_eq!(account.balance().unwrap().to_string(), "2380.00");
    }

    #[test]
    fn test_drop_line() {
        let account = Account::new().unwrap();
        for amount in ["1", "2", "3"] {
            account
                .post_line(&TransactionLine::new(dec(amount), ""))
                .unwrap();
        }

        account.drop_line(1).unwrap();
        assert_eq!(account.line_count(), 2);
        assert_eq!(account.balance().unwrap(), dec("4"));

        assert_eq!(
            account.drop_line(2),
            Err(BookError::IndexOutOfRange {
                kind: ObjectKind::Account,
                index: 2,
                count: 2,
            })
        );
        assert!(account.line(5).is_err());
    }

    #[test]
    fn test_failed_post_leaves_no_row() {
        let account = Account::new().unwrap();
        let table = account.table();
        table
            .set_column_types(&[ColumnType::Text, ColumnType::Text])
            .unwrap();

        let result = account.post_line(&TransactionLine::new(dec("1.00"), "rent"));
        assert!(matches!(
            result,
            Err(BookError::Core(CoreError::Table(TableError::TypeMismatch { .. })))
        ));
        assert_eq!(account.line_count(), 0);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_empty_balance_is_zero() {
        let account = Account::new().unwrap();
        assert!(account.balance().unwrap().is_zero());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn balance_tracks_posted_and_dropped_lines(
            values in prop::collection::vec(-1_000_000i64..1_000_000, 1..20),
            pick in any::<prop::sample::Index>(),
        ) {
            let account = Account::new().unwrap();
            for value in &values {
                let mut amount = Decimal::new();
                amount.configure(2, 2).unwrap();
                amount.set_i64(*value).unwrap();
                account.post_line(&TransactionLine::new(amount, "")).unwrap();
            }
            prop_assert_eq!(account.line_count(), values.len());

            let dropped = pick.index(values.len());
            account.drop_line(dropped).unwrap();
            prop_assert_eq!(account.line_count(), values.len() - 1);

            let expected: i64 = values.iter().sum::<i64>() - values[dropped];
            prop_assert_eq!(account.balance().unwrap(), Decimal::from_i64(expected).unwrap());
        }
    }
}
