//! # Sum Module
//!
//! Column aggregation: adds every decimal cell of a column into an
//! accumulator (an account balance, a journal total).
//!
//! ## Flow
//! ```text
//! accumulator ──clone──► total
//!                         │   read-only mark: row 0 → row 1 → … → End
//!                         │   total.add(cell)  (scale-aligned, grows on carry)
//!                         ▼
//! accumulator ◄──commit── total        (only when every row succeeded)
//! ```

use crate::decimal::Decimal;
use crate::error::{CoreResult, TableError};
use crate::table::{ColumnType, Table};

/// Adds the DECIMAL column `column` of every row into `accumulator`.
///
/// The accumulator's prior value is part of the sum; reset it to zero for a
/// fresh total. Rows are visited in table order. On any failure (wrong
/// column type, allocation) the accumulator is left unchanged.
///
/// ## Example
/// ```rust
/// use ledger_core::{sum_column, ColumnType, Decimal, Table};
///
/// let table = Table::new();
/// table.set_column_types(&[ColumnType::Decimal]).unwrap();
/// for amount in ["10.50", "-3.25", "0.75"] {
///     let mark = table.end();
///     mark.add_row().unwrap();
///     mark.put_decimal(0, &amount.parse().unwrap()).unwrap();
/// }
///
/// let mut balance = Decimal::new();
/// sum_column(&mut balance, &table, 0).unwrap();
/// assert_eq!(balance.to_string(), "8.00");
/// ```
pub fn sum_column(accumulator: &mut Decimal, table: &Table, column: usize) -> CoreResult<()> {
    match table.column_type(column) {
        Some(ColumnType::Decimal) => {}
        Some(found) => {
            return Err(TableError::TypeMismatch {
                column,
                expected: ColumnType::Decimal,
                found,
            }
            .into())
        }
        None => {
            return Err(TableError::ColumnOutOfRange {
                column,
                count: table.column_count(),
            }
            .into())
        }
    }

    let mut total = accumulator.clone();
    let mark = table.begin_read();
    while mark.is_valid() {
        mark.with_decimal(column, |amount| total.add(amount))??;
        mark.move_by(1);
    }

    *accumulator = total;
    Ok(())
}

/// Sum of a DECIMAL column starting from zero.
pub fn column_total(table: &Table, column: usize) -> CoreResult<Decimal> {
    let mut total = Decimal::new();
    sum_column(&mut total, table, column)?;
    Ok(total)
}

// =============================================================================
// Unit Tests
// =============================================================================
