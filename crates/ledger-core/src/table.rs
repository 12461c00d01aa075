//! # Table Module
//!
//! A typed, columnar row store (`Table`) and its positioned handle (`Mark`).
//!
//! ## Ownership Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Table & Mark Handles                                 │
//! │                                                                         │
//! │   Table ──┐                                                             │
//! │   Table ──┼──► Rc<RefCell<TableData>>   (share_count = 2)              │
//! │           │         ▲         ▲                                         │
//! │           │         ┊ Weak    ┊ Weak     (marks never keep it alive)   │
//! │           │    MarkState  MarkState                                     │
//! │           │      ▲  ▲         ▲                                         │
//! │         Mark  Mark Mark     Mark         (Mark::acquire shares state)  │
//! │                                                                         │
//! │   Two independent counts: table shares vs. mark shares.                │
//! │   A mark whose table is gone reports TableError::TableReleased.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Threading
//! Handles are `Rc`-based and therefore neither `Send` nor `Sync`. A host
//! that needs a table on several threads keeps it on one thread and routes
//! work to it, or guards its own container with a mutex.
//!
//! ## Usage
//! ```rust
//! use ledger_core::{ColumnType, Decimal, Table};
//!
//! let table = Table::new();
//! table
//!     .set_column_types(&[ColumnType::Identifier, ColumnType::Decimal])
//!     .unwrap();
//!
//! let mark = table.end();
//! mark.add_row().unwrap();
//! mark.put_id(0, 7).unwrap();
//! mark.put_decimal(1, &"12.50".parse().unwrap()).unwrap();
//!
//! assert_eq!(table.row_count(), 1);
//! assert_eq!(mark.text(1).unwrap(), "12.50");
//! ```

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::decimal::{write_sized, Decimal};
use crate::error::{TableError, TableResult};

// =============================================================================
// Column Types
// =============================================================================

/// Declared type of a table column.
///
/// The discriminants are the stable type codes accepted by
/// [`Table::set_column_codes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Signed identifier.
    Identifier = 1,
    /// Arbitrary-precision decimal.
    Decimal = 2,
    /// Text string.
    Text = 3,
    /// Array index.
    Index = 4,
}

impl ColumnType {
    /// Returns the numeric type code.
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for ColumnType {
    type Error = TableError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(ColumnType::Identifier),
            2 => Ok(ColumnType::Decimal),
            3 => Ok(ColumnType::Text),
            4 => Ok(ColumnType::Index),
            other => Err(TableError::InvalidColumnType(other)),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Identifier => write!(f, "identifier"),
            ColumnType::Decimal => write!(f, "decimal"),
            ColumnType::Text => write!(f, "text"),
            ColumnType::Index => write!(f, "index"),
        }
    }
}

// =============================================================================
// Cell Values
// =============================================================================

/// One typed cell. Every row holds exactly one per column.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellValue {
    Identifier(i64),
    Decimal(Decimal),
    Text(String),
    Index(usize),
}

impl CellValue {
    /// Zero/empty value for a freshly added row.
    pub fn empty(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Identifier => CellValue::Identifier(0),
            ColumnType::Decimal => CellValue::Decimal(Decimal::new()),
            ColumnType::Text => CellValue::Text(String::new()),
            ColumnType::Index => CellValue::Index(0),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            CellValue::Identifier(_) => ColumnType::Identifier,
            CellValue::Decimal(_) => ColumnType::Decimal,
            CellValue::Text(_) => ColumnType::Text,
            CellValue::Index(_) => ColumnType::Index,
        }
    }

    /// Text form: numbers in decimal notation, text verbatim.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Identifier(id) => id.to_string(),
            CellValue::Decimal(value) => value.to_text(false),
            CellValue::Text(text) => text.clone(),
            CellValue::Index(index) => index.to_string(),
        }
    }
}

// =============================================================================
// Table
// =============================================================================

#[derive(Debug, Default, PartialEq)]
struct TableData {
    columns: Vec<ColumnType>,
    rows: Vec<Vec<CellValue>>,
}

/// Shared handle to a row store.
///
/// `acquire` (or `clone`) adds a share; dropping a handle releases one. The
/// rows are freed with the last handle.
///
/// ## Equality
/// Two tables are equal when their column types match one for one and their
/// rows are equal cell by cell (decimals compare by value).
#[derive(Debug, Default)]
pub struct Table {
    inner: Rc<RefCell<TableData>>,
}

impl Table {
    /// Creates an empty table with no columns.
    pub fn new() -> Self {
        Table::default()
    }

    /// Takes another share of the same table.
    pub fn acquire(&self) -> Table {
        Table {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Number of live handles to this table.
    pub fn share_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// Whether two handles refer to the same table.
    pub fn ptr_eq(a: &Table, b: &Table) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    /// Equality over optional tables: absent equals only absent.
    ///
    /// ## Example
    /// ```rust
    /// use ledger_core::Table;
    ///
    /// let t = Table::new();
    /// assert!(Table::is_equal(None, None));
    /// assert!(Table::is_equal(Some(&t), Some(&t)));
    /// assert!(!Table::is_equal(Some(&t), None));
    /// ```
    pub fn is_equal(a: Option<&Table>, b: Option<&Table>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    fn data(&self) -> Ref<'_, TableData> {
        self.inner.borrow()
    }

    /// Sets the column schema.
    ///
    /// Rejected with [`TableError::SchemaLocked`] while the table holds rows,
    /// so existing rows always match the schema.
    pub fn set_column_types(&self, types: &[ColumnType]) -> TableResult<()> {
        let mut data = self.inner.try_borrow_mut().map_err(|_| TableError::Busy)?;
        if !data.rows.is_empty() {
            return Err(TableError::SchemaLocked {
                rows: data.rows.len(),
            });
        }
        let mut columns = Vec::new();
        columns
            .try_reserve_exact(types.len())
            .map_err(|_| TableError::AllocationFailed)?;
        columns.extend_from_slice(types);
        data.columns = columns;
        Ok(())
    }

    /// Sets the column schema from numeric type codes.
    ///
    /// ## Example
    /// ```rust
    /// use ledger_core::{ColumnType, Table, TableError};
    ///
    /// let t = Table::new();
    /// assert_eq!(t.set_column_codes(&[1, 9]), Err(TableError::InvalidColumnType(9)));
    /// assert_eq!(t.column_count(), 0);
    ///
    /// t.set_column_codes(&[1, 2, 3]).unwrap();
    /// assert_eq!(t.column_type(2), Some(ColumnType::Text));
    /// ```
    pub fn set_column_codes(&self, codes: &[i32]) -> TableResult<()> {
        let types = codes
            .iter()
            .map(|&code| ColumnType::try_from(code))
            .collect::<TableResult<Vec<_>>>()?;
        self.set_column_types(&types)
    }

    pub fn column_count(&self) -> usize {
        self.data().columns.len()
    }

    /// Type of column `index`, or `None` past the end.
    pub fn column_type(&self, index: usize) -> Option<ColumnType> {
        self.data().columns.get(index).copied()
    }

    pub fn column_types(&self) -> Vec<ColumnType> {
        self.data().columns.clone()
    }

    pub fn row_count(&self) -> usize {
        self.data().rows.len()
    }

    /// Mutable mark at the first row (the end sentinel when empty).
    pub fn begin(&self) -> Mark {
        Mark::new(self, 0, Access::ReadWrite)
    }

    /// Mutable mark at the end sentinel.
    pub fn end(&self) -> Mark {
        Mark::new(self, self.row_count() as isize, Access::ReadWrite)
    }

    /// Read-only mark at the first row.
    pub fn begin_read(&self) -> Mark {
        Mark::new(self, 0, Access::ReadOnly)
    }

    /// Read-only mark at the end sentinel.
    pub fn end_read(&self) -> Mark {
        Mark::new(self, self.row_count() as isize, Access::ReadOnly)
    }
}

/// `clone` is [`Table::acquire`]: it shares, it does not copy rows.
impl Clone for Table {
    fn clone(&self) -> Self {
        self.acquire()
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        Table::ptr_eq(self, other) || *self.data() == *other.data()
    }
}

// =============================================================================
// Mark
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    ReadWrite,
    ReadOnly,
}

#[derive(Debug)]
struct MarkState {
    table: Weak<RefCell<TableData>>,
    // Wider than `isize` so that moves never lose information.
    position: Cell<i128>,
    access: Access,
}

/// Positioned handle into a [`Table`].
///
/// ## States
/// ```text
///   Row(i), 0 <= i < rows   ──move_by──►  Row(j) | End | Invalid
///   End,    i == rows       add_row inserts here (append)
///   Invalid, otherwise      row operations fail until moved back
/// ```
///
/// A mark holds only a weak reference: keep a [`Table`] handle alive for as
/// long as the mark is used.
#[derive(Debug)]
pub struct Mark {
    state: Rc<MarkState>,
}

impl Mark {
    fn new(table: &Table, position: isize, access: Access) -> Self {
        Mark {
            state: Rc::new(MarkState {
                table: Rc::downgrade(&table.inner),
                position: Cell::new(position as i128),
                access,
            }),
        }
    }

    /// Takes another share of this mark. Both handles see the same position.
    pub fn acquire(&self) -> Mark {
        Mark {
            state: Rc::clone(&self.state),
        }
    }

    /// Number of live handles to this mark (independent of the table's).
    pub fn share_count(&self) -> usize {
        Rc::strong_count(&self.state)
    }

    pub fn is_read_only(&self) -> bool {
        self.state.access == Access::ReadOnly
    }

    /// Raw position; may be negative or past the end.
    ///
    /// Positions beyond the `isize` range are reported clamped to it, but the
    /// mark keeps the exact value, so moving back lands where expected.
    pub fn position(&self) -> isize {
        let position = self.state.position.get();
        isize::try_from(position).unwrap_or(if position < 0 { isize::MIN } else { isize::MAX })
    }

    /// Shifts the position by `n` rows (negative moves back).
    pub fn move_by(&self, n: isize) {
        let position = self.state.position.get().saturating_add(n as i128);
        self.state.position.set(position);
    }

    /// True iff the mark addresses a row.
    pub fn is_valid(&self) -> bool {
        let Some(table) = self.state.table.upgrade() else {
            return false;
        };
        let valid = match table.try_borrow() {
            Ok(data) => self.row_in(&data).is_some(),
            Err(_) => false,
        };
        valid
    }

    /// True iff the mark sits on the end sentinel.
    pub fn is_end(&self) -> bool {
        let Some(table) = self.state.table.upgrade() else {
            return false;
        };
        let at_end = match table.try_borrow() {
            Ok(data) => self.state.position.get() == data.rows.len() as i128,
            Err(_) => false,
        };
        at_end
    }

    /// Column type through this mark's table.
    pub fn column_type(&self, column: usize) -> Option<ColumnType> {
        let table = self.state.table.upgrade()?;
        let data = table.try_borrow().ok()?;
        data.columns.get(column).copied()
    }

    fn table(&self) -> TableResult<Rc<RefCell<TableData>>> {
        self.state.table.upgrade().ok_or(TableError::TableReleased)
    }

    fn writable(&self) -> TableResult<()> {
        match self.state.access {
            Access::ReadWrite => Ok(()),
            Access::ReadOnly => Err(TableError::ReadOnlyMark),
        }
    }

    fn row_in(&self, data: &TableData) -> Option<usize> {
        usize::try_from(self.state.position.get())
            .ok()
            .filter(|&row| row < data.rows.len())
    }

    fn row_index(&self, data: &TableData) -> TableResult<usize> {
        self.row_in(data).ok_or(TableError::InvalidPosition {
            position: self.position(),
        })
    }

    // =========================================================================
    // Row Operations
    // =========================================================================

    /// Inserts a zero/empty row before the current position and points at it.
    ///
    /// The end sentinel is a legal insertion point (append).
    pub fn add_row(&self) -> TableResult<()> {
        self.writable()?;
        let table = self.table()?;
        let mut data = borrow_mut(&table)?;
        if data.columns.is_empty() {
            return Err(TableError::NoColumns);
        }

        let index = usize::try_from(self.state.position.get())
            .ok()
            .filter(|&i| i <= data.rows.len())
            .ok_or(TableError::InvalidPosition {
                position: self.position(),
            })?;

        let mut row = Vec::new();
        row.try_reserve_exact(data.columns.len())
            .map_err(|_| TableError::AllocationFailed)?;
        row.extend(data.columns.iter().map(|&ty| CellValue::empty(ty)));
        data.rows
            .try_reserve(1)
            .map_err(|_| TableError::AllocationFailed)?;
        data.rows.insert(index, row);
        Ok(())
    }

    /// Removes the current row; the mark moves to the preceding row, or stays
    /// at 0 when the first row was removed.
    pub fn drop_row(&self) -> TableResult<()> {
        self.writable()?;
        let table = self.table()?;
        let mut data = borrow_mut(&table)?;
        let index = self.row_index(&data)?;
        data.rows.remove(index);
        if index > 0 {
            self.state.position.set(index as i128 - 1);
        }
        Ok(())
    }

    // =========================================================================
    // Cell Access
    // =========================================================================

    fn with_cell<R>(
        &self,
        column: usize,
        f: impl FnOnce(&CellValue) -> TableResult<R>,
    ) -> TableResult<R> {
        let table = self.table()?;
        let data = table.try_borrow().map_err(|_| TableError::Busy)?;
        let row = self.row_index(&data)?;
        let cell = data.rows[row]
            .get(column)
            .ok_or(TableError::ColumnOutOfRange {
                column,
                count: data.columns.len(),
            })?;
        f(cell)
    }

    fn with_cell_mut<R>(
        &self,
        column: usize,
        f: impl FnOnce(&mut CellValue) -> TableResult<R>,
    ) -> TableResult<R> {
        self.writable()?;
        let table = self.table()?;
        let mut data = borrow_mut(&table)?;
        let count = data.columns.len();
        let row = self.row_index(&data)?;
        let cell = data.rows[row]
            .get_mut(column)
            .ok_or(TableError::ColumnOutOfRange { column, count })?;
        f(cell)
    }

    /// Renders any cell as text with the sizing-query convention.
    ///
    /// An empty `buf` returns the needed length; a short non-empty `buf`
    /// fails with [`TableError::BufferTooSmall`] and is left untouched.
    ///
    /// ## Example
    /// ```rust
    /// use ledger_core::{ColumnType, Table};
    ///
    /// let t = Table::new();
    /// t.set_column_types(&[ColumnType::Identifier]).unwrap();
    /// let m = t.begin();
    /// m.add_row().unwrap();
    /// m.put_id(0, -4096).unwrap();
    ///
    /// let needed = m.fetch_text(0, &mut []).unwrap();
    /// let mut buf = vec![0u8; needed];
    /// m.fetch_text(0, &mut buf).unwrap();
    /// assert_eq!(buf, b"-4096");
    /// ```
    pub fn fetch_text(&self, column: usize, buf: &mut [u8]) -> TableResult<usize> {
        let text = self.text(column)?;
        write_sized(&text, buf).map_err(|_| TableError::BufferTooSmall {
            needed: text.len(),
            available: buf.len(),
        })
    }

    /// Renders any cell as an owned string.
    pub fn text(&self, column: usize) -> TableResult<String> {
        self.with_cell(column, |cell| Ok(cell.to_text()))
    }

    pub fn put_text(&self, column: usize, value: &str) -> TableResult<()> {
        self.with_cell_mut(column, |cell| match cell {
            CellValue::Text(text) => {
                let mut replacement = String::new();
                replacement
                    .try_reserve_exact(value.len())
                    .map_err(|_| TableError::AllocationFailed)?;
                replacement.push_str(value);
                *text = replacement;
                Ok(())
            }
            other => Err(mismatch(column, ColumnType::Text, other)),
        })
    }

    pub fn put_decimal(&self, column: usize, value: &Decimal) -> TableResult<()> {
        self.with_cell_mut(column, |cell| match cell {
            CellValue::Decimal(decimal) => {
                *decimal = value.clone();
                Ok(())
            }
            other => Err(mismatch(column, ColumnType::Decimal, other)),
        })
    }

    pub fn put_id(&self, column: usize, value: i64) -> TableResult<()> {
        self.with_cell_mut(column, |cell| match cell {
            CellValue::Identifier(id) => {
                *id = value;
                Ok(())
            }
            other => Err(mismatch(column, ColumnType::Identifier, other)),
        })
    }

    pub fn put_index(&self, column: usize, value: usize) -> TableResult<()> {
        self.with_cell_mut(column, |cell| match cell {
            CellValue::Index(index) => {
                *index = value;
                Ok(())
            }
            other => Err(mismatch(column, ColumnType::Index, other)),
        })
    }

    pub fn fetch_decimal(&self, column: usize) -> TableResult<Decimal> {
        self.with_decimal(column, Decimal::clone)
    }

    /// Runs `f` on a decimal cell without copying it.
    pub fn with_decimal<R>(&self, column: usize, f: impl FnOnce(&Decimal) -> R) -> TableResult<R> {
        self.with_cell(column, |cell| match cell {
            CellValue::Decimal(decimal) => Ok(f(decimal)),
            other => Err(mismatch(column, ColumnType::Decimal, other)),
        })
    }

    pub fn fetch_id(&self, column: usize) -> TableResult<i64> {
        self.with_cell(column, |cell| match cell {
            CellValue::Identifier(id) => Ok(*id),
            other => Err(mismatch(column, ColumnType::Identifier, other)),
        })
    }

    pub fn fetch_index(&self, column: usize) -> TableResult<usize> {
        self.with_cell(column, |cell| match cell {
            CellValue::Index(index) => Ok(*index),
            other => Err(mismatch(column, ColumnType::Index, other)),
        })
    }

    /// Reads a TEXT cell (typed; use [`Mark::text`] to render any cell).
    pub fn fetch_text_value(&self, column: usize) -> TableResult<String> {
        self.with_cell(column, |cell| match cell {
            CellValue::Text(text) => Ok(text.clone()),
            other => Err(mismatch(column, ColumnType::Text, other)),
        })
    }
}

/// Marks are equal when they point into the same table at the same position.
impl PartialEq for Mark {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.state.table, &other.state.table)
            && self.state.position.get() == other.state.position.get()
    }
}

fn borrow_mut(table: &RefCell<TableData>) -> TableResult<RefMut<'_, TableData>> {
    table.try_borrow_mut().map_err(|_| TableError::Busy)
}

fn mismatch(column: usize, expected: ColumnType, found: &CellValue) -> TableError {
    TableError::TypeMismatch {
        column,
        expected,
        found: found.column_type(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
