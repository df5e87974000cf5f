//! Typed rows.
//!
//! A [`Record`] declares its column headers and converts itself to and from a
//! row of cells. Columns are matched by header name, so on-disk column order
//! may differ from the declared order; writes always use the declared order.

use chrono::NaiveDate;

use crate::table::Cell;

/// A record type with a fixed column schema.
pub trait Record: Sized {
    /// Header names, in the order they are written.
    const COLUMNS: &'static [&'static str];

    /// Cells in `COLUMNS` order.
    fn to_row(&self) -> Vec<Cell>;

    /// Build a record from a row.
    ///
    /// # Errors
    ///
    /// Returns `RowError` naming the first column that cannot be converted.
    fn from_row(row: &RowView<'_>) -> Result<Self, RowError>;
}

/// A cell conversion failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub column: &'static str,
    pub reason: String,
}

impl RowError {
    fn new(column: &'static str, reason: impl Into<String>) -> Self {
        Self {
            column,
            reason: reason.into(),
        }
    }
}

/// Read access to one row through its schema's column names.
pub struct RowView<'a> {
    columns: &'static [&'static str],
    cells: Vec<&'a Cell>,
}

static EMPTY: Cell = Cell::Empty;

impl<'a> RowView<'a> {
    /// `positions[i]` is the index in `row` of `columns[i]`.
    pub(crate) fn new(
        columns: &'static [&'static str],
        positions: &[usize],
        row: &'a [Cell],
    ) -> Self {
        let cells = positions
            .iter()
            .map(|&index| row.get(index).unwrap_or(&EMPTY))
            .collect();
        Self { columns, cells }
    }

    fn cell(&self, column: &'static str) -> Result<&'a Cell, RowError> {
        self.columns
            .iter()
            .position(|c| *c == column)
            .and_then(|index| self.cells.get(index).copied())
            .ok_or_else(|| RowError::new(column, "is not part of the schema"))
    }

    /// Text value. Empty cells read as `""`; numbers use their canonical text.
    ///
    /// # Errors
    ///
    /// Fails only when `column` is not in the schema.
    pub fn text(&self, column: &'static str) -> Result<String, RowError> {
        self.cell(column).map(Cell::as_text)
    }

    /// Non-negative whole number.
    ///
    /// # Errors
    ///
    /// Fails on empty, fractional, negative or non-numeric cells.
    pub fn count(&self, column: &'static str) -> Result<u32, RowError> {
        let value = self.integer(column)?;
        u32::try_from(value).map_err(|_| RowError::new(column, format!("is out of range: {value}")))
    }

    /// Signed whole number that fits an `i32`.
    ///
    /// # Errors
    ///
    /// Fails on empty, fractional or non-numeric cells.
    pub fn id(&self, column: &'static str) -> Result<i32, RowError> {
        let value = self.integer(column)?;
        i32::try_from(value).map_err(|_| RowError::new(column, format!("is out of range: {value}")))
    }

    fn integer(&self, column: &'static str) -> Result<i64, RowError> {
        let cell = self.cell(column)?;
        if cell.is_empty() {
            return Err(RowError::new(column, "is empty"));
        }
        cell.as_i64()
            .ok_or_else(|| RowError::new(column, format!("is not a whole number: {cell}")))
    }

    /// Finite decimal number.
    ///
    /// # Errors
    ///
    /// Fails on empty or non-numeric cells.
    pub fn decimal(&self, column: &'static str) -> Result<f64, RowError> {
        let cell = self.cell(column)?;
        let value = match cell {
            Cell::Empty => return Err(RowError::new(column, "is empty")),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            other => other.as_f64(),
        };
        value
            .filter(|v| v.is_finite())
            .ok_or_else(|| RowError::new(column, format!("is not a number: {cell}")))
    }

    /// Calendar date written as `YYYY-MM-DD`, optionally followed by a time.
    ///
    /// # Errors
    ///
    /// Fails on empty cells or text that does not start with a date.
    pub fn date(&self, column: &'static str) -> Result<NaiveDate, RowError> {
        let text = self.text(column)?;
        let day = text.split_whitespace().next().unwrap_or_default();
        NaiveDate::parse_from_str(day, DATE_FORMAT)
            .map_err(|_| RowError::new(column, format!("is not a date: '{text}'")))
    }
}

/// Format dates are written in.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date cell in [`DATE_FORMAT`].
#[must_use]
pub fn date_cell(date: NaiveDate) -> Cell {
    Cell::Text(date.format(DATE_FORMAT).to_string())
}
