//! In-memory tabular shape shared by workbooks, CSV uploads and record stores.

use std::fmt;

/// A single spreadsheet cell.
///
/// Numbers with no fractional part are held as [`Cell::Int`]; XLSX stores
/// every number as a float, so this keeps integers stable across a
/// write/read cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

/// Largest magnitude at which every integer is exactly representable in an f64.
const MAX_EXACT_F64_INT: f64 = 9_007_199_254_740_992.0;

impl Cell {
    /// Build a numeric cell, normalizing integral floats to `Int`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // guarded by the exact-range check
    pub fn number(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT_F64_INT {
            Self::Int(value as i64)
        } else {
            Self::Float(value)
        }
    }

    /// Build a text cell; empty strings become `Empty`.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Numeric value, if the cell holds a number.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Integer value, if the cell holds an integer (or integer-valued text).
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Canonical text rendering: integers without a decimal point, empty as "".
    #[must_use]
    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A header row plus data rows.
///
/// Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given header.
    #[must_use]
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, padding with `Empty` or truncating to the header width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of data rows (the header is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact header name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate one column's cells, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// All cells rendered as text, for display.
    #[must_use]
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(Cell::as_text).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_normalizes_integral_floats() {
        assert_eq!(Cell::number(3.0), Cell::Int(3));
        assert_eq!(Cell::number(-12.0), Cell::Int(-12));
        assert_eq!(Cell::number(2.5), Cell::Float(2.5));
        assert!(matches!(Cell::number(f64::NAN), Cell::Float(_)));
    }

    #[test]
    fn test_text_empty_is_empty_cell() {
        assert_eq!(Cell::text(""), Cell::Empty);
        assert_eq!(Cell::text("a"), Cell::Text("a".to_string()));
    }

    #[test]
    fn test_as_text_renders_integers_without_decimal() {
        assert_eq!(Cell::Int(1234).as_text(), "1234");
        assert_eq!(Cell::Float(1.5).as_text(), "1.5");
        assert_eq!(Cell::Empty.as_text(), "");
    }

    #[test]
    fn test_as_i64_accepts_integer_text() {
        assert_eq!(Cell::Text(" 7 ".to_string()).as_i64(), Some(7));
        assert_eq!(Cell::Float(7.5).as_i64(), None);
    }

    #[test]
    fn test_push_row_pads_and_truncates() {
        let mut table = Table::new(["a", "b"]);
        table.push_row(vec![Cell::Int(1)]);
        table.push_row(vec![Cell::Int(1), Cell::Int(2), Cell::Int(3)]);
        assert_eq!(table.rows()[0], vec![Cell::Int(1), Cell::Empty]);
        assert_eq!(table.rows()[1], vec![Cell::Int(1), Cell::Int(2)]);
    }

    #[test]
    fn test_column_lookup() {
        let mut table = Table::new(["ID", "Nombre"]);
        table.push_row(vec![Cell::Int(1), Cell::text("Ana")]);
        table.push_row(vec![Cell::Int(2), Cell::text("Luis")]);
        assert_eq!(table.column_index("Nombre"), Some(1));
        assert_eq!(table.column_index("nombre"), None);
        let names: Vec<_> = table.column(1).map(Cell::as_text).collect();
        assert_eq!(names, vec!["Ana", "Luis"]);
    }
}
