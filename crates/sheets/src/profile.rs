//! Column summaries for exploratory views.
//!
//! Each column is classified by the cells it holds and summarized: numeric
//! columns get min/max/mean/standard deviation, every column gets its most
//! frequent value.

use std::collections::HashMap;

use crate::table::{Cell, Table};

/// What a column predominantly holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-empty cell is a number.
    Numeric,
    /// Every non-empty cell is a boolean.
    Boolean,
    /// Every non-empty cell is text.
    Text,
    /// More than one of the above.
    Mixed,
    /// No non-empty cells.
    Empty,
}

impl ColumnKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::Mixed => "mixed",
            Self::Empty => "empty",
        }
    }
}

/// Summary statistics of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation; zero with fewer than two values.
    pub std_dev: f64,
    pub sum: f64,
}

/// Summary of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    /// Non-empty cells.
    pub count: usize,
    /// Empty cells.
    pub missing: usize,
    pub distinct: usize,
    /// Most frequent value and its count; ties go to the value seen first.
    pub top: Option<(String, usize)>,
    pub numeric: Option<NumericSummary>,
}

/// Summary of a whole table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableProfile {
    pub rows: usize,
    pub columns: Vec<ColumnProfile>,
}

/// Profile every column of `table`.
#[must_use]
pub fn profile(table: &Table) -> TableProfile {
    let columns = table
        .columns()
        .iter()
        .enumerate()
        .map(|(index, name)| profile_column(name, table.column(index)))
        .collect();

    TableProfile {
        rows: table.len(),
        columns,
    }
}

fn profile_column<'a>(name: &str, cells: impl Iterator<Item = &'a Cell>) -> ColumnProfile {
    let mut missing = 0;
    let mut numbers = Vec::new();
    let (mut saw_number, mut saw_bool, mut saw_text) = (false, false, false);
    let mut frequencies: HashMap<String, (usize, usize)> = HashMap::new();

    for (position, cell) in cells.enumerate() {
        match cell {
            Cell::Empty => {
                missing += 1;
                continue;
            }
            Cell::Int(_) | Cell::Float(_) => {
                saw_number = true;
                numbers.extend(cell.as_f64());
            }
            Cell::Bool(_) => saw_bool = true,
            Cell::Text(_) => saw_text = true,
        }
        let entry = frequencies.entry(cell.as_text()).or_insert((0, position));
        entry.0 += 1;
    }

    let kind = match (saw_number, saw_bool, saw_text) {
        (false, false, false) => ColumnKind::Empty,
        (true, false, false) => ColumnKind::Numeric,
        (false, true, false) => ColumnKind::Boolean,
        (false, false, true) => ColumnKind::Text,
        _ => ColumnKind::Mixed,
    };

    let count = frequencies.values().map(|(n, _)| n).sum();
    let distinct = frequencies.len();
    let top = frequencies
        .into_iter()
        .max_by(|(_, (a, first_a)), (_, (b, first_b))| a.cmp(b).then(first_b.cmp(first_a)))
        .map(|(value, (n, _))| (value, n));

    ColumnProfile {
        name: name.to_string(),
        kind,
        count,
        missing,
        distinct,
        top,
        numeric: (kind == ColumnKind::Numeric).then(|| summarize(&numbers)),
    }
}

#[allow(clippy::cast_precision_loss)]
fn summarize(values: &[f64]) -> NumericSummary {
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    let mean = if values.is_empty() { 0.0 } else { sum / n };
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let std_dev = if values.len() < 2 {
        0.0
    } else {
        let variance = values
            .iter()
            .map(|&x| {
                let diff = x - mean;
                diff * diff
            })
            .sum::<f64>()
            / (n - 1.0);
        variance.sqrt()
    };

    NumericSummary {
        min,
        max,
        mean,
        std_dev,
        sum,
    }
}
