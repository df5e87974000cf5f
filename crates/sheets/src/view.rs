//! Template-ready renderings of tables and column profiles.

use crate::profile::{ColumnProfile, NumericSummary, TableProfile};
use crate::record::Record;
use crate::store::RecordTable;
use crate::table::Table;

/// A table rendered to strings.
#[derive(Debug, Clone, Default)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl From<&Table> for TableView {
    fn from(table: &Table) -> Self {
        Self {
            columns: table.columns().to_vec(),
            rows: table.display_rows(),
        }
    }
}

impl<R: Record> From<&RecordTable<R>> for TableView {
    fn from(table: &RecordTable<R>) -> Self {
        Self::from(&table.to_table())
    }
}

/// One row of the profile table.
#[derive(Debug, Clone)]
pub struct ProfileRow {
    pub name: String,
    pub kind: &'static str,
    pub count: usize,
    pub missing: usize,
    pub distinct: usize,
    pub top: String,
    pub min: String,
    pub max: String,
    pub mean: String,
    pub std_dev: String,
}

impl From<&ColumnProfile> for ProfileRow {
    fn from(column: &ColumnProfile) -> Self {
        let stat = |f: fn(&NumericSummary) -> f64| {
            column
                .numeric
                .as_ref()
                .map_or_else(String::new, |summary| format_number(f(summary)))
        };

        Self {
            name: column.name.clone(),
            kind: column.kind.label(),
            count: column.count,
            missing: column.missing,
            distinct: column.distinct,
            top: column
                .top
                .as_ref()
                .map_or_else(String::new, |(value, n)| format!("{value} ({n})")),
            min: stat(|s| s.min),
            max: stat(|s| s.max),
            mean: stat(|s| s.mean),
            std_dev: stat(|s| s.std_dev),
        }
    }
}

/// Profile of a whole table, ready for a template.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub rows: usize,
    pub columns: Vec<ProfileRow>,
}

impl From<&TableProfile> for ProfileView {
    fn from(profile: &TableProfile) -> Self {
        Self {
            rows: profile.rows,
            columns: profile.columns.iter().map(ProfileRow::from).collect(),
        }
    }
}

fn format_number(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
