//! Spreadsheet-backed record tables.
//!
//! The file on disk is the only source of truth: callers load a fresh
//! [`RecordTable`] whenever they need one and persist the whole table back
//! after a change. There is no locking, so concurrent writers race and the
//! last write wins.

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use techealth_core::Identified;

use crate::error::StoreError;
use crate::record::{Record, RowView};
use crate::table::Table;
use crate::workbook::{read_xlsx, write_xlsx};

/// A loaded value plus an optional non-fatal warning for the user.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub value: T,
    pub warning: Option<StoreWarning>,
}

impl<T> Loaded<T> {
    pub const fn ok(value: T) -> Self {
        Self {
            value,
            warning: None,
        }
    }

    /// Transform the value, keeping the warning.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loaded<U> {
        Loaded {
            value: f(self.value),
            warning: self.warning,
        }
    }
}

/// Problems that degrade a page without failing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWarning {
    /// The backing file does not exist; an empty table was substituted.
    MissingFile { name: String },
}

impl StoreWarning {
    /// Warning for an absent file, named by its file name only.
    #[must_use]
    pub fn missing_file(path: &Path) -> Self {
        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        Self::MissingFile { name }
    }
}

impl fmt::Display for StoreWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFile { name } => write!(f, "File '{name}' not found."),
        }
    }
}

/// Ordered records sharing one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable<R> {
    records: Vec<R>,
}

impl<R> Default for RecordTable<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R> RecordTable<R> {
    #[must_use]
    pub const fn from_records(records: Vec<R>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Return the table with `record` added at the end.
    #[must_use]
    pub fn append(mut self, record: R) -> Self {
        self.records.push(record);
        self
    }

    /// Rows matching `predicate`, in table order. No match yields an empty table.
    #[must_use]
    pub fn filter_by(&self, mut predicate: impl FnMut(&R) -> bool) -> Self
    where
        R: Clone,
    {
        Self {
            records: self.records.iter().filter(|r| predicate(r)).cloned().collect(),
        }
    }
}

impl<R: Identified> RecordTable<R> {
    /// One past the largest id in the table, or 1 when it is empty.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::IdsExhausted` when the largest id is `i32::MAX`.
    pub fn next_id(&self) -> Result<i32, StoreError> {
        match self.records.iter().map(Identified::id_value).max() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or(StoreError::IdsExhausted { max }),
        }
    }

    /// Rows with the given id. Ids are not unique on disk, so this may hold
    /// more than one row.
    #[must_use]
    pub fn with_id(&self, id: i32) -> Self
    where
        R: Clone,
    {
        self.filter_by(|record| record.id_value() == id)
    }
}

impl<R: Record> RecordTable<R> {
    /// Render as a table with the declared header.
    #[must_use]
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(R::COLUMNS.iter().copied());
        for record in &self.records {
            table.push_row(record.to_row());
        }
        table
    }

    /// Convert a raw table, matching columns by header name.
    ///
    /// Columns outside the schema are ignored and will not survive a persist.
    ///
    /// # Errors
    ///
    /// `MissingColumn` if the header lacks a declared column, `MalformedRow`
    /// if a row fails conversion. `path` is only used in the error.
    pub fn from_table(table: &Table, path: &Path) -> Result<Self, StoreError> {
        let positions = R::COLUMNS
            .iter()
            .map(|column| {
                table
                    .column_index(column)
                    .ok_or_else(|| StoreError::MissingColumn {
                        path: path.to_path_buf(),
                        column: (*column).to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let records = table
            .rows()
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let view = RowView::new(R::COLUMNS, &positions, row);
                R::from_row(&view).map_err(|e| StoreError::MalformedRow {
                    path: path.to_path_buf(),
                    // 1-based, after the header row
                    row: index + 2,
                    column: e.column,
                    reason: e.reason,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { records })
    }
}

impl<R> IntoIterator for RecordTable<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a RecordTable<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A record file on disk.
///
/// All methods do blocking file I/O.
#[derive(Debug)]
pub struct RecordStore<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for RecordStore<R> {
    fn clone(&self) -> Self {
        Self::new(self.path.clone())
    }
}

impl<R> RecordStore<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: Record> RecordStore<R> {
    /// Load the table, or an empty one with a warning if the file is absent.
    ///
    /// Nothing is written; the file appears on the first persist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file exists but cannot be read or does
    /// not match the schema.
    pub fn load_or_create(&self) -> Result<Loaded<RecordTable<R>>, StoreError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "Record file missing, using empty table");
            return Ok(Loaded {
                value: RecordTable::default(),
                warning: Some(StoreWarning::missing_file(&self.path)),
            });
        }

        let table = read_xlsx(&self.path)?;
        RecordTable::from_table(&table, &self.path).map(Loaded::ok)
    }

    /// Overwrite the file with `table`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the workbook cannot be written.
    pub fn persist(&self, table: &RecordTable<R>) -> Result<(), StoreError> {
        write_xlsx(&table.to_table(), &self.path)?;
        tracing::info!(path = %self.path.display(), rows = table.len(), "Record file saved");
        Ok(())
    }

    /// Load, append the record built from the current table, and persist.
    ///
    /// Returns the table as written.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` from the load, from `build`, or from the write.
    /// Nothing is written if `build` fails.
    pub fn append_with(
        &self,
        build: impl FnOnce(&RecordTable<R>) -> Result<R, StoreError>,
    ) -> Result<RecordTable<R>, StoreError> {
        let table = self.load_or_create()?.value;
        let record = build(&table)?;
        let table = table.append(record);
        self.persist(&table)?;
        Ok(table)
    }

    /// Load, append `record`, and persist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` from the load or the write.
    pub fn insert(&self, record: R) -> Result<RecordTable<R>, StoreError> {
        self.append_with(|_| Ok(record))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use techealth_core::{
        Client, ClientId, PatientSession, PersonDetails, Professional, ProfessionalId,
        ProfessionalKind,
    };

    use super::*;
    use crate::schema::files;
    use crate::table::Cell;

    fn professional(id: i32, name: &str) -> Professional {
        Professional {
            id: ProfessionalId::new(id),
            details: PersonDetails {
                name: name.to_string(),
                ..PersonDetails::default()
            },
            kind: ProfessionalKind::Physiotherapist,
        }
    }

    fn session(name: &str, dni: &str, reps: u32) -> PatientSession {
        PatientSession {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            name: name.to_string(),
            national_id: dni.to_string(),
            body_position: "Tumbado".to_string(),
            exercise_name: "Puente".to_string(),
            repetitions: reps,
            duration_minutes: 4,
            weight_kg: 1.5,
        }
    }

    #[test]
    fn test_missing_file_yields_empty_table_and_warning() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::<Client>::new(dir.path().join(files::CLIENTS));

        let loaded = store.load_or_create().unwrap();
        assert!(loaded.value.is_empty());
        assert_eq!(
            loaded.warning.unwrap().to_string(),
            "File 'clientes.xlsx' not found."
        );
        assert!(!store.path().exists());
        assert_eq!(loaded.value.to_table().columns().len(), Client::COLUMNS.len());
    }

    #[test]
    fn test_first_professional_gets_id_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::<Professional>::new(dir.path().join(files::PROFESSIONALS));

        let table = store
            .append_with(|table| Ok(professional(table.next_id()?, "Ana")))
            .unwrap();

        assert_eq!(table.len(), 1);
        let reloaded = store.load_or_create().unwrap();
        assert!(reloaded.warning.is_none());
        assert_eq!(reloaded.value.records(), &[professional(1, "Ana")]);
    }

    #[test]
    fn test_sequential_appends_increase_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::<Professional>::new(dir.path().join(files::PROFESSIONALS));

        for name in ["Ana", "Luis", "Marta"] {
            store
                .append_with(|table| Ok(professional(table.next_id()?, name)))
                .unwrap();
        }

        let table = store.load_or_create().unwrap().value;
        let ids: Vec<i32> = table.iter().map(Identified::id_value).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(table.next_id().unwrap(), 4);
    }

    #[test]
    fn test_next_id_follows_max_not_count() {
        let table = RecordTable::from_records(vec![professional(9, "a"), professional(3, "b")]);
        assert_eq!(table.next_id().unwrap(), 10);
        let table = table.append(professional(10, "c"));
        assert_eq!(table.next_id().unwrap(), 11);
    }

    #[test]
    fn test_next_id_past_max_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::<Professional>::new(dir.path().join(files::PROFESSIONALS));
        store.insert(professional(i32::MAX, "a")).unwrap();

        let err = store
            .append_with(|table| Ok(professional(table.next_id()?, "b")))
            .unwrap_err();
        assert!(matches!(err, StoreError::IdsExhausted { max: i32::MAX }));
        assert_eq!(store.load_or_create().unwrap().value.len(), 1);
    }

    #[test]
    fn test_with_id_keeps_duplicates() {
        let table = RecordTable::from_records(vec![
            professional(2, "a"),
            professional(5, "b"),
            professional(2, "c"),
        ]);
        assert_eq!(table.with_id(2).len(), 2);
        assert!(table.with_id(7).is_empty());
    }

    #[test]
    fn test_persist_then_load_reproduces_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::<PatientSession>::new(dir.path().join(files::PATIENT_SESSIONS));

        let table = RecordTable::from_records(vec![session("Ana", "1A", 10), session("Luis", "2B", 0)]);
        store.persist(&table).unwrap();

        assert_eq!(store.load_or_create().unwrap().value, table);
    }

    #[test]
    fn test_load_twice_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::<PatientSession>::new(dir.path().join(files::PATIENT_SESSIONS));
        store.insert(session("Ana", "1A", 10)).unwrap();

        let first = store.load_or_create().unwrap().value;
        let second = store.load_or_create().unwrap().value;
        assert_eq!(first, second);
    }

    #[test]
    fn test_filter_without_match_is_empty() {
        let table = RecordTable::from_records(vec![session("Ana", "1A", 10)]);
        let subset = table.filter_by(|s| s.belongs_to("Ana", "9Z"));
        assert!(subset.is_empty());

        let subset = table.filter_by(|s| s.belongs_to("Ana", "1A"));
        assert_eq!(subset.len(), 1);
    }

    #[test]
    fn test_columns_are_matched_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(files::CLIENTS);

        let mut raw = Table::new([
            "Nombre",
            "ID",
            "Apellidos",
            "Direccion",
            "DNI",
            "Telefono",
            "Municipio",
            "Codigo Postal",
            "Notas",
        ]);
        raw.push_row(vec![Cell::text("Eva"), Cell::Int(4)]);
        write_xlsx(&raw, &path).unwrap();

        let table = RecordStore::<Client>::new(&path).load_or_create().unwrap().value;
        let client = table.records().first().unwrap();
        assert_eq!(client.id, ClientId::new(4));
        assert_eq!(client.details.name, "Eva");
        assert_eq!(client.details.surname, "");
    }

    #[test]
    fn test_missing_column_is_a_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(files::CLIENTS);
        write_xlsx(&Table::new(["ID", "Nombre"]), &path).unwrap();

        let err = RecordStore::<Client>::new(&path).load_or_create().unwrap_err();
        assert!(matches!(err, StoreError::MissingColumn { ref column, .. } if column == "Apellidos"));
    }

    #[test]
    fn test_malformed_row_reports_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(files::PATIENT_SESSIONS);

        let mut raw = RecordTable::from_records(vec![session("Ana", "1A", 10)]).to_table();
        raw.push_row(vec![
            Cell::text("2024-06-02"),
            Cell::text("Luis"),
            Cell::text("2B"),
            Cell::text("Tumbado"),
            Cell::text("Puente"),
            Cell::text("muchas"),
            Cell::Int(1),
            Cell::Int(1),
        ]);
        write_xlsx(&raw, &path).unwrap();

        let err = RecordStore::<PatientSession>::new(&path)
            .load_or_create()
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::MalformedRow { row: 3, column: "Repeticiones", .. }
        ));
    }
}
