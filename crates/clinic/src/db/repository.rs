//! Async access to a `RecordStore`.

use std::path::PathBuf;

use techealth_core::{ExerciseEntry, ExerciseOptions, PatientSession};
use techealth_sheets::{Loaded, Record, RecordStore, RecordTable, StoreError};
use tracing::instrument;

use super::RepositoryError;

/// Repository for one record file.
///
/// Spreadsheet I/O is blocking, so each operation runs on the blocking pool.
#[derive(Debug)]
pub struct Repository<R> {
    store: RecordStore<R>,
}

impl<R> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<R> Repository<R>
where
    R: Record + Send + 'static,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: RecordStore::new(path),
        }
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, RepositoryError>
    where
        T: Send + 'static,
        F: FnOnce(RecordStore<R>) -> Result<T, StoreError> + Send + 'static,
    {
        let store = self.store.clone();
        Ok(tokio::task::spawn_blocking(move || op(store)).await??)
    }

    /// Load the table, or an empty one with a warning if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the file exists but cannot be read.
    #[instrument(skip(self), fields(path = %self.store.path().display()))]
    pub async fn load(&self) -> Result<Loaded<RecordTable<R>>, RepositoryError> {
        self.blocking(|store| store.load_or_create()).await
    }

    /// Append the record built from the freshly loaded table and persist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the load, `build`, or the write fails.
    #[instrument(skip(self, build), fields(path = %self.store.path().display()))]
    pub async fn append_with<F>(&self, build: F) -> Result<RecordTable<R>, RepositoryError>
    where
        F: FnOnce(&RecordTable<R>) -> Result<R, StoreError> + Send + 'static,
    {
        self.blocking(move |store| store.append_with(build)).await
    }

    /// Append `record` and persist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the load or the write fails.
    pub async fn insert(&self, record: R) -> Result<RecordTable<R>, RepositoryError> {
        self.blocking(move |store| store.insert(record)).await
    }
}

impl Repository<PatientSession> {
    /// All sessions logged for the patient with this exact name and DNI.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the file exists but cannot be read.
    #[instrument(skip(self, national_id))]
    pub async fn sessions_for(
        &self,
        name: &str,
        national_id: &str,
    ) -> Result<RecordTable<PatientSession>, RepositoryError> {
        let table = self.load().await?.value;
        Ok(table.filter_by(|session| session.belongs_to(name, national_id)))
    }
}

impl Repository<ExerciseEntry> {
    /// Selection lists for the session form.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog exists but cannot be read.
    pub async fn options(&self) -> Result<Loaded<ExerciseOptions>, RepositoryError> {
        Ok(self
            .load()
            .await?
            .map(|catalog| ExerciseOptions::from_entries(&catalog)))
    }
}
