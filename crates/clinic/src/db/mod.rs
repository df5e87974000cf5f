//! Record repositories over the clinic's spreadsheet files.
//!
//! # Files (inside `CLINIC_DATA_DIR`)
//!
//! - `datos_pacientes.xlsx` - Logged exercise sessions
//! - `profesionales.xlsx` - Registered professionals
//! - `clientes.xlsx` - Registered clients
//! - `ejercicios_pacientes.xlsx` - Exercise catalog (read only)
//!
//! Every call re-reads the file, so edits made outside the server show up on
//! the next request. Writes replace the whole file without locking; the last
//! writer wins.

mod repository;

use techealth_core::{Client, ExerciseEntry, PatientSession, Professional};
use techealth_sheets::{StoreError, files};
use thiserror::Error;

use crate::config::ClinicConfig;

pub use repository::Repository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Reading or writing the workbook failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The blocking file task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// One repository per record file.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub sessions: Repository<PatientSession>,
    pub professionals: Repository<Professional>,
    pub clients: Repository<Client>,
    pub exercises: Repository<ExerciseEntry>,
}

impl Repositories {
    #[must_use]
    pub fn new(config: &ClinicConfig) -> Self {
        Self {
            sessions: Repository::new(config.data_file(files::PATIENT_SESSIONS)),
            professionals: Repository::new(config.data_file(files::PROFESSIONALS)),
            clients: Repository::new(config.data_file(files::CLIENTS)),
            exercises: Repository::new(config.data_file(files::EXERCISES)),
        }
    }
}
