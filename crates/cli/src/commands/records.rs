//! Record file listing.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use techealth_core::{Client, ExerciseEntry, PatientSession, Professional};
use techealth_sheets::{Record, RecordStore, TableView, files};
use tracing::{info, warn};

use super::{CommandError, blocking};

/// Which record file to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordFile {
    /// Logged patient sessions (`datos_pacientes.xlsx`)
    Sessions,
    /// Registered professionals (`profesionales.xlsx`)
    Professionals,
    /// Registered clients (`clientes.xlsx`)
    Clients,
    /// Exercise catalog (`ejercicios_pacientes.xlsx`)
    Exercises,
}

impl RecordFile {
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Sessions => files::PATIENT_SESSIONS,
            Self::Professionals => files::PROFESSIONALS,
            Self::Clients => files::CLIENTS,
            Self::Exercises => files::EXERCISES,
        }
    }
}

/// Log every row of `file` and return the row count.
///
/// A missing file lists as empty with a warning.
///
/// # Errors
///
/// Returns `CommandError::Store` if the file exists but cannot be read.
pub async fn list(data_dir: &Path, file: RecordFile) -> Result<usize, CommandError> {
    let path = data_dir.join(file.file_name());
    blocking(move || match file {
        RecordFile::Sessions => list_rows::<PatientSession>(path),
        RecordFile::Professionals => list_rows::<Professional>(path),
        RecordFile::Clients => list_rows::<Client>(path),
        RecordFile::Exercises => list_rows::<ExerciseEntry>(path),
    })
    .await
}

fn list_rows<R: Record>(path: PathBuf) -> Result<usize, CommandError> {
    let loaded = RecordStore::<R>::new(path).load_or_create()?;
    if let Some(warning) = &loaded.warning {
        warn!("{warning}");
    }

    let view = TableView::from(&loaded.value);
    info!("{}", view.columns.join(" | "));
    for row in &view.rows {
        info!("{}", row.join(" | "));
    }
    info!(rows = view.rows.len(), "Listed");
    Ok(view.rows.len())
}
