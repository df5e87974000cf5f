//! Command implementations.
//!
//! Workbook access is blocking, so each command hands its file work to the
//! blocking pool through [`blocking`].

pub mod credentials;
pub mod records;
pub mod seed;

use std::path::PathBuf;

use techealth_sheets::StoreError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Reading or writing a workbook failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An input file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The exercise catalog YAML is malformed.
    #[error("Invalid catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The catalog has no usable (position, exercise) pair.
    #[error("The exercise catalog is empty")]
    EmptyCatalog,

    /// The target file exists and `--force` was not given.
    #[error("{} already exists; pass --force to overwrite it", .0.display())]
    AlreadyExists(PathBuf),

    /// The credential pair is not in the file.
    #[error("No credential row matches '{0}'")]
    NoMatch(String),

    /// The blocking task panicked.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Run `op` on the blocking pool.
pub async fn blocking<T, F>(op: F) -> Result<T, CommandError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CommandError> + Send + 'static,
{
    tokio::task::spawn_blocking(op).await?
}
