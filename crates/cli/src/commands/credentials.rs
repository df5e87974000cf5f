//! Credential file commands.
//!
//! The three credential files share one format (an identifier column and a
//! plaintext secret column), but each uses its own header names.

use std::path::Path;

use clap::ValueEnum;
use techealth_core::Credential;
use techealth_sheets::{CredentialSchema, CredentialStore, files};
use tracing::{info, warn};

use super::{CommandError, blocking};

/// Which credential file a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CredentialFile {
    /// Clinic sidebar login (`credentials.xlsx`)
    Clinic,
    /// Patient registry used by View Data (`credenciales.xlsx`)
    Patients,
    /// Portal Students login (`admin_credentials.xlsx`)
    Portal,
}

impl CredentialFile {
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Clinic => files::CLINIC_CREDENTIALS,
            Self::Patients => files::PATIENT_REGISTRY,
            Self::Portal => files::PORTAL_ADMIN_CREDENTIALS,
        }
    }

    #[must_use]
    pub const fn schema(self) -> CredentialSchema {
        match self {
            Self::Clinic => CredentialSchema::CLINIC_LOGIN,
            Self::Patients => CredentialSchema::PATIENT_REGISTRY,
            Self::Portal => CredentialSchema::PORTAL_ADMIN,
        }
    }

    fn store(self, data_dir: &Path) -> CredentialStore {
        CredentialStore::new(data_dir.join(self.file_name()), self.schema())
    }
}

/// Append a credential row.
///
/// Duplicates are allowed; matching only needs one equal row.
///
/// # Errors
///
/// Returns `CommandError::Store` if the file cannot be read or written.
pub async fn add(
    data_dir: &Path,
    file: CredentialFile,
    identifier: String,
    secret: String,
) -> Result<(), CommandError> {
    let store = file.store(data_dir);
    info!(path = %store.path().display(), %identifier, "Adding credential");

    blocking(move || {
        let existing = store.load()?.value;
        if existing.find(&identifier).is_some() {
            warn!(%identifier, "Identifier already present; adding another row");
        }
        store.append(&Credential::new(identifier, secret))?;
        Ok(())
    })
    .await
}

/// Check a credential pair the way the dashboards do.
///
/// # Errors
///
/// Returns `CommandError::NoMatch` if no row matches, or
/// `CommandError::Store` if the file cannot be read.
pub async fn check(
    data_dir: &Path,
    file: CredentialFile,
    identifier: String,
    secret: String,
) -> Result<(), CommandError> {
    let store = file.store(data_dir);

    blocking(move || {
        let loaded = store.load()?;
        if let Some(warning) = &loaded.warning {
            warn!("{warning}");
        }
        if loaded.value.matches(&identifier, &secret) {
            info!(%identifier, "Credential accepted");
            Ok(())
        } else {
            Err(CommandError::NoMatch(identifier))
        }
    })
    .await
}
