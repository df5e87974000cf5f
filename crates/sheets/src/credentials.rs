//! Plaintext credential files.
//!
//! A credential file is a workbook with an identifier column and a secret
//! column. Matching is exact string equality on both, with no hashing and no
//! normalization.

use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use techealth_core::Credential;

use crate::error::StoreError;
use crate::schema::files;
use crate::store::{Loaded, StoreWarning};
use crate::table::{Cell, Table};
use crate::workbook::{read_xlsx, write_xlsx};

/// Header names of a credential file's two columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialSchema {
    pub identifier: &'static str,
    pub secret: &'static str,
}

impl CredentialSchema {
    /// Clinic sidebar login (`credentials.xlsx`).
    pub const CLINIC_LOGIN: Self = Self {
        identifier: "email",
        secret: "password",
    };

    /// Patients allowed to view their sessions (`credenciales.xlsx`).
    pub const PATIENT_REGISTRY: Self = Self {
        identifier: "Nombre",
        secret: "DNI",
    };

    /// Portal Students page login (`admin_credentials.xlsx`).
    pub const PORTAL_ADMIN: Self = Self {
        identifier: "username",
        secret: "password",
    };

    /// The schema conventionally stored under `file_name`, if any.
    #[must_use]
    pub fn for_file(file_name: &str) -> Option<Self> {
        match file_name {
            files::CLINIC_CREDENTIALS => Some(Self::CLINIC_LOGIN),
            files::PATIENT_REGISTRY => Some(Self::PATIENT_REGISTRY),
            files::PORTAL_ADMIN_CREDENTIALS => Some(Self::PORTAL_ADMIN),
            _ => None,
        }
    }
}

/// Credentials loaded from one file, in file order.
#[derive(Debug, Clone, Default)]
pub struct CredentialTable {
    credentials: Vec<Credential>,
}

impl CredentialTable {
    #[must_use]
    pub const fn from_credentials(credentials: Vec<Credential>) -> Self {
        Self { credentials }
    }

    /// True iff some row has exactly this identifier and secret.
    #[must_use]
    pub fn matches(&self, identifier: &str, secret: &str) -> bool {
        self.credentials
            .iter()
            .any(|credential| credential.matches(identifier, secret))
    }

    /// First row with this identifier.
    #[must_use]
    pub fn find(&self, identifier: &str) -> Option<&Credential> {
        self.credentials
            .iter()
            .find(|credential| credential.identifier == identifier)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    fn from_table(table: &Table, schema: CredentialSchema, path: &Path) -> Result<Self, StoreError> {
        let (identifier, secret) = column_positions(table, schema, path)?;

        let credentials = table
            .rows()
            .iter()
            .filter_map(|row| {
                let identifier = row.get(identifier).map(Cell::as_text)?;
                if identifier.is_empty() {
                    return None;
                }
                let secret = row.get(secret).map(Cell::as_text).unwrap_or_default();
                Some(Credential::new(identifier, secret))
            })
            .collect();

        Ok(Self { credentials })
    }
}

fn column_positions(
    table: &Table,
    schema: CredentialSchema,
    path: &Path,
) -> Result<(usize, usize), StoreError> {
    let position = |column: &str| {
        table
            .column_index(column)
            .ok_or_else(|| StoreError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            })
    };
    Ok((position(schema.identifier)?, position(schema.secret)?))
}

/// A credential file on disk.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    schema: CredentialSchema,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>, schema: CredentialSchema) -> Self {
        Self {
            path: path.into(),
            schema,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn schema(&self) -> CredentialSchema {
        self.schema
    }

    /// Load all credentials. A missing file yields an empty table and a warning.
    ///
    /// Rows with an empty identifier are skipped.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file exists but cannot be read or lacks
    /// one of the schema's columns.
    pub fn load(&self) -> Result<Loaded<CredentialTable>, StoreError> {
        if !self.path.exists() {
            tracing::warn!(path = %self.path.display(), "Credential file not found");
            return Ok(Loaded {
                value: CredentialTable::default(),
                warning: Some(StoreWarning::missing_file(&self.path)),
            });
        }

        let table = read_xlsx(&self.path)?;
        let credentials = CredentialTable::from_table(&table, self.schema, &self.path)?;
        tracing::debug!(path = %self.path.display(), count = credentials.len(), "Credentials loaded");
        Ok(Loaded::ok(credentials))
    }

    /// Add a row, creating the file if needed.
    ///
    /// Columns outside the schema are kept as they are.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the existing file cannot be read or the
    /// workbook cannot be written.
    pub fn append(&self, credential: &Credential) -> Result<(), StoreError> {
        let mut table = if self.path.exists() {
            read_xlsx(&self.path)?
        } else {
            Table::new([self.schema.identifier, self.schema.secret])
        };

        let (identifier, secret) = column_positions(&table, self.schema, &self.path)?;
        let mut row = vec![Cell::Empty; table.columns().len()];
        if let Some(cell) = row.get_mut(identifier) {
            *cell = Cell::text(credential.identifier.as_str());
        }
        if let Some(cell) = row.get_mut(secret) {
            *cell = Cell::text(credential.secret.expose_secret());
        }
        table.push_row(row);

        write_xlsx(&table, &self.path)?;
        tracing::info!(path = %self.path.display(), "Credential added");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn write_rows(path: &Path, columns: &[&str], rows: Vec<Vec<Cell>>) {
        let mut table = Table::new(columns.iter().copied());
        for row in rows {
            table.push_row(row);
        }
        write_xlsx(&table, path).unwrap();
    }

    #[test]
    fn test_bob_can_log_in_with_exact_password() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(files::PORTAL_ADMIN_CREDENTIALS);
        write_rows(
            &path,
            &["username", "password"],
            vec![vec![Cell::text("bob"), Cell::text("x1")]],
        );

        let table = CredentialStore::new(&path, CredentialSchema::PORTAL_ADMIN)
            .load()
            .unwrap()
            .value;

        assert!(table.matches("bob", "x1"));
        assert!(!table.matches("bob", "wrong"));
        assert!(!table.matches("Bob", "x1"));
        assert!(!table.matches("bob ", "x1"));
    }

    #[test]
    fn test_missing_file_is_empty_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = CredentialStore::new(
            dir.path().join(files::CLINIC_CREDENTIALS),
            CredentialSchema::CLINIC_LOGIN,
        )
        .load()
        .unwrap();

        assert!(loaded.value.is_empty());
        assert!(!loaded.value.matches("", ""));
        assert_eq!(
            loaded.warning.unwrap().to_string(),
            "File 'credentials.xlsx' not found."
        );
    }

    #[test]
    fn test_numeric_secret_compares_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(files::PATIENT_REGISTRY);
        write_rows(
            &path,
            &["Nombre", "DNI"],
            vec![vec![Cell::text("Ana"), Cell::Int(1234)]],
        );

        let table = CredentialStore::new(&path, CredentialSchema::PATIENT_REGISTRY)
            .load()
            .unwrap()
            .value;
        assert!(table.matches("Ana", "1234"));
        assert!(!table.matches("Ana", "1234.0"));
    }

    #[test]
    fn test_find_returns_first_duplicate() {
        let table = CredentialTable::from_credentials(vec![
            Credential::new("ana@x.es", "first"),
            Credential::new("ana@x.es", "second"),
        ]);
        let found = table.find("ana@x.es").unwrap();
        assert_eq!(found.secret.expose_secret(), "first");
        assert!(table.matches("ana@x.es", "second"));
        assert!(table.find("luis@x.es").is_none());
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(files::CLINIC_CREDENTIALS);
        write_rows(&path, &["user", "password"], Vec::new());

        let err = CredentialStore::new(&path, CredentialSchema::CLINIC_LOGIN)
            .load()
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingColumn { .. }));
    }

    #[test]
    fn test_append_creates_then_extends_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(
            dir.path().join(files::CLINIC_CREDENTIALS),
            CredentialSchema::CLINIC_LOGIN,
        );

        store.append(&Credential::new("a@x.es", "1")).unwrap();
        store.append(&Credential::new("b@x.es", "2")).unwrap();

        let table = store.load().unwrap().value;
        assert_eq!(table.len(), 2);
        assert!(table.matches("b@x.es", "2"));
    }

    #[test]
    fn test_rows_without_identifier_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(files::CLINIC_CREDENTIALS);
        write_rows(
            &path,
            &["email", "password"],
            vec![
                vec![Cell::Empty, Cell::text("orphan")],
                vec![Cell::text("a@x.es"), Cell::Empty],
            ],
        );

        let table = CredentialStore::new(&path, CredentialSchema::CLINIC_LOGIN)
            .load()
            .unwrap()
            .value;
        assert_eq!(table.len(), 1);
        assert!(table.matches("a@x.es", ""));
    }

    #[test]
    fn test_schema_for_file() {
        assert_eq!(
            CredentialSchema::for_file("credenciales.xlsx"),
            Some(CredentialSchema::PATIENT_REGISTRY)
        );
        assert_eq!(CredentialSchema::for_file("other.xlsx"), None);
    }
}
