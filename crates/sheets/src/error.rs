//! Storage and upload errors.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from reading or writing a persisted table.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The workbook exists but could not be opened or parsed.
    #[error("failed to read workbook {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    /// The workbook could not be written.
    #[error("failed to write workbook {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    /// Filesystem error around the workbook.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header row lacks a column the schema declares.
    #[error("{path} is missing column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    /// A data row could not be converted into a record.
    #[error("{path} row {row}: column '{column}' {reason}")]
    MalformedRow {
        path: PathBuf,
        row: usize,
        column: &'static str,
        reason: String,
    },

    /// The largest id in the table is already `i32::MAX`.
    #[error("no ids left: the largest id is {max}")]
    IdsExhausted { max: i32 },

    /// The table exceeds what a worksheet can hold.
    #[error("{path}: table exceeds worksheet limits")]
    TooLarge { path: PathBuf },
}

impl StoreError {
    pub(crate) fn read(path: &Path, source: calamine::XlsxError) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn write(path: &Path, source: rust_xlsxwriter::XlsxError) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Errors from parsing an uploaded file into a table.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Only `.xlsx` and `.csv` uploads are accepted.
    #[error("unsupported file type '{0}': expected .xlsx or .csv")]
    UnsupportedType(String),

    /// The upload has no header row.
    #[error("the file is empty")]
    Empty,

    /// A CSV row has more fields than the header.
    #[error("expected {expected} fields in line {line}, saw {found}")]
    ExtraFields {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// The CSV could not be parsed.
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The workbook could not be parsed.
    #[error("invalid workbook: {0}")]
    Xlsx(#[from] calamine::XlsxError),
}
