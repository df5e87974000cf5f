//! TecHealth Sheets - Spreadsheet-backed storage.
//!
//! Both dashboards persist everything as XLSX workbooks in a data directory.
//! This crate owns that layer:
//!
//! - [`table`] - Untyped cells and tables
//! - [`workbook`] - Reading (`calamine`) and writing (`rust_xlsxwriter`) workbooks
//! - [`record`] / [`schema`] - Typed rows and the column schema of each file
//! - [`store`] - `RecordStore<R>`: load-or-create, filter, append and persist
//! - [`credentials`] - Plaintext credential files
//! - [`upload`] - Parsing uploaded `.xlsx` / `.csv` files
//! - [`profile`] - Column summaries for analysis pages
//! - [`view`] - String renderings of tables and profiles for templates
//!
//! Everything here does blocking file I/O; async callers wrap it in
//! `spawn_blocking`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod credentials;
pub mod error;
pub mod profile;
pub mod record;
pub mod schema;
pub mod store;
pub mod table;
pub mod upload;
pub mod view;
pub mod workbook;

pub use credentials::{CredentialSchema, CredentialStore, CredentialTable};
pub use error::{StoreError, UploadError};
pub use profile::{ColumnKind, ColumnProfile, NumericSummary, TableProfile, profile};
pub use record::Record;
pub use schema::files;
pub use store::{Loaded, RecordStore, RecordTable, StoreWarning};
pub use table::{Cell, Table};
pub use upload::parse_upload;
pub use view::{ProfileRow, ProfileView, TableView};
