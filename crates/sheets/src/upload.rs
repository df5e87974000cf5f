//! Parsing user-uploaded spreadsheets.
//!
//! Uploads are held in memory for a single request and never written.

use std::path::Path;

use crate::error::UploadError;
use crate::table::{Cell, Table};
use crate::workbook::read_xlsx_bytes;

/// Accepted upload kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Xlsx,
    Csv,
}

impl UploadKind {
    /// Detect the kind from a file name's extension, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::UnsupportedType` for anything else.
    pub fn from_file_name(file_name: &str) -> Result<Self, UploadError> {
        let extension = Path::new(file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            _ => Err(UploadError::UnsupportedType(file_name.to_string())),
        }
    }
}

/// Parse an uploaded `.xlsx` or `.csv` file into a table.
///
/// # Errors
///
/// Returns `UploadError` for unsupported extensions, unparseable content, or
/// a file without a header row.
pub fn parse_upload(file_name: &str, bytes: &[u8]) -> Result<Table, UploadError> {
    let table = match UploadKind::from_file_name(file_name)? {
        UploadKind::Xlsx => read_xlsx_bytes(bytes)?,
        UploadKind::Csv => parse_csv(bytes)?,
    };

    if table.columns().is_empty() {
        return Err(UploadError::Empty);
    }

    tracing::debug!(
        file_name,
        columns = table.columns().len(),
        rows = table.len(),
        "Upload parsed"
    );
    Ok(table)
}

/// Short rows are padded with empty cells; a row longer than the header is
/// an error, since its extra fields would have no column.
fn parse_csv(bytes: &[u8]) -> Result<Table, UploadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let mut table = Table::new(headers.iter().map(str::to_string));
    if headers.iter().all(str::is_empty) {
        return Ok(Table::default());
    }

    for record in reader.records() {
        let record = record?;
        if record.len() > headers.len() {
            return Err(UploadError::ExtraFields {
                line: record.position().map_or(0, csv::Position::line),
                expected: headers.len(),
                found: record.len(),
            });
        }
        let row: Vec<Cell> = record.iter().map(infer_cell).collect();
        if row.iter().all(Cell::is_empty) {
            continue;
        }
        table.push_row(row);
    }

    Ok(table)
}

/// Type a CSV field: whole number, finite decimal, boolean, or text.
fn infer_cell(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Cell::Empty;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Cell::Int(int);
    }
    if let Ok(float) = trimmed.parse::<f64>()
        && float.is_finite()
    {
        return Cell::Float(float);
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Cell::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Cell::Bool(false);
    }
    Cell::text(field)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::workbook::write_xlsx;

    #[test]
    fn test_csv_cells_are_typed() {
        let csv = "Nombre,Edad,Salario,Activo\nAna,34,1500.5,true\nLuis,,2000,FALSE\n";
        let table = parse_upload("empleados.csv", csv.as_bytes()).unwrap();

        assert_eq!(table.columns(), ["Nombre", "Edad", "Salario", "Activo"]);
        assert_eq!(
            table.rows()[0],
            vec![
                Cell::text("Ana"),
                Cell::Int(34),
                Cell::Float(1500.5),
                Cell::Bool(true)
            ]
        );
        assert_eq!(table.rows()[1][1], Cell::Empty);
        assert_eq!(table.rows()[1][2], Cell::Int(2000));
    }

    #[test]
    fn test_short_csv_rows_are_padded() {
        let csv = "a,b,c\n1\n1,2,3\n";
        let table = parse_upload("x.CSV", csv.as_bytes()).unwrap();
        assert_eq!(table.rows()[0], vec![Cell::Int(1), Cell::Empty, Cell::Empty]);
        assert_eq!(table.rows()[1].len(), 3);
    }

    #[test]
    fn test_csv_row_longer_than_header_is_rejected() {
        let err = parse_upload("x.csv", b"a,b,c\n1,2,3,4\n").unwrap_err();
        assert!(matches!(
            err,
            UploadError::ExtraFields {
                line: 2,
                expected: 3,
                found: 4
            }
        ));
        assert_eq!(err.to_string(), "expected 3 fields in line 2, saw 4");
    }

    #[test]
    fn test_csv_headers_are_kept_as_written() {
        let table = parse_upload("x.csv", b" Nombre ,Edad\nAna,34\n").unwrap();
        assert_eq!(table.columns(), [" Nombre ", "Edad"]);
    }

    #[test]
    fn test_nan_text_stays_text() {
        assert_eq!(infer_cell("NaN"), Cell::text("NaN"));
        assert_eq!(infer_cell("inf"), Cell::text("inf"));
    }

    #[test]
    fn test_xlsx_upload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datos.xlsx");
        let mut table = Table::new(["Departamento", "Plantilla"]);
        table.push_row(vec![Cell::text("IT"), Cell::Int(12)]);
        write_xlsx(&table, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(parse_upload("datos.xlsx", &bytes).unwrap(), table);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = parse_upload("notes.txt", b"hello").unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType(name) if name == "notes.txt"));
        assert!(parse_upload("no_extension", b"").is_err());
    }

    #[test]
    fn test_empty_csv_is_rejected() {
        assert!(matches!(
            parse_upload("empty.csv", b"").unwrap_err(),
            UploadError::Empty
        ));
    }

    #[test]
    fn test_corrupt_xlsx_is_rejected() {
        assert!(matches!(
            parse_upload("broken.xlsx", b"PK\x03\x04 not really").unwrap_err(),
            UploadError::Xlsx(_)
        ));
    }
}
