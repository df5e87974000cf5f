//! XLSX reading and writing.
//!
//! Workbooks are read with `calamine` and written with `rust_xlsxwriter`.
//! Only the first worksheet is used, and its first row is the header.
//! Writes always replace the whole file.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Reader, Xlsx, XlsxError, open_workbook};
use rust_xlsxwriter::Workbook;

use crate::error::StoreError;
use crate::table::{Cell, Table};

/// Read the first worksheet of the workbook at `path`.
///
/// # Errors
///
/// Returns `StoreError::Read` if the file cannot be opened or parsed.
pub fn read_xlsx(path: &Path) -> Result<Table, StoreError> {
    let workbook: Xlsx<_> = open_workbook(path).map_err(|e| StoreError::read(path, e))?;
    table_from_workbook(workbook).map_err(|e| StoreError::read(path, e))
}

/// Read the first worksheet of an in-memory workbook.
///
/// # Errors
///
/// Returns the `calamine` error if the bytes are not a readable workbook.
pub fn read_xlsx_bytes(bytes: &[u8]) -> Result<Table, XlsxError> {
    let workbook = Xlsx::new(Cursor::new(bytes))?;
    table_from_workbook(workbook)
}

fn table_from_workbook<RS: Read + Seek>(mut workbook: Xlsx<RS>) -> Result<Table, XlsxError> {
    let Some(range) = workbook.worksheet_range_at(0) else {
        return Ok(Table::default());
    };
    let range = range?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Table::default());
    };

    let mut table = Table::new(header.iter().map(|data| cell_from_data(data).as_text()));
    for row in rows {
        let cells: Vec<Cell> = row.iter().map(cell_from_data).collect();
        // Trailing blank rows come back from some writers; drop them.
        if cells.iter().all(Cell::is_empty) {
            continue;
        }
        table.push_row(cells);
    }

    Ok(table)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) if datetime.time() == chrono::NaiveTime::MIN => {
                Cell::Text(datetime.date().format("%Y-%m-%d").to_string())
            }
            Some(datetime) => Cell::Text(datetime.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Cell::number(dt.as_f64()),
        },
    }
}

/// Write `table` as the only worksheet of a new workbook at `path`.
///
/// Any existing file is overwritten. Missing parent directories are created.
///
/// # Errors
///
/// Returns `StoreError` if the table does not fit a worksheet or the file
/// cannot be written.
pub fn write_xlsx(table: &Table, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::io(path, e))?;
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let too_large = || StoreError::TooLarge {
        path: path.to_path_buf(),
    };

    for (col, name) in table.columns().iter().enumerate() {
        let col = u16::try_from(col).map_err(|_| too_large())?;
        worksheet
            .write_string(0, col, name)
            .map_err(|e| StoreError::write(path, e))?;
    }

    for (row_index, row) in table.rows().iter().enumerate() {
        let row_num = u32::try_from(row_index + 1).map_err(|_| too_large())?;
        for (col, cell) in row.iter().enumerate() {
            let col = u16::try_from(col).map_err(|_| too_large())?;
            let result = match cell {
                Cell::Empty => continue,
                Cell::Int(_) | Cell::Float(_) => {
                    worksheet.write_number(row_num, col, cell.as_f64().unwrap_or_default())
                }
                Cell::Bool(b) => worksheet.write_boolean(row_num, col, *b),
                Cell::Text(s) => worksheet.write_string(row_num, col, s),
            };
            result.map_err(|e| StoreError::write(path, e))?;
        }
    }

    workbook.save(path).map_err(|e| StoreError::write(path, e))?;
    tracing::debug!(path = %path.display(), rows = table.len(), "Workbook written");
    Ok(())
}
