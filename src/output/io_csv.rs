//! CSV writer for the flat table.
//!
//! One header row with [`Table::columns`], then one record per output row.
//! Cells are rendered with [`render_cell`]: null is an empty field, strings
//! are raw, and nested values (such as `bbox`) are compact JSON.

use std::io::{self, Write};
use std::path::Path;

use crate::error::LabelflatError;
use crate::table::{render_cell, Table};

/// Writes `table` as CSV to `writer`.
///
/// `path` is only used for error context.
pub fn write_csv<W: Write>(writer: W, table: &Table, path: &Path) -> Result<(), LabelflatError> {
    let csv_err = |source| LabelflatError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.columns()).map_err(csv_err)?;

    let mut record: Vec<String> = Vec::with_capacity(table.columns().len());
    for row in table.rows() {
        record.clear();
        record.extend(
            table
                .columns()
                .iter()
                .map(|column| row.get(column).map(|v| render_cell(&v)).unwrap_or_default()),
        );
        csv_writer.write_record(&record).map_err(csv_err)?;
    }

    csv_writer
        .into_inner()
        .map_err(|e| LabelflatError::Io(e.into_error()))?
        .flush()
        .map_err(LabelflatError::Io)?;

    Ok(())
}

/// Writes `table` to a CSV string.
///
/// Useful for testing without file I/O.
pub fn to_csv_string(table: &Table) -> Result<String, LabelflatError> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, table, Path::new("<string>"))?;

    String::from_utf8(buffer)
        .map_err(|e| LabelflatError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
