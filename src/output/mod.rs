//! Serialization of the flat table to analytics formats.
//!
//! Two formats are supported: CSV and Parquet (the latter behind the
//! `parquet` cargo feature, on by default). Both writers take the column
//! layout straight from [`Table::columns`] and emit rows in table order.
//!
//! # Atomic output
//!
//! [`write_table`] writes into a temporary file next to the destination and
//! renames it into place only after the encoder finished. On any failure the
//! temporary file is removed and the destination is left untouched.

pub mod io_csv;
#[cfg(feature = "parquet")]
pub mod io_parquet;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tempfile::NamedTempFile;

use crate::error::LabelflatError;
use crate::table::Table;

/// Output format selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Parquet,
}

impl OutputFormat {
    /// Selector name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }

    /// File extension for artifacts of this format.
    pub fn extension(&self) -> &'static str {
        self.name()
    }

    /// Whether this build can write the format.
    pub fn is_available(&self) -> bool {
        match self {
            OutputFormat::Csv => true,
            OutputFormat::Parquet => cfg!(feature = "parquet"),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = LabelflatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(OutputFormat::Csv),
            "parquet" => Ok(OutputFormat::Parquet),
            other => Err(LabelflatError::UnsupportedFormat(format!(
                "'{}' (supported: csv, parquet)",
                other
            ))),
        }
    }
}

/// Writes `table` to `path` in the given format.
///
/// # Errors
/// [`LabelflatError::UnsupportedFormat`] if the format is not compiled in,
/// otherwise IO or encoder errors. The destination is only replaced on
/// success.
pub fn write_table(path: &Path, table: &Table, format: OutputFormat) -> Result<(), LabelflatError> {
    if !format.is_available() {
        return Err(unavailable(format));
    }

    tracing::info!(
        path = %path.display(),
        %format,
        rows = table.len(),
        columns = table.columns().len(),
        "writing table"
    );

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staging = NamedTempFile::new_in(dir).map_err(LabelflatError::Io)?;

    match format {
        OutputFormat::Csv => io_csv::write_csv(staging.as_file_mut(), table, path)?,
        #[cfg(feature = "parquet")]
        OutputFormat::Parquet => io_parquet::write_parquet(staging.as_file_mut(), table, path)?,
        #[cfg(not(feature = "parquet"))]
        OutputFormat::Parquet => return Err(unavailable(format)),
    }

    staging
        .persist(path)
        .map_err(|e| LabelflatError::Io(e.error))?;

    tracing::info!(path = %path.display(), "table written");
    Ok(())
}

fn unavailable(format: OutputFormat) -> LabelflatError {
    LabelflatError::UnsupportedFormat(format!(
        "'{}' (this build was compiled without the '{}' feature)",
        format, format
    ))
}
