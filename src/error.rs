use std::path::PathBuf;
use thiserror::Error;

/// The main error type for labelflat operations.
#[derive(Debug, Error)]
pub enum LabelflatError {
    #[error("Configuration error: {key}: {message}")]
    Configuration { key: &'static str, message: String },

    #[error("Malformed input in {path}: {message}")]
    MalformedInput { path: PathBuf, message: String },

    #[error("Missing column in image {image_index}: {message}")]
    MissingColumn { image_index: usize, message: String },

    #[error(
        "Unexpected column '{field}' in image {image_index}, label {label_index} \
         (strict projection allows only class_name, bbox, foot, sex, individual)"
    )]
    UnexpectedColumn {
        image_index: usize,
        label_index: usize,
        field: String,
    },

    #[error("Failed to derive image_rating for image {image_index}: {message}")]
    Derivation { image_index: usize, message: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write CSV to {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write Parquet to {path}: {message}")]
    ParquetWrite { path: PathBuf, message: String },
}
