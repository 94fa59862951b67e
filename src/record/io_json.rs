//! Loader for annotation export JSON.
//!
//! The export is parsed in one pass; there is no partial-success mode. A
//! document either parses completely or the whole load fails with
//! [`LabelflatError::MalformedInput`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::model::Document;
use crate::error::LabelflatError;

/// Reads a document from a JSON export file.
///
/// # Errors
/// Returns [`LabelflatError::Io`] if the file cannot be opened and
/// [`LabelflatError::MalformedInput`] if it is not a valid export (not JSON,
/// no `images` array, or an image entry that is not an object).
pub fn read_document(path: &Path) -> Result<Document, LabelflatError> {
    tracing::info!(path = %path.display(), "loading annotation export");

    let file = File::open(path).map_err(LabelflatError::Io)?;
    let reader = BufReader::new(file);

    let document: Document =
        serde_json::from_reader(reader).map_err(|source| LabelflatError::MalformedInput {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;

    tracing::info!(images = document.images.len(), "annotation export loaded");
    Ok(document)
}

/// Reads a document from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_json_str(json: &str) -> Result<Document, LabelflatError> {
    from_json_slice(json.as_bytes())
}

/// Reads a document from raw JSON bytes.
///
/// Useful for fuzzing and processing bytes without requiring UTF-8 upfront.
pub fn from_json_slice(bytes: &[u8]) -> Result<Document, LabelflatError> {
    serde_json::from_slice(bytes).map_err(|source| LabelflatError::MalformedInput {
        path: Path::new("<bytes>").to_path_buf(),
        message: source.to_string(),
    })
}
