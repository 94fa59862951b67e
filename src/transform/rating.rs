//! `image_rating` derivation from `dataset_name`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::LabelflatError;
use crate::record::ImageRecord;

static TRAILING_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+$").expect("trailing digit pattern is valid"));

/// Returns the run of ASCII digits at the end of `s`, if any.
pub fn trailing_digits(s: &str) -> Option<&str> {
    TRAILING_DIGITS.find(s).map(|m| m.as_str())
}

/// Parses the trailing digit run of a dataset name as the image rating.
///
/// # Errors
/// [`LabelflatError::Derivation`] when there are no trailing digits or the
/// number does not fit in an `i64`.
pub fn extract_image_rating(dataset_name: &str, image_index: usize) -> Result<i64, LabelflatError> {
    let digits = trailing_digits(dataset_name).ok_or_else(|| LabelflatError::Derivation {
        image_index,
        message: format!("dataset_name '{dataset_name}' has no trailing digits"),
    })?;

    digits.parse::<i64>().map_err(|e| LabelflatError::Derivation {
        image_index,
        message: format!("dataset_name '{dataset_name}': {e}"),
    })
}

/// Derives the rating for an image record.
///
/// # Errors
/// [`LabelflatError::Derivation`] when `dataset_name` is missing, not a
/// string, or has no usable trailing digits.
pub fn derive_image_rating(image: &ImageRecord, image_index: usize) -> Result<i64, LabelflatError> {
    let name = image
        .dataset_name()
        .ok_or_else(|| LabelflatError::Derivation {
            image_index,
            message: "missing string field 'dataset_name'".to_string(),
        })?;
    extract_image_rating(name, image_index)
}
