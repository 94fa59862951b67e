//! Per-label processing steps.
//!
//! Each label goes through four steps, in this order:
//!
//! 1. [`filter_excluded`]: drop fields named in the exclusion set.
//! 2. [`flatten_attributes`]: promote `attributes` entries to top level.
//! 3. [`merge_individual`]: move `"<class_name> - Individual"` into `individual`.
//! 4. [`project_label`]: keep exactly the five label columns.
//!
//! Exclusion runs before flattening, so excluding `attributes` means its
//! contents are never looked at.

use serde_json::Value;

use super::{ExclusionSet, ProjectionMode};
use crate::error::LabelflatError;
use crate::record::{LabelRecord, Record};
use crate::table::LabelColumns;

const ATTRIBUTES_KEY: &str = "attributes";
const INDIVIDUAL_KEY: &str = "individual";

/// Where a label sits in the document, for error context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelPosition {
    pub image_index: usize,
    pub label_index: usize,
}

/// Result of projecting a label onto the fixed column set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Projection {
    pub columns: LabelColumns,
    /// Fields that were present but are not label columns, in label order.
    pub dropped: Vec<String>,
}

/// Name of the per-class individual field, e.g. `"Bird - Individual"`.
pub fn individual_key(class_name: &str) -> String {
    format!("{class_name} - Individual")
}

/// Returns a copy of `label` without any excluded field.
pub fn filter_excluded(label: &Record, exclude: &ExclusionSet) -> LabelRecord {
    label
        .iter()
        .filter(|(key, _)| !exclude.contains(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect::<Record>()
        .into()
}

/// Moves every `attributes` entry to the top level, then removes `attributes`.
///
/// Removal happens after the merge, so an attribute itself named
/// `attributes` does not survive.
///
/// Attribute entries overwrite existing fields with the same name. A null
/// `attributes` counts as empty.
///
/// # Errors
/// [`LabelflatError::MissingColumn`] if `attributes` is neither a mapping nor null.
pub fn flatten_attributes(
    label: &mut LabelRecord,
    position: LabelPosition,
) -> Result<(), LabelflatError> {
    let attributes = match label.0.shift_remove(ATTRIBUTES_KEY) {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Object(attributes)) => attributes,
        Some(other) => {
            return Err(LabelflatError::MissingColumn {
                image_index: position.image_index,
                message: format!(
                    "label {}: 'attributes' is {}, expected a mapping",
                    position.label_index,
                    value_kind(&other)
                ),
            });
        }
    };

    for (key, value) in attributes {
        label.0.insert(key, value);
    }
    // A nested `attributes` entry goes away with the container.
    label.0.shift_remove(ATTRIBUTES_KEY);
    Ok(())
}

/// Replaces `individual` with the value of `"<class_name> - Individual"`.
///
/// The per-class field is always removed. `individual` is only written when
/// the removed value is non-null. A missing or non-string `class_name` looks
/// up `" - Individual"`.
pub fn merge_individual(label: &mut LabelRecord) {
    let key = individual_key(label.class_name().unwrap_or(""));

    match label.0.shift_remove(&key) {
        Some(Value::Null) | None => {}
        Some(individual) => {
            label.0.insert(INDIVIDUAL_KEY.to_string(), individual);
        }
    }
}

/// Restricts `label` to the five label columns.
///
/// # Errors
/// In [`ProjectionMode::Strict`], [`LabelflatError::UnexpectedColumn`] for
/// the first field that is not a label column.
pub fn project_label(
    label: LabelRecord,
    mode: ProjectionMode,
    position: LabelPosition,
) -> Result<Projection, LabelflatError> {
    let mut projection = Projection::default();

    for (key, value) in label.0 {
        match projection.columns.slot_mut(&key) {
            Some(slot) => *slot = value,
            None if mode == ProjectionMode::Strict => {
                return Err(LabelflatError::UnexpectedColumn {
                    image_index: position.image_index,
                    label_index: position.label_index,
                    field: key,
                });
            }
            None => projection.dropped.push(key),
        }
    }

    Ok(projection)
}

/// Human-readable name of a JSON value's type, for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
