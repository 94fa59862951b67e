//! Schema-free record types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An ordered mapping from field name to JSON value.
///
/// Insertion order is preserved, which is what lets the writer lay out
/// pass-through columns in the order they were first seen.
pub type Record = Map<String, Value>;

/// Key holding an image's label records.
pub const LABELS_KEY: &str = "labels";

/// Key holding an image's tags. Tags never reach the output.
pub const TAGS_KEY: &str = "tags";

/// Key holding the dataset name an image belongs to.
pub const DATASET_NAME_KEY: &str = "dataset_name";

/// Root of an annotation export.
///
/// Only the `images` key is read; anything else at the root is ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub images: Vec<ImageRecord>,
}

/// One annotated image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRecord(pub Record);

/// One annotation attached to an image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelRecord(pub Record);

impl ImageRecord {
    /// Wraps an existing field map.
    pub fn new(fields: Record) -> Self {
        Self(fields)
    }

    /// Returns a field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `dataset_name` if present and a string.
    pub fn dataset_name(&self) -> Option<&str> {
        self.0.get(DATASET_NAME_KEY).and_then(Value::as_str)
    }

    /// Returns the raw `labels` value. `None` when the key is absent.
    pub fn labels(&self) -> Option<&Value> {
        self.0.get(LABELS_KEY)
    }

    /// Iterates the fields carried onto every output row, in source order.
    ///
    /// Everything except `labels` and `tags` passes through.
    pub fn passthrough_fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0
            .iter()
            .filter(|(key, _)| key.as_str() != LABELS_KEY && key.as_str() != TAGS_KEY)
    }
}

impl LabelRecord {
    /// Wraps an existing field map.
    pub fn new(fields: Record) -> Self {
        Self(fields)
    }

    /// Returns a field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `class_name` if present and a string.
    pub fn class_name(&self) -> Option<&str> {
        self.0.get("class_name").and_then(Value::as_str)
    }
}

impl From<Record> for ImageRecord {
    fn from(fields: Record) -> Self {
        Self(fields)
    }
}

impl From<Record> for LabelRecord {
    fn from(fields: Record) -> Self {
        Self(fields)
    }
}
