//! Source records of an annotation export.
//!
//! An export is a [`Document`] holding a list of [`ImageRecord`]s, each of
//! which owns zero or more label records under its `labels` key. Records are
//! kept schema-free: every record is an ordered map from field name to JSON
//! value, so unknown fields survive untouched until the transformer decides
//! what to do with them.
//!
//! # Example
//!
//! ```
//! use labelflat::record::io_json::from_json_str;
//!
//! let doc = from_json_str(r#"{"images":[{"dataset_name":"set_5","labels":[]}]}"#).unwrap();
//! assert_eq!(doc.images.len(), 1);
//! assert_eq!(doc.images[0].dataset_name(), Some("set_5"));
//! ```

pub mod io_json;
mod model;

pub use model::{
    Document, ImageRecord, LabelRecord, Record, DATASET_NAME_KEY, LABELS_KEY, TAGS_KEY,
};
