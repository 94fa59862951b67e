//! Summary of what a transform run did to the input.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Counts collected while transforming a document.
///
/// Field counts use `BTreeMap` so text and JSON output are stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    /// Image records read.
    pub images: usize,
    /// Label records read across all images.
    pub labels: usize,
    /// Rows emitted for images without labels.
    pub placeholder_rows: usize,
    /// Total rows emitted.
    pub rows: usize,
    /// Label fields removed by the exclusion set, by name.
    pub excluded_fields: BTreeMap<String, usize>,
    /// Label fields removed by permissive projection, by name.
    pub dropped_fields: BTreeMap<String, usize>,
}

impl TransformReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_excluded(&mut self, field: &str) {
        *self.excluded_fields.entry(field.to_string()).or_default() += 1;
    }

    pub(crate) fn record_dropped(&mut self, field: &str) {
        *self.dropped_fields.entry(field.to_string()).or_default() += 1;
    }

    /// True when projection dropped no data.
    pub fn is_lossless(&self) -> bool {
        self.dropped_fields.is_empty()
    }
}

impl fmt::Display for TransformReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Transformed {} image(s) with {} label(s) into {} row(s) ({} placeholder)",
            self.images, self.labels, self.rows, self.placeholder_rows
        )?;

        if !self.excluded_fields.is_empty() {
            writeln!(f, "Excluded fields:")?;
            for (field, count) in &self.excluded_fields {
                writeln!(f, "  {field}: {count}")?;
            }
        }

        if !self.dropped_fields.is_empty() {
            writeln!(f, "Dropped fields (not a label column):")?;
            for (field, count) in &self.dropped_fields {
                writeln!(f, "  {field}: {count}")?;
            }
        }

        Ok(())
    }
}
