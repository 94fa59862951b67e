//! Flattening of image/label records into output rows.
//!
//! This is the core of labelflat. Every image record expands into one row
//! per label (or a single all-null label row when it has no labels), each
//! label is filtered, flattened and projected onto the fixed label columns,
//! and `image_rating` is derived from `dataset_name`.
//!
//! Output order always follows input order: images first, then labels within
//! each image. Nothing is reordered or deduplicated.

pub mod label;
pub mod rating;
pub mod report;

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::str::FromStr;

use serde_json::Value;

pub use label::{
    filter_excluded, flatten_attributes, individual_key, merge_individual, project_label,
    LabelPosition, Projection,
};
pub use rating::{derive_image_rating, extract_image_rating};
pub use report::TransformReport;

use crate::error::LabelflatError;
use crate::record::{Document, ImageRecord, Record};
use crate::table::{LabelColumns, OutputRow, Table};

/// Label field names dropped before attributes are flattened.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExclusionSet(BTreeSet<String>);

impl ExclusionSet {
    /// Parses a comma-separated list. Entries are trimmed; empty entries are skipped.
    pub fn parse(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl FromStr for ExclusionSet {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// What to do with label fields that are not one of the five label columns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProjectionMode {
    /// Drop them and count them in the report.
    #[default]
    Permissive,
    /// Fail with [`LabelflatError::UnexpectedColumn`].
    Strict,
}

impl ProjectionMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            ProjectionMode::Strict
        } else {
            ProjectionMode::Permissive
        }
    }
}

/// Options controlling a transform run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransformOptions {
    pub exclude: ExclusionSet,
    pub projection: ProjectionMode,
}

/// The flat table plus a summary of the run.
#[derive(Clone, Debug)]
pub struct TransformOutput {
    pub table: Table,
    pub report: TransformReport,
}

/// Transforms every image of `document` into output rows.
///
/// # Errors
/// Fails on the first structural problem ([`LabelflatError::MissingColumn`]),
/// strict projection violation ([`LabelflatError::UnexpectedColumn`]) or
/// rating derivation failure ([`LabelflatError::Derivation`]). No partial
/// table is returned.
pub fn transform_document(
    document: &Document,
    options: &TransformOptions,
) -> Result<TransformOutput, LabelflatError> {
    tracing::info!(
        images = document.images.len(),
        excluded = options.exclude.iter().count(),
        projection = ?options.projection,
        "transforming annotation records"
    );

    let mut report = TransformReport::new();
    let mut rows = Vec::with_capacity(document.images.len());

    for (image_index, image) in document.images.iter().enumerate() {
        let image_rows = expand_image(image, image_index, options, &mut report)?;
        rows.extend(image_rows);
    }

    report.images = document.images.len();
    report.rows = rows.len();

    if !report.dropped_fields.is_empty() {
        let fields: Vec<&str> = report.dropped_fields.keys().map(String::as_str).collect();
        tracing::warn!(
            ?fields,
            "label fields outside the label columns were dropped"
        );
    }
    tracing::info!(rows = report.rows, "annotation records transformed");

    Ok(TransformOutput {
        table: Table::from_rows(rows),
        report,
    })
}

/// Expands one image record into its output rows.
///
/// # Errors
/// See [`transform_document`].
pub fn expand_image(
    image: &ImageRecord,
    image_index: usize,
    options: &TransformOptions,
    report: &mut TransformReport,
) -> Result<Vec<OutputRow>, LabelflatError> {
    let image_rating = derive_image_rating(image, image_index)?;
    let labels = image_labels(image, image_index)?;
    let passthrough: Record = image
        .passthrough_fields()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    tracing::debug!(image_index, labels = labels.len(), image_rating, "expanding image");

    if labels.is_empty() {
        report.placeholder_rows += 1;
        return Ok(vec![OutputRow {
            image: passthrough,
            label: LabelColumns::default(),
            image_rating,
        }]);
    }

    let mut rows = Vec::with_capacity(labels.len());
    for (label_index, label) in labels.into_iter().enumerate() {
        let position = LabelPosition {
            image_index,
            label_index,
        };
        let columns = process_label(label, options, position, report)?;
        rows.push(OutputRow {
            image: passthrough.clone(),
            label: columns,
            image_rating,
        });
    }
    report.labels += rows.len();

    Ok(rows)
}

/// Runs the four label steps on one source label.
pub fn process_label(
    label: &Record,
    options: &TransformOptions,
    position: LabelPosition,
    report: &mut TransformReport,
) -> Result<LabelColumns, LabelflatError> {
    for key in label.keys().filter(|key| options.exclude.contains(key)) {
        report.record_excluded(key);
    }

    let mut working = filter_excluded(label, &options.exclude);
    flatten_attributes(&mut working, position)?;
    merge_individual(&mut working);
    let projection = project_label(working, options.projection, position)?;

    for field in &projection.dropped {
        report.record_dropped(field);
    }
    Ok(projection.columns)
}

/// Returns the label mappings of an image. Absent or null `labels` is empty.
fn image_labels(image: &ImageRecord, image_index: usize) -> Result<Vec<&Record>, LabelflatError> {
    let items = match image.labels() {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(LabelflatError::MissingColumn {
                image_index,
                message: format!(
                    "'labels' is {}, expected a sequence",
                    label::value_kind(other)
                ),
            });
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(label_index, item)| {
            item.as_object().ok_or_else(|| LabelflatError::MissingColumn {
                image_index,
                message: format!(
                    "label {label_index} is {}, expected a mapping",
                    label::value_kind(item)
                ),
            })
        })
        .collect()
}
