//! Flat output rows and their column layout.
//!
//! A [`Table`] is what the transformer hands to the writer. Its column order
//! is fixed by construction: pass-through image fields in first-seen order
//! across all rows, then the five label columns, then `image_rating`.

use std::borrow::Cow;
use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::record::Record;

/// The label-derived columns, in output order.
pub const LABEL_COLUMNS: [&str; 5] = ["class_name", "bbox", "foot", "sex", "individual"];

/// The derived rating column, always last.
pub const IMAGE_RATING_COLUMN: &str = "image_rating";

/// The five projected label fields of one output row.
///
/// Absent source fields are `Value::Null`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LabelColumns {
    pub class_name: Value,
    pub bbox: Value,
    pub foot: Value,
    pub sex: Value,
    pub individual: Value,
}

impl LabelColumns {
    /// Returns the value of a label column by name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        match column {
            "class_name" => Some(&self.class_name),
            "bbox" => Some(&self.bbox),
            "foot" => Some(&self.foot),
            "sex" => Some(&self.sex),
            "individual" => Some(&self.individual),
            _ => None,
        }
    }

    /// Returns a mutable slot for a label column by name.
    pub fn slot_mut(&mut self, column: &str) -> Option<&mut Value> {
        match column {
            "class_name" => Some(&mut self.class_name),
            "bbox" => Some(&mut self.bbox),
            "foot" => Some(&mut self.foot),
            "sex" => Some(&mut self.sex),
            "individual" => Some(&mut self.individual),
            _ => None,
        }
    }

    /// True when every label column is null (the placeholder row).
    pub fn is_null(&self) -> bool {
        LABEL_COLUMNS
            .iter()
            .all(|column| self.get(column).is_some_and(Value::is_null))
    }
}

/// One flattened (image x label) row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutputRow {
    /// Image fields other than `labels` and `tags`, in source order.
    pub image: Record,
    pub label: LabelColumns,
    pub image_rating: i64,
}

impl OutputRow {
    /// Returns the cell for `column`, or `None` when this row lacks it.
    ///
    /// Derived columns shadow image fields of the same name.
    pub fn get(&self, column: &str) -> Option<Cow<'_, Value>> {
        if column == IMAGE_RATING_COLUMN {
            return Some(Cow::Owned(Value::from(self.image_rating)));
        }
        if let Some(value) = self.label.get(column) {
            return Some(Cow::Borrowed(value));
        }
        self.image.get(column).map(Cow::Borrowed)
    }
}

/// Returns true for column names produced by the transformer itself.
pub fn is_derived_column(name: &str) -> bool {
    name == IMAGE_RATING_COLUMN || LABEL_COLUMNS.contains(&name)
}

/// An ordered set of output rows with a deterministic column layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<OutputRow>,
}

impl Table {
    /// Builds a table, deriving the column layout from the rows.
    pub fn from_rows(rows: Vec<OutputRow>) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut columns: Vec<String> = Vec::new();

        for row in &rows {
            for key in row.image.keys() {
                if is_derived_column(key) {
                    continue;
                }
                if seen.insert(key.as_str()) {
                    columns.push(key.clone());
                }
            }
        }

        columns.extend(LABEL_COLUMNS.iter().map(|c| c.to_string()));
        columns.push(IMAGE_RATING_COLUMN.to_string());

        Self { columns, rows }
    }

    /// Column names in output order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in output order.
    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates the cells of one column, top to bottom. Missing cells are `None`.
    pub fn column_cells<'a>(
        &'a self,
        column: &'a str,
    ) -> impl Iterator<Item = Option<Cow<'a, Value>>> + 'a {
        self.rows.iter().map(move |row| row.get(column))
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::from_rows(Vec::new())
    }
}

/// Renders a JSON value as a single text cell.
///
/// Null becomes an empty string, strings are written raw, and arrays or
/// objects are written as compact JSON.
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
