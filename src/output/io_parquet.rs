//! Parquet writer for the flat table.
//!
//! Records are schema-free, so the Arrow schema is inferred per column from
//! the values it holds:
//!
//! | non-null values            | Arrow type |
//! |----------------------------|------------|
//! | all integers               | `Int64`    |
//! | all numbers                | `Float64`  |
//! | all booleans               | `Boolean`  |
//! | anything else, or all null | `Utf8`     |
//!
//! `Utf8` cells use the same rendering as the CSV writer, so nested values
//! such as `bbox` are stored as compact JSON. `image_rating` is the only
//! non-nullable column.

use std::borrow::Cow;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use serde_json::Value;

use crate::error::LabelflatError;
use crate::table::{render_cell, Table, IMAGE_RATING_COLUMN};

/// Writes `table` as a single-row-group Parquet file to `writer`.
///
/// `path` is only used for error context.
pub fn write_parquet<W: Write + Send>(
    writer: W,
    table: &Table,
    path: &Path,
) -> Result<(), LabelflatError> {
    let parquet_err = |message: String| LabelflatError::ParquetWrite {
        path: path.to_path_buf(),
        message,
    };

    let batch = table_to_record_batch(table).map_err(|e| parquet_err(e.to_string()))?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut arrow_writer = ArrowWriter::try_new(writer, batch.schema(), Some(props))
        .map_err(|e| parquet_err(e.to_string()))?;

    arrow_writer
        .write(&batch)
        .map_err(|e| parquet_err(e.to_string()))?;
    arrow_writer
        .close()
        .map_err(|e| parquet_err(e.to_string()))?;

    Ok(())
}

/// Writes `table` to an in-memory Parquet file.
///
/// Useful for testing without file I/O.
pub fn to_parquet_bytes(table: &Table) -> Result<Vec<u8>, LabelflatError> {
    let mut buffer = Vec::new();
    write_parquet(&mut buffer, table, Path::new("<bytes>"))?;
    Ok(buffer)
}

/// Converts the table into one Arrow record batch.
pub fn table_to_record_batch(table: &Table) -> Result<RecordBatch, ArrowError> {
    let mut fields = Vec::with_capacity(table.columns().len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.columns().len());

    for column in table.columns() {
        let data_type = infer_column_type(table.column_cells(column));
        let nullable = column != IMAGE_RATING_COLUMN;

        arrays.push(build_array(&data_type, table.column_cells(column)));
        fields.push(Field::new(column.as_str(), data_type, nullable));
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
}

/// Widening lattice used while scanning a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColumnKind {
    Null,
    Int,
    Float,
    Bool,
    Text,
}

impl ColumnKind {
    fn of(value: &Value) -> Self {
        match value {
            Value::Null => ColumnKind::Null,
            Value::Bool(_) => ColumnKind::Bool,
            Value::Number(n) if n.as_i64().is_some() => ColumnKind::Int,
            Value::Number(_) => ColumnKind::Float,
            Value::String(_) | Value::Array(_) | Value::Object(_) => ColumnKind::Text,
        }
    }

    fn widen(self, other: Self) -> Self {
        use ColumnKind::*;
        match (self, other) {
            (Null, k) | (k, Null) => k,
            (a, b) if a == b => a,
            (Int, Float) | (Float, Int) => Float,
            _ => Text,
        }
    }

    fn data_type(self) -> DataType {
        match self {
            ColumnKind::Int => DataType::Int64,
            ColumnKind::Float => DataType::Float64,
            ColumnKind::Bool => DataType::Boolean,
            ColumnKind::Null | ColumnKind::Text => DataType::Utf8,
        }
    }
}

fn infer_column_type<'a>(cells: impl Iterator<Item = Option<Cow<'a, Value>>>) -> DataType {
    cells
        .flatten()
        .fold(ColumnKind::Null, |kind, value| kind.widen(ColumnKind::of(&value)))
        .data_type()
}

fn build_array<'a>(
    data_type: &DataType,
    cells: impl Iterator<Item = Option<Cow<'a, Value>>>,
) -> ArrayRef {
    match data_type {
        DataType::Int64 => {
            let mut builder = Int64Builder::new();
            for cell in cells {
                builder.append_option(cell.as_deref().and_then(Value::as_i64));
            }
            Arc::new(builder.finish())
        }
        DataType::Float64 => {
            let mut builder = Float64Builder::new();
            for cell in cells {
                builder.append_option(cell.as_deref().and_then(Value::as_f64));
            }
            Arc::new(builder.finish())
        }
        DataType::Boolean => {
            let mut builder = BooleanBuilder::new();
            for cell in cells {
                builder.append_option(cell.as_deref().and_then(Value::as_bool));
            }
            Arc::new(builder.finish())
        }
        _ => {
            let mut builder = StringBuilder::new();
            for cell in cells {
                let text = cell.as_deref().filter(|v| !v.is_null()).map(render_cell);
                builder.append_option(text);
            }
            Arc::new(builder.finish())
        }
    }
}
