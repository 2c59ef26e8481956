//! Typed column access for record batches
//!
//! Columns are cast with Arrow's compute kernels rather than downcast
//! directly, so the same record decoder works for all-text CSV batches and
//! for natively typed Parquet columns (dates, timestamps, integers).

use arrow::array::{Array, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};

/// Get a column as UTF-8 text
///
/// # Errors
/// Returns an error if the column is missing or cannot be cast to text
pub fn text_column(batch: &RecordBatch, column: &str) -> Result<StringArray> {
    let array = column_by_name(batch, column)?;
    let casted = cast(array.as_ref(), &DataType::Utf8)?;
    casted
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| {
            Error::Arrow(ArrowError::CastError(format!(
                "column '{column}' did not cast to Utf8"
            )))
        })
}

/// Get a column as 64-bit floats, with unparseable cells as nulls
///
/// # Errors
/// Returns an error if the column is missing or has no numeric cast
pub fn float_column(batch: &RecordBatch, column: &str) -> Result<Float64Array> {
    let array = column_by_name(batch, column)?;
    let casted = cast(array.as_ref(), &DataType::Float64)?;
    casted
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| {
            Error::Arrow(ArrowError::CastError(format!(
                "column '{column}' did not cast to Float64"
            )))
        })
}

/// Non-empty text at a row, `None` for nulls and blank cells
#[must_use]
pub fn text_at(array: &StringArray, row: usize) -> Option<&str> {
    if row >= array.len() || array.is_null(row) {
        return None;
    }
    let value = array.value(row).trim();
    (!value.is_empty()).then_some(value)
}

/// Finite float at a row
#[must_use]
pub fn float_at(array: &Float64Array, row: usize) -> Option<f64> {
    if row >= array.len() || array.is_null(row) {
        return None;
    }
    let value = array.value(row);
    value.is_finite().then_some(value)
}

fn column_by_name<'a>(batch: &'a RecordBatch, column: &str) -> Result<&'a arrow::array::ArrayRef> {
    batch.column_by_name(column).ok_or_else(|| Error::ColumnNotFound {
        column: column.to_string(),
    })
}
