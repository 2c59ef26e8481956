//! Delimited text input
//!
//! Every column is read as nullable UTF-8 and typed later by the record
//! decoders, so headers only need to be normalized, not inferred.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::config::LoaderConfig;
use crate::error::{Error, Result};
use crate::schema::normalize_header;

/// Build an all-text schema from the header line of a delimited file
///
/// The header is parsed by the CSV reader, so quoted names may contain the
/// delimiter.
///
/// # Errors
/// Returns an error if the file cannot be read or has no header line
pub fn read_header_schema(path: &Path, delimiter: char) -> Result<Schema> {
    let format = Format::default()
        .with_header(true)
        .with_delimiter(delimiter_byte(delimiter)?);
    let (inferred, _) = format.infer_schema(File::open(path)?, Some(0))?;
    if inferred.fields().is_empty() {
        return Err(Error::EmptyInput(path.to_path_buf()));
    }

    let fields = inferred
        .fields()
        .iter()
        .map(|f| Field::new(normalize_header(f.name()), DataType::Utf8, true))
        .collect::<Vec<_>>();

    Ok(Schema::new(fields))
}

/// The delimiter as the single byte the CSV reader expects
///
/// # Errors
/// Returns [`Error::Config`] for a delimiter outside ASCII
pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            Error::Config(format!(
                "delimiter {delimiter:?} must be a single ASCII character"
            ))
        })
}

/// Read a delimited text file into record batches
///
/// # Errors
/// Returns an error if the file is missing, empty or not valid delimited text
pub fn read_delimited_batches(path: &Path, config: &LoaderConfig) -> Result<Vec<RecordBatch>> {
    let schema = Arc::new(read_header_schema(path, config.delimiter)?);
    log::debug!(
        "Header of {}: {:?}",
        path.display(),
        schema.fields().iter().map(|f| f.name()).collect::<Vec<_>>()
    );

    let reader = ReaderBuilder::new(schema)
        .with_header(true)
        .with_delimiter(delimiter_byte(config.delimiter)?)
        .with_batch_size(config.batch_size)
        .build(File::open(path)?)?;

    let batches = reader.collect::<std::result::Result<Vec<_>, ArrowError>>()?;
    Ok(batches)
}
