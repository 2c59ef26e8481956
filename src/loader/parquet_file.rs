//! Parquet input, synchronous and async

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::datatypes::{Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use futures::TryStreamExt;
use parquet::arrow::ParquetRecordBatchStreamBuilder;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::config::LoaderConfig;
use crate::error::Result;
use crate::schema::normalize_header;

/// Read a Parquet file into record batches with normalized column names
///
/// # Errors
/// Returns an error if the file cannot be opened or decoded
pub fn read_parquet_batches(path: &Path, config: &LoaderConfig) -> Result<Vec<RecordBatch>> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(config.batch_size)
        .build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, ArrowError>>()?;
    batches.iter().map(normalize_batch_headers).collect()
}

/// Read a Parquet file through the async stream reader
///
/// # Errors
/// Returns an error if the file cannot be opened or decoded
pub async fn read_parquet_batches_async(
    path: &Path,
    config: &LoaderConfig,
) -> Result<Vec<RecordBatch>> {
    let file = tokio::fs::File::open(path).await?;
    let stream = ParquetRecordBatchStreamBuilder::new(file)
        .await?
        .with_batch_size(config.batch_size)
        .build()?;

    let batches: Vec<RecordBatch> = stream.try_collect().await?;
    batches.iter().map(normalize_batch_headers).collect()
}

/// Rename the columns of a batch to their snake_case form
///
/// # Errors
/// Returns an error if the renamed batch cannot be assembled
pub fn normalize_batch_headers(batch: &RecordBatch) -> Result<RecordBatch> {
    let schema = batch.schema();
    let fields = schema
        .fields()
        .iter()
        .map(|f| {
            Field::new(normalize_header(f.name()), f.data_type().clone(), f.is_nullable())
        })
        .collect::<Vec<_>>();

    let renamed = RecordBatch::try_new(Arc::new(Schema::new(fields)), batch.columns().to_vec())?;
    Ok(renamed)
}
