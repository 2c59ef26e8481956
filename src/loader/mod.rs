//! Loading laboratory datasets from delimited text or Parquet files.
//!
//! Files are read into Arrow record batches with snake_case column names,
//! then decoded into typed records through [`FromRecordBatch`].

use std::path::Path;
use std::time::Instant;

use arrow::record_batch::RecordBatch;

use crate::config::LoaderConfig;
use crate::error::{Error, Result};
use crate::schema::require_columns;
use crate::utils::logging::{log_load_complete, log_load_start, log_skipped_row};

pub mod delimited;
pub mod extract;
pub mod parquet_file;
pub mod records;

pub use records::FromRecordBatch;

/// Supported input file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Delimited text using the configured delimiter
    Delimited,
    /// Tab separated text
    TabSeparated,
    /// Apache Parquet
    Parquet,
}

impl InputFormat {
    /// Detect the format from a file extension
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedFormat`] for unknown extensions
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("csv" | "txt") => Ok(Self::Delimited),
            Some("tsv" | "tab") => Ok(Self::TabSeparated),
            Some("parquet" | "pq") => Ok(Self::Parquet),
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Read a file into record batches
///
/// # Errors
/// Returns an error if the format is unsupported or the file cannot be read
pub fn read_batches(path: &Path, config: &LoaderConfig) -> Result<Vec<RecordBatch>> {
    match InputFormat::from_path(path)? {
        InputFormat::Delimited => delimited::read_delimited_batches(path, config),
        InputFormat::TabSeparated => {
            let config = LoaderConfig {
                delimiter: '\t',
                ..config.clone()
            };
            delimited::read_delimited_batches(path, &config)
        }
        InputFormat::Parquet => parquet_file::read_parquet_batches(path, config),
    }
}

/// Load typed records from a file
///
/// # Errors
/// Returns an error if the file cannot be read, a required column is
/// missing, or a row is malformed and `skip_invalid_rows` is off
pub fn load_records<T: FromRecordBatch>(path: &Path, config: &LoaderConfig) -> Result<Vec<T>> {
    log_load_start(path);
    let start = Instant::now();

    let batches = read_batches(path, config)?;
    let records = records_from_batches(&batches, config)?;

    log_load_complete(path, records.len(), start.elapsed());
    Ok(records)
}

/// Load typed records without blocking the async runtime
///
/// Parquet files go through the async stream reader; delimited files are
/// read on the blocking thread pool.
///
/// # Errors
/// Same as [`load_records`], plus [`Error::Task`] if the blocking read fails
pub async fn load_records_async<T: FromRecordBatch>(
    path: &Path,
    config: &LoaderConfig,
) -> Result<Vec<T>> {
    log_load_start(path);
    let start = Instant::now();

    let batches = match InputFormat::from_path(path)? {
        InputFormat::Parquet => parquet_file::read_parquet_batches_async(path, config).await?,
        InputFormat::Delimited | InputFormat::TabSeparated => {
            let owned_path = path.to_path_buf();
            let owned_config = config.clone();
            tokio::task::spawn_blocking(move || read_batches(&owned_path, &owned_config))
                .await
                .map_err(|e| Error::Task(e.to_string()))??
        }
    };
    let records = records_from_batches(&batches, config)?;

    log_load_complete(path, records.len(), start.elapsed());
    Ok(records)
}

/// Decode record batches into typed records
///
/// # Errors
/// Returns an error if a required column is missing, or a row is malformed
/// and `skip_invalid_rows` is off
pub fn records_from_batches<T: FromRecordBatch>(
    batches: &[RecordBatch],
    config: &LoaderConfig,
) -> Result<Vec<T>> {
    let mut records = Vec::with_capacity(batches.iter().map(RecordBatch::num_rows).sum());
    let mut first_row = 0;

    for batch in batches {
        require_columns(&batch.schema(), T::REQUIRED_COLUMNS)?;

        for row in T::decode_batch(batch, first_row, &config.date_formats)? {
            match row {
                Ok(record) => records.push(record),
                Err(e) if config.skip_invalid_rows && e.is_row_level() => log_skipped_row(&e),
                Err(e) => return Err(e),
            }
        }
        first_row += batch.num_rows();
    }

    Ok(records)
}
