//! Decoding record batches into typed records

use arrow::array::StringArray;
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};
use crate::loader::extract::{float_at, float_column, text_at, text_column};
use crate::models::{EventRecord, QcRecord};
use crate::schema::{DateFormatConfig, event_columns, parse_date, parse_timestamp, qc_columns};

/// Types that can be decoded row by row from a record batch
pub trait FromRecordBatch: Sized {
    /// Normalized column names the decoder reads
    const REQUIRED_COLUMNS: &'static [&'static str];

    /// Decode every row of a batch
    ///
    /// The outer error covers column-level failures; each row carries its own
    /// result so callers can decide whether a malformed row is fatal.
    /// `first_row` is the index of the batch's first row in the whole input.
    ///
    /// # Errors
    /// Returns an error if a required column is missing or cannot be cast
    fn decode_batch(
        batch: &RecordBatch,
        first_row: usize,
        formats: &DateFormatConfig,
    ) -> Result<Vec<Result<Self>>>;
}

impl FromRecordBatch for QcRecord {
    const REQUIRED_COLUMNS: &'static [&'static str] = &qc_columns::REQUIRED;

    fn decode_batch(
        batch: &RecordBatch,
        first_row: usize,
        formats: &DateFormatConfig,
    ) -> Result<Vec<Result<Self>>> {
        let dates = text_column(batch, qc_columns::DATE)?;
        let codes = text_column(batch, qc_columns::QC_CODE)?;
        let raw_values = text_column(batch, qc_columns::VALUE)?;
        let values = float_column(batch, qc_columns::VALUE)?;

        let rows = (0..batch.num_rows())
            .map(|row| -> Result<Self> {
                let line = first_row + row;
                let date_text = text_at(&dates, row).unwrap_or_default();
                let date = parse_date(date_text, formats)
                    .ok_or_else(|| Error::malformed(line, qc_columns::DATE, date_text))?;
                let qc_code = text_at(&codes, row)
                    .ok_or_else(|| Error::malformed(line, qc_columns::QC_CODE, ""))?;
                let value = float_at(&values, row).ok_or_else(|| {
                    Error::malformed(
                        line,
                        qc_columns::VALUE,
                        text_at(&raw_values, row).unwrap_or_default(),
                    )
                })?;
                Ok(QcRecord::new(date, qc_code, value))
            })
            .collect();

        Ok(rows)
    }
}

impl FromRecordBatch for EventRecord {
    const REQUIRED_COLUMNS: &'static [&'static str] = &event_columns::REQUIRED;

    fn decode_batch(
        batch: &RecordBatch,
        first_row: usize,
        formats: &DateFormatConfig,
    ) -> Result<Vec<Result<Self>>> {
        let labs = text_column(batch, event_columns::RESULTING_LAB)?;
        let tests = text_column(batch, event_columns::TEST)?;
        let priorities = text_column(batch, event_columns::PRIORITY)?;
        let ordered = text_column(batch, event_columns::ORDERED)?;
        let collection = text_column(batch, event_columns::COLLECTION)?;
        let received = text_column(batch, event_columns::RECEIVED)?;
        let result = text_column(batch, event_columns::RESULT)?;

        let rows = (0..batch.num_rows())
            .map(|row| -> Result<Self> {
                let line = first_row + row;
                let category = |array: &StringArray, column: &str| {
                    text_at(array, row)
                        .map(str::to_string)
                        .ok_or_else(|| Error::malformed(line, column, ""))
                };
                let timestamp = |array: &StringArray, column: &str| {
                    let text = text_at(array, row).unwrap_or_default();
                    parse_timestamp(text, formats)
                        .ok_or_else(|| Error::malformed(line, column, text))
                };

                Ok(EventRecord {
                    resulting_lab: category(&labs, event_columns::RESULTING_LAB)?,
                    test: category(&tests, event_columns::TEST)?,
                    priority: category(&priorities, event_columns::PRIORITY)?,
                    ordered: timestamp(&ordered, event_columns::ORDERED)?,
                    collection: timestamp(&collection, event_columns::COLLECTION)?,
                    received: timestamp(&received, event_columns::RECEIVED)?,
                    result: timestamp(&result, event_columns::RESULT)?,
                })
            })
            .collect();

        Ok(rows)
    }
}
