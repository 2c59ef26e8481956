//! Column naming and header normalization for laboratory input files.
//!
//! Input files come from different exports, so headers are normalized to
//! snake_case before columns are looked up (`"Resulting Lab"`,
//! `ResultingLab` and `resulting.lab` all become `resulting_lab`).

use arrow::datatypes::Schema;

use crate::error::{Error, Result};

pub mod date_utils;

pub use date_utils::{DateFormatConfig, parse_date, parse_timestamp};

/// Column names of a QC series file
pub mod qc_columns {
    /// Measurement date
    pub const DATE: &str = "date";
    /// Control material / series identifier
    pub const QC_CODE: &str = "qc_code";
    /// Measured value
    pub const VALUE: &str = "value";

    /// All columns a QC series file must provide
    pub const REQUIRED: [&str; 3] = [DATE, QC_CODE, VALUE];
}

/// Column names of a lab event (KPI) file
pub mod event_columns {
    /// Laboratory that produced the result
    pub const RESULTING_LAB: &str = "resulting_lab";
    /// Test name
    pub const TEST: &str = "test";
    /// Order priority (e.g. "S" for stat, "R" for routine)
    pub const PRIORITY: &str = "priority";
    /// Order timestamp
    pub const ORDERED: &str = "ordered_date";
    /// Specimen collection timestamp
    pub const COLLECTION: &str = "collection_date";
    /// Specimen receipt timestamp
    pub const RECEIVED: &str = "received_date";
    /// Result timestamp
    pub const RESULT: &str = "result_date";

    /// All columns an event file must provide
    pub const REQUIRED: [&str; 7] = [
        RESULTING_LAB,
        TEST,
        PRIORITY,
        ORDERED,
        COLLECTION,
        RECEIVED,
        RESULT,
    ];
}

/// Normalize a header to snake_case
///
/// Letters are lowercased, camelCase boundaries and any run of
/// non-alphanumeric characters become a single underscore, and leading or
/// trailing underscores are dropped.
#[must_use]
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('"').trim_start_matches('\u{feff}');
    let mut out = String::with_capacity(trimmed.len() + 4);
    let mut prev_lower_or_digit = false;
    let mut pending_sep = false;

    for ch in trimmed.chars() {
        if ch.is_alphanumeric() {
            if ch.is_uppercase() && prev_lower_or_digit {
                pending_sep = true;
            }
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(ch.to_lowercase());
            prev_lower_or_digit = ch.is_lowercase() || ch.is_ascii_digit();
        } else {
            pending_sep = true;
            prev_lower_or_digit = false;
        }
    }

    out
}

/// Check that every required column is present in a schema
///
/// # Errors
/// Returns [`Error::ColumnNotFound`] for the first missing column
pub fn require_columns(schema: &Schema, required: &[&str]) -> Result<()> {
    for column in required {
        if schema.index_of(column).is_err() {
            return Err(Error::ColumnNotFound {
                column: (*column).to_string(),
            });
        }
    }
    Ok(())
}
