//! Quality-control series measurements

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One QC measurement of a control material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcRecord {
    /// Measurement date
    pub date: NaiveDate,
    /// Series identifier (control material / level)
    pub qc_code: String,
    /// Measured value
    pub value: f64,
}

impl QcRecord {
    /// Create a new QC measurement
    pub fn new(date: NaiveDate, qc_code: impl Into<String>, value: f64) -> Self {
        Self {
            date,
            qc_code: qc_code.into(),
            value,
        }
    }
}

/// A QC measurement standardized against its series in the visible window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledQcRecord {
    /// Measurement date
    pub date: NaiveDate,
    /// Series identifier
    pub qc_code: String,
    /// Raw measured value
    pub value: f64,
    /// z-score within the series, `None` when the series has fewer than two
    /// points or no spread
    pub value_scaled: Option<f64>,
}
