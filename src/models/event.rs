//! Lab test events carrying the four workflow timestamps

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One resulted lab test
///
/// Timestamps are expected to satisfy
/// `ordered <= collection <= received <= result`, but this is not enforced:
/// out-of-order values yield negative turnaround intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Laboratory that produced the result
    pub resulting_lab: String,
    /// Test name
    pub test: String,
    /// Order priority
    pub priority: String,
    /// Order placed
    pub ordered: NaiveDateTime,
    /// Specimen collected
    pub collection: NaiveDateTime,
    /// Specimen received in the lab
    pub received: NaiveDateTime,
    /// Result verified
    pub result: NaiveDateTime,
}
