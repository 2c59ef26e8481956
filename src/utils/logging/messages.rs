//! Standard log lines
//!
//! All pipeline stages log through these helpers so a run reads the same
//! whether it was started from the binary or from a test.

use std::path::Path;
use std::time::Duration;

use crate::error::Error;

/// Log the start of a file load
pub fn log_load_start(path: &Path) {
    log::info!("Loading {}", path.display());
}

/// Log a completed file load
///
/// # Arguments
/// * `path` - File that was loaded
/// * `records` - Number of decoded records
/// * `elapsed` - Time spent reading and decoding
pub fn log_load_complete(path: &Path, records: usize, elapsed: Duration) {
    if records == 0 {
        log::warn!("No records loaded from {}", path.display());
    } else {
        log::info!(
            "Loaded {} records from {} in {:?}",
            records,
            path.display(),
            elapsed
        );
    }
}

/// Log a malformed row that was skipped
pub fn log_skipped_row(error: &Error) {
    log::warn!("Skipping row: {error}");
}

/// Log the output size of a pipeline stage
pub fn log_stage(stage: &str, items: usize) {
    log::debug!("{stage}: {items} items");
}
