//! Progress reporting for loads and report builds
//!
//! Uses the indicatif crate; the library itself never draws progress, only
//! the binary does.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Template for the spinner shown while a stage runs
pub const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {msg}";

/// Create a ticking spinner with a message
///
/// # Arguments
/// * `message` - Description of the running stage
///
/// # Returns
/// A configured spinner `ProgressBar`
#[must_use]
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Stop a spinner, leaving a completion message on screen
pub fn finish_spinner(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(message.to_string());
}

/// Stop a spinner after a failed stage, leaving the failure message on screen
pub fn abandon_spinner(pb: &ProgressBar, message: &str) {
    pb.abandon_with_message(message.to_string());
}
