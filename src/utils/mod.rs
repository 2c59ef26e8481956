//! Shared utilities

pub mod logging;

pub use logging::{log_load_complete, log_load_start, log_skipped_row};
