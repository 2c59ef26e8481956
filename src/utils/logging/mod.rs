//! Logging utilities for load and report operations
//!
//! This module provides consistent log lines and progress indicators.

pub mod messages;
pub mod progress;

pub use messages::{log_load_complete, log_load_start, log_skipped_row, log_stage};
pub use progress::{abandon_spinner, create_spinner, finish_spinner};
