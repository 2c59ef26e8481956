//! Laboratory quality-control and turnaround-time KPI pipelines.
//!
//! Two independent pipelines over tabular lab data:
//! - [`levey_jennings`]: filter a QC series to a date window, standardize
//!   each series and describe a banded Levey-Jennings chart.
//! - [`kpi`] and [`report`]: derive turnaround intervals from event
//!   timestamps, aggregate them per lab and test, and describe the report
//!   charts.
//!
//! Input files are read through [`loader`] into Arrow record batches, and
//! all output is renderer-neutral ([`chart::ChartSpec`]).

pub mod chart;
pub mod config;
pub mod error;
pub mod filter;
pub mod kpi;
pub mod levey_jennings;
pub mod loader;
pub mod models;
pub mod report;
pub mod schema;
pub mod stats;
pub mod utils;

// Core types
pub use config::{KpiConfig, LoaderConfig, PipelineConfig, QcChartConfig};
pub use error::{Error, Result};
pub use models::{EventRecord, QcRecord, ScaledQcRecord};

// Pipelines
pub use chart::ChartSpec;
pub use filter::DateWindow;
pub use levey_jennings::{QcParams, QcSession, render};
pub use loader::{FromRecordBatch, load_records, load_records_async};
pub use report::KpiReport;
