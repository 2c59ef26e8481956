//! Record types for QC series and lab test events.

pub mod event;
pub mod qc;

pub use event::EventRecord;
pub use qc::{QcRecord, ScaledQcRecord};
