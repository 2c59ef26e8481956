//! Turnaround-time KPI pipeline.
//!
//! Events are first enriched with their four turnaround intervals and
//! collection calendar keys ([`derive`]), then grouped into summary tables
//! ([`summary`]) and chart descriptions ([`charts`]).

pub mod charts;
pub mod derive;
pub mod summary;

pub use derive::{
    CalendarKeys, DerivedEvent, Interval, TurnaroundIntervals, derive_all, to_minutes,
};
pub use summary::{
    ComponentMedians, DailyPercentiles, LabTestSummary, PrioritySummary,
    component_medians_by_test, component_medians_by_weekday, daily_percentiles, most_frequent,
    summarize_by_lab_test, summarize_priority,
};
