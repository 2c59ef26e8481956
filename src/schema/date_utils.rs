//! Date and timestamp parsing with multiple format attempts.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Configuration for date and timestamp formats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateFormatConfig {
    /// chrono formats tried, in order, for point-in-time values
    pub timestamp_formats: Vec<String>,
    /// chrono formats tried, in order, for calendar dates
    pub date_formats: Vec<String>,
}

impl Default for DateFormatConfig {
    fn default() -> Self {
        Self {
            timestamp_formats: [
                "%Y-%m-%d %H:%M:%S%.f",
                "%Y-%m-%dT%H:%M:%S%.f",
                "%Y-%m-%d %H:%M",
                "%Y-%m-%dT%H:%M",
                "%m/%d/%Y %H:%M:%S",
                "%m/%d/%Y %H:%M",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            date_formats: ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Parse a timestamp, falling back to a bare date at midnight
#[must_use]
pub fn parse_timestamp(s: &str, config: &DateFormatConfig) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    config
        .timestamp_formats
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            config
                .date_formats
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Parse a calendar date, accepting full timestamps by truncation
#[must_use]
pub fn parse_date(s: &str, config: &DateFormatConfig) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    config
        .date_formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .or_else(|| {
            config
                .timestamp_formats
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
                .map(|ts| ts.date())
        })
}
