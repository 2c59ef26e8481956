//! Date window filtering for QC series
//!
//! The selectable range is a rolling window ending today. A requested range
//! is intersected with it; a start after the end is rejected.

use chrono::{Days, NaiveDate};

use crate::error::{Error, Result};
use crate::filter::FilterCriteria;
use crate::models::QcRecord;

/// An inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Create a window from explicit bounds
    ///
    /// # Errors
    /// Returns [`Error::InvalidDateRange`] if `start` is after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Intersect user bounds with the rolling window `[today - window_days, today]`
    ///
    /// Returns `Ok(None)` when the requested range lies entirely outside the
    /// rolling window, so nothing in it is selectable.
    ///
    /// # Arguments
    /// * `start` - Requested start date
    /// * `end` - Requested end date
    /// * `today` - Reference date the rolling window ends on
    /// * `window_days` - Length of the rolling window
    ///
    /// # Errors
    /// Returns [`Error::InvalidDateRange`] if the requested start is after
    /// the requested end
    pub fn resolve(
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
        window_days: u64,
    ) -> Result<Option<Self>> {
        Self::new(start, end)?;
        let earliest = today
            .checked_sub_days(Days::new(window_days))
            .unwrap_or(NaiveDate::MIN);

        let clamped_start = start.max(earliest);
        let clamped_end = end.min(today);
        if clamped_start > clamped_end {
            log::warn!("Range {start}..{end} lies outside {earliest}..{today}");
            return Ok(None);
        }
        if clamped_start != start || clamped_end != end {
            log::warn!(
                "Range {start}..{end} exceeds {earliest}..{today}, \
                 using {clamped_start}..{clamped_end}"
            );
        }

        Ok(Some(Self {
            start: clamped_start,
            end: clamped_end,
        }))
    }

    /// Window start (inclusive)
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Window end (inclusive)
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether a date lies inside the window
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl FilterCriteria<QcRecord> for DateWindow {
    fn meets_criteria(&self, record: &QcRecord) -> bool {
        self.contains(record.date)
    }
}
