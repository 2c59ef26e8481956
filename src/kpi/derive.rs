//! Turnaround intervals and calendar keys derived per event

use chrono::{Datelike, NaiveDate, TimeDelta, Timelike, Weekday};
use serde::Serialize;

use crate::models::EventRecord;

/// The four turnaround intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Interval {
    /// Order to collection
    OrderToCollection,
    /// Collection to receipt
    CollectionToReceipt,
    /// Receipt to result
    ReceiptToResult,
    /// Order to result
    OrderToResult,
}

impl Interval {
    /// The three consecutive components that add up to order-to-result
    pub const COMPONENTS: [Self; 3] = [
        Self::OrderToCollection,
        Self::CollectionToReceipt,
        Self::ReceiptToResult,
    ];

    /// Short label used in tables and legends
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OrderToCollection => "OTC",
            Self::CollectionToReceipt => "CTR",
            Self::ReceiptToResult => "RTR",
            Self::OrderToResult => "OTR",
        }
    }
}

/// Signed durations between the workflow timestamps of one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnaroundIntervals {
    /// Order to collection
    pub otc: TimeDelta,
    /// Collection to receipt
    pub ctr: TimeDelta,
    /// Receipt to result
    pub rtr: TimeDelta,
    /// Order to result
    pub otr: TimeDelta,
}

impl TurnaroundIntervals {
    /// Derive intervals from an event's timestamps
    #[must_use]
    pub fn from_event(event: &EventRecord) -> Self {
        Self {
            otc: event.collection - event.ordered,
            ctr: event.received - event.collection,
            rtr: event.result - event.received,
            otr: event.result - event.ordered,
        }
    }

    /// Exact duration of one interval
    #[must_use]
    pub const fn get(&self, interval: Interval) -> TimeDelta {
        match interval {
            Interval::OrderToCollection => self.otc,
            Interval::CollectionToReceipt => self.ctr,
            Interval::ReceiptToResult => self.rtr,
            Interval::OrderToResult => self.otr,
        }
    }

    /// One interval in minutes
    #[must_use]
    pub fn minutes(&self, interval: Interval) -> f64 {
        to_minutes(self.get(interval))
    }
}

/// Convert a duration to fractional minutes
#[must_use]
pub fn to_minutes(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 60_000.0
}

/// Weekdays in display order
pub const WEEKDAY_ORDER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Abbreviated weekday label
#[must_use]
pub const fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Weekday labels in display order
#[must_use]
pub fn weekday_levels() -> Vec<String> {
    WEEKDAY_ORDER
        .iter()
        .map(|d| weekday_label(*d).to_string())
        .collect()
}

/// Calendar grouping keys taken from the collection timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarKeys {
    /// Collection date
    pub date: NaiveDate,
    /// Collection weekday
    pub weekday: Weekday,
    /// Collection hour, 0 to 23
    pub hour: u32,
}

impl CalendarKeys {
    /// Derive calendar keys from an event's collection timestamp
    #[must_use]
    pub fn from_event(event: &EventRecord) -> Self {
        Self {
            date: event.collection.date(),
            weekday: event.collection.weekday(),
            hour: event.collection.hour(),
        }
    }

    /// Position of the weekday in [`WEEKDAY_ORDER`], usable as a sort key
    #[must_use]
    pub fn weekday_index(&self) -> u32 {
        self.weekday.num_days_from_monday()
    }

    /// Abbreviated weekday label
    #[must_use]
    pub const fn weekday_label(&self) -> &'static str {
        weekday_label(self.weekday)
    }
}

/// An event together with its derived columns
#[derive(Debug, Clone, Copy)]
pub struct DerivedEvent<'a> {
    /// Source event
    pub event: &'a EventRecord,
    /// Turnaround intervals
    pub intervals: TurnaroundIntervals,
    /// Calendar keys
    pub calendar: CalendarKeys,
}

impl<'a> DerivedEvent<'a> {
    /// Derive all columns for one event
    #[must_use]
    pub fn new(event: &'a EventRecord) -> Self {
        Self {
            event,
            intervals: TurnaroundIntervals::from_event(event),
            calendar: CalendarKeys::from_event(event),
        }
    }

    /// One interval in minutes
    #[must_use]
    pub fn minutes(&self, interval: Interval) -> f64 {
        self.intervals.minutes(interval)
    }
}

/// Derive intervals and calendar keys for every event
#[must_use]
pub fn derive_all(events: &[EventRecord]) -> Vec<DerivedEvent<'_>> {
    events.iter().map(DerivedEvent::new).collect()
}
