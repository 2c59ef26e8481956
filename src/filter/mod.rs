//! Record filtering.
//!
//! Filters are small predicate values implementing [`FilterCriteria`], so
//! pipelines can combine them without touching the records themselves.

pub mod date;

pub use date::DateWindow;

use crate::models::EventRecord;

/// Defines a criterion for filtering records
pub trait FilterCriteria<T> {
    /// Determine if a record meets the criterion
    fn meets_criteria(&self, record: &T) -> bool;

    /// Borrow the records that meet the criterion, preserving order
    fn apply<'a>(&self, records: &'a [T]) -> Vec<&'a T> {
        records.iter().filter(|r| self.meets_criteria(r)).collect()
    }
}

/// A filter that can be applied to a lab event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFilter {
    /// Exact priority match
    Priority(String),
    /// Exact resulting lab match
    Lab(String),
    /// Exact test match
    Test(String),
    /// Requires all filters to match
    All(Vec<EventFilter>),
    /// Requires any filter to match
    Any(Vec<EventFilter>),
}

impl FilterCriteria<EventRecord> for EventFilter {
    fn meets_criteria(&self, event: &EventRecord) -> bool {
        match self {
            Self::Priority(priority) => event.priority == *priority,
            Self::Lab(lab) => event.resulting_lab == *lab,
            Self::Test(test) => event.test == *test,
            Self::All(filters) => filters.iter().all(|f| f.meets_criteria(event)),
            Self::Any(filters) => filters.iter().any(|f| f.meets_criteria(event)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(lab: &str, test: &str, priority: &str) -> EventRecord {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        EventRecord {
            resulting_lab: lab.to_string(),
            test: test.to_string(),
            priority: priority.to_string(),
            ordered: ts,
            collection: ts,
            received: ts,
            result: ts,
        }
    }

    #[test]
    fn test_combined_event_filters() {
        let events = vec![
            event("Main", "K", "S"),
            event("Main", "K", "R"),
            event("North", "Na", "S"),
        ];

        let stat_main = EventFilter::All(vec![
            EventFilter::Priority("S".to_string()),
            EventFilter::Lab("Main".to_string()),
        ]);
        assert_eq!(stat_main.apply(&events), vec![&events[0]]);

        let either = EventFilter::Any(vec![
            EventFilter::Test("Na".to_string()),
            EventFilter::Priority("R".to_string()),
        ]);
        assert_eq!(either.apply(&events), vec![&events[1], &events[2]]);
        assert!(EventFilter::Lab("South".to_string()).apply(&events).is_empty());
    }
}
