//! Grouped turnaround summaries
//!
//! Groups are built explicitly as ordered maps from key to member events,
//! so every table comes out sorted by its key. A group whose statistic is
//! undefined is omitted rather than reported with a missing number.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::filter::{EventFilter, FilterCriteria};
use crate::kpi::derive::{DerivedEvent, Interval, WEEKDAY_ORDER, weekday_label};
use crate::stats::{self, HistogramBin};

/// Group events by a key, keeping event order inside each group
pub fn group_by<'e, 'r, K, F>(
    events: &'r [DerivedEvent<'e>],
    key: F,
) -> BTreeMap<K, Vec<&'r DerivedEvent<'e>>>
where
    K: Ord,
    F: Fn(&DerivedEvent<'e>) -> K,
{
    let mut groups: BTreeMap<K, Vec<&'r DerivedEvent<'e>>> = BTreeMap::new();
    for event in events {
        groups.entry(key(event)).or_default().push(event);
    }
    groups
}

/// Minutes of one interval for a group of events
#[must_use]
pub fn interval_minutes(events: &[&DerivedEvent<'_>], interval: Interval) -> Vec<f64> {
    events.iter().map(|e| e.minutes(interval)).collect()
}

/// Count, median and 90th percentile of OTC and RTR per lab and test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabTestSummary {
    /// Resulting lab
    pub resulting_lab: String,
    /// Test
    pub test: String,
    /// Events in the group
    pub count: usize,
    /// Median order-to-collection, minutes
    pub otc_median: f64,
    /// 90th percentile order-to-collection, minutes
    pub otc_p90: f64,
    /// Median receipt-to-result, minutes
    pub rtr_median: f64,
    /// 90th percentile receipt-to-result, minutes
    pub rtr_p90: f64,
}

/// Build the lab/test summary table
#[must_use]
pub fn summarize_by_lab_test(events: &[DerivedEvent<'_>]) -> Vec<LabTestSummary> {
    group_by(events, |e| (e.event.resulting_lab.clone(), e.event.test.clone()))
        .into_iter()
        .filter_map(|((resulting_lab, test), group)| {
            let otc = stats::sorted(&interval_minutes(&group, Interval::OrderToCollection));
            let rtr = stats::sorted(&interval_minutes(&group, Interval::ReceiptToResult));
            Some(LabTestSummary {
                count: group.len(),
                otc_median: stats::quantile_sorted(&otc, 0.5)?,
                otc_p90: stats::quantile_sorted(&otc, 0.9)?,
                rtr_median: stats::quantile_sorted(&rtr, 0.5)?,
                rtr_p90: stats::quantile_sorted(&rtr, 0.9)?,
                resulting_lab,
                test,
            })
        })
        .collect()
}

/// Median order-to-result per lab and test for one priority, with the
/// distribution binned for inline histograms
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrioritySummary {
    /// Resulting lab
    pub resulting_lab: String,
    /// Test
    pub test: String,
    /// Priority the table was restricted to
    pub priority: String,
    /// Events in the group
    pub count: usize,
    /// Median order-to-result, minutes
    pub otr_median: f64,
    /// Order-to-result distribution
    pub otr_histogram: Vec<HistogramBin>,
}

/// Build the priority summary table
#[must_use]
pub fn summarize_priority(
    events: &[DerivedEvent<'_>],
    priority: &str,
    bins: usize,
) -> Vec<PrioritySummary> {
    let filter = EventFilter::Priority(priority.to_string());
    let matching: Vec<DerivedEvent<'_>> = events
        .iter()
        .filter(|e| filter.meets_criteria(e.event))
        .copied()
        .collect();

    group_by(&matching, |e| (e.event.resulting_lab.clone(), e.event.test.clone()))
        .into_iter()
        .filter_map(|((resulting_lab, test), group)| {
            let otr = interval_minutes(&group, Interval::OrderToResult);
            Some(PrioritySummary {
                count: group.len(),
                otr_median: stats::median(&otr)?,
                otr_histogram: stats::histogram(&otr, bins),
                priority: priority.to_string(),
                resulting_lab,
                test,
            })
        })
        .collect()
}

/// Daily order-to-result percentiles for one lab and test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPercentiles {
    /// Test
    pub test: String,
    /// Resulting lab
    pub resulting_lab: String,
    /// Collection date
    pub date: NaiveDate,
    /// Events on the date
    pub count: usize,
    /// 10th percentile, minutes
    pub p10: f64,
    /// Median, minutes
    pub p50: f64,
    /// 90th percentile, minutes
    pub p90: f64,
}

/// Order-to-result percentiles per test, lab and collection date
#[must_use]
pub fn daily_percentiles(events: &[DerivedEvent<'_>]) -> Vec<DailyPercentiles> {
    group_by(events, |e| {
        (
            e.event.test.clone(),
            e.event.resulting_lab.clone(),
            e.calendar.date,
        )
    })
    .into_iter()
    .filter_map(|((test, resulting_lab, date), group)| {
        let otr = stats::sorted(&interval_minutes(&group, Interval::OrderToResult));
        Some(DailyPercentiles {
            count: group.len(),
            p10: stats::quantile_sorted(&otr, 0.1)?,
            p50: stats::quantile_sorted(&otr, 0.5)?,
            p90: stats::quantile_sorted(&otr, 0.9)?,
            test,
            resulting_lab,
            date,
        })
    })
    .collect()
}

/// Median of each turnaround component for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentMedians {
    /// Category label (test name or weekday)
    pub category: String,
    /// Events in the category
    pub count: usize,
    /// Median OTC, CTR and RTR in minutes, in [`Interval::COMPONENTS`] order
    pub medians: [f64; 3],
}

fn component_medians(
    category: String,
    group: &[&DerivedEvent<'_>],
) -> Option<ComponentMedians> {
    let mut medians = [0.0; 3];
    for (slot, interval) in medians.iter_mut().zip(Interval::COMPONENTS) {
        *slot = stats::median(&interval_minutes(group, interval))?;
    }
    Some(ComponentMedians {
        category,
        count: group.len(),
        medians,
    })
}

/// Component medians per test
#[must_use]
pub fn component_medians_by_test(events: &[DerivedEvent<'_>]) -> Vec<ComponentMedians> {
    group_by(events, |e| e.event.test.clone())
        .into_iter()
        .filter_map(|(test, group)| component_medians(test, &group))
        .collect()
}

/// Component medians per collection weekday, Monday first
#[must_use]
pub fn component_medians_by_weekday(events: &[DerivedEvent<'_>]) -> Vec<ComponentMedians> {
    group_by(events, |e| e.calendar.weekday_index())
        .into_iter()
        .filter_map(|(index, group)| {
            let day = WEEKDAY_ORDER.get(usize::try_from(index).ok()?)?;
            component_medians(weekday_label(*day).to_string(), &group)
        })
        .collect()
}

/// Most frequent value of a key, ties broken by the smallest value
#[must_use]
pub fn most_frequent<'e, F>(events: &[DerivedEvent<'e>], key: F) -> Option<&'e str>
where
    F: Fn(&DerivedEvent<'e>) -> &'e str,
{
    group_by(events, |e| key(e))
        .into_iter()
        .max_by(|(a, ga), (b, gb)| ga.len().cmp(&gb.len()).then_with(|| b.cmp(a)))
        .map(|(k, _)| k)
}
