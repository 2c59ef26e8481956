//! Chart builders for the turnaround-time report
//!
//! Each builder is a pure function of the derived events (or of a summary
//! computed from them) and does not depend on any other chart.

use std::collections::BTreeMap;

use crate::chart::{Axis, ChartSpec, Layer, Point, RibbonPoint, XValue, panel_label};
use crate::filter::{EventFilter, FilterCriteria};
use crate::kpi::derive::{DerivedEvent, Interval, weekday_levels};
use crate::kpi::summary::{
    ComponentMedians, DailyPercentiles, component_medians_by_weekday, group_by, interval_minutes,
};
use crate::stats::{self, BoxStats};

const OTR_AXIS: &str = "Order to result (minutes)";
const RIBBON_OPACITY: f64 = 0.3;

/// Density of order-to-result, one panel per lab
///
/// Labs with fewer than two events have no density and are left out.
#[must_use]
pub fn otr_density_chart(events: &[DerivedEvent<'_>], points: usize) -> ChartSpec {
    let mut chart = ChartSpec::new(
        "Order-to-result density by lab",
        Axis::continuous(OTR_AXIS),
        Axis::continuous("Density"),
    )
    .faceted_by(&["resulting_lab"]);

    for (lab, group) in group_by(events, |e| e.event.resulting_lab.as_str()) {
        let otr = interval_minutes(&group, Interval::OrderToResult);
        match stats::gaussian_kde(&otr, points) {
            Some(curve) => chart.layers.push(Layer::Density {
                series: lab.to_string(),
                panel: Some(lab.to_string()),
                curve,
            }),
            None => log::debug!("No density for lab {lab}: {} event(s)", group.len()),
        }
    }

    chart
}

/// Daily 10th/50th/90th order-to-result percentiles, one panel per test and
/// lab
#[must_use]
pub fn daily_percentile_chart(daily: &[DailyPercentiles]) -> ChartSpec {
    let mut chart = ChartSpec::new(
        "Daily order-to-result percentiles (10th, 50th, 90th)",
        Axis::date("Collection date"),
        Axis::continuous(OTR_AXIS),
    )
    .faceted_by(&["test", "resulting_lab"]);

    let mut panels: BTreeMap<(&str, &str), Vec<&DailyPercentiles>> = BTreeMap::new();
    for row in daily {
        panels
            .entry((row.test.as_str(), row.resulting_lab.as_str()))
            .or_default()
            .push(row);
    }

    for ((test, lab), mut rows) in panels {
        rows.sort_by_key(|r| r.date);
        let panel = Some(panel_label(&[test, lab]));

        chart.layers.push(Layer::Ribbon {
            series: lab.to_string(),
            panel: panel.clone(),
            points: rows
                .iter()
                .map(|r| RibbonPoint {
                    x: XValue::Date(r.date),
                    lower: r.p10,
                    upper: r.p90,
                })
                .collect(),
            opacity: RIBBON_OPACITY,
        });
        chart.layers.push(Layer::Line {
            series: lab.to_string(),
            panel,
            points: rows
                .iter()
                .map(|r| Point {
                    x: XValue::Date(r.date),
                    y: r.p50,
                })
                .collect(),
        });
    }

    chart
}

/// Violin and boxplot of order-to-result by collection weekday, one panel
/// per test, colored by lab
#[must_use]
pub fn weekday_violin_chart(events: &[DerivedEvent<'_>], points: usize) -> ChartSpec {
    let mut chart = ChartSpec::new(
        "Order-to-result by weekday",
        Axis::discrete("Weekday", weekday_levels()),
        Axis::continuous(OTR_AXIS),
    )
    .faceted_by(&["test"]);

    let groups = group_by(events, |e| {
        (
            e.event.test.as_str(),
            e.event.resulting_lab.as_str(),
            e.calendar.weekday_index(),
        )
    });

    for ((test, lab, _), group) in groups {
        let weekday = group[0].calendar.weekday_label();
        let otr = interval_minutes(&group, Interval::OrderToResult);

        if let Some(curve) = stats::gaussian_kde(&otr, points) {
            chart.layers.push(Layer::Violin {
                series: lab.to_string(),
                panel: Some(test.to_string()),
                x: weekday.to_string(),
                curve,
            });
        }
        if let Some(stats) = BoxStats::from_values(&otr) {
            chart.layers.push(Layer::Boxplot {
                series: lab.to_string(),
                panel: Some(test.to_string()),
                x: weekday.to_string(),
                stats,
            });
        }
    }

    chart
}

/// Boxplot of order-to-result by collection hour for one lab, one panel
/// per test
#[must_use]
pub fn hourly_boxplot_chart(events: &[DerivedEvent<'_>], lab: &str) -> ChartSpec {
    let mut chart = ChartSpec::new(
        format!("Order-to-result by collection hour, {lab}"),
        Axis::discrete("Hour of collection", (0..24).map(hour_label).collect()),
        Axis::continuous(OTR_AXIS),
    )
    .faceted_by(&["test"]);

    let filter = EventFilter::Lab(lab.to_string());
    let in_lab: Vec<DerivedEvent<'_>> = events
        .iter()
        .filter(|e| filter.meets_criteria(e.event))
        .copied()
        .collect();

    let groups = group_by(&in_lab, |e| (e.event.test.as_str(), e.calendar.hour));
    for ((test, hour), group) in groups {
        let otr = interval_minutes(&group, Interval::OrderToResult);
        if let Some(stats) = BoxStats::from_values(&otr) {
            chart.layers.push(Layer::Boxplot {
                series: lab.to_string(),
                panel: Some(test.to_string()),
                x: hour_label(hour),
                stats,
            });
        }
    }

    chart
}

/// Stacked bar of median turnaround components per category
#[must_use]
pub fn component_bar_chart(rows: &[ComponentMedians]) -> ChartSpec {
    let mut chart = ChartSpec::new(
        "Median turnaround components by test",
        Axis::discrete("Test", rows.iter().map(|r| r.category.clone()).collect()),
        Axis::continuous("Median minutes"),
    );
    push_component_bars(&mut chart, rows);
    chart
}

/// Stacked component medians by weekday in polar coordinates, for one lab
/// and test
#[must_use]
pub fn weekday_rose_chart(events: &[DerivedEvent<'_>], lab: &str, test: &str) -> ChartSpec {
    let mut chart = ChartSpec::new(
        format!("Median turnaround components by weekday, {test} at {lab}"),
        Axis::discrete("Weekday", weekday_levels()),
        Axis::continuous("Median minutes"),
    )
    .polar();

    let filter = EventFilter::All(vec![
        EventFilter::Lab(lab.to_string()),
        EventFilter::Test(test.to_string()),
    ]);
    let selected: Vec<DerivedEvent<'_>> = events
        .iter()
        .filter(|e| filter.meets_criteria(e.event))
        .copied()
        .collect();

    push_component_bars(&mut chart, &component_medians_by_weekday(&selected));
    chart
}

fn push_component_bars(chart: &mut ChartSpec, rows: &[ComponentMedians]) {
    for row in rows {
        for (interval, median) in Interval::COMPONENTS.iter().zip(row.medians) {
            chart.layers.push(Layer::Bar {
                series: interval.label().to_string(),
                panel: None,
                x: row.category.clone(),
                value: median,
            });
        }
    }
}

fn hour_label(hour: u32) -> String {
    format!("{hour:02}")
}
