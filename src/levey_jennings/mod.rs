//! Levey-Jennings QC chart pipeline.
//!
//! `render` is a pure function of the dataset and the selected date range:
//! filter to the window, standardize each QC series against the records in
//! that window, then lay the series over ±1/±2/±3 SD bands. Nothing is
//! cached between calls; changing either date means calling it again.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use itertools::Itertools;

use crate::chart::{Axis, ChartSpec, Layer, Point, XValue};
use crate::config::QcChartConfig;
use crate::error::Result;
use crate::filter::{DateWindow, FilterCriteria};
use crate::models::{QcRecord, ScaledQcRecord};
use crate::stats;
use crate::utils::logging::log_stage;

/// User-selected chart parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QcParams {
    /// Requested first date
    pub start: NaiveDate,
    /// Requested last date
    pub end: NaiveDate,
    /// Date the selectable window ends on
    pub today: NaiveDate,
}

impl QcParams {
    /// Default range relative to `today`
    #[must_use]
    pub fn defaults_for(today: NaiveDate, config: &QcChartConfig) -> Self {
        let back = |days| today.checked_sub_days(Days::new(days)).unwrap_or(today);
        Self {
            start: back(config.default_start_offset_days),
            end: back(config.default_end_offset_days),
            today,
        }
    }

    /// Selectable part of the requested range, `None` if it lies entirely
    /// outside the rolling window
    ///
    /// # Errors
    /// Returns an error if the requested range is reversed
    pub fn window(&self, config: &QcChartConfig) -> Result<Option<DateWindow>> {
        DateWindow::resolve(self.start, self.end, self.today, config.window_days)
    }
}

/// Standardize each QC series against its own records
///
/// Records are grouped by `qc_code` (output in code order, then date
/// order). A series with fewer than two records, or with no spread, gets
/// `value_scaled = None` for all of its records.
#[must_use]
pub fn standardize(records: &[&QcRecord]) -> Vec<ScaledQcRecord> {
    let mut groups: BTreeMap<&str, Vec<&QcRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.qc_code.as_str()).or_default().push(record);
    }

    let mut scaled = Vec::with_capacity(records.len());
    for (code, mut group) in groups {
        group.sort_by_key(|r| r.date);
        let values: Vec<f64> = group.iter().map(|r| r.value).collect();
        let z = stats::z_scores(&values);
        if z.is_none() {
            log::debug!(
                "QC series {code} has {} record(s) without spread, leaving it unscaled",
                group.len()
            );
        }

        scaled.extend(group.iter().enumerate().map(|(i, r)| ScaledQcRecord {
            date: r.date,
            qc_code: r.qc_code.clone(),
            value: r.value,
            value_scaled: z.as_ref().map(|z| z[i]),
        }));
    }

    scaled
}

/// Assemble the banded chart from standardized records
#[must_use]
pub fn build_chart(
    scaled: &[ScaledQcRecord],
    window: &DateWindow,
    config: &QcChartConfig,
) -> ChartSpec {
    let mut chart = ChartSpec::new(
        format!("{} ({} to {})", config.title, window.start(), window.end()),
        Axis::date("Date"),
        Axis::continuous("Standard deviations from mean"),
    );

    // Outermost band first so narrower bands draw on top
    for (k, opacity) in config.band_opacities.iter().enumerate().rev() {
        let sigma = (k + 1) as f64;
        chart.layers.push(Layer::HBand {
            lower: -sigma,
            upper: sigma,
            fill: config.band_fill.clone(),
            opacity: *opacity,
        });
    }

    let series = scaled
        .iter()
        .filter_map(|r| r.value_scaled.map(|z| (r.qc_code.as_str(), r.date, z)))
        .into_group_map_by(|(code, _, _)| *code);

    for code in series.keys().sorted() {
        let points: Vec<Point> = series[code]
            .iter()
            .sorted_by_key(|(_, date, _)| *date)
            .map(|(_, date, z)| Point {
                x: XValue::Date(*date),
                y: *z,
            })
            .collect();

        chart.layers.push(Layer::Line {
            series: (*code).to_string(),
            panel: None,
            points: points.clone(),
        });
        chart.layers.push(Layer::Points {
            series: (*code).to_string(),
            panel: None,
            points,
        });
    }

    chart
}

/// Render the Levey-Jennings chart for a date range
///
/// An empty window, or a range entirely outside the selectable window,
/// yields a chart with bands only.
///
/// # Errors
/// Returns [`crate::Error::InvalidDateRange`] if the requested range is
/// reversed
pub fn render(
    dataset: &[QcRecord],
    params: &QcParams,
    config: &QcChartConfig,
) -> Result<ChartSpec> {
    let Some(window) = params.window(config)? else {
        let requested = DateWindow::new(params.start, params.end)?;
        return Ok(build_chart(&[], &requested, config));
    };
    let visible = window.apply(dataset);
    log_stage("QC records in window", visible.len());

    let scaled = standardize(&visible);
    Ok(build_chart(&scaled, &window, config))
}

/// An interactive chart session over one loaded dataset
///
/// Each parameter change re-renders from scratch; the session only keeps
/// the current parameters.
#[derive(Debug)]
pub struct QcSession<'a> {
    dataset: &'a [QcRecord],
    config: &'a QcChartConfig,
    params: QcParams,
}

impl<'a> QcSession<'a> {
    /// Start a session with the default range for `today`
    #[must_use]
    pub fn new(dataset: &'a [QcRecord], config: &'a QcChartConfig, today: NaiveDate) -> Self {
        Self {
            dataset,
            config,
            params: QcParams::defaults_for(today, config),
        }
    }

    /// Current parameters
    #[must_use]
    pub const fn params(&self) -> &QcParams {
        &self.params
    }

    /// Render with the current parameters
    ///
    /// # Errors
    /// See [`render`]
    pub fn render(&self) -> Result<ChartSpec> {
        render(self.dataset, &self.params, self.config)
    }

    /// Change the start date and re-render
    ///
    /// # Errors
    /// See [`render`]; the new start is kept even if rendering fails
    pub fn set_start(&mut self, start: NaiveDate) -> Result<ChartSpec> {
        self.params.start = start;
        self.render()
    }

    /// Change the end date and re-render
    ///
    /// # Errors
    /// See [`render`]; the new end is kept even if rendering fails
    pub fn set_end(&mut self, end: NaiveDate) -> Result<ChartSpec> {
        self.params.end = end;
        self.render()
    }
}
