//! Assembled turnaround-time KPI report.
//!
//! Runs the whole KPI pipeline once over a loaded event set and keeps the
//! summary tables and chart descriptions together, ready to be handed to a
//! document renderer as JSON or printed as text tables.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::chart::ChartSpec;
use crate::config::KpiConfig;
use crate::error::Result;
use crate::filter::{EventFilter, FilterCriteria};
use crate::kpi::charts::{
    component_bar_chart, daily_percentile_chart, hourly_boxplot_chart, otr_density_chart,
    weekday_rose_chart, weekday_violin_chart,
};
use crate::kpi::{
    DerivedEvent, LabTestSummary, PrioritySummary, component_medians_by_test, daily_percentiles,
    derive_all, most_frequent, summarize_by_lab_test, summarize_priority,
};
use crate::models::EventRecord;
use crate::stats::HistogramBin;
use crate::utils::logging::log_stage;

/// A chart with the file stem it is written under
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedChart {
    /// File stem and lookup key
    pub name: String,
    /// Chart description
    pub chart: ChartSpec,
}

/// Tables and charts of one KPI run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiReport {
    /// Events the report was built from
    pub event_count: usize,
    /// Lab used by the single-lab charts
    pub focus_lab: Option<String>,
    /// Test used by the rose chart
    pub focus_test: Option<String>,
    /// Count, median and 90th percentile of OTC and RTR per lab and test
    pub lab_test_summary: Vec<LabTestSummary>,
    /// Median OTR per lab and test for the configured priority
    pub priority_summary: Vec<PrioritySummary>,
    /// Chart descriptions
    pub charts: Vec<NamedChart>,
}

impl KpiReport {
    /// Build the report from loaded events
    ///
    /// Single-lab charts are only included when a focus lab is configured
    /// or at least one event exists to pick the busiest lab from.
    #[must_use]
    pub fn build(events: &[EventRecord], config: &KpiConfig) -> Self {
        let derived = derive_all(events);
        log_stage("Derived events", derived.len());

        let focus_lab = config.focus_lab.clone().or_else(|| {
            most_frequent(&derived, |e| e.event.resulting_lab.as_str()).map(str::to_string)
        });
        let focus_test = focus_lab.as_deref().and_then(|lab| {
            config
                .focus_test
                .clone()
                .or_else(|| busiest_test_in_lab(&derived, lab))
        });

        let lab_test_summary = summarize_by_lab_test(&derived);
        let priority_summary =
            summarize_priority(&derived, &config.priority_filter, config.histogram_bins);
        log_stage("Lab/test summary rows", lab_test_summary.len());
        log_stage("Priority summary rows", priority_summary.len());

        let mut charts = vec![
            named("otr_density", otr_density_chart(&derived, config.density_points)),
            named("daily_percentiles", daily_percentile_chart(&daily_percentiles(&derived))),
            named("weekday_violin", weekday_violin_chart(&derived, config.density_points)),
            named("component_bar", component_bar_chart(&component_medians_by_test(&derived))),
        ];
        if let Some(lab) = focus_lab.as_deref() {
            charts.push(named("hourly_boxplot", hourly_boxplot_chart(&derived, lab)));
            if let Some(test) = focus_test.as_deref() {
                charts.push(named("weekday_rose", weekday_rose_chart(&derived, lab, test)));
            }
        }

        Self {
            event_count: events.len(),
            focus_lab,
            focus_test,
            lab_test_summary,
            priority_summary,
            charts,
        }
    }

    /// Look up a chart by name
    #[must_use]
    pub fn chart(&self, name: &str) -> Option<&ChartSpec> {
        self.charts.iter().find(|c| c.name == name).map(|c| &c.chart)
    }

    /// The lab/test summary as an aligned text table
    #[must_use]
    pub fn lab_test_table(&self) -> String {
        let rows = self
            .lab_test_summary
            .iter()
            .map(|r| {
                vec![
                    r.resulting_lab.clone(),
                    r.test.clone(),
                    r.count.to_string(),
                    format!("{:.1}", r.otc_median),
                    format!("{:.1}", r.otc_p90),
                    format!("{:.1}", r.rtr_median),
                    format!("{:.1}", r.rtr_p90),
                ]
            })
            .collect();

        render_table(
            &["Lab", "Test", "N", "OTC median", "OTC p90", "RTR median", "RTR p90"],
            2,
            rows,
        )
    }

    /// The priority summary as an aligned text table with inline histograms
    #[must_use]
    pub fn priority_table(&self) -> String {
        let rows = self
            .priority_summary
            .iter()
            .map(|r| {
                vec![
                    r.resulting_lab.clone(),
                    r.test.clone(),
                    r.priority.clone(),
                    r.count.to_string(),
                    format!("{:.1}", r.otr_median),
                    sparkline(&r.otr_histogram),
                ]
            })
            .collect();

        render_table(
            &["Lab", "Test", "Priority", "N", "OTR median", "OTR distribution"],
            3,
            rows,
        )
    }

    /// Serialize the whole report to pretty JSON
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write `report.json`, `tables.txt` and one JSON file per chart
    ///
    /// # Errors
    /// Returns an error if the directory or any file cannot be written
    pub fn write_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(self.charts.len() + 2);

        let report_path = dir.join("report.json");
        fs::write(&report_path, self.to_json()?)?;
        written.push(report_path);

        let tables_path = dir.join("tables.txt");
        fs::write(
            &tables_path,
            format!("{}\n{}", self.lab_test_table(), self.priority_table()),
        )?;
        written.push(tables_path);

        for chart in &self.charts {
            let path = dir.join(format!("{}.json", chart.name));
            fs::write(&path, chart.chart.to_json()?)?;
            written.push(path);
        }

        log::info!("Wrote {} report files to {}", written.len(), dir.display());
        Ok(written)
    }
}

fn named(name: &str, chart: ChartSpec) -> NamedChart {
    NamedChart {
        name: name.to_string(),
        chart,
    }
}

fn busiest_test_in_lab(events: &[DerivedEvent<'_>], lab: &str) -> Option<String> {
    let filter = EventFilter::Lab(lab.to_string());
    let in_lab: Vec<DerivedEvent<'_>> = events
        .iter()
        .filter(|e| filter.meets_criteria(e.event))
        .copied()
        .collect();
    most_frequent(&in_lab, |e| e.event.test.as_str()).map(str::to_string)
}

/// Render rows as a text table, left-aligning the first `text_columns`
/// columns and right-aligning the rest
fn render_table(headers: &[&str], text_columns: usize, rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| {
        let mut line = String::new();
        for (i, (cell, width)) in cells.iter().zip(&widths).enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            let pad = width.saturating_sub(cell.chars().count());
            if i < text_columns {
                let _ = write!(line, "{cell}{}", " ".repeat(pad));
            } else {
                let _ = write!(line, "{}{cell}", " ".repeat(pad));
            }
        }
        line.trim_end().to_string()
    };

    let header: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();
    let mut out = format_row(&header[..]);
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    out.push('\n');
    for row in &rows {
        out.push_str(&format_row(&row[..]));
        out.push('\n');
    }
    out
}

/// Inline histogram using block characters, blank for empty bins
fn sparkline(bins: &[HistogramBin]) -> String {
    const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    let max = bins.iter().map(|b| b.count).max().unwrap_or(0);
    if max == 0 {
        return String::new();
    }

    bins.iter()
        .map(|b| {
            if b.count == 0 {
                ' '
            } else {
                BLOCKS[((b.count * BLOCKS.len()).div_ceil(max)).clamp(1, BLOCKS.len()) - 1]
            }
        })
        .collect()
}
