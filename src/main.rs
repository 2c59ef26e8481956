use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use lab_kpi::utils::logging::{abandon_spinner, create_spinner, finish_spinner};
use lab_kpi::{
    EventRecord, KpiReport, PipelineConfig, QcParams, QcRecord, load_records_async,
};
use log::info;

/// Levey-Jennings charts and turnaround-time KPI reports from lab data
#[derive(Debug, Parser)]
#[command(name = "lab-kpi", version, about)]
struct Cli {
    /// JSON configuration file overriding the defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the turnaround-time KPI report from an event file
    Kpi {
        /// Event file (.csv, .tsv or .parquet)
        events: PathBuf,
        /// Output directory for tables and chart descriptions
        #[arg(long, default_value = "kpi-report")]
        out: PathBuf,
    },
    /// Render a Levey-Jennings chart description from a QC series file
    Qc {
        /// QC series file (.csv, .tsv or .parquet)
        series: PathBuf,
        /// First date shown (default: today - 45 days)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last date shown (default: today - 15 days)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Reference date for the selectable window (default: local today)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Write the chart JSON here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    log::debug!("{config}");

    match cli.command {
        Command::Kpi { events, out } => run_kpi(&config, &events, &out).await,
        Command::Qc {
            series,
            start,
            end,
            today,
            out,
        } => {
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            let defaults = QcParams::defaults_for(today, &config.qc);
            let params = QcParams {
                start: start.unwrap_or(defaults.start),
                end: end.unwrap_or(defaults.end),
                today,
            };
            run_qc(&config, &series, &params, out.as_deref()).await
        }
    }
}

async fn run_kpi(config: &PipelineConfig, events_path: &Path, out: &Path) -> anyhow::Result<()> {
    let start = Instant::now();
    let spinner = create_spinner(&format!("Loading {}", events_path.display()));
    let loaded: lab_kpi::Result<Vec<EventRecord>> =
        load_records_async(events_path, &config.loader).await;
    match &loaded {
        Ok(events) => finish_spinner(&spinner, &format!("Loaded {} events", events.len())),
        Err(_) => abandon_spinner(&spinner, "Loading failed"),
    }
    let events =
        loaded.with_context(|| format!("Failed to load events from {}", events_path.display()))?;

    let report = KpiReport::build(&events, &config.kpi);
    println!("{}", report.lab_test_table());
    println!("{}", report.priority_table());

    let written = report
        .write_to_dir(out)
        .with_context(|| format!("Failed to write report to {}", out.display()))?;
    info!(
        "KPI report with {} files finished in {:?}",
        written.len(),
        start.elapsed()
    );
    Ok(())
}

async fn run_qc(
    config: &PipelineConfig,
    series_path: &Path,
    params: &QcParams,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let records: Vec<QcRecord> = load_records_async(series_path, &config.loader)
        .await
        .with_context(|| format!("Failed to load QC series from {}", series_path.display()))?;

    let chart = lab_kpi::render(&records, params, &config.qc).context("Failed to render chart")?;
    if !chart.has_data() {
        log::warn!("No QC data between {} and {}", params.start, params.end);
    }

    let json = chart.to_json()?;
    match out {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write chart to {}", path.display()))?;
            info!("Wrote chart to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
