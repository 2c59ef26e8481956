//! Configuration for the QC chart and KPI pipelines.
//!
//! Every structure has a usable `Default`; a JSON file only needs to name
//! the values it overrides.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::loader::delimited::delimiter_byte;
use crate::schema::DateFormatConfig;

/// Top-level configuration passed into both pipelines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Input file handling
    pub loader: LoaderConfig,
    /// Levey-Jennings chart parameters
    pub qc: QcChartConfig,
    /// Turnaround-time KPI parameters
    pub kpi: KpiConfig,
}

impl PipelineConfig {
    /// Load a configuration from a JSON file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting configuration is invalid
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    ///
    /// # Errors
    /// Returns [`Error::Config`] describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        self.loader.validate()?;
        self.qc.validate()?;
        self.kpi.validate()
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Configuration:")?;
        writeln!(f, "  Delimiter: {:?}", self.loader.delimiter)?;
        writeln!(f, "  Batch Size: {}", self.loader.batch_size)?;
        writeln!(f, "  Skip Invalid Rows: {}", self.loader.skip_invalid_rows)?;
        writeln!(f, "  QC Window: {} days", self.qc.window_days)?;
        writeln!(
            f,
            "  QC Default Range: today-{} .. today-{}",
            self.qc.default_start_offset_days, self.qc.default_end_offset_days
        )?;
        writeln!(f, "  KPI Priority Filter: {}", self.kpi.priority_filter)?;
        if let Some(lab) = &self.kpi.focus_lab {
            writeln!(f, "  KPI Focus Lab: {lab}")?;
        }
        if let Some(test) = &self.kpi.focus_test {
            writeln!(f, "  KPI Focus Test: {test}")?;
        }
        Ok(())
    }
}

/// Configuration for reading input files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Field delimiter for delimited text files
    pub delimiter: char,
    /// Rows per Arrow record batch
    pub batch_size: usize,
    /// Skip rows with unparseable cells instead of failing
    pub skip_invalid_rows: bool,
    /// Accepted date and timestamp formats
    pub date_formats: DateFormatConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            batch_size: 8192,
            skip_invalid_rows: false,
            date_formats: DateFormatConfig::default(),
        }
    }
}

impl LoaderConfig {
    fn validate(&self) -> Result<()> {
        delimiter_byte(self.delimiter)?;
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be positive".to_string()));
        }
        Ok(())
    }
}

/// Configuration for the Levey-Jennings chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QcChartConfig {
    /// Length of the selectable window ending today
    pub window_days: u64,
    /// Default start bound, in days before today
    pub default_start_offset_days: u64,
    /// Default end bound, in days before today
    pub default_end_offset_days: u64,
    /// Opacity of the ±1, ±2 and ±3 SD bands
    pub band_opacities: [f64; 3],
    /// Fill color of the bands
    pub band_fill: String,
    /// Chart title
    pub title: String,
}

impl Default for QcChartConfig {
    fn default() -> Self {
        Self {
            window_days: 365,
            default_start_offset_days: 45,
            default_end_offset_days: 15,
            band_opacities: [0.3, 0.2, 0.1],
            band_fill: "#4682b4".to_string(),
            title: "Levey-Jennings Chart".to_string(),
        }
    }
}

impl QcChartConfig {
    fn validate(&self) -> Result<()> {
        if self.default_start_offset_days > self.window_days {
            return Err(Error::Config(
                "default_start_offset_days must lie inside window_days".to_string(),
            ));
        }
        if self.default_end_offset_days > self.default_start_offset_days {
            return Err(Error::Config(
                "default range must start before it ends".to_string(),
            ));
        }
        if self
            .band_opacities
            .iter()
            .any(|o| !(0.0..=1.0).contains(o))
        {
            return Err(Error::Config(
                "band_opacities must lie in [0, 1]".to_string(),
            ));
        }
        if self.band_opacities.windows(2).any(|w| w[0] < w[1]) {
            return Err(Error::Config(
                "band_opacities must decrease outward".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the turnaround-time KPI report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiConfig {
    /// Priority used by the priority summary table
    pub priority_filter: String,
    /// Lab used by the hourly boxplot and rose charts; busiest lab if unset
    pub focus_lab: Option<String>,
    /// Test used by the rose chart; busiest test of the focus lab if unset
    pub focus_test: Option<String>,
    /// Bins of the per-row turnaround histogram
    pub histogram_bins: usize,
    /// Grid points of each density curve
    pub density_points: usize,
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            priority_filter: "S".to_string(),
            focus_lab: None,
            focus_test: None,
            histogram_bins: 10,
            density_points: 512,
        }
    }
}

impl KpiConfig {
    fn validate(&self) -> Result<()> {
        if self.histogram_bins == 0 {
            return Err(Error::Config("histogram_bins must be positive".to_string()));
        }
        if self.density_points < 2 {
            return Err(Error::Config(
                "density_points must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}
