//! Renderer-neutral chart descriptions.
//!
//! A [`ChartSpec`] holds everything a plotting front end needs: axes,
//! coordinate system, facets and fully computed layers. Statistical layers
//! (density curves, box statistics, quantile ribbons) are computed here in
//! Rust, so a renderer only draws.

use chrono::NaiveDate;
use serde::Serialize;

use crate::stats::{BoxStats, DensityCurve};

/// A complete chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// Chart title
    pub title: String,
    /// Horizontal axis
    pub x: Axis,
    /// Vertical axis
    pub y: Axis,
    /// Coordinate system
    pub coord: Coord,
    /// Facet variables, empty for a single panel
    pub facet_by: Vec<String>,
    /// Layers in drawing order
    pub layers: Vec<Layer>,
}

impl ChartSpec {
    /// Start a chart with Cartesian coordinates and no layers
    pub fn new(title: impl Into<String>, x: Axis, y: Axis) -> Self {
        Self {
            title: title.into(),
            x,
            y,
            coord: Coord::Cartesian,
            facet_by: Vec::new(),
            layers: Vec::new(),
        }
    }

    /// Set facet variables
    #[must_use]
    pub fn faceted_by(mut self, vars: &[&str]) -> Self {
        self.facet_by = vars.iter().map(|v| (*v).to_string()).collect();
        self
    }

    /// Switch to polar coordinates
    #[must_use]
    pub fn polar(mut self) -> Self {
        self.coord = Coord::Polar;
        self
    }

    /// Whether any layer carries data (reference bands do not count)
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.layers.iter().any(Layer::is_data)
    }

    /// Distinct series names across data layers, sorted
    #[must_use]
    pub fn series_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.layers.iter().filter_map(Layer::series).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Axis description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    /// Axis label
    pub label: String,
    /// Scale type
    pub scale: Scale,
}

impl Axis {
    /// Axis over calendar dates
    pub fn date(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            scale: Scale::Date,
        }
    }

    /// Continuous numeric axis
    pub fn continuous(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            scale: Scale::Continuous,
        }
    }

    /// Axis over discrete categories in the given order
    pub fn discrete(label: impl Into<String>, levels: Vec<String>) -> Self {
        Self {
            label: label.into(),
            scale: Scale::Discrete { levels },
        }
    }
}

/// Axis scale
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Scale {
    /// Calendar dates
    Date,
    /// Real numbers
    Continuous,
    /// Ordered categories
    Discrete {
        /// Category order
        levels: Vec<String>,
    },
}

/// Coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Coord {
    /// Rectangular
    Cartesian,
    /// Polar, x mapped to angle
    Polar,
}

/// A position on the x axis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XValue {
    /// Calendar date
    Date(NaiveDate),
}

/// A plotted point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    /// x position
    pub x: XValue,
    /// y position
    pub y: f64,
}

/// A ribbon slice between two y values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RibbonPoint {
    /// x position
    pub x: XValue,
    /// Lower edge
    pub lower: f64,
    /// Upper edge
    pub upper: f64,
}

/// A drawable layer
///
/// `panel` names the facet panel a layer belongs to (`None` for all panels);
/// `series` drives the color mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "geom", rename_all = "snake_case")]
pub enum Layer {
    /// Horizontal reference band across the whole panel
    HBand {
        /// Lower y edge
        lower: f64,
        /// Upper y edge
        upper: f64,
        /// Fill color
        fill: String,
        /// Fill opacity
        opacity: f64,
    },
    /// Connected line
    Line {
        /// Color group
        series: String,
        /// Facet panel
        panel: Option<String>,
        /// Points in x order
        points: Vec<Point>,
    },
    /// Scatter points
    Points {
        /// Color group
        series: String,
        /// Facet panel
        panel: Option<String>,
        /// Points in x order
        points: Vec<Point>,
    },
    /// Shaded region between two lines
    Ribbon {
        /// Color group
        series: String,
        /// Facet panel
        panel: Option<String>,
        /// Slices in x order
        points: Vec<RibbonPoint>,
        /// Fill opacity
        opacity: f64,
    },
    /// Density curve over the x axis
    Density {
        /// Color group
        series: String,
        /// Facet panel
        panel: Option<String>,
        /// Estimated curve
        curve: DensityCurve,
    },
    /// Mirrored density along the y axis at a discrete x position
    Violin {
        /// Color group
        series: String,
        /// Facet panel
        panel: Option<String>,
        /// Category on the x axis
        x: String,
        /// Density of the y values
        curve: DensityCurve,
    },
    /// Box and whiskers at a discrete x position
    Boxplot {
        /// Color group
        series: String,
        /// Facet panel
        panel: Option<String>,
        /// Category on the x axis
        x: String,
        /// Box statistics of the y values
        stats: BoxStats,
    },
    /// One stacked bar segment
    Bar {
        /// Stack segment (fill group)
        series: String,
        /// Facet panel
        panel: Option<String>,
        /// Category on the x axis
        x: String,
        /// Segment height
        value: f64,
    },
}

impl Layer {
    /// Whether the layer is derived from data rather than decoration
    #[must_use]
    pub const fn is_data(&self) -> bool {
        !matches!(self, Self::HBand { .. })
    }

    /// Color group of a data layer
    #[must_use]
    pub fn series(&self) -> Option<&str> {
        match self {
            Self::HBand { .. } => None,
            Self::Line { series, .. }
            | Self::Points { series, .. }
            | Self::Ribbon { series, .. }
            | Self::Density { series, .. }
            | Self::Violin { series, .. }
            | Self::Boxplot { series, .. }
            | Self::Bar { series, .. } => Some(series.as_str()),
        }
    }

    /// Facet panel of a data layer
    #[must_use]
    pub fn panel(&self) -> Option<&str> {
        match self {
            Self::HBand { .. } => None,
            Self::Line { panel, .. }
            | Self::Points { panel, .. }
            | Self::Ribbon { panel, .. }
            | Self::Density { panel, .. }
            | Self::Violin { panel, .. }
            | Self::Boxplot { panel, .. }
            | Self::Bar { panel, .. } => panel.as_deref(),
        }
    }
}

/// Panel label for a multi-variable facet
#[must_use]
pub fn panel_label(parts: &[&str]) -> String {
    parts.join(" / ")
}
