//! Descriptive statistics used by both pipelines.
//!
//! Every function returns `None` instead of producing NaN when its input is
//! too small to define the statistic, so empty windows and groups surface
//! as missing values rather than arithmetic errors.
//!
//! Conventions:
//! - standard deviation uses the sample (n - 1) denominator
//! - quantiles interpolate linearly between order statistics
//!   (`h = (n - 1) * p`, Hyndman-Fan type 7)

use serde::Serialize;

/// Arithmetic mean
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation, defined for two or more values
#[must_use]
pub fn sample_sd(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss = values.iter().map(|v| (v - m).powi(2)).sum::<f64>();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Standardize values to z-scores
///
/// Returns `None` when the standard deviation is undefined or zero.
#[must_use]
pub fn z_scores(values: &[f64]) -> Option<Vec<f64>> {
    let m = mean(values)?;
    let sd = sample_sd(values)?;
    if sd == 0.0 || !sd.is_finite() {
        return None;
    }
    Some(values.iter().map(|v| (v - m) / sd).collect())
}

/// Sort a copy of the values in ascending order
#[must_use]
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Quantile of already sorted values
#[must_use]
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// Quantile of unsorted values
#[must_use]
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    quantile_sorted(&sorted(values), p)
}

/// Median of unsorted values
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Tukey box-and-whisker statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    /// Number of values
    pub n: usize,
    /// Smallest value within 1.5 IQR below the first quartile
    pub lower_whisker: f64,
    /// First quartile
    pub q1: f64,
    /// Median
    pub median: f64,
    /// Third quartile
    pub q3: f64,
    /// Largest value within 1.5 IQR above the third quartile
    pub upper_whisker: f64,
    /// Values beyond the whiskers
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Compute box statistics, `None` for empty input
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = sorted(values);
        let q1 = quantile_sorted(&sorted, 0.25)?;
        let median = quantile_sorted(&sorted, 0.5)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        let inside = sorted.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
        let lower_whisker = inside.clone().next().unwrap_or(q1);
        let upper_whisker = inside.last().unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();

        Some(Self {
            n: sorted.len(),
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

/// Kernel density estimate evaluated on an even grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityCurve {
    /// Gaussian kernel bandwidth
    pub bandwidth: f64,
    /// Grid positions
    pub x: Vec<f64>,
    /// Estimated density at each grid position
    pub y: Vec<f64>,
}

/// Silverman's rule-of-thumb bandwidth, `None` for fewer than two values
#[must_use]
pub fn silverman_bandwidth(values: &[f64]) -> Option<f64> {
    let sd = sample_sd(values)?;
    let sorted = sorted(values);
    let iqr = quantile_sorted(&sorted, 0.75)? - quantile_sorted(&sorted, 0.25)?;

    let mut spread = sd.min(iqr / 1.34);
    if spread <= 0.0 {
        spread = if sd > 0.0 { sd } else { sorted[0].abs() };
    }
    if spread <= 0.0 {
        spread = 1.0;
    }
    Some(0.9 * spread * (values.len() as f64).powf(-0.2))
}

/// Gaussian kernel density estimate on `points` grid positions spanning
/// three bandwidths beyond the data range
#[must_use]
pub fn gaussian_kde(values: &[f64], points: usize) -> Option<DensityCurve> {
    if points < 2 {
        return None;
    }
    let bandwidth = silverman_bandwidth(values)?;
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min) - 3.0 * bandwidth;
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 3.0 * bandwidth;
    let step = (hi - lo) / (points - 1) as f64;
    let norm = 1.0 / (values.len() as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    let x: Vec<f64> = (0..points).map(|i| lo + step * i as f64).collect();
    let y = x
        .iter()
        .map(|xi| {
            norm * values
                .iter()
                .map(|v| (-0.5 * ((xi - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
        })
        .collect();

    Some(DensityCurve { bandwidth, x, y })
}

/// One histogram bin, half-open except for the last
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Lower edge
    pub lower: f64,
    /// Upper edge
    pub upper: f64,
    /// Values in the bin
    pub count: usize,
}

/// Equal-width histogram over the value range
///
/// Constant input collapses into a single bin; empty input yields no bins.
#[must_use]
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        return vec![HistogramBin {
            lower: lo,
            upper: hi,
            count: values.len(),
        }];
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + width * i as f64,
            upper: lo + width * (i + 1) as f64,
            count,
        })
        .collect()
}
