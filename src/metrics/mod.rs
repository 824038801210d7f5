//! Similarity metrics between two spectra.
//!
//! This module computes one of three metrics from two aligned spectra:
//!
//! - **MSE**: mean squared error (lower is better, 0 = identical)
//! - **RMSE**: square root of the MSE, in the units of the data
//! - **PSNR**: peak signal-to-noise ratio in dB (higher is better,
//!   `+inf` for identical data)
//!
//! ## PSNR peak
//!
//! | Mode | Peak |
//! |------|------|
//! | `DataRange` | `max - min` of both spectra; `max(|max|, |min|)` if flat; `1.0` if all zero |
//! | `Custom(v)` | `v`, which must be finite and positive |

pub mod psnr;

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use psnr::{psnr_from_rmse, resolve_psnr_peak};

use crate::align::align;
use crate::config::{MetricConfiguration, MetricKind};
use crate::error::MetricError;
use crate::series::Series;
use crate::stats::Summary;

/// Distribution of per-pixel metric values across an ROI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerPixelSummary {
    /// Number of pixel pairs evaluated.
    pub pixel_count: f64,
    /// Smallest per-pixel value.
    #[serde(with = "float_text")]
    pub min_value: f64,
    /// Largest per-pixel value.
    #[serde(with = "float_text")]
    pub max_value: f64,
    /// Mean per-pixel value.
    #[serde(with = "float_text")]
    pub mean_value: f64,
    /// Median per-pixel value.
    #[serde(with = "float_text")]
    pub median_value: f64,
    /// Population standard deviation (NaN when any value is infinite).
    #[serde(with = "float_text")]
    pub std_dev: f64,
}

impl From<&Summary> for PerPixelSummary {
    fn from(summary: &Summary) -> Self {
        Self {
            pixel_count: summary.count as f64,
            min_value: summary.min,
            max_value: summary.max,
            mean_value: summary.mean,
            median_value: summary.median,
            std_dev: summary.std_dev,
        }
    }
}

/// Outcome of one comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    /// Metric that was computed.
    pub metric: MetricKind,
    /// Metric value. For per-hyperpixel evaluation, the mean over pixels.
    #[serde(with = "float_text")]
    pub value: f64,
    /// Number of aligned samples the value was computed from.
    pub sample_count: usize,
    /// PSNR peak that was applied, if any.
    pub psnr_peak_used: Option<f64>,
    /// Per-pixel distribution, for per-hyperpixel evaluation.
    pub per_pixel_summary: Option<PerPixelSummary>,
}

impl MetricResult {
    /// Whether `self` indicates more similar spectra than `other`.
    ///
    /// Direction follows [`MetricKind::is_higher_better`]. NaN is never better.
    #[must_use]
    pub fn is_better_than(&self, other: &Self) -> bool {
        self.similarity_cmp(other) == Ordering::Less
    }

    /// Order results most-similar first.
    #[must_use]
    pub fn similarity_cmp(&self, other: &Self) -> Ordering {
        let key = |r: &Self| {
            if r.value.is_nan() {
                f64::INFINITY
            } else if r.metric.is_higher_better() {
                -r.value
            } else {
                r.value
            }
        };
        key(self).total_cmp(&key(other))
    }
}

impl fmt::Display for MetricResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = self.metric.unit();
        if self.value.is_infinite() {
            write!(f, "{} = inf", self.metric)?;
        } else {
            write!(f, "{} = {:.6}", self.metric, self.value)?;
        }
        if !unit.is_empty() {
            write!(f, " {unit}")?;
        }
        write!(f, " (n={})", self.sample_count)
    }
}

/// Mean of squared differences of two equal-length vectors.
///
/// Returns `None` for empty or mismatched input.
#[must_use]
pub fn mean_squared_error(lhs: &[f64], rhs: &[f64]) -> Option<f64> {
    if lhs.is_empty() || lhs.len() != rhs.len() {
        return None;
    }
    let sum: f64 = lhs
        .iter()
        .zip(rhs)
        .map(|(l, r)| {
            let diff = l - r;
            diff * diff
        })
        .sum();
    Some(sum / lhs.len() as f64)
}

/// Compare two spectra as a whole.
///
/// Aligns the series according to `config`, then computes the configured
/// metric. `config.evaluation_mode` is not consulted here; see
/// [`crate::compare::compare`] for dispatch.
///
/// # Example
///
/// ```
/// use spectral_compare::{evaluate, MetricConfiguration, MetricKind, Series};
///
/// let reference = Series::new(vec![1.0, 2.0, 3.0]);
/// let target = Series::new(vec![1.0, 2.0, 5.0]);
/// let config = MetricConfiguration::builder().metric(MetricKind::Rmse).build();
///
/// let result = evaluate(&reference, &target, &config).unwrap();
/// assert_eq!(result.sample_count, 3);
/// assert!((result.value - (4.0_f64 / 3.0).sqrt()).abs() < 1e-12);
/// ```
pub fn evaluate(
    reference: &Series,
    target: &Series,
    config: &MetricConfiguration,
) -> Result<MetricResult, MetricError> {
    let (lhs, rhs) = align(reference, target, config)?;
    let mse = mean_squared_error(&lhs, &rhs).ok_or(MetricError::EmptyData)?;
    let rmse = mse.sqrt();

    let (value, psnr_peak_used) = match config.metric {
        MetricKind::Mse => (mse, None),
        MetricKind::Rmse => (rmse, None),
        MetricKind::Psnr => {
            let peak = resolve_psnr_peak(&lhs, &rhs, config.psnr_peak_mode)?;
            (psnr_from_rmse(peak, rmse), Some(peak))
        }
    };

    Ok(MetricResult {
        metric: config.metric,
        value,
        sample_count: lhs.len(),
        psnr_peak_used,
        per_pixel_summary: None,
    })
}

// JSON has no infinity or NaN, so non-finite values are written as strings.
mod float_text {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_finite() {
            value.serialize(serializer)
        } else if value.is_nan() {
            "nan".serialize(serializer)
        } else if value.is_sign_positive() {
            "inf".serialize(serializer)
        } else {
            "-inf".serialize(serializer)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FloatOrText {
        Float(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match FloatOrText::deserialize(deserializer)? {
            FloatOrText::Float(v) => Ok(v),
            FloatOrText::Text(s) => match s.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "nan" => Ok(f64::NAN),
                other => Err(serde::de::Error::custom(format!(
                    "expected a number, 'inf', '-inf' or 'nan', got '{other}'"
                ))),
            },
        }
    }
}
