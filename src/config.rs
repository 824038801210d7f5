//! Comparison configuration.
//!
//! A [`MetricConfiguration`] is immutable per comparison. Build one with
//! [`MetricConfiguration::builder`], deserialize one from JSON, or start from
//! [`Default`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Smallest number of resample points used for wavelength alignment.
pub const MIN_RESAMPLE_POINTS: usize = 2;

/// Largest number of resample points used for wavelength alignment.
pub const MAX_RESAMPLE_POINTS: usize = 4096;

/// Resample points used when none are configured.
pub const DEFAULT_RESAMPLE_POINTS: usize = 256;

/// Which metric to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Mean squared error (lower is better, 0 = identical).
    #[default]
    Mse,
    /// Root mean squared error (lower is better, 0 = identical).
    Rmse,
    /// Peak signal-to-noise ratio in dB (higher is better).
    Psnr,
}

impl MetricKind {
    /// Whether larger values mean more similar spectra.
    #[must_use]
    pub fn is_higher_better(self) -> bool {
        matches!(self, Self::Psnr)
    }

    /// Unit suffix for display.
    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Self::Psnr => "dB",
            Self::Mse | Self::Rmse => "",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mse => write!(f, "MSE"),
            Self::Rmse => write!(f, "RMSE"),
            Self::Psnr => write!(f, "PSNR"),
        }
    }
}

impl FromStr for MetricKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mse" => Ok(Self::Mse),
            "rmse" => Ok(Self::Rmse),
            "psnr" => Ok(Self::Psnr),
            other => Err(Error::InvalidArgument(format!(
                "unknown metric '{other}' (expected mse, rmse or psnr)"
            ))),
        }
    }
}

/// How two series are brought to a common length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMode {
    /// Pair values by channel index, truncating to the shorter series.
    #[default]
    ByIndex,
    /// Resample both series on a common grid over their wavelength overlap.
    ByWavelength,
}

impl fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByIndex => write!(f, "index"),
            Self::ByWavelength => write!(f, "wavelength"),
        }
    }
}

impl FromStr for AlignmentMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "index" | "by_index" | "by-index" => Ok(Self::ByIndex),
            "wavelength" | "by_wavelength" | "by-wavelength" => Ok(Self::ByWavelength),
            other => Err(Error::InvalidArgument(format!(
                "unknown alignment '{other}' (expected index or wavelength)"
            ))),
        }
    }
}

/// Peak amplitude used to normalize PSNR.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PsnrPeakMode {
    /// Derive the peak from the range of the compared data.
    #[default]
    DataRange,
    /// Use a caller-supplied peak. Must be finite and positive.
    Custom(f64),
}

impl PsnrPeakMode {
    /// The custom peak, if one is configured.
    #[must_use]
    pub fn custom_peak(self) -> Option<f64> {
        match self {
            Self::Custom(peak) => Some(peak),
            Self::DataRange => None,
        }
    }
}

/// Whether to compare whole spectra or every ROI pixel independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Compare the two series as given.
    #[default]
    AveragedSpectrum,
    /// Compare matching pixels of two ROI rectangles and summarize.
    PerHyperpixelRoi,
}

impl fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AveragedSpectrum => write!(f, "averaged"),
            Self::PerHyperpixelRoi => write!(f, "per-pixel"),
        }
    }
}

impl FromStr for EvaluationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "averaged" | "averaged_spectrum" => Ok(Self::AveragedSpectrum),
            "per-pixel" | "per_pixel" | "per_hyperpixel_roi" => Ok(Self::PerHyperpixelRoi),
            other => Err(Error::InvalidArgument(format!(
                "unknown evaluation mode '{other}' (expected averaged or per-pixel)"
            ))),
        }
    }
}

/// Configuration for one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricConfiguration {
    /// Metric to compute.
    pub metric: MetricKind,
    /// Alignment strategy.
    pub alignment: AlignmentMode,
    /// Resample points for wavelength alignment (clamped to 2..=4096 at use).
    pub resample_point_count: usize,
    /// PSNR peak policy.
    pub psnr_peak_mode: PsnrPeakMode,
    /// Averaged or per-hyperpixel evaluation.
    pub evaluation_mode: EvaluationMode,
}

impl Default for MetricConfiguration {
    fn default() -> Self {
        Self {
            metric: MetricKind::default(),
            alignment: AlignmentMode::default(),
            resample_point_count: DEFAULT_RESAMPLE_POINTS,
            psnr_peak_mode: PsnrPeakMode::default(),
            evaluation_mode: EvaluationMode::default(),
        }
    }
}

impl MetricConfiguration {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> MetricConfigurationBuilder {
        MetricConfigurationBuilder::default()
    }

    /// Resample point count after clamping.
    #[must_use]
    pub fn effective_resample_points(&self) -> usize {
        self.resample_point_count
            .clamp(MIN_RESAMPLE_POINTS, MAX_RESAMPLE_POINTS)
    }

    /// Same configuration with a different evaluation mode.
    #[must_use]
    pub fn with_evaluation_mode(mut self, mode: EvaluationMode) -> Self {
        self.evaluation_mode = mode;
        self
    }
}

/// Builder for [`MetricConfiguration`].
#[derive(Debug, Default)]
pub struct MetricConfigurationBuilder {
    metric: Option<MetricKind>,
    alignment: Option<AlignmentMode>,
    resample_point_count: Option<usize>,
    psnr_peak_mode: Option<PsnrPeakMode>,
    evaluation_mode: Option<EvaluationMode>,
}

impl MetricConfigurationBuilder {
    /// Set the metric.
    #[must_use]
    pub fn metric(mut self, metric: MetricKind) -> Self {
        self.metric = Some(metric);
        self
    }

    /// Set the alignment mode.
    #[must_use]
    pub fn alignment(mut self, alignment: AlignmentMode) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Set the resample point count for wavelength alignment.
    #[must_use]
    pub fn resample_point_count(mut self, count: usize) -> Self {
        self.resample_point_count = Some(count);
        self
    }

    /// Set the PSNR peak policy.
    #[must_use]
    pub fn psnr_peak_mode(mut self, mode: PsnrPeakMode) -> Self {
        self.psnr_peak_mode = Some(mode);
        self
    }

    /// Set the evaluation mode.
    #[must_use]
    pub fn evaluation_mode(mut self, mode: EvaluationMode) -> Self {
        self.evaluation_mode = Some(mode);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> MetricConfiguration {
        let defaults = MetricConfiguration::default();
        MetricConfiguration {
            metric: self.metric.unwrap_or(defaults.metric),
            alignment: self.alignment.unwrap_or(defaults.alignment),
            resample_point_count: self
                .resample_point_count
                .unwrap_or(defaults.resample_point_count),
            psnr_peak_mode: self.psnr_peak_mode.unwrap_or(defaults.psnr_peak_mode),
            evaluation_mode: self.evaluation_mode.unwrap_or(defaults.evaluation_mode),
        }
    }
}
