//! # spectral-compare
//!
//! Similarity metrics between spectral samples of hyperspectral cubes.
//!
//! Given two captured spectra (single pixels, ROI averages, or every pixel of
//! two ROI rectangles), this library computes MSE, RMSE or PSNR between them.
//! Spectra are aligned either by channel index or by resampling over their
//! common wavelength range.
//!
//! ## Quick Start
//!
//! ```
//! use spectral_compare::{evaluate, AlignmentMode, MetricConfiguration, MetricKind, Series};
//!
//! let reference = Series::new(vec![1.0, 2.0, 3.0]).with_wavelengths(vec![400.0, 500.0, 600.0]);
//! let target = Series::new(vec![4.0, 5.0, 6.0]).with_wavelengths(vec![450.0, 550.0, 650.0]);
//!
//! let config = MetricConfiguration::builder()
//!     .metric(MetricKind::Mse)
//!     .alignment(AlignmentMode::ByWavelength)
//!     .resample_point_count(2)
//!     .build();
//!
//! let result = evaluate(&reference, &target, &config).unwrap();
//! assert!((result.value - 6.25).abs() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`series`]: the spectrum value type
//! - [`config`]: comparison configuration
//! - [`align`]: index and wavelength alignment
//! - [`interpolation`]: sorted-pairs linear interpolation
//! - [`metrics`]: MSE, RMSE and PSNR
//! - [`cube`]: read-only cube access and pixel extraction
//! - [`hyperpixel`]: per-pixel evaluation of two ROIs
//! - [`compare`]: dispatch, library ranking and reports
//! - [`import`]: loading series from CSV and JSON
//! - [`stats`]: summary statistics
//! - [`error`]: error types

pub mod align;
pub mod compare;
pub mod config;
pub mod cube;
pub mod error;
pub mod hyperpixel;
pub mod import;
pub mod interpolation;
pub mod metrics;
pub mod series;
pub mod stats;

// Re-export commonly used types
pub use align::align;
pub use compare::{ComparisonReport, LiveCube, RankedMatch, compare, rank_matches};
pub use config::{AlignmentMode, EvaluationMode, MetricConfiguration, MetricKind, PsnrPeakMode};
pub use cube::{ArrayCube, AxisRoles, CubeAccessor, CubeLayout};
pub use error::{Error, MetricError, Result};
pub use hyperpixel::{CancellationToken, evaluate_per_hyperpixel, evaluate_per_hyperpixel_with_cancel};
pub use metrics::{MetricResult, PerPixelSummary, evaluate};
pub use series::{RoiRect, Series, SeriesKind};
pub use stats::Summary;
