//! Error types for spectral comparison.
//!
//! [`MetricError`] is the closed set of reasons a comparison can fail. It is
//! what the engine functions ([`crate::align`], [`crate::metrics::evaluate`],
//! [`crate::hyperpixel`]) return. [`Error`] wraps it together with the I/O
//! and parsing failures of the surrounding helpers (series import, cube
//! loading, report writing).

use thiserror::Error;

/// Result type alias for spectral-compare operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a spectral comparison can fail.
///
/// Every variant is fatal to the call that produced it. The engine never
/// recovers from one internally and never returns partial results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MetricError {
    /// No comparable samples remained (empty input or everything non-finite).
    #[error("No comparable data: the series are empty or contain no finite values")]
    EmptyData,

    /// Wavelength alignment was requested but a series has no usable wavelengths.
    #[error("Wavelength alignment requires both series to carry at least two finite wavelengths")]
    RequiresWavelengths,

    /// The wavelength ranges of the two series do not overlap.
    #[error("The wavelength ranges of the two series do not overlap")]
    NoOverlap,

    /// A custom PSNR peak must be finite and strictly positive.
    #[error("PSNR peak must be a finite value greater than zero")]
    InvalidPsnrPeak,

    /// Per-hyperpixel evaluation needs two region-of-interest samples.
    #[error("Per-hyperpixel evaluation requires two region-of-interest samples")]
    PerPixelRequiresRoi,

    /// Per-hyperpixel evaluation only works on samples of the loaded cube.
    #[error("Per-hyperpixel evaluation is only available for samples taken from the current cube")]
    PerPixelCurrentCubeOnly,

    /// The two ROI rectangles differ in width or height.
    #[error("ROI rectangles must have the same width and height")]
    RoiSpatialMismatch,

    /// ROI pixels could not be read from the cube.
    #[error("ROI pixel data is unavailable (missing rectangle, out of bounds, or no channels)")]
    RoiDataUnavailable,

    /// The caller cancelled a long-running evaluation.
    #[error("Evaluation was cancelled")]
    Cancelled,
}

/// Errors from the library as a whole, including I/O around the engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Comparison failure.
    #[error(transparent)]
    Metric(#[from] MetricError),

    /// Failed to parse a series file.
    #[error("Series import error at line {line}: {reason}")]
    SeriesImport {
        /// Line number where the error occurred (1-based, header is line 1).
        line: usize,
        /// Reason for the failure.
        reason: String,
    },

    /// Failed to load or interpret a hyperspectral cube.
    #[error("Cube error: {0}")]
    Cube(String),

    /// A name or value supplied by the caller could not be understood.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_error_converts() {
        let err: Error = MetricError::NoOverlap.into();
        assert!(matches!(err, Error::Metric(MetricError::NoOverlap)));
        assert_eq!(
            err.to_string(),
            "The wavelength ranges of the two series do not overlap"
        );
    }

    #[test]
    fn test_series_import_message() {
        let err = Error::SeriesImport {
            line: 4,
            reason: "bad value".to_string(),
        };
        assert_eq!(err.to_string(), "Series import error at line 4: bad value");
    }
}
