//! PSNR peak resolution and conversion from RMSE.

use crate::config::PsnrPeakMode;
use crate::error::MetricError;

/// Resolve the PSNR peak for two aligned vectors.
///
/// With [`PsnrPeakMode::DataRange`] the peak is the range of both vectors
/// taken together. Flat data falls back to the largest magnitude, and
/// all-zero data to `1.0`. The computation treats `lhs` and `rhs`
/// identically, so swapping them never changes the peak.
pub fn resolve_psnr_peak(lhs: &[f64], rhs: &[f64], mode: PsnrPeakMode) -> Result<f64, MetricError> {
    match mode {
        PsnrPeakMode::Custom(peak) => {
            if peak.is_finite() && peak > 0.0 {
                Ok(peak)
            } else {
                Err(MetricError::InvalidPsnrPeak)
            }
        }
        PsnrPeakMode::DataRange => Ok(data_range_peak(lhs, rhs)),
    }
}

fn data_range_peak(lhs: &[f64], rhs: &[f64]) -> f64 {
    let (min, max) = lhs
        .iter()
        .chain(rhs)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let range = max - min;
    if range > 0.0 {
        return range;
    }

    let abs_max = max.abs().max(min.abs());
    if abs_max > 0.0 && abs_max.is_finite() {
        abs_max
    } else {
        1.0
    }
}

/// PSNR in dB from a peak and an RMSE.
///
/// Zero RMSE means identical data and yields `+inf`.
#[must_use]
pub fn psnr_from_rmse(peak: f64, rmse: f64) -> f64 {
    if rmse == 0.0 {
        f64::INFINITY
    } else {
        20.0 * (peak / rmse).log10()
    }
}
