//! Alignment of two series into equal-length comparable vectors.
//!
//! - [`AlignmentMode::ByIndex`] pairs values channel by channel.
//! - [`AlignmentMode::ByWavelength`] resamples both spectra on an evenly
//!   spaced grid across their common wavelength range.
//!
//! Non-finite samples never reach the metric: any pair with a NaN or
//! infinite component is dropped here.

use crate::config::{AlignmentMode, MetricConfiguration};
use crate::error::MetricError;
use crate::interpolation::{SortedPairs, linspace};
use crate::series::Series;

/// Two equal-length vectors ready for comparison.
pub type Aligned = (Vec<f64>, Vec<f64>);

/// Align `reference` and `target` according to `config.alignment`.
pub fn align(
    reference: &Series,
    target: &Series,
    config: &MetricConfiguration,
) -> Result<Aligned, MetricError> {
    match config.alignment {
        AlignmentMode::ByIndex => align_by_index(&reference.values, &target.values),
        AlignmentMode::ByWavelength => {
            align_by_wavelength(reference, target, config.effective_resample_points())
        }
    }
}

/// Pair values by index over the shorter length, keeping finite pairs.
pub fn align_by_index(lhs: &[f64], rhs: &[f64]) -> Result<Aligned, MetricError> {
    let n = lhs.len().min(rhs.len());
    if n == 0 {
        return Err(MetricError::EmptyData);
    }

    let (left, right): (Vec<f64>, Vec<f64>) = lhs[..n]
        .iter()
        .zip(&rhs[..n])
        .filter(|(l, r)| l.is_finite() && r.is_finite())
        .map(|(l, r)| (*l, *r))
        .unzip();

    if left.is_empty() {
        return Err(MetricError::EmptyData);
    }
    log::trace!("index alignment dropped {} non-finite pairs", n - left.len());
    log::debug!("index alignment: {} of {} pairs kept", left.len(), n);

    Ok((left, right))
}

/// Resample both series over their wavelength overlap.
fn align_by_wavelength(
    reference: &Series,
    target: &Series,
    sample_count: usize,
) -> Result<Aligned, MetricError> {
    let left = wavelength_pairs(reference).ok_or(MetricError::RequiresWavelengths)?;
    let right = wavelength_pairs(target).ok_or(MetricError::RequiresWavelengths)?;

    let (Some(left_min), Some(left_max), Some(right_min), Some(right_max)) =
        (left.first_x(), left.last_x(), right.first_x(), right.last_x())
    else {
        return Err(MetricError::RequiresWavelengths);
    };

    let overlap_min = left_min.max(right_min);
    let overlap_max = left_max.min(right_max);
    if overlap_max <= overlap_min {
        return Err(MetricError::NoOverlap);
    }

    let grid = linspace(overlap_min, overlap_max, sample_count);
    let (lhs, rhs): (Vec<f64>, Vec<f64>) = grid
        .iter()
        .filter_map(|&x| {
            let l = left.at(x)?;
            let r = right.at(x)?;
            (l.is_finite() && r.is_finite()).then_some((l, r))
        })
        .unzip();

    if lhs.is_empty() {
        return Err(MetricError::NoOverlap);
    }
    log::debug!(
        "wavelength alignment: {} samples over [{}, {}]",
        lhs.len(),
        overlap_min,
        overlap_max
    );

    Ok((lhs, rhs))
}

/// Finite `(wavelength, value)` pairs sorted by wavelength.
///
/// `None` when the series has no wavelengths or fewer than two usable pairs.
fn wavelength_pairs(series: &Series) -> Option<SortedPairs> {
    let wavelengths = series.wavelengths.as_ref()?;
    let pairs: Vec<(f64, f64)> = wavelengths
        .iter()
        .zip(&series.values)
        .filter(|(w, v)| w.is_finite() && v.is_finite())
        .map(|(w, v)| (*w, *v))
        .collect();

    if pairs.len() <= 1 {
        log::trace!(
            "series '{}' has {} usable wavelength pairs",
            series.display_name(),
            pairs.len()
        );
        return None;
    }
    Some(SortedPairs::from_unsorted(pairs))
}
