//! Per-hyperpixel evaluation of two ROI samples.
//!
//! Instead of comparing the averaged spectra of two regions, this mode
//! compares every pixel of the reference rectangle with the pixel at the
//! same offset in the target rectangle and summarizes the resulting metric
//! values. Both samples must come from the currently loaded cube, because
//! only its per-pixel data is addressable.
//!
//! Work is `O(pixels × channels)`. Large ROIs can hold tens of thousands of
//! pixels, so [`evaluate_per_hyperpixel_with_cancel`] accepts a
//! [`CancellationToken`] that is polled every [`CANCEL_CHECK_INTERVAL`]
//! pixels.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{EvaluationMode, MetricConfiguration};
use crate::cube::{CubeAccessor, CubeLayout, SpectrumReader};
use crate::error::MetricError;
use crate::metrics::{MetricResult, PerPixelSummary, evaluate};
use crate::series::{RoiRect, Series, SeriesKind};
use crate::stats::Summary;

/// Pixels evaluated between cancellation checks.
pub const CANCEL_CHECK_INTERVAL: usize = 256;

/// Shared flag for stopping a running evaluation from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Check the ordered preconditions and return both rectangles.
///
/// The first failing check wins: ROI kind, live cube, rectangle present,
/// matching size.
pub fn check_preconditions(
    reference: &Series,
    target: &Series,
) -> Result<(RoiRect, RoiRect), MetricError> {
    if reference.kind != SeriesKind::RegionOfInterest || target.kind != SeriesKind::RegionOfInterest
    {
        return Err(MetricError::PerPixelRequiresRoi);
    }
    if !reference.is_from_live_cube || !target.is_from_live_cube {
        return Err(MetricError::PerPixelCurrentCubeOnly);
    }
    let (Some(reference_rect), Some(target_rect)) = (reference.roi_rect, target.roi_rect) else {
        return Err(MetricError::RoiDataUnavailable);
    };
    if !reference_rect.same_size(&target_rect) {
        return Err(MetricError::RoiSpatialMismatch);
    }
    Ok((reference_rect, target_rect))
}

/// Evaluate every pixel pair of two equally sized ROIs.
pub fn evaluate_per_hyperpixel<C: CubeAccessor + ?Sized>(
    reference: &Series,
    target: &Series,
    config: &MetricConfiguration,
    cube: &C,
    layout: CubeLayout,
) -> Result<MetricResult, MetricError> {
    evaluate_per_hyperpixel_with_cancel(
        reference,
        target,
        config,
        cube,
        layout,
        &CancellationToken::new(),
    )
}

/// [`evaluate_per_hyperpixel`] with cooperative cancellation.
///
/// The result's `value` is the mean per-pixel value, `sample_count` comes
/// from the last pixel evaluated, and `psnr_peak_used` is set only for a
/// custom peak, since data-range peaks differ from pixel to pixel.
pub fn evaluate_per_hyperpixel_with_cancel<C: CubeAccessor + ?Sized>(
    reference: &Series,
    target: &Series,
    config: &MetricConfiguration,
    cube: &C,
    layout: CubeLayout,
    cancel: &CancellationToken,
) -> Result<MetricResult, MetricError> {
    let (reference_rect, target_rect) = check_preconditions(reference, target)?;

    let reader = SpectrumReader::new(cube, layout)?;
    reader.check_rect(&reference_rect)?;
    reader.check_rect(&target_rect)?;

    let pixel_count = reference_rect.pixel_count();
    if pixel_count == 0 || pixel_count != target_rect.pixel_count() {
        return Err(MetricError::RoiDataUnavailable);
    }
    log::debug!(
        "per-hyperpixel {}: {} pixels x {} channels",
        config.metric,
        pixel_count,
        reader.channels()
    );

    let pixel_config = config.with_evaluation_mode(EvaluationMode::AveragedSpectrum);
    let mut values = Vec::with_capacity(pixel_count);
    let mut last_sample_count = 0;

    for (i, ((rx, ry), (tx, ty))) in reference_rect.pixels().zip(target_rect.pixels()).enumerate() {
        if i % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
            log::info!("per-hyperpixel evaluation cancelled after {i} of {pixel_count} pixels");
            return Err(MetricError::Cancelled);
        }

        let reference_pixel = pixel_series(reference, reader.spectrum(rx, ry));
        let target_pixel = pixel_series(target, reader.spectrum(tx, ty));
        let result = evaluate(&reference_pixel, &target_pixel, &pixel_config)?;

        last_sample_count = result.sample_count;
        values.push(result.value);
    }

    let summary = Summary::compute(&values).ok_or(MetricError::EmptyData)?;

    Ok(MetricResult {
        metric: config.metric,
        value: summary.mean,
        sample_count: last_sample_count,
        psnr_peak_used: config.psnr_peak_mode.custom_peak(),
        per_pixel_summary: Some(PerPixelSummary::from(&summary)),
    })
}

/// Single-pixel series carrying the wavelengths of the ROI it came from.
fn pixel_series(source: &Series, values: Vec<f64>) -> Series {
    Series {
        values,
        wavelengths: source.wavelengths.clone(),
        title: source.title.clone(),
        source_label: source.source_label.clone(),
        kind: SeriesKind::Point,
        roi_rect: None,
        is_from_live_cube: true,
    }
}
