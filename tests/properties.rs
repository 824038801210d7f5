//! End-to-end properties of the public comparison API.

use spectral_compare::{
    AlignmentMode, ArrayCube, CubeLayout, EvaluationMode, LiveCube, MetricConfiguration,
    MetricError, MetricKind, PsnrPeakMode, RoiRect, Series, compare, evaluate,
};

const METRICS: [MetricKind; 3] = [MetricKind::Mse, MetricKind::Rmse, MetricKind::Psnr];
const ALIGNMENTS: [AlignmentMode; 2] = [AlignmentMode::ByIndex, AlignmentMode::ByWavelength];

fn config(metric: MetricKind, alignment: AlignmentMode) -> MetricConfiguration {
    MetricConfiguration::builder()
        .metric(metric)
        .alignment(alignment)
        .resample_point_count(16)
        .build()
}

fn leaf() -> Series {
    Series::new(vec![0.12, 0.18, 0.45, 0.52, 0.49])
        .with_wavelengths(vec![450.0, 500.0, 550.0, 600.0, 650.0])
}

fn soil() -> Series {
    Series::new(vec![0.21, 0.24, 0.28, 0.31, 0.35, 0.36])
        .with_wavelengths(vec![420.0, 480.0, 540.0, 600.0, 660.0, 720.0])
}

/// 2x4 cube with two channels, stored HWC. Channel values of pixel `(x, y)`
/// are `[x, x]` except column 1, which holds `[2, 2]`.
fn live_cube() -> ArrayCube {
    let mut values = Vec::new();
    for _y in 0..2 {
        for x in 0..4 {
            let v = if x == 1 { 2.0 } else { x as f64 };
            values.extend([v, v]);
        }
    }
    ArrayCube::from_shape_vec((2, 4, 2), values).unwrap()
}

fn live_roi(rect: RoiRect) -> Series {
    Series::new(vec![0.0, 0.0]).roi(rect).from_live_cube(true)
}

#[test]
fn symmetric_for_every_metric_and_alignment() {
    for metric in METRICS {
        for alignment in ALIGNMENTS {
            let config = config(metric, alignment);
            let forward = evaluate(&leaf(), &soil(), &config).unwrap();
            let backward = evaluate(&soil(), &leaf(), &config).unwrap();
            assert!(
                (forward.value - backward.value).abs() < 1e-9,
                "{metric} / {alignment}: {} vs {}",
                forward.value,
                backward.value
            );
            assert_eq!(forward.sample_count, backward.sample_count);
        }
    }
}

#[test]
fn identical_series_have_zero_distance() {
    for alignment in ALIGNMENTS {
        let mse = evaluate(&leaf(), &leaf(), &config(MetricKind::Mse, alignment)).unwrap();
        assert!(mse.value.abs() < 1e-12, "{alignment}: {}", mse.value);

        let rmse = evaluate(&leaf(), &leaf(), &config(MetricKind::Rmse, alignment)).unwrap();
        assert!(rmse.value.abs() < 1e-6, "{alignment}: {}", rmse.value);

        let psnr = evaluate(&leaf(), &leaf(), &config(MetricKind::Psnr, alignment)).unwrap();
        assert_eq!(psnr.value, f64::INFINITY);
    }
}

#[test]
fn index_alignment_truncates_to_shorter() {
    let reference = Series::new(vec![1.0, 2.0, 3.0, 4.0]);
    let target = Series::new(vec![1.0, 2.0]);
    let result = evaluate(&reference, &target, &MetricConfiguration::default()).unwrap();
    assert_eq!(result.sample_count, 2);
    assert_eq!(result.value, 0.0);
}

#[test]
fn wavelength_overlap_resamples_common_range() {
    let reference = Series::new(vec![1.0, 2.0, 3.0]).with_wavelengths(vec![400.0, 500.0, 600.0]);
    let target = Series::new(vec![4.0, 5.0, 6.0]).with_wavelengths(vec![450.0, 550.0, 650.0]);
    let config = MetricConfiguration::builder()
        .alignment(AlignmentMode::ByWavelength)
        .resample_point_count(2)
        .build();

    let result = evaluate(&reference, &target, &config).unwrap();
    assert!((result.value - 6.25).abs() < 1e-12);
    assert_eq!(result.sample_count, 2);
}

#[test]
fn disjoint_wavelength_ranges_fail() {
    let reference = Series::new(vec![1.0, 2.0]).with_wavelengths(vec![400.0, 500.0]);
    let target = Series::new(vec![1.0, 2.0]).with_wavelengths(vec![600.0, 700.0]);
    let config = config(MetricKind::Mse, AlignmentMode::ByWavelength);
    assert_eq!(
        evaluate(&reference, &target, &config).unwrap_err(),
        MetricError::NoOverlap
    );
}

#[test]
fn custom_peak_must_be_positive_and_finite() {
    for peak in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let config = MetricConfiguration::builder()
            .metric(MetricKind::Psnr)
            .psnr_peak_mode(PsnrPeakMode::Custom(peak))
            .build();
        assert_eq!(
            evaluate(&leaf(), &soil(), &config).unwrap_err(),
            MetricError::InvalidPsnrPeak
        );
    }

    let config = MetricConfiguration::builder()
        .metric(MetricKind::Psnr)
        .psnr_peak_mode(PsnrPeakMode::Custom(2.0))
        .build();
    let result = evaluate(&leaf(), &soil(), &config).unwrap();
    assert_eq!(result.psnr_peak_used, Some(2.0));
}

#[test]
fn flat_data_uses_fallback_peak() {
    let config = MetricConfiguration::builder().metric(MetricKind::Psnr).build();

    // All zeros against all zeros: identical, and the peak falls back to 1.
    let zeros = Series::new(vec![0.0, 0.0]);
    let result = evaluate(&zeros, &zeros, &config).unwrap();
    assert_eq!(result.psnr_peak_used, Some(1.0));
    assert_eq!(result.value, f64::INFINITY);

    // Constant data: peak is the magnitude.
    let flat = Series::new(vec![-3.0, -3.0]);
    let result = evaluate(&flat, &flat, &config).unwrap();
    assert_eq!(result.psnr_peak_used, Some(3.0));
}

#[test]
fn per_pixel_checks_preconditions_in_order() {
    let per_pixel = MetricConfiguration::default().with_evaluation_mode(EvaluationMode::PerHyperpixelRoi);
    let cube = live_cube();
    let live = Some(LiveCube::new(&cube, CubeLayout::Hwc));

    let point = Series::new(vec![1.0, 2.0]);
    let a = live_roi(RoiRect::new(0, 0, 1, 1));
    assert_eq!(
        compare(&point, &a, &per_pixel, live),
        Err(MetricError::PerPixelRequiresRoi)
    );

    let cached = Series::new(vec![1.0, 2.0]).roi(RoiRect::new(0, 0, 1, 1));
    assert_eq!(
        compare(&a, &cached, &per_pixel, live),
        Err(MetricError::PerPixelCurrentCubeOnly)
    );

    let wide = live_roi(RoiRect::new(0, 0, 2, 1));
    assert_eq!(
        compare(&a, &wide, &per_pixel, live),
        Err(MetricError::RoiSpatialMismatch)
    );

    let outside = live_roi(RoiRect::new(3, 1, 1, 2));
    let tall = live_roi(RoiRect::new(0, 0, 1, 2));
    assert_eq!(
        compare(&tall, &outside, &per_pixel, live),
        Err(MetricError::RoiDataUnavailable)
    );
}

#[test]
fn per_pixel_reduces_to_summary() {
    let per_pixel = MetricConfiguration::default().with_evaluation_mode(EvaluationMode::PerHyperpixelRoi);
    let cube = live_cube();

    // Pixels (0,0),(1,0) hold 0 and 2; (2,0),(3,0) hold 2 and 3.
    // Per-pixel MSE is 4 and 1.
    let reference = live_roi(RoiRect::new(0, 0, 2, 1));
    let target = live_roi(RoiRect::new(2, 0, 2, 1));
    let result = compare(
        &reference,
        &target,
        &per_pixel,
        Some(LiveCube::new(&cube, CubeLayout::Hwc)),
    )
    .unwrap();
    let summary = result.per_pixel_summary.unwrap();
    assert_eq!(summary.pixel_count, 2.0);
    assert_eq!(summary.min_value, 1.0);
    assert_eq!(summary.max_value, 4.0);
    assert_eq!(summary.mean_value, 2.5);
    assert_eq!(result.value, 2.5);

    // Pixels (0,0),(1,0) against (1,0),(2,0): values 0,2 vs 2,2, MSE 4 and 0.
    let target = live_roi(RoiRect::new(1, 0, 2, 1));
    let result = compare(
        &reference,
        &target,
        &per_pixel,
        Some(LiveCube::new(&cube, CubeLayout::Hwc)),
    )
    .unwrap();
    let summary = result.per_pixel_summary.unwrap();
    assert_eq!(
        (summary.pixel_count, summary.min_value, summary.max_value, summary.mean_value),
        (2.0, 0.0, 4.0, 2.0)
    );
}
