//! Cube command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use spectral_compare::cube::roi_mean_spectrum;
use spectral_compare::import::load_wavelengths;
use spectral_compare::{
    ArrayCube, ComparisonReport, CubeAccessor, CubeLayout, EvaluationMode, LiveCube, RoiRect,
    Series, compare,
};

use super::{MetricArgs, print_result};

/// Inputs of the cube command besides the metric flags.
pub struct CubeArgs {
    pub cube: PathBuf,
    pub layout: String,
    pub reference_roi: String,
    pub target_roi: String,
    pub wavelengths: Option<PathBuf>,
    pub per_pixel: bool,
    pub output: Option<PathBuf>,
}

/// Run the cube command.
pub fn run(args: CubeArgs, metric: &MetricArgs, verbose: bool) -> Result<()> {
    let mut config = metric.to_config()?;
    if args.per_pixel {
        config.evaluation_mode = EvaluationMode::PerHyperpixelRoi;
    }

    let layout: CubeLayout = args.layout.parse()?;
    let reference_rect: RoiRect = args
        .reference_roi
        .parse()
        .context("Invalid --reference-roi")?;
    let target_rect: RoiRect = args.target_roi.parse().context("Invalid --target-roi")?;

    let cube = ArrayCube::from_npy(&args.cube)
        .with_context(|| format!("Failed to load cube {}", args.cube.display()))?;
    if verbose {
        let (d0, d1, d2) = cube.dims();
        eprintln!("Loaded cube {} with shape ({d0}, {d1}, {d2})", args.cube.display());
    }

    let wavelengths = args
        .wavelengths
        .as_ref()
        .map(|path| {
            load_wavelengths(path).with_context(|| format!("Failed to read {}", path.display()))
        })
        .transpose()?;

    let source_label = args.cube.display().to_string();
    let roi_series = |rect: RoiRect| -> Result<Series> {
        let values = roi_mean_spectrum(&cube, layout, &rect)
            .with_context(|| format!("Cannot read ROI {rect}"))?;
        let mut series = Series::new(values)
            .with_title(format!("ROI {rect}"))
            .with_source_label(source_label.clone())
            .roi(rect)
            .from_live_cube(true);
        if let Some(wavelengths) = &wavelengths {
            series = series.with_wavelengths(wavelengths.clone());
        }
        Ok(series)
    };

    let reference = roi_series(reference_rect)?;
    let target = roi_series(target_rect)?;

    if verbose {
        eprintln!(
            "Comparing {} with {} ({} channels, {} / {}, {})",
            reference.title,
            target.title,
            reference.len(),
            config.metric,
            config.alignment,
            config.evaluation_mode
        );
    }

    let result = compare(&reference, &target, &config, Some(LiveCube::new(&cube, layout)))
        .context("Comparison failed")?;
    print_result(&result);

    if let Some(output) = args.output {
        ComparisonReport::new(&reference, &target, config, result)
            .write_json(&output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        if verbose {
            eprintln!("Wrote report to {}", output.display());
        }
    }

    Ok(())
}
