//! Compare command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use spectral_compare::import::load_series;
use spectral_compare::{ComparisonReport, compare};

use super::{MetricArgs, print_result};

/// Run the compare command.
pub fn run(
    reference: PathBuf,
    target: PathBuf,
    metric: &MetricArgs,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let config = metric.to_config()?;

    let reference_series = load_series(&reference)
        .with_context(|| format!("Failed to load {}", reference.display()))?;
    let target_series =
        load_series(&target).with_context(|| format!("Failed to load {}", target.display()))?;

    if verbose {
        eprintln!(
            "Comparing '{}' ({} values) with '{}' ({} values) using {} / {}",
            reference_series.display_name(),
            reference_series.len(),
            target_series.display_name(),
            target_series.len(),
            config.metric,
            config.alignment
        );
    }

    let result = compare(&reference_series, &target_series, &config, None)
        .context("Comparison failed")?;
    print_result(&result);

    if let Some(output) = output {
        ComparisonReport::new(&reference_series, &target_series, config, result)
            .write_json(&output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        if verbose {
            eprintln!("Wrote report to {}", output.display());
        }
    }

    Ok(())
}
