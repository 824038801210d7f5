//! Subcommands and the metric flags they share.

pub mod compare;
pub mod cube;
pub mod rank;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use spectral_compare::{MetricConfiguration, MetricResult, PsnrPeakMode};

/// Metric selection flags.
#[derive(Args, Debug, Default)]
pub struct MetricArgs {
    /// Metric to compute (mse, rmse, psnr)
    #[arg(long)]
    pub metric: Option<String>,

    /// Alignment mode (index, wavelength)
    #[arg(long)]
    pub alignment: Option<String>,

    /// Resample points for wavelength alignment (2-4096)
    #[arg(long)]
    pub points: Option<usize>,

    /// Custom PSNR peak (default: derived from the data range)
    #[arg(long)]
    pub peak: Option<f64>,

    /// JSON configuration file; other flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl MetricArgs {
    /// Build a configuration from the config file (if any) and flags.
    pub fn to_config(&self) -> Result<MetricConfiguration> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => MetricConfiguration::default(),
        };

        if let Some(metric) = &self.metric {
            config.metric = metric.parse()?;
        }
        if let Some(alignment) = &self.alignment {
            config.alignment = alignment.parse()?;
        }
        if let Some(points) = self.points {
            config.resample_point_count = points;
        }
        if let Some(peak) = self.peak {
            config.psnr_peak_mode = PsnrPeakMode::Custom(peak);
        }
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<MetricConfiguration> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as a metric configuration", path.display()))
}

/// Print a result in human-readable form.
pub fn print_result(result: &MetricResult) {
    println!("{result}");
    if let Some(peak) = result.psnr_peak_used {
        println!("  PSNR peak: {peak}");
    }
    if let Some(summary) = &result.per_pixel_summary {
        println!("  Pixels:    {}", summary.pixel_count);
        println!("  Min:       {:.6}", summary.min_value);
        println!("  Max:       {:.6}", summary.max_value);
        println!("  Mean:      {:.6}", summary.mean_value);
        println!("  Median:    {:.6}", summary.median_value);
        println!("  Std dev:   {:.6}", summary.std_dev);
    }
}
