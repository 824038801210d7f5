//! Report types for comparison results.
//!
//! A [`ComparisonReport`] records one comparison together with the inputs
//! that produced it and can be written as JSON. Library rankings are written
//! as CSV with [`write_ranking_csv`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compare::RankedMatch;
use crate::config::MetricConfiguration;
use crate::error::Result;
use crate::metrics::MetricResult;
use crate::series::{RoiRect, Series, SeriesKind};

/// Identity of one compared series, without its data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesInfo {
    /// Display title.
    pub title: String,
    /// Provenance label.
    pub source_label: String,
    /// Kind of sample.
    pub kind: SeriesKind,
    /// Number of intensity values.
    pub channels: usize,
    /// Whether calibrated wavelengths were attached.
    pub has_wavelengths: bool,
    /// Sampled rectangle, for ROI series.
    pub roi_rect: Option<RoiRect>,
}

impl From<&Series> for SeriesInfo {
    fn from(series: &Series) -> Self {
        Self {
            title: series.title.clone(),
            source_label: series.source_label.clone(),
            kind: series.kind,
            channels: series.len(),
            has_wavelengths: series.has_wavelengths(),
            roi_rect: series.roi_rect,
        }
    }
}

/// One comparison and the inputs that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Reference series.
    pub reference: SeriesInfo,
    /// Target series.
    pub target: SeriesInfo,
    /// Configuration used.
    pub config: MetricConfiguration,
    /// Computed result.
    pub result: MetricResult,
    /// When this report was generated.
    #[serde(with = "chrono_serde")]
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ComparisonReport {
    /// Create a report stamped with the current time.
    #[must_use]
    pub fn new(
        reference: &Series,
        target: &Series,
        config: MetricConfiguration,
        result: MetricResult,
    ) -> Self {
        Self {
            reference: reference.into(),
            target: target.into(),
            config,
            result,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Write a library ranking as CSV, best match first.
pub fn write_ranking_csv(
    path: impl AsRef<Path>,
    reference_title: &str,
    matches: &[RankedMatch],
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "rank",
        "reference",
        "candidate",
        "metric",
        "value",
        "samples",
        "psnr_peak",
        "error",
    ])?;

    for (rank, m) in matches.iter().enumerate() {
        let (metric, value, samples, peak, error) = match &m.outcome {
            Ok(result) => (
                result.metric.to_string(),
                format!("{:.6}", result.value),
                result.sample_count.to_string(),
                result.psnr_peak_used.map_or(String::new(), |p| p.to_string()),
                String::new(),
            ),
            Err(e) => (
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                e.to_string(),
            ),
        };
        wtr.write_record([
            (rank + 1).to_string(),
            reference_title.to_string(),
            m.title.clone(),
            metric,
            value,
            samples,
            peak,
            error,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

mod chrono_serde {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        dt.to_rfc3339().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
