//! Entry points that pick the right evaluation for a configuration.
//!
//! - [`compare`]: one reference against one target, averaged or per-hyperpixel
//! - [`rank_matches`]: one reference against a library of candidates
//! - [`report`]: serializable reports of comparisons and rankings

pub mod report;

use rayon::prelude::*;

use crate::config::{EvaluationMode, MetricConfiguration};
use crate::cube::{CubeAccessor, CubeLayout};
use crate::error::MetricError;
use crate::hyperpixel::{check_preconditions, evaluate_per_hyperpixel};
use crate::metrics::{MetricResult, evaluate};
use crate::series::Series;

pub use report::{ComparisonReport, write_ranking_csv};

/// A loaded cube together with the layout to read it with.
#[derive(Clone, Copy)]
pub struct LiveCube<'a> {
    /// Cube storage.
    pub accessor: &'a dyn CubeAccessor,
    /// Memory layout used to find the channel axis.
    pub layout: CubeLayout,
}

impl<'a> LiveCube<'a> {
    /// Pair a cube with a layout.
    #[must_use]
    pub fn new(accessor: &'a dyn CubeAccessor, layout: CubeLayout) -> Self {
        Self { accessor, layout }
    }
}

/// Compare two series according to `config.evaluation_mode`.
///
/// Per-hyperpixel evaluation needs the live cube. Without one, the ROI
/// precondition is still checked first, and any pair of ROI samples then
/// fails with `PerPixelCurrentCubeOnly`.
pub fn compare(
    reference: &Series,
    target: &Series,
    config: &MetricConfiguration,
    cube: Option<LiveCube<'_>>,
) -> Result<MetricResult, MetricError> {
    match config.evaluation_mode {
        EvaluationMode::AveragedSpectrum => evaluate(reference, target, config),
        EvaluationMode::PerHyperpixelRoi => match cube {
            Some(cube) => {
                evaluate_per_hyperpixel(reference, target, config, cube.accessor, cube.layout)
            }
            None => {
                check_preconditions(reference, target)?;
                Err(MetricError::PerPixelCurrentCubeOnly)
            }
        },
    }
}

/// Outcome of comparing the reference with one library candidate.
#[derive(Debug, Clone)]
pub struct RankedMatch {
    /// Position of the candidate in the input slice.
    pub index: usize,
    /// Candidate title (or source label).
    pub title: String,
    /// Metric result, or why the candidate could not be compared.
    pub outcome: Result<MetricResult, MetricError>,
}

/// Compare `reference` with every candidate and order best-first.
///
/// Candidates are evaluated in parallel in averaged mode, whatever
/// `config.evaluation_mode` says. Successful comparisons come first, most
/// similar first; failures follow in input order.
pub fn rank_matches(
    reference: &Series,
    candidates: &[Series],
    config: &MetricConfiguration,
) -> Vec<RankedMatch> {
    let config = config.with_evaluation_mode(EvaluationMode::AveragedSpectrum);

    let mut matches: Vec<RankedMatch> = candidates
        .par_iter()
        .enumerate()
        .map(|(index, candidate)| RankedMatch {
            index,
            title: candidate.display_name().to_string(),
            outcome: evaluate(reference, candidate, &config),
        })
        .collect();

    matches.sort_by(|a, b| match (&a.outcome, &b.outcome) {
        (Ok(ra), Ok(rb)) => ra.similarity_cmp(rb).then(a.index.cmp(&b.index)),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.index.cmp(&b.index),
    });

    let failures = matches.iter().filter(|m| m.outcome.is_err()).count();
    log::debug!(
        "ranked {} candidates against '{}' ({} failed)",
        matches.len(),
        reference.display_name(),
        failures
    );

    matches
}
