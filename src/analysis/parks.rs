//! Park rating statistics and weighted scores.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{mean, round_to, sample_std_dev};
use crate::ahp::{CriteriaSet, WeightVector};
use crate::error::AhpError;
use crate::storage::StoredParkEvaluation;
use crate::survey::DEFAULT_SCORE;

/// Decimal places of a weighted park score.
pub const SCORE_DECIMALS: i32 = 2;

/// Mean and spread of one criterion's ratings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionStats {
    /// Criterion name.
    pub criterion: String,
    /// Mean rating.
    pub mean: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
}

/// Rating statistics of one park.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParkStatistics {
    /// Park name.
    pub park: String,
    /// Number of evaluations.
    pub ratings: usize,
    /// Per-criterion statistics in criteria order.
    pub criteria: Vec<CriterionStats>,
}

impl ParkStatistics {
    /// Largest standard deviation across criteria.
    #[must_use]
    pub fn max_std_dev(&self) -> f64 {
        self.criteria
            .iter()
            .map(|c| c.std_dev)
            .fold(0.0, f64::max)
    }
}

/// Per park and criterion, mean and sample standard deviation of the
/// ratings. Parks are sorted by name.
///
/// A criterion missing from a stored evaluation counts as [`DEFAULT_SCORE`].
#[must_use]
pub fn park_statistics(
    criteria: &CriteriaSet,
    evaluations: &[StoredParkEvaluation],
) -> Vec<ParkStatistics> {
    let mut by_park: BTreeMap<&str, Vec<&StoredParkEvaluation>> = BTreeMap::new();
    for evaluation in evaluations {
        by_park
            .entry(evaluation.park.as_str())
            .or_default()
            .push(evaluation);
    }

    by_park
        .into_iter()
        .map(|(park, rows)| {
            let stats = criteria
                .iter()
                .map(|criterion| {
                    let values: Vec<f64> = rows
                        .iter()
                        .map(|r| f64::from(r.score(criterion).unwrap_or(DEFAULT_SCORE)))
                        .collect();
                    CriterionStats {
                        criterion: criterion.to_string(),
                        mean: mean(&values).unwrap_or(f64::from(DEFAULT_SCORE)),
                        std_dev: sample_std_dev(&values),
                    }
                })
                .collect();
            ParkStatistics {
                park: park.to_string(),
                ratings: rows.len(),
                criteria: stats,
            }
        })
        .collect()
}

/// A scored park.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParkScore {
    /// 1-based position, best first.
    pub rank: usize,
    /// Park name.
    pub park: String,
    /// Weighted mean rating.
    pub score: f64,
}

/// A park left out of scoring because its ratings disagree too much.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedPark {
    /// Park name.
    pub park: String,
    /// Largest criterion standard deviation.
    pub max_std_dev: f64,
}

/// Weighted park ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParkReport {
    /// Criterion weights used.
    pub weights: Vec<(String, f64)>,
    /// Scored parks, best first.
    pub scores: Vec<ParkScore>,
    /// Parks above the dispersion threshold.
    pub excluded: Vec<ExcludedPark>,
}

/// Score parks as Σ mean[c]·w[c], skipping those whose largest criterion
/// standard deviation exceeds `outlier_threshold`.
///
/// Scores are rounded to [`SCORE_DECIMALS`] and ranked descending; ties
/// keep name order.
///
/// # Errors
///
/// Returns [`AhpError::DimensionMismatch`] if `weights` does not match
/// `criteria`.
pub fn score_parks(
    criteria: &CriteriaSet,
    statistics: &[ParkStatistics],
    weights: &WeightVector,
    outlier_threshold: f64,
) -> Result<ParkReport, AhpError> {
    if weights.len() != criteria.len() {
        return Err(AhpError::DimensionMismatch {
            expected: criteria.len(),
            found: weights.len(),
        });
    }

    let mut scored = Vec::with_capacity(statistics.len());
    let mut excluded = Vec::new();

    for stats in statistics {
        let spread = stats.max_std_dev();
        if spread > outlier_threshold {
            tracing::warn!(
                park = %stats.park,
                max_std_dev = spread,
                threshold = outlier_threshold,
                "Excluding park with dispersed ratings"
            );
            excluded.push(ExcludedPark {
                park: stats.park.clone(),
                max_std_dev: spread,
            });
            continue;
        }

        let score: f64 = stats
            .criteria
            .iter()
            .zip(weights.as_slice())
            .map(|(c, w)| c.mean * w)
            .sum();
        scored.push((stats.park.clone(), round_to(score, SCORE_DECIMALS)));
    }

    // Stable sort keeps the name order of `statistics` among equal scores
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(ParkReport {
        weights: weights.labelled(criteria),
        scores: scored
            .into_iter()
            .enumerate()
            .map(|(i, (park, score))| ParkScore {
                rank: i + 1,
                park,
                score,
            })
            .collect(),
        excluded,
    })
}
