//! Round-table weight statistics.
//!
//! Mean weights per table, and a one-way ANOVA per criterion testing whether
//! the tables weigh it differently.

use std::collections::BTreeMap;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

use crate::ahp::{mean_weights, CriteriaSet, WeightVector};
use crate::error::{AhpError, AnalysisError};
use crate::storage::StoredAhpSubmission;

/// p-value below which round tables are reported as different.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Mean stored weights of one round table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableWeights {
    /// Round table name.
    pub round_table: String,
    /// Submissions averaged.
    pub respondents: usize,
    /// Mean weight per criterion, in criteria order.
    pub weights: Vec<(String, f64)>,
}

/// Outcome of a one-way analysis of variance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnovaResult {
    /// Ratio of between-group to within-group mean squares.
    pub f_statistic: f64,
    /// Upper tail probability of `f_statistic` under F(`df_between`, `df_within`).
    pub p_value: f64,
    /// Groups minus one.
    pub df_between: usize,
    /// Observations minus groups.
    pub df_within: usize,
}

impl AnovaResult {
    /// Whether the group means differ at `alpha`.
    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// ANOVA of one criterion's weights across round tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionAnova {
    /// Criterion name.
    pub criterion: String,
    /// Test outcome.
    #[serde(flatten)]
    pub result: AnovaResult,
    /// `p_value` is below [`SIGNIFICANCE_LEVEL`].
    pub significant: bool,
}

/// Per-criterion ANOVA across round tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableAnova {
    /// Round tables compared, sorted by name.
    pub round_tables: Vec<String>,
    /// Submissions used.
    pub respondents: usize,
    /// One test per criterion, in criteria order.
    pub criteria: Vec<CriterionAnova>,
}

/// Stored weight vectors over `criteria`, grouped by round table.
fn weights_by_table<'a>(
    criteria: &CriteriaSet,
    submissions: &'a [StoredAhpSubmission],
) -> BTreeMap<&'a str, Vec<&'a WeightVector>> {
    let mut groups: BTreeMap<&str, Vec<&WeightVector>> = BTreeMap::new();

    for submission in submissions {
        if &submission.criteria != criteria {
            tracing::warn!(
                submission = %submission.id,
                "Skipping submission over a different criteria set"
            );
            continue;
        }
        groups
            .entry(submission.round_table.as_str())
            .or_default()
            .push(&submission.weights);
    }

    groups
}

/// Mean stored weight per criterion, grouped by round table (sorted by name).
///
/// Submissions over a different criteria set are skipped.
///
/// # Errors
///
/// Returns [`AhpError::DimensionMismatch`] if a stored weight vector does
/// not match its own criteria.
pub fn mean_weights_by_table(
    criteria: &CriteriaSet,
    submissions: &[StoredAhpSubmission],
) -> Result<Vec<TableWeights>, AhpError> {
    weights_by_table(criteria, submissions)
        .into_iter()
        .map(|(table, vectors)| {
            let vectors: Vec<WeightVector> = vectors.into_iter().cloned().collect();
            let mean = mean_weights(&vectors)?;
            Ok(TableWeights {
                round_table: table.to_string(),
                respondents: vectors.len(),
                weights: mean.labelled(criteria),
            })
        })
        .collect()
}

/// One-way ANOVA of each criterion's stored weights across round tables.
///
/// Submissions over a different criteria set, or with a weight vector of the
/// wrong length, are skipped.
///
/// # Errors
///
/// Returns [`AnalysisError::TooFewGroups`] with fewer than two round tables,
/// [`AnalysisError::TooFewObservations`] if a table has a single submission
/// and [`AnalysisError::NoWithinGroupVariance`] if every table answered a
/// criterion identically.
pub fn anova_by_table(
    criteria: &CriteriaSet,
    submissions: &[StoredAhpSubmission],
) -> Result<TableAnova, AnalysisError> {
    let groups: Vec<(&str, Vec<&WeightVector>)> = weights_by_table(criteria, submissions)
        .into_iter()
        .map(|(table, vectors)| {
            let valid = vectors
                .into_iter()
                .filter(|w| {
                    let ok = w.len() == criteria.len();
                    if !ok {
                        tracing::warn!(round_table = table, "Skipping malformed weight vector");
                    }
                    ok
                })
                .collect();
            (table, valid)
        })
        .collect();

    let results = criteria
        .iter()
        .enumerate()
        .map(|(c, name)| {
            let samples: Vec<(&str, Vec<f64>)> = groups
                .iter()
                .map(|(table, vectors)| {
                    (*table, vectors.iter().map(|w| w.as_slice()[c]).collect())
                })
                .collect();
            let result = one_way_anova(name, &samples)?;
            Ok(CriterionAnova {
                criterion: name.to_string(),
                significant: result.is_significant(SIGNIFICANCE_LEVEL),
                result,
            })
        })
        .collect::<Result<Vec<_>, AnalysisError>>()?;

    Ok(TableAnova {
        round_tables: groups.iter().map(|(t, _)| (*t).to_string()).collect(),
        respondents: groups.iter().map(|(_, v)| v.len()).sum(),
        criteria: results,
    })
}

/// One-way analysis of variance of `variable` over named groups.
///
/// # Errors
///
/// Returns [`AnalysisError::TooFewGroups`] for fewer than two groups,
/// [`AnalysisError::TooFewObservations`] for a group with fewer than two
/// values and [`AnalysisError::NoWithinGroupVariance`] when every group is
/// constant.
#[allow(clippy::cast_precision_loss)]
pub fn one_way_anova<S: AsRef<str>>(
    variable: &str,
    groups: &[(S, Vec<f64>)],
) -> Result<AnovaResult, AnalysisError> {
    if groups.len() < 2 {
        return Err(AnalysisError::TooFewGroups {
            found: groups.len(),
        });
    }
    if let Some((name, values)) = groups.iter().find(|(_, values)| values.len() < 2) {
        return Err(AnalysisError::TooFewObservations {
            group: name.as_ref().to_string(),
            found: values.len(),
        });
    }

    let total: usize = groups.iter().map(|(_, values)| values.len()).sum();
    let grand_mean =
        groups.iter().flat_map(|(_, values)| values).sum::<f64>() / total as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for (_, values) in groups {
        let group_mean = values.iter().sum::<f64>() / values.len() as f64;
        ss_between += values.len() as f64 * (group_mean - grand_mean).powi(2);
        ss_within += values.iter().map(|v| (v - group_mean).powi(2)).sum::<f64>();
    }

    if ss_within <= f64::EPSILON {
        return Err(AnalysisError::NoWithinGroupVariance {
            variable: variable.to_string(),
        });
    }

    let df_between = groups.len() - 1;
    let df_within = total - groups.len();
    let f_statistic = (ss_between / df_between as f64) / (ss_within / df_within as f64);

    let distribution = FisherSnedecor::new(df_between as f64, df_within as f64).map_err(|e| {
        AnalysisError::Distribution {
            reason: e.to_string(),
        }
    })?;

    Ok(AnovaResult {
        f_statistic,
        p_value: distribution.sf(f_statistic),
        df_between,
        df_within,
    })
}
