//! Analytic Hierarchy Process.
//!
//! This module turns one respondent's pairwise answers into a weight vector
//! and combines many respondents into a consensus:
//! - `scale`: the nine Saaty-scale choices and their ratios
//! - `criteria`: ordered criteria sets
//! - `matrix`: positive reciprocal comparison matrices
//! - `weights`: principal eigenvector extraction (power iteration)
//! - `consistency`: consistency index and ratio
//! - `aggregate`: geometric-mean group aggregation
//!
//! # Example
//!
//! ```
//! use lotus_ahp::ahp::{evaluate, Choice, CriteriaSet, EigenSettings, MissingAnswerPolicy, PairwiseAnswer};
//!
//! let criteria = CriteriaSet::new(["Shade", "Playgrounds"]).unwrap();
//! let answers = [PairwiseAnswer::new(0, 1, "first:3".parse::<Choice>().unwrap())];
//! let result = evaluate(
//!     &criteria,
//!     &answers,
//!     MissingAnswerPolicy::Reject,
//!     EigenSettings::default(),
//! )
//! .unwrap();
//!
//! assert!((result.weights.as_slice()[0] - 0.75).abs() < 1e-9);
//! ```

mod aggregate;
mod consistency;
mod criteria;
mod matrix;
mod scale;
mod weights;

pub use aggregate::{aggregate_consensus, geometric_mean, mean_weights, GroupConsensus};
pub use consistency::{random_index, ConsistencyReport, ACCEPTABLE_RATIO, RANDOM_INDEX};
pub use criteria::{CriteriaSet, GREEN_SPACE_CRITERIA};
pub use matrix::{MissingAnswerPolicy, PairwiseAnswer, PairwiseMatrix, RECIPROCAL_TOLERANCE};
pub use scale::{Choice, Intensity, Side};
pub use weights::{
    extract_weights, principal_eigenvector, EigenSettings, PrincipalEigen, WeightVector,
    DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE,
};

use serde::Serialize;

use crate::error::AhpError;

/// One respondent's evaluated questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AhpEvaluation {
    /// The criteria compared.
    pub criteria: CriteriaSet,
    /// The reciprocal matrix built from the answers.
    pub matrix: PairwiseMatrix,
    /// Normalized principal eigenvector.
    pub weights: WeightVector,
    /// Consistency diagnostics.
    pub consistency: ConsistencyReport,
}

impl AhpEvaluation {
    /// Weights paired with criterion names, heaviest first.
    #[must_use]
    pub fn ranked(&self) -> Vec<(String, f64)> {
        let labelled = self.weights.labelled(&self.criteria);
        self.weights
            .ranking()
            .into_iter()
            .map(|i| labelled[i].clone())
            .collect()
    }
}

/// Build the matrix for `answers`, extract weights and diagnose consistency.
///
/// # Errors
///
/// Returns [`AhpError`] if the answers are invalid under `policy` or
/// eigenvector extraction fails.
pub fn evaluate(
    criteria: &CriteriaSet,
    answers: &[PairwiseAnswer],
    policy: MissingAnswerPolicy,
    settings: EigenSettings,
) -> Result<AhpEvaluation, AhpError> {
    let matrix = PairwiseMatrix::from_answers(criteria, answers, policy)?;
    evaluate_matrix(criteria, matrix, settings)
}

/// Extract weights and consistency for an already-built matrix.
///
/// # Errors
///
/// Returns [`AhpError::DimensionMismatch`] if the matrix does not match the
/// criteria, or any eigenvector extraction error.
pub fn evaluate_matrix(
    criteria: &CriteriaSet,
    matrix: PairwiseMatrix,
    settings: EigenSettings,
) -> Result<AhpEvaluation, AhpError> {
    if matrix.size() != criteria.len() {
        return Err(AhpError::DimensionMismatch {
            expected: criteria.len(),
            found: matrix.size(),
        });
    }

    let eigen = principal_eigenvector(&matrix, settings)?;
    let consistency = ConsistencyReport::new(matrix.size(), eigen.lambda_max);

    Ok(AhpEvaluation {
        criteria: criteria.clone(),
        matrix,
        weights: eigen.weights,
        consistency,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_all_equal_green_space() {
        let criteria = CriteriaSet::green_space();
        let result = evaluate(
            &criteria,
            &[],
            MissingAnswerPolicy::DefaultEqual,
            EigenSettings::default(),
        )
        .unwrap();
        for w in result.weights.as_slice() {
            assert!((w - 0.2).abs() < 1e-9);
        }
        assert!(result.consistency.is_acceptable());
    }

    #[test]
    fn test_ranked_orders_by_weight() {
        let criteria = CriteriaSet::new(["a", "b", "c"]).unwrap();
        let answers = [
            PairwiseAnswer::new(0, 1, Choice::favors(Side::Second, Intensity::Strongly)),
            PairwiseAnswer::new(1, 2, Choice::favors(Side::First, Intensity::Slightly)),
            PairwiseAnswer::new(0, 2, Choice::favors(Side::Second, Intensity::Slightly)),
        ];
        let result = evaluate(
            &criteria,
            &answers,
            MissingAnswerPolicy::Reject,
            EigenSettings::default(),
        )
        .unwrap();
        let names: Vec<String> = result.ranked().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_evaluate_matrix_size_mismatch() {
        let criteria = CriteriaSet::green_space();
        let err = evaluate_matrix(
            &criteria,
            PairwiseMatrix::equal(3).unwrap(),
            EigenSettings::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            AhpError::DimensionMismatch {
                expected: 5,
                found: 3
            }
        );
    }
}
