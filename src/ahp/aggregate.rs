//! Group aggregation of individual judgments.
//!
//! Matrices are combined with the element-wise geometric mean, which keeps
//! the result reciprocal. Consensus weights are then extracted from the
//! combined matrix exactly as for a single respondent.

use serde::Serialize;

use super::consistency::ConsistencyReport;
use super::matrix::PairwiseMatrix;
use super::weights::{principal_eigenvector, EigenSettings, WeightVector};
use crate::error::AhpError;

/// Element-wise geometric mean of `matrices`.
///
/// A single matrix is returned unchanged. Only the upper triangle is
/// averaged; the lower triangle is set to its reciprocal.
///
/// # Errors
///
/// Returns [`AhpError::EmptyAggregation`] for an empty slice and
/// [`AhpError::DimensionMismatch`] if sizes differ.
#[allow(clippy::cast_precision_loss)]
pub fn geometric_mean(matrices: &[PairwiseMatrix]) -> Result<PairwiseMatrix, AhpError> {
    let first = matrices.first().ok_or(AhpError::EmptyAggregation)?;
    let n = first.size();

    if let Some(other) = matrices.iter().find(|m| m.size() != n) {
        return Err(AhpError::DimensionMismatch {
            expected: n,
            found: other.size(),
        });
    }

    if matrices.len() == 1 {
        return Ok(first.clone());
    }

    let m = matrices.len() as f64;
    let mut log_sums = vec![0.0_f64; n * (n - 1) / 2];
    for matrix in matrices {
        for (sum, value) in log_sums.iter_mut().zip(matrix.upper_triangle()) {
            *sum += value.ln();
        }
    }
    let upper: Vec<f64> = log_sums.into_iter().map(|s| (s / m).exp()).collect();

    PairwiseMatrix::from_upper_triangle(n, &upper)
}

/// Consensus of a group of respondents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupConsensus {
    /// Geometric-mean matrix of the included respondents.
    pub matrix: PairwiseMatrix,
    /// Weights derived from `matrix`.
    pub weights: WeightVector,
    /// Consistency of `matrix`.
    pub consistency: ConsistencyReport,
    /// Indices (into the input) that were aggregated.
    pub included: Vec<usize>,
    /// Indices excluded by the consistency threshold.
    pub excluded: Vec<usize>,
}

/// Aggregate respondents and derive consensus weights.
///
/// With `threshold` set, respondents whose consistency ratio exceeds it are
/// left out. Without it every matrix is aggregated as-is.
///
/// # Errors
///
/// Returns [`AhpError`] if the input is empty, sizes differ, eigenvector
/// extraction fails, or every respondent is excluded.
pub fn aggregate_consensus(
    matrices: &[PairwiseMatrix],
    threshold: Option<f64>,
    settings: EigenSettings,
) -> Result<GroupConsensus, AhpError> {
    if matrices.is_empty() {
        return Err(AhpError::EmptyAggregation);
    }

    let mut included = Vec::with_capacity(matrices.len());
    let mut excluded = Vec::new();

    match threshold {
        Some(limit) => {
            for (index, matrix) in matrices.iter().enumerate() {
                let eigen = principal_eigenvector(matrix, settings)?;
                let report = ConsistencyReport::new(matrix.size(), eigen.lambda_max);
                if report.within(limit) {
                    included.push(index);
                } else {
                    tracing::warn!(
                        respondent = index,
                        consistency_ratio = report.consistency_ratio,
                        threshold = limit,
                        "Excluding inconsistent respondent from aggregation"
                    );
                    excluded.push(index);
                }
            }
            if included.is_empty() {
                return Err(AhpError::AllRespondentsExcluded {
                    count: matrices.len(),
                    threshold: limit,
                });
            }
        }
        None => included.extend(0..matrices.len()),
    }

    let selected: Vec<PairwiseMatrix> = included.iter().map(|&i| matrices[i].clone()).collect();
    let matrix = geometric_mean(&selected)?;
    let eigen = principal_eigenvector(&matrix, settings)?;
    let consistency = ConsistencyReport::new(matrix.size(), eigen.lambda_max);

    tracing::info!(
        respondents = included.len(),
        excluded = excluded.len(),
        consistency_ratio = consistency.consistency_ratio,
        "Aggregated pairwise matrices"
    );

    Ok(GroupConsensus {
        matrix,
        weights: eigen.weights,
        consistency,
        included,
        excluded,
    })
}

/// Arithmetic mean of weight vectors.
///
/// # Errors
///
/// Returns [`AhpError::EmptyAggregation`] for an empty slice and
/// [`AhpError::DimensionMismatch`] if lengths differ.
#[allow(clippy::cast_precision_loss)]
pub fn mean_weights(vectors: &[WeightVector]) -> Result<WeightVector, AhpError> {
    let first = vectors.first().ok_or(AhpError::EmptyAggregation)?;
    let n = first.len();
    let mut totals = vec![0.0_f64; n];

    for vector in vectors {
        if vector.len() != n {
            return Err(AhpError::DimensionMismatch {
                expected: n,
                found: vector.len(),
            });
        }
        for (total, w) in totals.iter_mut().zip(vector.as_slice()) {
            *total += w;
        }
    }

    let count = vectors.len() as f64;
    Ok(WeightVector::from_raw(
        totals.into_iter().map(|t| t / count).collect(),
    ))
}
