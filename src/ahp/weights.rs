//! Principal eigenvector extraction.
//!
//! The weight vector of a pairwise matrix is its principal eigenvector,
//! normalized to sum to 1. For a strictly positive matrix the dominant
//! eigenvalue is real, simple and strictly larger in modulus than every other
//! eigenvalue (Perron-Frobenius), so power iteration converges to it from the
//! uniform start vector.

use serde::{Deserialize, Serialize};

use super::criteria::CriteriaSet;
use super::matrix::PairwiseMatrix;
use crate::error::AhpError;

/// Default iteration budget.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Default convergence tolerance (max-norm change between iterates).
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Power iteration settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenSettings {
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Stop once successive iterates differ by less than this.
    pub tolerance: f64,
}

impl Default for EigenSettings {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Non-negative weights summing to 1, one per criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    /// Wrap raw weights without renormalizing.
    #[must_use]
    pub const fn from_raw(weights: Vec<f64>) -> Self {
        Self(weights)
    }

    /// Uniform weights `1/n`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn uniform(n: usize) -> Self {
        Self(vec![1.0 / n as f64; n])
    }

    /// Number of weights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no weights.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Weight at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Borrow the weights.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Unwrap into the inner vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Sum of all weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Copy rounded to `decimals` places.
    #[must_use]
    pub fn rounded(&self, decimals: i32) -> Self {
        let factor = 10f64.powi(decimals);
        Self(self.0.iter().map(|w| (w * factor).round() / factor).collect())
    }

    /// Pair each weight with its criterion name.
    #[must_use]
    pub fn labelled(&self, criteria: &CriteriaSet) -> Vec<(String, f64)> {
        criteria
            .iter()
            .map(ToString::to_string)
            .zip(self.0.iter().copied())
            .collect()
    }

    /// Criteria indices ordered by descending weight.
    #[must_use]
    pub fn ranking(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.0.len()).collect();
        order.sort_by(|&a, &b| self.0[b].total_cmp(&self.0[a]));
        order
    }
}

/// Result of power iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct PrincipalEigen {
    /// Normalized principal eigenvector.
    pub weights: WeightVector,
    /// Dominant eigenvalue.
    pub lambda_max: f64,
    /// Iterations used.
    pub iterations: usize,
}

/// Compute the normalized principal eigenvector and eigenvalue of `matrix`.
///
/// # Errors
///
/// Returns [`AhpError::NotConverged`] if the iterate has not settled within
/// `settings.max_iterations`, or [`AhpError::DegenerateEigenvector`] if the
/// iterate can no longer be normalized.
#[allow(clippy::cast_precision_loss)]
pub fn principal_eigenvector(
    matrix: &PairwiseMatrix,
    settings: EigenSettings,
) -> Result<PrincipalEigen, AhpError> {
    let n = matrix.size();
    let mut current = vec![1.0 / n as f64; n];

    for iteration in 1..=settings.max_iterations {
        let mut next = matrix.multiply(&current);
        // `current` sums to 1, so sum(A v) is the Rayleigh-style estimate of λ.
        let lambda = next.iter().sum::<f64>();
        if !(lambda.is_finite() && lambda > 0.0) {
            return Err(AhpError::DegenerateEigenvector {
                reason: format!("iterate sum is {lambda}"),
            });
        }
        for value in &mut next {
            *value /= lambda;
        }

        let delta = next
            .iter()
            .zip(&current)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max);
        current = next;

        if delta < settings.tolerance {
            tracing::debug!(iteration, lambda, "Power iteration converged");
            if current.iter().any(|w| *w < 0.0) {
                return Err(AhpError::DegenerateEigenvector {
                    reason: "negative component".into(),
                });
            }
            return Ok(PrincipalEigen {
                weights: WeightVector(current),
                lambda_max: lambda,
                iterations: iteration,
            });
        }
    }

    Err(AhpError::NotConverged {
        iterations: settings.max_iterations,
    })
}

/// Weights of `matrix` with default settings.
///
/// # Errors
///
/// See [`principal_eigenvector`].
pub fn extract_weights(matrix: &PairwiseMatrix) -> Result<WeightVector, AhpError> {
    principal_eigenvector(matrix, EigenSettings::default()).map(|e| e.weights)
}
