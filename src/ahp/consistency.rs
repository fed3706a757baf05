//! Saaty consistency index and ratio.

use serde::{Deserialize, Serialize};

/// Saaty's random consistency index for n = 1..=10.
pub const RANDOM_INDEX: [f64; 10] = [0.0, 0.0, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49];

/// Conventional acceptance threshold for the consistency ratio.
pub const ACCEPTABLE_RATIO: f64 = 0.10;

/// Random index for a matrix of size `n`; sizes above 10 use the n = 10 value.
#[must_use]
pub fn random_index(n: usize) -> f64 {
    match n {
        0 => 0.0,
        n if n <= RANDOM_INDEX.len() => RANDOM_INDEX[n - 1],
        _ => RANDOM_INDEX[RANDOM_INDEX.len() - 1],
    }
}

/// Consistency diagnostics of one pairwise matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// Dominant eigenvalue.
    pub lambda_max: f64,
    /// CI = (λmax - n) / (n - 1).
    pub consistency_index: f64,
    /// CR = CI / RI(n); 0 when RI is 0.
    pub consistency_ratio: f64,
}

impl ConsistencyReport {
    /// Diagnostics for a matrix of size `n` with dominant eigenvalue `lambda_max`.
    ///
    /// Floating-point noise that would make CI slightly negative is clamped.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(n: usize, lambda_max: f64) -> Self {
        let consistency_index = if n > 1 {
            ((lambda_max - n as f64) / (n as f64 - 1.0)).max(0.0)
        } else {
            0.0
        };
        let ri = random_index(n);
        let consistency_ratio = if ri > 0.0 {
            consistency_index / ri
        } else {
            0.0
        };
        Self {
            lambda_max,
            consistency_index,
            consistency_ratio,
        }
    }

    /// CR at or below [`ACCEPTABLE_RATIO`].
    #[must_use]
    pub fn is_acceptable(&self) -> bool {
        self.consistency_ratio <= ACCEPTABLE_RATIO
    }

    /// CR at or below `threshold`.
    #[must_use]
    pub fn within(&self, threshold: f64) -> bool {
        self.consistency_ratio <= threshold
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_random_index_lookup() {
        assert_eq!(random_index(2), 0.0);
        assert_eq!(random_index(5), 1.12);
        assert_eq!(random_index(15), 1.49);
    }

    #[test]
    fn test_two_by_two_is_always_consistent() {
        let report = ConsistencyReport::new(2, 2.0);
        assert_eq!(report.consistency_ratio, 0.0);
        assert!(report.is_acceptable());
    }

    #[test]
    fn test_ratio_for_five_criteria() {
        let report = ConsistencyReport::new(5, 5.448);
        assert!((report.consistency_index - 0.112).abs() < 1e-9);
        assert!((report.consistency_ratio - 0.1).abs() < 1e-9);
        assert!(report.within(0.2));
    }

    #[test]
    fn test_negative_noise_is_clamped() {
        let report = ConsistencyReport::new(3, 3.0 - 1e-14);
        assert_eq!(report.consistency_index, 0.0);
    }
}
