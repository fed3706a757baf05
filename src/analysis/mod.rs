//! Workshop result analysis.
//!
//! Pure functions over stored submissions:
//! - `tables`: mean AHP weights per round table and one-way ANOVA across
//!   tables
//! - `parks`: per-park rating statistics, outlier exclusion and weighted
//!   scores
//!
//! # Example
//!
//! ```
//! use lotus_ahp::analysis::{mean, sample_std_dev};
//!
//! assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
//! assert!((sample_std_dev(&[2.0, 4.0]) - 2f64.sqrt()).abs() < 1e-12);
//! ```

mod parks;
mod tables;

pub use parks::{
    park_statistics, score_parks, CriterionStats, ExcludedPark, ParkReport, ParkScore,
    ParkStatistics, SCORE_DECIMALS,
};
pub use tables::{
    anova_by_table, mean_weights_by_table, one_way_anova, AnovaResult, CriterionAnova,
    TableAnova, TableWeights, SIGNIFICANCE_LEVEL,
};

/// Arithmetic mean; `None` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n − 1 denominator).
///
/// Fewer than two values give 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sample_std_dev(values: &[f64]) -> f64 {
    let Some(m) = mean(values) else {
        return 0.0;
    };
    if values.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Round to `decimals` places.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
