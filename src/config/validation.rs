//! Configuration validation.
//!
//! This module provides validation logic for configuration values,
//! ensuring they are within acceptable ranges.

use tracing_subscriber::EnvFilter;

use super::Config;
use crate::error::ConfigError;

/// Minimum power iteration budget.
pub const MIN_ITERATIONS: usize = 10;

/// Maximum power iteration budget.
pub const MAX_ITERATIONS_LIMIT: usize = 100_000;

/// Loosest accepted convergence tolerance.
pub const MAX_TOLERANCE: f64 = 1e-3;

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if any value is out of range:
/// - `DATABASE_PATH` must not be empty
/// - `LOG_LEVEL` must be a valid tracing filter directive
/// - `CONSISTENCY_THRESHOLD` must be in (0, 1]
/// - `MAX_ITERATIONS` must be between 10 and 100000
/// - `CONVERGENCE_TOLERANCE` must be in (0, 1e-3]
/// - `OUTLIER_STD_THRESHOLD` must be positive
#[must_use = "validation result should be checked"]
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.database_path.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            var: "DATABASE_PATH".into(),
            reason: "must not be empty".into(),
        });
    }

    if let Err(e) = EnvFilter::try_new(&config.log_level) {
        return Err(ConfigError::InvalidValue {
            var: "LOG_LEVEL".into(),
            reason: e.to_string(),
        });
    }

    if let Some(threshold) = config.consistency_threshold {
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::InvalidValue {
                var: "CONSISTENCY_THRESHOLD".into(),
                reason: "must be greater than 0 and at most 1".into(),
            });
        }
    }

    if !(MIN_ITERATIONS..=MAX_ITERATIONS_LIMIT).contains(&config.max_iterations) {
        return Err(ConfigError::InvalidValue {
            var: "MAX_ITERATIONS".into(),
            reason: format!("must be between {MIN_ITERATIONS} and {MAX_ITERATIONS_LIMIT}"),
        });
    }

    if !(config.convergence_tolerance > 0.0 && config.convergence_tolerance <= MAX_TOLERANCE) {
        return Err(ConfigError::InvalidValue {
            var: "CONVERGENCE_TOLERANCE".into(),
            reason: format!("must be greater than 0 and at most {MAX_TOLERANCE}"),
        });
    }

    if !(config.outlier_std_threshold.is_finite() && config.outlier_std_threshold > 0.0) {
        return Err(ConfigError::InvalidValue {
            var: "OUTLIER_STD_THRESHOLD".into(),
            reason: "must be a positive number".into(),
        });
    }

    Ok(())
}
