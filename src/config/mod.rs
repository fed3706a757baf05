//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading (with `.env` support)
//! - Configuration validation
//! - Default value handling
//! - Secret lookup via [`EnvSecretProvider`] and redaction via [`SecretString`]
//!
//! # Example
//!
//! ```
//! use lotus_ahp::ahp::MissingAnswerPolicy;
//! use lotus_ahp::config::{Config, DEFAULT_DATABASE_PATH};
//!
//! let config = Config {
//!     database_path: DEFAULT_DATABASE_PATH.to_string(),
//!     missing_answer_policy: MissingAnswerPolicy::Reject,
//!     ..Config::default()
//! };
//!
//! assert_eq!(config.eigen_settings().max_iterations, 1000);
//! ```

mod secret;
mod validation;

pub use secret::{EnvSecretProvider, SecretString};
pub use validation::{
    validate_config, MAX_ITERATIONS_LIMIT, MAX_TOLERANCE, MIN_ITERATIONS,
};

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use crate::ahp::{EigenSettings, MissingAnswerPolicy, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::error::ConfigError;

/// Default database path.
pub const DEFAULT_DATABASE_PATH: &str = "./data/lotus.db";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default standard deviation above which a park's ratings are considered
/// too dispersed to score.
pub const DEFAULT_OUTLIER_STD_THRESHOLD: f64 = 1.2;

/// Application configuration.
///
/// Use [`Config::from_env`] to load configuration from environment variables.
/// Login credentials are not part of this struct; they are read on demand
/// through a [`crate::traits::SecretProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Database path.
    pub database_path: String,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: String,
    /// How unanswered pairs are handled.
    pub missing_answer_policy: MissingAnswerPolicy,
    /// Optional consistency-ratio cutoff applied before group aggregation.
    pub consistency_threshold: Option<f64>,
    /// Power iteration budget.
    pub max_iterations: usize,
    /// Power iteration convergence tolerance.
    pub convergence_tolerance: f64,
    /// Park rating dispersion cutoff.
    pub outlier_std_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            missing_answer_policy: MissingAnswerPolicy::DefaultEqual,
            consistency_threshold: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence_tolerance: DEFAULT_TOLERANCE,
            outlier_std_threshold: DEFAULT_OUTLIER_STD_THRESHOLD,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables (with defaults):
    /// - `DATABASE_PATH`: Path to `SQLite` database (default: `./data/lotus.db`)
    /// - `LOG_LEVEL`: Logging level (default: `info`)
    /// - `MISSING_ANSWER_POLICY`: `equal` or `reject` (default: `equal`)
    /// - `CONSISTENCY_THRESHOLD`: CR cutoff for aggregation (default: unset)
    /// - `MAX_ITERATIONS`: Power iteration budget (default: `1000`)
    /// - `CONVERGENCE_TOLERANCE`: Power iteration tolerance (default: `1e-12`)
    /// - `OUTLIER_STD_THRESHOLD`: Park rating dispersion cutoff (default: `1.2`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable cannot be parsed or
    /// fails validation (see [`validate_config`]).
    #[must_use = "configuration should be used"]
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.into());

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into());

        let missing_answer_policy = match std::env::var("MISSING_ANSWER_POLICY") {
            Ok(val) => val
                .parse::<MissingAnswerPolicy>()
                .map_err(|reason| ConfigError::InvalidValue {
                    var: "MISSING_ANSWER_POLICY".into(),
                    reason,
                })?,
            Err(_) => MissingAnswerPolicy::DefaultEqual,
        };

        let consistency_threshold = parse_env_opt::<f64>("CONSISTENCY_THRESHOLD", "a number")?;
        let max_iterations = parse_env_opt::<usize>("MAX_ITERATIONS", "a positive integer")?
            .unwrap_or(DEFAULT_MAX_ITERATIONS);
        let convergence_tolerance = parse_env_opt::<f64>("CONVERGENCE_TOLERANCE", "a number")?
            .unwrap_or(DEFAULT_TOLERANCE);
        let outlier_std_threshold = parse_env_opt::<f64>("OUTLIER_STD_THRESHOLD", "a number")?
            .unwrap_or(DEFAULT_OUTLIER_STD_THRESHOLD);

        let config = Self {
            database_path,
            log_level,
            missing_answer_policy,
            consistency_threshold,
            max_iterations,
            convergence_tolerance,
            outlier_std_threshold,
        };

        validate_config(&config)?;
        Ok(config)
    }

    /// Tracing filter for the configured log level.
    ///
    /// [`validate_config`] rejects unparsable levels; a hand-built config
    /// with one falls back to [`DEFAULT_LOG_LEVEL`].
    #[must_use]
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    }

    /// Power iteration settings derived from this configuration.
    #[must_use]
    pub const fn eigen_settings(&self) -> EigenSettings {
        EigenSettings {
            max_iterations: self.max_iterations,
            tolerance: self.convergence_tolerance,
        }
    }
}

/// Parse an optional environment variable.
fn parse_env_opt<T: FromStr>(name: &str, expected: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                var: name.into(),
                reason: format!("must be {expected}"),
            }),
        Err(_) => Ok(None),
    }
}
