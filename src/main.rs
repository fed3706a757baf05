//! LOTUS workshop engine binary entry point.
//!
//! All logs go to stderr; stdout carries the JSON result of the command.
//!
//! Coverage is excluded because the main function only wires the
//! environment, the database and the command dispatcher together.

// Enable the coverage attribute when running with nightly for llvm-cov exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lotus_ahp::auth::Authenticator;
use lotus_ahp::cli::{run, run_standalone, Cli};
use lotus_ahp::config::{Config, EnvSecretProvider, DEFAULT_LOG_LEVEL};
use lotus_ahp::storage::SqliteStorage;
use lotus_ahp::traits::RealTimeProvider;
use lotus_ahp::workshop::{WorkshopService, WorkshopSettings};

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration before logging so LOG_LEVEL from .env applies
    let config = Config::from_env();

    // Initialize logging to stderr only (stdout is for results)
    let filter = config.as_ref().map_or_else(
        |_| EnvFilter::new(DEFAULT_LOG_LEVEL),
        Config::log_filter,
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    tracing::debug!(
        "Configuration loaded: database={}, policy={:?}",
        config.database_path,
        config.missing_answer_policy
    );

    let settings = WorkshopSettings::from_config(&config);
    let auth = Authenticator::new(EnvSecretProvider::from_env());

    let result = if cli.command.needs_storage() {
        let storage = match SqliteStorage::new(&config.database_path).await {
            Ok(storage) => storage,
            Err(e) => {
                tracing::error!("Storage error: {e}");
                std::process::exit(1);
            }
        };
        let service = WorkshopService::new(storage, RealTimeProvider, settings);
        run(&cli, &service, &auth).await
    } else {
        run_standalone(&cli, &settings, &auth)
    };

    match result.and_then(|value| {
        serde_json::to_string_pretty(&value).map_err(|e| lotus_ahp::error::AppError::Output {
            message: e.to_string(),
        })
    }) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}
