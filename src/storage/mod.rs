//! Storage backend.
//!
//! This module provides:
//! - `SQLite` database implementation
//! - Participant, answer and question persistence
//! - AHP submission persistence (matrix and weights as JSON)
//! - Park catalog and park evaluation persistence
//!
//! # Architecture
//!
//! The storage layer uses `SQLite` with the `sqlx` crate for async operations.
//! Submission tables are append-only; multi-row inserts run in a transaction.
//!
//! The implementation is split across submodules:
//! - `core`: Pool management, migrations, and helper functions
//! - `registration`: Participants, answers and questions
//! - `ahp`: AHP submissions
//! - `parks`: Park catalog and evaluations
//! - `trait_impl`: `StorageTrait` implementation
//!
//! # Example
//!
//! ```ignore
//! use lotus_ahp::storage::SqliteStorage;
//!
//! let storage = SqliteStorage::new("./data/lotus.db").await?;
//! let parks = storage.fetch_parks().await?;
//! ```

mod ahp;
mod core;
mod parks;
mod registration;
mod trait_impl;
mod types;

pub use self::core::SqliteStorage;
pub use types::{StoredAhpSubmission, StoredAnswer, StoredParkEvaluation, STORED_WEIGHT_DECIMALS};
