//! LOTUS workshop engine
//!
//! Survey and decision-analysis engine for the LOTUS urban green-space
//! participation workshop: participant registration, AHP pairwise
//! questionnaires, park ratings and the aggregated results staff consult.
//!
//! # Features
//!
//! - Saaty-scale pairwise matrices with principal-eigenvector weights
//! - Consistency index and ratio diagnostics
//! - Geometric-mean group aggregation with optional consistency gating
//! - Role-based login from secret-sourced credentials
//! - `SQLite` persistence for participants, submissions and parks
//! - Park statistics, outlier exclusion and weighted ranking
//!
//! # Quick Start
//!
//! ```bash
//! echo '{"answers":[{"i":0,"j":1,"choice":"first:5"}]}' | ./lotus-ahp weights
//! ADMIN_USER=root ADMIN_PASS=secret ./lotus-ahp report parks --user root --password secret
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐  JSON   ┌─────────────────┐
//! │  lotus-ahp  │────────▶│ WorkshopService │──────▶ ahp / survey / analysis
//! │    (CLI)    │◀────────│     (Rust)      │
//! └─────────────┘  JSON   └────────┬────────┘
//!                                  │
//!                                  ▼
//!                               SQLite
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod ahp;
pub mod analysis;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod storage;
pub mod survey;
pub mod traits;
pub mod workshop;

#[cfg(test)]
mod test_utils;
