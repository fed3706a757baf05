//! Integration tests for the LOTUS workshop engine.
//!
//! These tests verify end-to-end workflows including:
//! - Registration with dynamic questions
//! - AHP submissions, round-table statistics and consensus
//! - Park catalog, ratings and the weighted ranking
//! - Error recovery paths

mod ahp_workflow;
mod error_recovery;
mod park_workflow;
mod registration_workflow;
