//! Storage types for database operations.
//!
//! This module defines the append-only rows stored in the database:
//! - [`StoredAnswer`]: One long-format registration answer
//! - [`StoredAhpSubmission`]: One respondent's AHP matrix and weights
//! - [`StoredParkEvaluation`]: One participant's rating of one park
//!
//! Participants, questions and parks are stored as their
//! [`crate::survey`] types directly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ahp::{AhpEvaluation, CriteriaSet, PairwiseMatrix, WeightVector};

/// Decimal places kept for stored weights.
pub const STORED_WEIGHT_DECIMALS: i32 = 4;

/// Registration answer stored in database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAnswer {
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
    /// Participant identifier.
    pub participant_id: String,
    /// Neighborhood (quartiere).
    pub neighborhood: String,
    /// Question text.
    pub question: String,
    /// Response text; multiple choices joined with `", "`.
    pub response: String,
}

impl StoredAnswer {
    /// Create a new stored answer.
    #[must_use]
    pub fn new(
        participant_id: impl Into<String>,
        neighborhood: impl Into<String>,
        question: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            created_at: Utc::now(),
            participant_id: participant_id.into(),
            neighborhood: neighborhood.into(),
            question: question.into(),
            response: response.into(),
        }
    }

    /// Set submission timestamp.
    #[must_use]
    pub const fn with_timestamp(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// AHP submission stored in database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAhpSubmission {
    /// Unique submission identifier.
    pub id: String,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
    /// Who answered (participant id or free label).
    pub respondent: String,
    /// Round table (tavola rotonda).
    pub round_table: String,
    /// Criteria the matrix is indexed by.
    pub criteria: CriteriaSet,
    /// Reciprocal comparison matrix.
    pub matrix: PairwiseMatrix,
    /// Weights, rounded to [`STORED_WEIGHT_DECIMALS`].
    pub weights: WeightVector,
    /// Consistency ratio of the matrix.
    pub consistency_ratio: f64,
}

impl StoredAhpSubmission {
    /// Create a submission row from an evaluation.
    ///
    /// Weights are rounded for storage; the matrix is kept exact.
    #[must_use]
    pub fn from_evaluation(
        id: impl Into<String>,
        respondent: impl Into<String>,
        round_table: impl Into<String>,
        evaluation: &AhpEvaluation,
    ) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            respondent: respondent.into(),
            round_table: round_table.into(),
            criteria: evaluation.criteria.clone(),
            matrix: evaluation.matrix.clone(),
            weights: evaluation.weights.rounded(STORED_WEIGHT_DECIMALS),
            consistency_ratio: evaluation.consistency.consistency_ratio,
        }
    }

    /// Set submission timestamp.
    #[must_use]
    pub const fn with_timestamp(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Park evaluation stored in database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredParkEvaluation {
    /// Unique evaluation identifier.
    pub id: String,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
    /// Participant identifier.
    pub participant_id: String,
    /// Round table (tavola rotonda).
    pub round_table: String,
    /// Park name.
    pub park: String,
    /// Score per criterion name.
    pub scores: BTreeMap<String, u8>,
    /// Optional comment.
    pub feedback: Option<String>,
}

impl StoredParkEvaluation {
    /// Create a new stored evaluation.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        participant_id: impl Into<String>,
        round_table: impl Into<String>,
        park: impl Into<String>,
        scores: BTreeMap<String, u8>,
    ) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            participant_id: participant_id.into(),
            round_table: round_table.into(),
            park: park.into(),
            scores,
            feedback: None,
        }
    }

    /// Set feedback.
    #[must_use]
    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    /// Set submission timestamp.
    #[must_use]
    pub const fn with_timestamp(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Score for `criterion`, if rated.
    #[must_use]
    pub fn score(&self, criterion: &str) -> Option<u8> {
        self.scores.get(criterion).copied()
    }
}
