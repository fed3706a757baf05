//! Workshop service inputs, outputs and settings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ahp::{
    AhpEvaluation, ConsistencyReport, CriteriaSet, EigenSettings, MissingAnswerPolicy,
    PairwiseAnswer, PairwiseMatrix,
};
use crate::analysis::{ParkReport, ParkStatistics};
use crate::config::Config;
use crate::survey::{ParkEvaluationSubmission, Participant};

/// Round table recorded when none is known.
pub const UNSPECIFIED_ROUND_TABLE: &str = "non specificata";

/// Respondent recorded for an anonymous AHP submission.
pub const ANONYMOUS_RESPONDENT: &str = "anonimo";

/// Participant id draws before giving up.
pub const MAX_ID_ATTEMPTS: usize = 10;

/// Settings the service computes with.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkshopSettings {
    /// Criteria of the AHP questionnaire and park ratings.
    pub criteria: CriteriaSet,
    /// How unanswered pairs are handled.
    pub missing_answer_policy: MissingAnswerPolicy,
    /// Power iteration settings.
    pub eigen: EigenSettings,
    /// Optional CR cutoff for aggregation.
    pub consistency_threshold: Option<f64>,
    /// Park rating dispersion cutoff.
    pub outlier_std_threshold: f64,
}

impl Default for WorkshopSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl WorkshopSettings {
    /// Settings for the green-space criteria from `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            criteria: CriteriaSet::green_space(),
            missing_answer_policy: config.missing_answer_policy,
            eigen: config.eigen_settings(),
            consistency_threshold: config.consistency_threshold,
            outlier_std_threshold: config.outlier_std_threshold,
        }
    }

    /// Replace the criteria set.
    #[must_use]
    pub fn with_criteria(mut self, criteria: CriteriaSet) -> Self {
        self.criteria = criteria;
        self
    }
}

/// One AHP questionnaire as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AhpSubmission {
    /// Participant id or name; anonymous when absent.
    #[serde(default)]
    pub respondent: Option<String>,
    /// Round table; looked up from the respondent when absent.
    #[serde(default)]
    pub round_table: Option<String>,
    /// Pairwise answers by criterion index.
    pub answers: Vec<PairwiseAnswer>,
}

/// Park ratings of one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ParkEvaluationInput {
    /// Registered participant id.
    pub participant_id: String,
    /// Round table override; defaults to the participant's.
    #[serde(default)]
    pub round_table: Option<String>,
    /// Ratings.
    #[serde(flatten)]
    pub submission: ParkEvaluationSubmission,
}

/// Result of a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationReceipt {
    /// The stored participant.
    pub participant: Participant,
    /// Number of answer rows stored.
    pub answers: usize,
}

/// Result of an AHP submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AhpReceipt {
    /// Stored submission id.
    pub submission_id: String,
    /// Round table recorded.
    pub round_table: String,
    /// Weights as stored (rounded), by criterion.
    pub stored_weights: Vec<(String, f64)>,
    /// Full-precision evaluation.
    pub evaluation: AhpEvaluation,
}

/// Group consensus of stored AHP submissions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsensusReport {
    /// Round table aggregated, or `None` for everyone.
    pub round_table: Option<String>,
    /// Submissions aggregated.
    pub respondents: usize,
    /// Respondents left out by the consistency threshold.
    pub excluded: Vec<String>,
    /// Consensus weight per criterion.
    pub weights: Vec<(String, f64)>,
    /// Consistency of the aggregated matrix.
    pub consistency: ConsistencyReport,
    /// Geometric-mean matrix.
    pub matrix: PairwiseMatrix,
}

/// Park statistics and ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParkAnalysis {
    /// Round table analysed, or `None` for everyone.
    pub round_table: Option<String>,
    /// Per-park statistics.
    pub statistics: Vec<ParkStatistics>,
    /// Weighted ranking.
    pub report: ParkReport,
}
