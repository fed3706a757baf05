//! Error types for the LOTUS workshop engine.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`AhpError`]: Pairwise comparison and weight extraction errors
//! - [`SurveyError`]: Registration, question and park evaluation errors
//! - [`AnalysisError`]: Statistical test errors
//! - [`AuthError`]: Login and section access errors
//! - [`StorageError`]: Database operation errors
//! - [`ConfigError`]: Configuration errors
//!
//! All errors implement `Send + Sync`.

use thiserror::Error;

/// Top-level application error.
///
/// This is the main error type returned by the workshop service and the CLI.
/// It wraps all subsystem errors for unified error handling.
#[derive(Debug, Error)]
pub enum AppError {
    /// AHP computation error.
    #[error("AHP error: {0}")]
    Ahp(#[from] AhpError),

    /// Survey validation error.
    #[error("Survey error: {0}")]
    Survey(#[from] SurveyError),

    /// Statistical analysis error.
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Authentication error.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input document could not be read or parsed.
    #[error("Invalid input: {message}")]
    Input {
        /// Description of the input problem.
        message: String,
    },

    /// Result could not be rendered as JSON.
    #[error("Output error: {message}")]
    Output {
        /// Description of the rendering failure.
        message: String,
    },
}

/// AHP errors.
///
/// These errors cover criteria definition, answer collection, matrix
/// validation, eigenvector extraction and group aggregation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AhpError {
    /// Fewer than two criteria were supplied.
    #[error("At least 2 criteria are required, got {count}")]
    TooFewCriteria {
        /// Number of criteria supplied.
        count: usize,
    },

    /// A criterion name is blank.
    #[error("Criterion name must not be empty")]
    EmptyCriterionName,

    /// The same criterion name appears twice.
    #[error("Duplicate criterion: {name}")]
    DuplicateCriterion {
        /// The repeated name.
        name: String,
    },

    /// A pair references a criterion index outside the set, or i == j.
    #[error("Invalid pair ({i}, {j}) for {n} criteria")]
    InvalidPair {
        /// First index.
        i: usize,
        /// Second index.
        j: usize,
        /// Number of criteria.
        n: usize,
    },

    /// A pair was answered more than once.
    #[error("Pair ({i}, {j}) answered more than once")]
    DuplicateAnswer {
        /// Lower index.
        i: usize,
        /// Higher index.
        j: usize,
    },

    /// A pair was not answered and missing answers are rejected.
    #[error("Pair ({i}, {j}) was not answered")]
    MissingAnswer {
        /// Lower index.
        i: usize,
        /// Higher index.
        j: usize,
    },

    /// A choice label could not be parsed.
    #[error("Invalid comparison choice: {input}")]
    InvalidChoice {
        /// The rejected input.
        input: String,
    },

    /// An intensity outside {3, 5, 7, 9}.
    #[error("Invalid Saaty intensity: {value}")]
    InvalidIntensity {
        /// The rejected value.
        value: u8,
    },

    /// Matrix rows are not all of length n.
    #[error("Matrix must be square: row {row} has {len} entries, expected {expected}")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Its length.
        len: usize,
        /// Expected length.
        expected: usize,
    },

    /// An entry is zero, negative, NaN or infinite.
    #[error("Matrix entry ({row}, {col}) must be positive and finite, got {value}")]
    NonPositiveEntry {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// The offending value.
        value: f64,
    },

    /// A[i][j] * A[j][i] differs from 1.
    #[error("Matrix is not reciprocal at ({row}, {col})")]
    NotReciprocal {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
    },

    /// Power iteration did not settle.
    #[error("Principal eigenvector did not converge after {iterations} iterations")]
    NotConverged {
        /// Iterations performed.
        iterations: usize,
    },

    /// The eigenvector could not be normalized to a weight vector.
    #[error("Degenerate eigenvector: {reason}")]
    DegenerateEigenvector {
        /// Why normalization failed.
        reason: String,
    },

    /// Aggregation was asked to combine zero matrices.
    #[error("Cannot aggregate an empty set of matrices")]
    EmptyAggregation,

    /// Matrices or weight vectors of different sizes were combined.
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Dimension found.
        found: usize,
    },

    /// Consistency gating excluded every respondent.
    #[error("All {count} respondents exceed the consistency threshold {threshold}")]
    AllRespondentsExcluded {
        /// Number of respondents considered.
        count: usize,
        /// The CR threshold applied.
        threshold: f64,
    },
}

/// Survey errors.
///
/// These errors represent invalid registration data, invalid answers to
/// dynamic questions, and invalid park evaluations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurveyError {
    /// Missing required field.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The missing field name.
        field: String,
    },

    /// Invalid value for a field.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// The field name.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// A park rating outside 1..=5.
    #[error("Score {score} for {criterion} is outside 1..=5")]
    ScoreOutOfRange {
        /// The criterion rated.
        criterion: String,
        /// The rejected score.
        score: u8,
    },

    /// The neighborhood already has a question with this text.
    #[error("Question already defined for {neighborhood}: {question}")]
    DuplicateQuestion {
        /// The neighborhood.
        neighborhood: String,
        /// The question text.
        question: String,
    },

    /// The park is not in the catalog.
    #[error("Unknown park: {name}")]
    UnknownPark {
        /// The park name.
        name: String,
    },

    /// A participant id could not be generated without collision.
    #[error("Could not generate a unique participant id after {attempts} attempts")]
    IdExhausted {
        /// Attempts made.
        attempts: usize,
    },

    /// Nothing to submit.
    #[error("Submission is empty")]
    EmptySubmission,
}

/// Analysis errors.
///
/// These errors are returned when a statistical test has too little data
/// to produce a finite result.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// Fewer groups than the test compares.
    #[error("At least 2 groups are required, got {found}")]
    TooFewGroups {
        /// Groups available.
        found: usize,
    },

    /// A group has too few observations.
    #[error("Group {group} has {found} observation(s), at least 2 are required")]
    TooFewObservations {
        /// The group name.
        group: String,
        /// Observations in the group.
        found: usize,
    },

    /// Every group is constant, so the F statistic is undefined.
    #[error("No variance within groups for {variable}")]
    NoWithinGroupVariance {
        /// The variable tested.
        variable: String,
    },

    /// The reference distribution could not be built.
    #[error("Invalid F distribution: {reason}")]
    Distribution {
        /// Why construction failed.
        reason: String,
    },
}

/// Authentication errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Username/password pair did not match any role.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The role is not allowed into the section.
    #[error("Role {role} may not access section {section}")]
    AccessDenied {
        /// The authenticated role.
        role: String,
        /// The requested section.
        section: String,
    },

    /// No role has both user and password secrets configured.
    #[error("No credentials configured")]
    NoCredentials,
}

/// Storage errors.
///
/// These errors represent failures in database operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Failed to connect to the database.
    #[error("Database connection failed: {message}")]
    ConnectionFailed {
        /// Description of the connection failure.
        message: String,
    },

    /// A database query failed.
    #[error("Query failed: {query} - {message}")]
    QueryFailed {
        /// The query that failed (may be truncated).
        query: String,
        /// Description of the failure.
        message: String,
    },

    /// Participant not found.
    #[error("Participant not found: {participant_id}")]
    ParticipantNotFound {
        /// The participant ID that was not found.
        participant_id: String,
    },

    /// Database migration failed.
    #[error("Migration failed: {version} - {message}")]
    MigrationFailed {
        /// The migration version that failed.
        version: String,
        /// Description of the failure.
        message: String,
    },

    /// Internal storage error.
    #[error("Internal storage error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

/// Configuration errors.
///
/// These errors represent failures in configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required configuration is missing.
    #[error("Missing required: {var}")]
    MissingRequired {
        /// The missing variable name.
        var: String,
    },

    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}
