//! Trait definitions for mockable dependencies.
//!
//! This module defines traits for:
//! - [`StorageTrait`]: Database operations abstraction
//! - [`SecretProvider`]: Credential lookup abstraction
//! - [`TimeProvider`]: Time abstraction for testing
//!
//! # Mocking
//!
//! All traits are annotated with `#[cfg_attr(test, mockall::automock)]`
//! which generates mock implementations automatically for testing.
//!
//! # Example
//!
//! ```
//! use lotus_ahp::traits::{TimeProvider, RealTimeProvider};
//!
//! let time_provider = RealTimeProvider;
//! let now = time_provider.now();
//! println!("Current time: {now}");
//! ```

// Re-export storage row types used in trait signatures
pub use crate::storage::{StoredAhpSubmission, StoredAnswer, StoredParkEvaluation};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::SecretString;
use crate::error::StorageError;
use crate::survey::{Park, Participant, Question};

/// Storage trait for mocking.
///
/// This trait abstracts database operations to allow for
/// dependency injection and testing with mock implementations.
/// Submissions are append-only; only the park catalog is keyed and
/// replaced by name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageTrait: Send + Sync {
    /// Whether a participant id is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn participant_exists(&self, id: &str) -> Result<bool, StorageError>;

    /// Save a new participant together with their long-format answer rows.
    ///
    /// Either every row is written or none is.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn save_registration(
        &self,
        participant: &Participant,
        answers: &[StoredAnswer],
    ) -> Result<(), StorageError>;

    /// Get a participant by ID.
    ///
    /// Returns `None` if the participant doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn get_participant(&self, id: &str) -> Result<Option<Participant>, StorageError>;

    /// List participants, optionally restricted to one round table.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn list_participants(
        &self,
        round_table: Option<String>,
    ) -> Result<Vec<Participant>, StorageError>;

    /// Get every answer row of a participant.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn get_answers(&self, participant_id: &str) -> Result<Vec<StoredAnswer>, StorageError>;

    /// Save a registration question.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn save_question(&self, question: &Question) -> Result<(), StorageError>;

    /// Get the registration questions of a neighborhood, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn get_questions(&self, neighborhood: &str) -> Result<Vec<Question>, StorageError>;

    /// Append an AHP submission.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn save_ahp_submission(
        &self,
        submission: &StoredAhpSubmission,
    ) -> Result<(), StorageError>;

    /// Get AHP submissions, optionally restricted to one round table.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn get_ahp_submissions(
        &self,
        round_table: Option<String>,
    ) -> Result<Vec<StoredAhpSubmission>, StorageError>;

    /// Insert or replace a park in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn save_park(&self, park: &Park) -> Result<(), StorageError>;

    /// Get the park catalog ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn get_parks(&self) -> Result<Vec<Park>, StorageError>;

    /// Append park evaluations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn save_park_evaluations(
        &self,
        evaluations: &[StoredParkEvaluation],
    ) -> Result<(), StorageError>;

    /// Get park evaluations, optionally restricted to one round table.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn get_park_evaluations(
        &self,
        round_table: Option<String>,
    ) -> Result<Vec<StoredParkEvaluation>, StorageError>;
}

/// Secret lookup for mocking.
///
/// Implementations return `None` when a secret is absent or blank.
#[cfg_attr(test, mockall::automock)]
pub trait SecretProvider: Send + Sync {
    /// Look up a secret by key.
    fn get_secret(&self, key: &str) -> Option<SecretString>;
}

/// Time provider trait for mocking.
///
/// This trait abstracts time operations to allow for
/// deterministic testing with fixed timestamps.
#[cfg_attr(test, mockall::automock)]
pub trait TimeProvider: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Real time provider using system clock.
///
/// This is the production implementation that returns the actual current time.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    #[test]
    fn test_real_time_provider() {
        let provider = RealTimeProvider;
        let before = Utc::now();
        let now = provider.now();
        let after = Utc::now();

        assert!(now >= before);
        assert!(now <= after);
    }

    #[tokio::test]
    async fn test_mock_storage_participant_exists() {
        let mut mock = MockStorageTrait::new();
        mock.expect_participant_exists()
            .with(eq("taken"))
            .returning(|_| Ok(true));
        mock.expect_participant_exists()
            .with(eq("free"))
            .returning(|_| Ok(false));

        assert!(mock.participant_exists("taken").await.unwrap());
        assert!(!mock.participant_exists("free").await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_storage_error() {
        let mut mock = MockStorageTrait::new();
        mock.expect_get_participant().returning(|_id| {
            Err(StorageError::ConnectionFailed {
                message: "Test error".to_string(),
            })
        });

        let result = mock.get_participant("test").await;
        assert!(matches!(result, Err(StorageError::ConnectionFailed { .. })));
    }

    #[tokio::test]
    async fn test_mock_storage_round_table_filter() {
        let mut mock = MockStorageTrait::new();
        mock.expect_get_ahp_submissions()
            .with(eq(Some("Tavolo 1".to_string())))
            .times(1)
            .returning(|_| Ok(vec![]));

        let result = mock
            .get_ahp_submissions(Some("Tavolo 1".to_string()))
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_mock_secret_provider() {
        let mut mock = MockSecretProvider::new();
        mock.expect_get_secret()
            .with(eq("ADMIN_USER"))
            .returning(|_| Some(SecretString::new("admin")));
        mock.expect_get_secret().returning(|_| None);

        assert_eq!(mock.get_secret("ADMIN_USER").unwrap().expose(), "admin");
        assert!(mock.get_secret("ADMIN_PASS").is_none());
    }

    #[test]
    fn test_mock_time_provider_multiple_calls() {
        let time1 = Utc::now();
        let time2 = time1 + chrono::Duration::hours(1);

        let mut mock = MockTimeProvider::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_now()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(time1);
        mock.expect_now()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(time2);

        assert_eq!(mock.now(), time1);
        assert_eq!(mock.now(), time2);
    }
}
