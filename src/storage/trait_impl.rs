//! `StorageTrait` implementation for `SqliteStorage`.

#![allow(clippy::missing_errors_doc)]

use async_trait::async_trait;

use crate::error::StorageError;
use crate::survey::{Park, Participant, Question};
use crate::traits::StorageTrait;

use super::core::SqliteStorage;
use super::types::{StoredAhpSubmission, StoredAnswer, StoredParkEvaluation};

#[async_trait]
impl StorageTrait for SqliteStorage {
    async fn participant_exists(&self, id: &str) -> Result<bool, StorageError> {
        self.has_participant(id).await
    }

    async fn save_registration(
        &self,
        participant: &Participant,
        answers: &[StoredAnswer],
    ) -> Result<(), StorageError> {
        self.insert_registration(participant, answers).await
    }

    async fn get_participant(&self, id: &str) -> Result<Option<Participant>, StorageError> {
        self.fetch_participant(id).await
    }

    async fn list_participants(
        &self,
        round_table: Option<String>,
    ) -> Result<Vec<Participant>, StorageError> {
        self.fetch_participants(round_table.as_deref()).await
    }

    async fn get_answers(&self, participant_id: &str) -> Result<Vec<StoredAnswer>, StorageError> {
        self.fetch_answers(participant_id).await
    }

    async fn save_question(&self, question: &Question) -> Result<(), StorageError> {
        self.insert_question(question).await
    }

    async fn get_questions(&self, neighborhood: &str) -> Result<Vec<Question>, StorageError> {
        self.fetch_questions(neighborhood).await
    }

    async fn save_ahp_submission(
        &self,
        submission: &StoredAhpSubmission,
    ) -> Result<(), StorageError> {
        self.insert_ahp_submission(submission).await
    }

    async fn get_ahp_submissions(
        &self,
        round_table: Option<String>,
    ) -> Result<Vec<StoredAhpSubmission>, StorageError> {
        self.fetch_ahp_submissions(round_table.as_deref()).await
    }

    async fn save_park(&self, park: &Park) -> Result<(), StorageError> {
        self.upsert_park(park).await
    }

    async fn get_parks(&self) -> Result<Vec<Park>, StorageError> {
        self.fetch_parks().await
    }

    async fn save_park_evaluations(
        &self,
        evaluations: &[StoredParkEvaluation],
    ) -> Result<(), StorageError> {
        if evaluations.is_empty() {
            return Ok(());
        }
        self.insert_park_evaluations(evaluations).await
    }

    async fn get_park_evaluations(
        &self,
        round_table: Option<String>,
    ) -> Result<Vec<StoredParkEvaluation>, StorageError> {
        self.fetch_park_evaluations(round_table.as_deref()).await
    }
}
