//! Participant, answer and question storage operations.

#![allow(clippy::missing_errors_doc)]

use crate::error::StorageError;
use crate::survey::{CoreValue, Participant, ParticipantRole, Question, QuestionKind};
use sqlx::{Row, SqliteConnection};

use super::core::SqliteStorage;
use super::types::StoredAnswer;

impl SqliteStorage {
    /// Insert a participant.
    pub async fn insert_participant(&self, participant: &Participant) -> Result<(), StorageError> {
        self.insert_registration(participant, &[]).await
    }

    /// Insert a participant and their answer rows in one transaction.
    pub async fn insert_registration(
        &self,
        participant: &Participant,
        answers: &[StoredAnswer],
    ) -> Result<(), StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::query_error("BEGIN registration", format!("{e}")))?;

        Self::write_participant(&mut *tx, participant).await?;
        for answer in answers {
            Self::write_answer(&mut *tx, answer).await?;
        }

        tx.commit()
            .await
            .map_err(|e| Self::query_error("COMMIT registration", format!("{e}")))?;

        Ok(())
    }

    async fn write_participant(
        conn: &mut SqliteConnection,
        participant: &Participant,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO participants (id, neighborhood, round_table, age, profession, role,
                                       motivation, goal, participant_values, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&participant.id)
        .bind(&participant.neighborhood)
        .bind(&participant.round_table)
        .bind(i64::from(participant.age))
        .bind(&participant.profession)
        .bind(participant.role.as_str())
        .bind(&participant.motivation)
        .bind(&participant.goal)
        .bind(participant.values_csv())
        .bind(participant.created_at.to_rfc3339())
        .execute(conn)
        .await
        .map_err(|e| Self::query_error("INSERT participants", format!("{e}")))?;

        Ok(())
    }

    async fn write_answer(
        conn: &mut SqliteConnection,
        answer: &StoredAnswer,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO answers (created_at, participant_id, neighborhood, question, response)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(answer.created_at.to_rfc3339())
        .bind(&answer.participant_id)
        .bind(&answer.neighborhood)
        .bind(&answer.question)
        .bind(&answer.response)
        .execute(conn)
        .await
        .map_err(|e| Self::query_error("INSERT answers", format!("{e}")))?;

        Ok(())
    }

    /// Whether a participant id exists.
    pub async fn has_participant(&self, id: &str) -> Result<bool, StorageError> {
        let row = sqlx::query("SELECT 1 FROM participants WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::query_error("SELECT participants", format!("{e}")))?;

        Ok(row.is_some())
    }

    /// Get a participant by ID.
    pub async fn fetch_participant(&self, id: &str) -> Result<Option<Participant>, StorageError> {
        let row = sqlx::query(
            "SELECT id, neighborhood, round_table, age, profession, role, motivation, goal,
                    participant_values, created_at
             FROM participants WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT participants", format!("{e}")))?;

        row.as_ref().map(Self::row_to_participant).transpose()
    }

    /// List participants, optionally for one round table.
    pub async fn fetch_participants(
        &self,
        round_table: Option<&str>,
    ) -> Result<Vec<Participant>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, neighborhood, round_table, age, profession, role, motivation, goal,
                    participant_values, created_at
             FROM participants
             WHERE ?1 IS NULL OR round_table = ?1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(round_table)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT participants", format!("{e}")))?;

        rows.iter().map(Self::row_to_participant).collect()
    }

    /// Get all answers of a participant in insertion order.
    pub async fn fetch_answers(
        &self,
        participant_id: &str,
    ) -> Result<Vec<StoredAnswer>, StorageError> {
        let rows = sqlx::query(
            "SELECT created_at, participant_id, neighborhood, question, response
             FROM answers WHERE participant_id = ? ORDER BY seq ASC",
        )
        .bind(participant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT answers", format!("{e}")))?;

        rows.iter()
            .map(|row| {
                let created_at: String = row.get("created_at");
                Ok(StoredAnswer {
                    created_at: Self::parse_datetime(&created_at)?,
                    participant_id: row.get("participant_id"),
                    neighborhood: row.get("neighborhood"),
                    question: row.get("question"),
                    response: row.get("response"),
                })
            })
            .collect()
    }

    /// Insert a registration question.
    pub async fn insert_question(&self, question: &Question) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO questions (neighborhood, question, question_type, question_value)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&question.neighborhood)
        .bind(&question.text)
        .bind(question.kind.as_str())
        .bind(question.values_csv())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::query_error("INSERT questions", format!("{e}")))?;

        Ok(())
    }

    /// Get the questions of a neighborhood in insertion order.
    pub async fn fetch_questions(&self, neighborhood: &str) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            "SELECT neighborhood, question, question_type, question_value
             FROM questions WHERE neighborhood = ? ORDER BY seq ASC",
        )
        .bind(neighborhood)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT questions", format!("{e}")))?;

        Ok(rows
            .iter()
            .map(|row| {
                let neighborhood: String = row.get("neighborhood");
                let text: String = row.get("question");
                let kind: String = row.get("question_type");
                let values: String = row.get("question_value");
                let kind = kind.parse().unwrap_or(QuestionKind::Text);
                Question::new(neighborhood, text, kind, &values)
            })
            .collect())
    }

    /// Convert a database row to a `Participant`.
    fn row_to_participant(row: &sqlx::sqlite::SqliteRow) -> Result<Participant, StorageError> {
        let age: i64 = row.get("age");
        let role: String = row.get("role");
        let values: String = row.get("participant_values");
        let created_at: String = row.get("created_at");

        let role = ParticipantRole::from_stored(&role).ok_or_else(|| StorageError::Internal {
            message: format!("Unknown participant role '{role}'"),
        })?;
        let values = values
            .split(", ")
            .filter(|v| !v.is_empty())
            .map(|v| {
                CoreValue::from_stored(v).ok_or_else(|| StorageError::Internal {
                    message: format!("Unknown participant value '{v}'"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Participant {
            id: row.get("id"),
            neighborhood: row.get("neighborhood"),
            round_table: row.get("round_table"),
            age: u8::try_from(age).map_err(|_| StorageError::Internal {
                message: format!("Participant age {age} out of range"),
            })?,
            profession: row.get("profession"),
            role,
            motivation: row.get("motivation"),
            goal: row.get("goal"),
            values,
            created_at: Self::parse_datetime(&created_at)?,
        })
    }
}
