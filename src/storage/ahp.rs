//! AHP submission storage operations.

#![allow(clippy::missing_errors_doc)]

use crate::error::StorageError;
use sqlx::Row;

use super::core::SqliteStorage;
use super::types::StoredAhpSubmission;

impl SqliteStorage {
    /// Insert an AHP submission.
    pub async fn insert_ahp_submission(
        &self,
        submission: &StoredAhpSubmission,
    ) -> Result<(), StorageError> {
        let criteria = Self::to_json("criteria", &submission.criteria)?;
        let matrix = Self::to_json("matrix", &submission.matrix)?;
        let weights = Self::to_json("weights", &submission.weights)?;

        sqlx::query(
            "INSERT INTO ahp_submissions (id, created_at, respondent, round_table, criteria,
                                          matrix, weights, consistency_ratio)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&submission.id)
        .bind(submission.created_at.to_rfc3339())
        .bind(&submission.respondent)
        .bind(&submission.round_table)
        .bind(&criteria)
        .bind(&matrix)
        .bind(&weights)
        .bind(submission.consistency_ratio)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::query_error("INSERT ahp_submissions", format!("{e}")))?;

        Ok(())
    }

    /// Get AHP submissions in submission order, optionally for one round table.
    pub async fn fetch_ahp_submissions(
        &self,
        round_table: Option<&str>,
    ) -> Result<Vec<StoredAhpSubmission>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, created_at, respondent, round_table, criteria, matrix, weights,
                    consistency_ratio
             FROM ahp_submissions
             WHERE ?1 IS NULL OR round_table = ?1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(round_table)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT ahp_submissions", format!("{e}")))?;

        rows.iter().map(Self::row_to_ahp_submission).collect()
    }

    /// Convert a database row to a `StoredAhpSubmission`.
    fn row_to_ahp_submission(
        row: &sqlx::sqlite::SqliteRow,
    ) -> Result<StoredAhpSubmission, StorageError> {
        let created_at: String = row.get("created_at");
        let criteria: String = row.get("criteria");
        let matrix: String = row.get("matrix");
        let weights: String = row.get("weights");

        Ok(StoredAhpSubmission {
            id: row.get("id"),
            created_at: Self::parse_datetime(&created_at)?,
            respondent: row.get("respondent"),
            round_table: row.get("round_table"),
            criteria: Self::from_json("criteria", &criteria)?,
            matrix: Self::from_json("matrix", &matrix)?,
            weights: Self::from_json("weights", &weights)?,
            consistency_ratio: row.get("consistency_ratio"),
        })
    }
}
