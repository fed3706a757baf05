//! Park catalog and park evaluation storage operations.

#![allow(clippy::missing_errors_doc)]

use crate::error::StorageError;
use crate::survey::Park;
use sqlx::Row;

use super::core::SqliteStorage;
use super::types::StoredParkEvaluation;

impl SqliteStorage {
    /// Insert a park, replacing any park with the same name.
    pub async fn upsert_park(&self, park: &Park) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO parks (name, neighborhood, description, image_link, latitude, longitude)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(name) DO UPDATE SET
                neighborhood = excluded.neighborhood,
                description = excluded.description,
                image_link = excluded.image_link,
                latitude = excluded.latitude,
                longitude = excluded.longitude",
        )
        .bind(&park.name)
        .bind(&park.neighborhood)
        .bind(&park.description)
        .bind(&park.image_link)
        .bind(park.latitude)
        .bind(park.longitude)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::query_error("UPSERT parks", format!("{e}")))?;

        Ok(())
    }

    /// Get every park ordered by name.
    pub async fn fetch_parks(&self) -> Result<Vec<Park>, StorageError> {
        let rows = sqlx::query(
            "SELECT name, neighborhood, description, image_link, latitude, longitude
             FROM parks ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT parks", format!("{e}")))?;

        Ok(rows
            .iter()
            .map(|row| Park {
                name: row.get("name"),
                neighborhood: row.get("neighborhood"),
                description: row.get("description"),
                image_link: row.get("image_link"),
                latitude: row.get("latitude"),
                longitude: row.get("longitude"),
            })
            .collect())
    }

    /// Append park evaluations in one transaction.
    pub async fn insert_park_evaluations(
        &self,
        evaluations: &[StoredParkEvaluation],
    ) -> Result<(), StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::query_error("BEGIN park_evaluations", format!("{e}")))?;

        for evaluation in evaluations {
            let scores = Self::to_json("scores", &evaluation.scores)?;
            sqlx::query(
                "INSERT INTO park_evaluations (id, created_at, participant_id, round_table, park,
                                               scores, feedback)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&evaluation.id)
            .bind(evaluation.created_at.to_rfc3339())
            .bind(&evaluation.participant_id)
            .bind(&evaluation.round_table)
            .bind(&evaluation.park)
            .bind(&scores)
            .bind(&evaluation.feedback)
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::query_error("INSERT park_evaluations", format!("{e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| Self::query_error("COMMIT park_evaluations", format!("{e}")))?;

        Ok(())
    }

    /// Get park evaluations, optionally for one round table.
    pub async fn fetch_park_evaluations(
        &self,
        round_table: Option<&str>,
    ) -> Result<Vec<StoredParkEvaluation>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, created_at, participant_id, round_table, park, scores, feedback
             FROM park_evaluations
             WHERE ?1 IS NULL OR round_table = ?1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(round_table)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT park_evaluations", format!("{e}")))?;

        rows.iter()
            .map(|row| {
                let created_at: String = row.get("created_at");
                let scores: String = row.get("scores");
                Ok(StoredParkEvaluation {
                    id: row.get("id"),
                    created_at: Self::parse_datetime(&created_at)?,
                    participant_id: row.get("participant_id"),
                    round_table: row.get("round_table"),
                    park: row.get("park"),
                    scores: Self::from_json("scores", &scores)?,
                    feedback: row.get("feedback"),
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::storage::core::tests::test_storage;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use std::collections::BTreeMap;

    fn park(name: &str, description: &str) -> Park {
        Park {
            name: name.into(),
            neighborhood: "Centro".into(),
            description: description.into(),
            image_link: Some("https://example.org/p.jpg".into()),
            latitude: 45.6983,
            longitude: 9.6773,
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_upsert_replaces_by_name() {
        let storage = test_storage().await;
        storage.upsert_park(&park("Parco Suardi", "old")).await.unwrap();
        storage.upsert_park(&park("Parco Goisis", "")).await.unwrap();
        storage.upsert_park(&park("Parco Suardi", "new")).await.unwrap();

        let parks = storage.fetch_parks().await.unwrap();
        assert_eq!(parks.len(), 2);
        assert_eq!(parks[0].name, "Parco Goisis");
        assert_eq!(parks[1].description, "new");
        assert_eq!(parks[1].latitude, 45.6983);
    }

    #[tokio::test]
    #[serial]
    async fn test_park_evaluations_roundtrip_and_filter() {
        let storage = test_storage().await;
        let scores = BTreeMap::from([
            ("Biodiversity".to_string(), 5_u8),
            ("Social function".to_string(), 2_u8),
        ]);
        let evaluations = vec![
            StoredParkEvaluation::new("e-1", "p1", "Tavolo 1", "Parco Suardi", scores.clone())
                .with_feedback("bello"),
            StoredParkEvaluation::new("e-2", "p2", "Tavolo 2", "Parco Suardi", scores),
        ];
        storage.insert_park_evaluations(&evaluations).await.unwrap();

        let all = storage.fetch_park_evaluations(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let table_one = storage.fetch_park_evaluations(Some("Tavolo 1")).await.unwrap();
        assert_eq!(table_one.len(), 1);
        assert_eq!(table_one[0].score("Biodiversity"), Some(5));
        assert_eq!(table_one[0].feedback.as_deref(), Some("bello"));
    }

    #[tokio::test]
    #[serial]
    async fn test_failed_batch_is_rolled_back() {
        let storage = test_storage().await;
        let e = StoredParkEvaluation::new("dup", "p1", "T", "Parco Suardi", BTreeMap::new());
        let result = storage
            .insert_park_evaluations(&[e.clone(), e])
            .await;
        assert!(result.is_err());
        assert!(storage.fetch_park_evaluations(None).await.unwrap().is_empty());
    }
}
