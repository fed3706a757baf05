//! Test utilities and mock factories.
//!
//! This module provides shared testing infrastructure:
//! - Mock implementations for traits
//! - Workshop fixtures (registrations, participants, parks, answers)
//!
//! Only compiled for tests (`#[cfg(test)]`).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::ahp::{Choice, CriteriaSet, Intensity, PairwiseAnswer, Side};
use crate::config::SecretString;
use crate::error::StorageError;
use crate::survey::{CoreValue, Park, ParkRating, Participant, ParticipantRole, Registration};
use crate::traits::{MockSecretProvider, MockStorageTrait, MockTimeProvider};

/// Create a mock time provider that returns a fixed timestamp.
///
/// # Example
///
/// ```ignore
/// let fixed_time = Utc::now();
/// let mock = mock_time(fixed_time);
/// assert_eq!(mock.now(), fixed_time);
/// ```
#[must_use]
pub fn mock_time(time: DateTime<Utc>) -> MockTimeProvider {
    let mut mock = MockTimeProvider::new();
    mock.expect_now().return_const(time);
    mock
}

/// Create a mock time provider from an ISO 8601 timestamp string.
///
/// # Panics
///
/// Panics if the timestamp string is invalid.
#[must_use]
pub fn mock_time_str(timestamp: &str) -> MockTimeProvider {
    let time = timestamp
        .parse::<DateTime<Utc>>()
        .expect("Invalid timestamp format");
    mock_time(time)
}

/// Create a mock secret provider backed by a fixed key/value list.
#[must_use]
pub fn mock_secrets(pairs: &[(&str, &str)]) -> MockSecretProvider {
    let secrets: BTreeMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    let mut mock = MockSecretProvider::new();
    mock.expect_get_secret()
        .returning(move |key| secrets.get(key).map(|v| SecretString::new(v.clone())));
    mock
}

/// Create a mock storage whose lookups all fail with `error`.
#[must_use]
pub fn mock_storage_error(error: StorageError) -> MockStorageTrait {
    let mut mock = MockStorageTrait::new();
    let e1 = error.clone();
    mock.expect_get_questions()
        .returning(move |_| Err(e1.clone()));
    let e2 = error.clone();
    mock.expect_get_participant()
        .returning(move |_| Err(e2.clone()));
    let e3 = error.clone();
    mock.expect_get_ahp_submissions()
        .returning(move |_| Err(e3.clone()));
    mock.expect_get_park_evaluations()
        .returning(move |_| Err(error.clone()));
    mock
}

/// A valid registration without dynamic answers.
#[must_use]
pub fn test_registration(neighborhood: &str, round_table: &str) -> Registration {
    Registration {
        neighborhood: neighborhood.to_string(),
        round_table: round_table.to_string(),
        age: 34,
        profession: "Architect".to_string(),
        role: ParticipantRole::Citizen,
        motivation: "More shade".to_string(),
        goal: "Better parks".to_string(),
        values: vec![CoreValue::Sustainability, CoreValue::Inclusion],
        answers: BTreeMap::new(),
    }
}

/// A registered participant.
#[must_use]
pub fn test_participant(id: &str, round_table: &str) -> Participant {
    Participant::from_registration(
        id,
        &test_registration("Loreto", round_table),
        "2025-03-01T10:00:00Z".parse().unwrap(),
    )
}

/// A catalog park.
#[must_use]
pub fn test_park(name: &str) -> Park {
    Park {
        name: name.to_string(),
        neighborhood: "Loreto".to_string(),
        description: format!("{name} park"),
        image_link: None,
        latitude: 45.69,
        longitude: 9.67,
    }
}

/// A rating giving `score` to every criterion.
#[must_use]
pub fn test_rating(park: &str, criteria: &CriteriaSet, score: u8) -> ParkRating {
    ParkRating {
        park: park.to_string(),
        scores: criteria.iter().map(|c| (c.to_string(), score)).collect(),
        feedback: None,
    }
}

/// Answers where every earlier criterion is slightly preferred to every
/// later one.
#[must_use]
pub fn ordered_answers(criteria: &CriteriaSet) -> Vec<PairwiseAnswer> {
    criteria
        .pairs()
        .map(|(i, j)| PairwiseAnswer::new(i, j, Choice::favors(Side::First, Intensity::Slightly)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{SecretProvider, StorageTrait, TimeProvider};
    use chrono::Datelike;

    #[tokio::test]
    async fn test_mock_storage_error() {
        let mock = mock_storage_error(StorageError::ConnectionFailed {
            message: "Database down".to_string(),
        });

        let result = mock.get_participant("test").await;
        assert!(matches!(result, Err(StorageError::ConnectionFailed { .. })));
        assert!(mock.get_ahp_submissions(None).await.is_err());
    }

    #[test]
    fn test_mock_time_str() {
        let mock = mock_time_str("2024-01-15T12:00:00Z");
        let now = mock.now();
        assert_eq!(now.year(), 2024);
        assert_eq!(now.month(), 1);
        assert_eq!(now.day(), 15);
    }

    #[test]
    fn test_mock_secrets() {
        let mock = mock_secrets(&[("ADMIN_USER", "root")]);
        assert!(mock.get_secret("ADMIN_USER").unwrap().matches("root"));
        assert!(mock.get_secret("ADMIN_PASS").is_none());
    }

    #[test]
    fn test_fixtures_are_valid() {
        assert!(test_registration("Loreto", "Tavolo 1").validate().is_ok());
        assert!(test_park("Suardi").validate().is_ok());
        assert_eq!(test_participant("abc", "Tavolo 1").round_table, "Tavolo 1");
    }

    #[test]
    fn test_ordered_answers_cover_all_pairs() {
        let criteria = CriteriaSet::green_space();
        assert_eq!(ordered_answers(&criteria).len(), criteria.pair_count());
    }
}
