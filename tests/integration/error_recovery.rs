//! Error recovery tests.
//!
//! Rejected submissions must leave the store untouched and later valid
//! submissions must still succeed.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;

use lotus_ahp::ahp::{Choice, MissingAnswerPolicy, PairwiseAnswer};
use lotus_ahp::error::{AhpError, AppError, StorageError, SurveyError};
use lotus_ahp::storage::SqliteStorage;
use lotus_ahp::survey::{Park, ParkEvaluationSubmission, ParkRating};
use lotus_ahp::traits::{RealTimeProvider, StorageTrait};
use lotus_ahp::workshop::{AhpSubmission, ParkEvaluationInput, WorkshopService, WorkshopSettings};
use serial_test::serial;
use tempfile::TempDir;

async fn create_service(
    settings: WorkshopSettings,
) -> (WorkshopService<SqliteStorage, RealTimeProvider>, SqliteStorage, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage = SqliteStorage::new(temp_dir.path().join("test.db"))
        .await
        .expect("Failed to create storage");
    let service = WorkshopService::new(storage.clone(), RealTimeProvider, settings);
    (service, storage, temp_dir)
}

#[tokio::test]
#[serial]
async fn test_invalid_pairs_store_nothing() {
    let (service, storage, _temp_dir) = create_service(WorkshopSettings::default()).await;

    let duplicate = AhpSubmission {
        respondent: Some("x".into()),
        round_table: Some("T".into()),
        answers: vec![
            PairwiseAnswer::new(0, 1, Choice::Equal),
            PairwiseAnswer::new(1, 0, Choice::Equal),
        ],
    };
    let err = service.submit_ahp(&duplicate).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Ahp(AhpError::DuplicateAnswer { i: 0, j: 1 })
    ));

    let out_of_range = AhpSubmission {
        answers: vec![PairwiseAnswer::new(0, 7, Choice::Equal)],
        ..duplicate.clone()
    };
    assert!(matches!(
        service.submit_ahp(&out_of_range).await.unwrap_err(),
        AppError::Ahp(AhpError::InvalidPair { .. })
    ));

    assert!(storage.get_ahp_submissions(None).await.unwrap().is_empty());

    // A valid submission still goes through afterwards
    let valid = AhpSubmission {
        answers: vec![],
        ..duplicate
    };
    service.submit_ahp(&valid).await.unwrap();
    assert_eq!(storage.get_ahp_submissions(None).await.unwrap().len(), 1);
}

#[tokio::test]
#[serial]
async fn test_reject_policy_requires_every_pair() {
    let settings = WorkshopSettings {
        missing_answer_policy: MissingAnswerPolicy::Reject,
        ..WorkshopSettings::default()
    };
    let (service, _storage, _temp_dir) = create_service(settings).await;

    let partial = AhpSubmission {
        respondent: None,
        round_table: None,
        answers: vec![PairwiseAnswer::new(0, 1, Choice::Equal)],
    };
    assert!(matches!(
        service.submit_ahp(&partial).await.unwrap_err(),
        AppError::Ahp(AhpError::MissingAnswer { i: 0, j: 2 })
    ));
}

#[tokio::test]
#[serial]
async fn test_consensus_on_empty_store() {
    let (service, _storage, _temp_dir) = create_service(WorkshopSettings::default()).await;
    assert!(matches!(
        service.consensus(None).await.unwrap_err(),
        AppError::Ahp(AhpError::EmptyAggregation)
    ));
}

#[tokio::test]
#[serial]
async fn test_ratings_from_unregistered_participant() {
    let (service, storage, _temp_dir) = create_service(WorkshopSettings::default()).await;
    service
        .add_park(&Park {
            name: "Suardi".into(),
            neighborhood: "Loreto".into(),
            description: String::new(),
            image_link: None,
            latitude: 45.7,
            longitude: 9.67,
        })
        .await
        .unwrap();

    let input = ParkEvaluationInput {
        participant_id: "nobody".into(),
        round_table: None,
        submission: ParkEvaluationSubmission {
            ratings: vec![ParkRating {
                park: "Suardi".into(),
                scores: BTreeMap::new(),
                feedback: None,
            }],
        },
    };
    assert!(matches!(
        service.submit_park_evaluations(&input).await.unwrap_err(),
        AppError::Storage(StorageError::ParticipantNotFound { .. })
    ));
    assert!(storage.get_park_evaluations(None).await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn test_out_of_range_score() {
    let (service, _storage, _temp_dir) = create_service(WorkshopSettings::default()).await;
    let registered = service
        .register(&lotus_ahp::survey::Registration {
            neighborhood: "Loreto".into(),
            round_table: "T".into(),
            age: 30,
            profession: String::new(),
            role: lotus_ahp::survey::ParticipantRole::Citizen,
            motivation: String::new(),
            goal: String::new(),
            values: vec![],
            answers: BTreeMap::new(),
        })
        .await
        .unwrap();
    service
        .add_park(&Park {
            name: "Suardi".into(),
            neighborhood: "Loreto".into(),
            description: String::new(),
            image_link: None,
            latitude: 45.7,
            longitude: 9.67,
        })
        .await
        .unwrap();

    let input = ParkEvaluationInput {
        participant_id: registered.participant.id,
        round_table: None,
        submission: ParkEvaluationSubmission {
            ratings: vec![ParkRating {
                park: "Suardi".into(),
                scores: BTreeMap::from([("Biodiversity".to_string(), 6)]),
                feedback: None,
            }],
        },
    };
    assert!(matches!(
        service.submit_park_evaluations(&input).await.unwrap_err(),
        AppError::Survey(SurveyError::ScoreOutOfRange { score: 6, .. })
    ));
}
