//! Registration workflow tests.
//!
//! Tests the complete registration flow:
//! 1. Define neighborhood questions
//! 2. Register participants with and without answers
//! 3. Verify participant and long-format answer rows

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;

use lotus_ahp::error::{AppError, SurveyError};
use lotus_ahp::storage::SqliteStorage;
use lotus_ahp::survey::{
    is_valid_participant_id, AnswerValue, CoreValue, ParticipantRole, Question, QuestionKind,
    Registration,
};
use lotus_ahp::traits::{RealTimeProvider, StorageTrait};
use lotus_ahp::workshop::{WorkshopService, WorkshopSettings};
use serial_test::serial;
use tempfile::TempDir;

/// Create a service over a database in a temporary directory.
async fn create_service() -> (WorkshopService<SqliteStorage, RealTimeProvider>, SqliteStorage, TempDir)
{
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let storage = SqliteStorage::new(&db_path)
        .await
        .expect("Failed to create storage");
    let service = WorkshopService::new(
        storage.clone(),
        RealTimeProvider,
        WorkshopSettings::default(),
    );
    (service, storage, temp_dir)
}

fn registration(round_table: &str) -> Registration {
    Registration {
        neighborhood: "Loreto".into(),
        round_table: round_table.into(),
        age: 52,
        profession: "Schoolteacher".into(),
        role: ParticipantRole::EnvironmentalEducator,
        motivation: "Trees for the school".into(),
        goal: "Shade in the yard".into(),
        values: vec![CoreValue::Collaboration, CoreValue::Sustainability],
        answers: BTreeMap::new(),
    }
}

#[tokio::test]
#[serial]
async fn test_register_with_dynamic_questions() {
    let (service, storage, _temp_dir) = create_service().await;

    for question in [
        Question::new("Loreto", "Transport", QuestionKind::Select, "Bike,Bus,Car"),
        Question::new("Loreto", "Activities", QuestionKind::Multiselect, "Walk,Sport,Read"),
        Question::new("Loreto", "Visits per month", QuestionKind::Slider, "0,10,30"),
        Question::new("Loreto", "Notes", QuestionKind::Text, ""),
    ] {
        service.add_question(&question).await.unwrap();
    }

    let mut form = registration("Tavolo 1");
    form.answers.insert(
        "Activities".into(),
        AnswerValue::List(vec!["Walk".into(), "Read".into()]),
    );
    form.answers
        .insert("Transport".into(), AnswerValue::Text("Bike".into()));

    let receipt = service.register(&form).await.unwrap();
    assert!(is_valid_participant_id(&receipt.participant.id));
    // Text question without an answer is skipped
    assert_eq!(receipt.answers, 3);

    let answers = storage.get_answers(&receipt.participant.id).await.unwrap();
    let by_question: BTreeMap<&str, &str> = answers
        .iter()
        .map(|a| (a.question.as_str(), a.response.as_str()))
        .collect();
    assert_eq!(by_question["Transport"], "Bike");
    assert_eq!(by_question["Activities"], "Walk, Read");
    // Slider default is the midpoint of 0..=30
    assert_eq!(by_question["Visits per month"], "15");

    let stored = storage
        .get_participant(&receipt.participant.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.role, ParticipantRole::EnvironmentalEducator);
    assert_eq!(stored.values, form.values);
}

#[tokio::test]
#[serial]
async fn test_register_rejects_unknown_question() {
    let (service, storage, _temp_dir) = create_service().await;

    let mut form = registration("Tavolo 1");
    form.answers
        .insert("Not asked".into(), AnswerValue::Text("x".into()));

    assert!(service.register(&form).await.is_err());
    assert!(storage.list_participants(None).await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn test_participants_listed_by_round_table() {
    let (service, storage, _temp_dir) = create_service().await;

    let first = service.register(&registration("Tavolo 1")).await.unwrap();
    let second = service.register(&registration("Tavolo 1")).await.unwrap();
    service.register(&registration("Tavolo 2")).await.unwrap();

    assert_ne!(first.participant.id, second.participant.id);
    assert_eq!(storage.list_participants(None).await.unwrap().len(), 3);
    assert_eq!(
        storage
            .list_participants(Some("Tavolo 1".into()))
            .await
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
#[serial]
async fn test_questions_are_per_neighborhood() {
    let (service, _storage, _temp_dir) = create_service().await;

    service
        .add_question(&Question::new("Loreto", "Q1", QuestionKind::Radio, "Yes,No"))
        .await
        .unwrap();
    service
        .add_question(&Question::new("Redona", "Q2", QuestionKind::Text, ""))
        .await
        .unwrap();

    let loreto = service.questions("Loreto").await.unwrap();
    assert_eq!(loreto.len(), 1);
    assert_eq!(loreto[0].values, vec!["Yes".to_string(), "No".to_string()]);
    assert!(service.questions("Celadina").await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn test_duplicate_question_text_is_rejected() {
    let (service, storage, _temp_dir) = create_service().await;

    service
        .add_question(&Question::new("Loreto", "Visits", QuestionKind::Radio, "Yes,No"))
        .await
        .unwrap();
    let err = service
        .add_question(&Question::new("Loreto", "Visits", QuestionKind::Slider, "0,10"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Survey(SurveyError::DuplicateQuestion { ref question, .. }) if question == "Visits"
    ));
    // Same text in another neighborhood is a different question
    service
        .add_question(&Question::new("Redona", "Visits", QuestionKind::Slider, "0,10"))
        .await
        .unwrap();

    // Registration still works and stores one row for the question
    let receipt = service.register(&registration("Tavolo 1")).await.unwrap();
    assert_eq!(receipt.answers, 1);
    let mut form = registration("Tavolo 1");
    form.answers
        .insert("Visits".into(), AnswerValue::Text("No".into()));
    let receipt = service.register(&form).await.unwrap();
    let answers = storage.get_answers(&receipt.participant.id).await.unwrap();
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].response, "No");
}
