//! Park evaluation workflow tests.
//!
//! Tests the park flow end to end:
//! 1. Build the park catalog
//! 2. Register participants and submit ratings
//! 3. Produce statistics, outlier exclusion and the weighted ranking

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::collections::BTreeMap;

use lotus_ahp::ahp::{Choice, CriteriaSet, Intensity, PairwiseAnswer, Side};
use lotus_ahp::storage::SqliteStorage;
use lotus_ahp::survey::{
    Park, ParkEvaluationSubmission, ParkRating, ParticipantRole, Registration,
};
use lotus_ahp::traits::{RealTimeProvider, StorageTrait};
use lotus_ahp::workshop::{AhpSubmission, ParkEvaluationInput, WorkshopService, WorkshopSettings};
use serial_test::serial;
use tempfile::TempDir;

async fn create_service() -> (WorkshopService<SqliteStorage, RealTimeProvider>, SqliteStorage, TempDir)
{
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage = SqliteStorage::new(temp_dir.path().join("test.db"))
        .await
        .expect("Failed to create storage");
    let settings =
        WorkshopSettings::default().with_criteria(CriteriaSet::new(["shade", "play"]).unwrap());
    let service = WorkshopService::new(storage.clone(), RealTimeProvider, settings);
    (service, storage, temp_dir)
}

fn park(name: &str) -> Park {
    Park {
        name: name.into(),
        neighborhood: "Loreto".into(),
        description: String::new(),
        image_link: Some("https://example.org/park.jpg".into()),
        latitude: 45.7,
        longitude: 9.67,
    }
}

fn rating(park: &str, shade: u8, play: u8) -> ParkRating {
    ParkRating {
        park: park.into(),
        scores: BTreeMap::from([("shade".to_string(), shade), ("play".to_string(), play)]),
        feedback: None,
    }
}

async fn participant(
    service: &WorkshopService<SqliteStorage, RealTimeProvider>,
    table: &str,
) -> String {
    service
        .register(&Registration {
            neighborhood: "Loreto".into(),
            round_table: table.into(),
            age: 41,
            profession: String::new(),
            role: ParticipantRole::Citizen,
            motivation: String::new(),
            goal: String::new(),
            values: vec![],
            answers: BTreeMap::new(),
        })
        .await
        .unwrap()
        .participant
        .id
}

async fn rate(
    service: &WorkshopService<SqliteStorage, RealTimeProvider>,
    participant_id: &str,
    ratings: Vec<ParkRating>,
) {
    service
        .submit_park_evaluations(&ParkEvaluationInput {
            participant_id: participant_id.into(),
            round_table: None,
            submission: ParkEvaluationSubmission { ratings },
        })
        .await
        .unwrap();
}

#[tokio::test]
#[serial]
async fn test_catalog_upsert_by_name() {
    let (service, _storage, _temp_dir) = create_service().await;

    service.add_park(&park("Suardi")).await.unwrap();
    let mut updated = park("Suardi");
    updated.description = "Renovated in 2024".into();
    service.add_park(&updated).await.unwrap();
    service.add_park(&park("Goisis")).await.unwrap();

    let parks = service.parks().await.unwrap();
    assert_eq!(parks.len(), 2);
    assert_eq!(parks[0].name, "Goisis");
    assert_eq!(parks[1].description, "Renovated in 2024");
    assert_eq!(parks[1].image_url(), Some("https://example.org/park.jpg"));
}

#[tokio::test]
#[serial]
async fn test_full_park_report() {
    let (service, storage, _temp_dir) = create_service().await;
    for name in ["Calm", "Split", "Shady"] {
        service.add_park(&park(name)).await.unwrap();
    }

    let p1 = participant(&service, "Tavolo 1").await;
    let p2 = participant(&service, "Tavolo 1").await;

    rate(&service, &p1, vec![rating("Calm", 3, 3), rating("Split", 1, 3), rating("Shady", 5, 2)]).await;
    rate(&service, &p2, vec![rating("Calm", 4, 3), rating("Split", 5, 3), rating("Shady", 5, 2)]).await;

    // Shade slightly preferred by both: weights 0.75 / 0.25
    for respondent in [&p1, &p2] {
        service
            .submit_ahp(&AhpSubmission {
                respondent: Some(respondent.clone()),
                round_table: None,
                answers: vec![PairwiseAnswer::new(
                    0,
                    1,
                    Choice::favors(Side::First, Intensity::Slightly),
                )],
            })
            .await
            .unwrap();
    }

    assert_eq!(
        storage
            .get_park_evaluations(Some("Tavolo 1".into()))
            .await
            .unwrap()
            .len(),
        6
    );

    let analysis = service.park_report(Some("Tavolo 1".into())).await.unwrap();
    assert_eq!(analysis.statistics.len(), 3);

    let ranking: Vec<(&str, f64)> = analysis
        .report
        .scores
        .iter()
        .map(|s| (s.park.as_str(), s.score))
        .collect();
    // Shady: 5 * 0.75 + 2 * 0.25 = 4.25; Calm: 3.5 * 0.75 + 3 * 0.25 = 3.375
    assert_eq!(ranking[0], ("Shady", 4.25));
    assert_eq!(ranking[1].0, "Calm");
    assert!((ranking[1].1 - 3.38).abs() < 1e-9 || (ranking[1].1 - 3.37).abs() < 1e-9);

    assert_eq!(analysis.report.excluded.len(), 1);
    assert_eq!(analysis.report.excluded[0].park, "Split");
}

#[tokio::test]
#[serial]
async fn test_evaluation_rejects_unknown_park() {
    let (service, storage, _temp_dir) = create_service().await;
    service.add_park(&park("Suardi")).await.unwrap();
    let p1 = participant(&service, "Tavolo 1").await;

    let result = service
        .submit_park_evaluations(&ParkEvaluationInput {
            participant_id: p1,
            round_table: None,
            submission: ParkEvaluationSubmission {
                ratings: vec![rating("Suardi", 4, 4), rating("Atlantis", 4, 4)],
            },
        })
        .await;

    assert!(result.is_err());
    assert!(storage.get_park_evaluations(None).await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn test_resubmitted_park_replaces_earlier_rating() {
    let (service, storage, _temp_dir) = create_service().await;
    service.add_park(&park("Suardi")).await.unwrap();
    let p1 = participant(&service, "Tavolo 1").await;

    let mut revised = rating("Suardi", 2, 2);
    revised.feedback = Some("Too few benches".into());
    rate(&service, &p1, vec![rating("Suardi", 5, 5), revised]).await;

    let rows = storage.get_park_evaluations(None).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].score("shade"), Some(2));
    assert_eq!(rows[0].feedback.as_deref(), Some("Too few benches"));
}
