//! AHP workflow tests.
//!
//! Tests the questionnaire flow end to end:
//! 1. Register a participant
//! 2. Submit AHP questionnaires (named, anonymous, explicit table)
//! 3. Read round-table statistics and consensus weights back

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::collections::BTreeMap;

use lotus_ahp::ahp::{Choice, CriteriaSet, Intensity, PairwiseAnswer, Side};
use lotus_ahp::storage::SqliteStorage;
use lotus_ahp::survey::{ParticipantRole, Registration};
use lotus_ahp::traits::{RealTimeProvider, StorageTrait};
use lotus_ahp::workshop::{
    AhpSubmission, WorkshopService, WorkshopSettings, ANONYMOUS_RESPONDENT,
    UNSPECIFIED_ROUND_TABLE,
};
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

fn favor(i: usize, j: usize, side: Side, intensity: Intensity) -> PairwiseAnswer {
    PairwiseAnswer::new(i, j, Choice::favors(side, intensity))
}

fn submission(respondent: &str, table: Option<&str>, answers: Vec<PairwiseAnswer>) -> AhpSubmission {
    AhpSubmission {
        respondent: Some(respondent.into()),
        round_table: table.map(Into::into),
        answers,
    }
}

#[tokio::test]
#[serial]
async fn test_submission_stored_with_rounded_weights() {
    let (service, storage, _temp_dir) = create_service(WorkshopSettings::default()).await;

    let receipt = service
        .submit_ahp(&submission(
            "Marco",
            Some("Tavolo 1"),
            vec![
                favor(0, 1, Side::First, Intensity::Moderately),
                favor(1, 2, Side::Second, Intensity::Strongly),
                favor(3, 4, Side::First, Intensity::Slightly),
            ],
        ))
        .await
        .unwrap();

    let stored = storage
        .get_ahp_submissions(Some("Tavolo 1".into()))
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, receipt.submission_id);
    assert_eq!(stored[0].respondent, "Marco");

    for (w, (_, labelled)) in stored[0].weights.as_slice().iter().zip(&receipt.stored_weights) {
        assert!((w - labelled).abs() < 1e-12);
        assert!(((w * 1e4).round() / 1e4 - w).abs() < 1e-12);
    }
    assert!((receipt.evaluation.weights.sum() - 1.0).abs() < 1e-9);
    // Strongly favoring the second criterion of (1, 2)
    assert!((stored[0].matrix.get(1, 2) - 1.0 / 7.0).abs() < 1e-12);
}

#[tokio::test]
#[serial]
async fn test_round_table_resolution() {
    let (service, storage, _temp_dir) = create_service(WorkshopSettings::default()).await;

    let registered = service
        .register(&Registration {
            neighborhood: "Loreto".into(),
            round_table: "Tavolo 4".into(),
            age: 29,
            profession: String::new(),
            role: ParticipantRole::MunicipalTechnician,
            motivation: String::new(),
            goal: String::new(),
            values: vec![],
            answers: BTreeMap::new(),
        })
        .await
        .unwrap();

    let from_participant = service
        .submit_ahp(&submission(&registered.participant.id, None, vec![]))
        .await
        .unwrap();
    assert_eq!(from_participant.round_table, "Tavolo 4");

    let anonymous = service
        .submit_ahp(&AhpSubmission {
            respondent: None,
            round_table: None,
            answers: vec![],
        })
        .await
        .unwrap();
    assert_eq!(anonymous.round_table, UNSPECIFIED_ROUND_TABLE);

    let tables = service.table_statistics().await.unwrap();
    let names: Vec<&str> = tables.iter().map(|t| t.round_table.as_str()).collect();
    assert_eq!(names, vec!["Tavolo 4", UNSPECIFIED_ROUND_TABLE]);

    let unspecified = storage
        .get_ahp_submissions(Some(UNSPECIFIED_ROUND_TABLE.into()))
        .await
        .unwrap();
    assert_eq!(unspecified[0].respondent, ANONYMOUS_RESPONDENT);
}

#[tokio::test]
#[serial]
async fn test_consensus_per_round_table() {
    let (service, _storage, _temp_dir) = create_service(WorkshopSettings::default()).await;

    // Two respondents at one table: one strongly favors biodiversity over
    // accessibility, the other is indifferent.
    service
        .submit_ahp(&submission(
            "a",
            Some("Tavolo 1"),
            vec![favor(0, 1, Side::Second, Intensity::Extremely)],
        ))
        .await
        .unwrap();
    service
        .submit_ahp(&submission("b", Some("Tavolo 1"), vec![]))
        .await
        .unwrap();
    service
        .submit_ahp(&submission(
            "c",
            Some("Tavolo 2"),
            vec![favor(0, 1, Side::First, Intensity::Extremely)],
        ))
        .await
        .unwrap();

    let table_one = service.consensus(Some("Tavolo 1".into())).await.unwrap();
    assert_eq!(table_one.respondents, 2);
    // sqrt(1/9 * 1) = 1/3
    assert!((table_one.matrix.get(0, 1) - 1.0 / 3.0).abs() < 1e-9);
    assert!(table_one.weights[1].1 > table_one.weights[0].1);

    let everyone = service.consensus(None).await.unwrap();
    assert_eq!(everyone.respondents, 3);
    // (1/9 * 1 * 9)^(1/3) = 1
    assert!((everyone.matrix.get(0, 1) - 1.0).abs() < 1e-9);
    for i in 0..5 {
        for j in 0..5 {
            let product = everyone.matrix.get(i, j) * everyone.matrix.get(j, i);
            assert!((product - 1.0).abs() < 1e-9);
        }
    }
}

#[tokio::test]
#[serial]
async fn test_consensus_with_threshold_excludes_inconsistent() {
    let criteria = CriteriaSet::new(["shade", "play", "quiet"]).unwrap();
    let settings = WorkshopSettings {
        consistency_threshold: Some(0.1),
        ..WorkshopSettings::default().with_criteria(criteria)
    };
    let (service, _storage, _temp_dir) = create_service(settings).await;

    service
        .submit_ahp(&submission(
            "steady",
            Some("T"),
            vec![
                favor(0, 1, Side::First, Intensity::Slightly),
                favor(0, 2, Side::First, Intensity::Slightly),
            ],
        ))
        .await
        .unwrap();
    // shade > play > quiet > shade
    let cyclic = service
        .submit_ahp(&submission(
            "cyclic",
            Some("T"),
            vec![
                favor(0, 1, Side::First, Intensity::Extremely),
                favor(1, 2, Side::First, Intensity::Extremely),
                favor(0, 2, Side::Second, Intensity::Extremely),
            ],
        ))
        .await
        .unwrap();
    assert!(!cyclic.evaluation.consistency.is_acceptable());

    let report = service.consensus(Some("T".into())).await.unwrap();
    assert_eq!(report.respondents, 1);
    assert_eq!(report.excluded, vec!["cyclic".to_string()]);
}

#[tokio::test]
#[serial]
async fn test_anova_separates_round_tables() {
    let (service, _storage, _temp_dir) = create_service(WorkshopSettings::default()).await;

    // Table 1 favors the first criterion over the second, table 2 the reverse
    for (respondent, table, side, intensity) in [
        ("a", "Tavolo 1", Side::First, Intensity::Strongly),
        ("b", "Tavolo 1", Side::First, Intensity::Extremely),
        ("c", "Tavolo 2", Side::Second, Intensity::Strongly),
        ("d", "Tavolo 2", Side::Second, Intensity::Extremely),
    ] {
        service
            .submit_ahp(&submission(
                respondent,
                Some(table),
                vec![favor(0, 1, side, intensity)],
            ))
            .await
            .unwrap();
    }

    let anova = service.table_anova().await.unwrap();
    assert_eq!(anova.round_tables, vec!["Tavolo 1", "Tavolo 2"]);
    assert_eq!(anova.respondents, 4);

    let significant: Vec<bool> = anova.criteria.iter().map(|c| c.significant).collect();
    assert_eq!(significant, vec![true, true, false, false, false]);
    assert_eq!(anova.criteria[0].result.df_between, 1);
    assert_eq!(anova.criteria[0].result.df_within, 2);
}
