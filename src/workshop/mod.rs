//! Workshop service.
//!
//! [`WorkshopService`] is the single entry point the CLI uses: it validates
//! submissions, runs the AHP and analysis functions and persists rows
//! through a [`StorageTrait`].
//!
//! # Example
//!
//! ```ignore
//! use lotus_ahp::storage::SqliteStorage;
//! use lotus_ahp::traits::RealTimeProvider;
//! use lotus_ahp::workshop::{WorkshopService, WorkshopSettings};
//!
//! let storage = SqliteStorage::new("./data/lotus.db").await?;
//! let service = WorkshopService::new(storage, RealTimeProvider, WorkshopSettings::default());
//! let consensus = service.consensus(Some("Tavolo 1".into())).await?;
//! ```

mod types;

pub use types::{
    AhpReceipt, AhpSubmission, ConsensusReport, ParkAnalysis, ParkEvaluationInput,
    RegistrationReceipt, WorkshopSettings, ANONYMOUS_RESPONDENT, MAX_ID_ATTEMPTS,
    UNSPECIFIED_ROUND_TABLE,
};

use crate::ahp::{aggregate_consensus, evaluate, mean_weights, PairwiseMatrix, WeightVector};
use crate::analysis::{
    anova_by_table, mean_weights_by_table, park_statistics, score_parks, TableAnova,
    TableWeights,
};
use crate::error::{AppError, StorageError, SurveyError};
use crate::storage::{StoredAhpSubmission, StoredAnswer, StoredParkEvaluation};
use crate::survey::{generate_participant_id, Park, Participant, Question, Registration};
use crate::traits::{StorageTrait, TimeProvider};

/// Workshop operations over a storage backend and a clock.
pub struct WorkshopService<S, T>
where
    S: StorageTrait,
    T: TimeProvider,
{
    storage: S,
    clock: T,
    settings: WorkshopSettings,
}

impl<S, T> WorkshopService<S, T>
where
    S: StorageTrait,
    T: TimeProvider,
{
    /// Create a new service.
    #[must_use]
    pub const fn new(storage: S, clock: T, settings: WorkshopSettings) -> Self {
        Self {
            storage,
            clock,
            settings,
        }
    }

    /// Settings in use.
    #[must_use]
    pub const fn settings(&self) -> &WorkshopSettings {
        &self.settings
    }

    /// Register a participant and store their dynamic answers.
    ///
    /// A fresh participant id is drawn until it does not collide with an
    /// existing one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Survey`] for invalid fields or answers, or if no
    /// free id is found within [`MAX_ID_ATTEMPTS`], and [`AppError::Storage`]
    /// if persistence fails.
    pub async fn register(
        &self,
        registration: &Registration,
    ) -> Result<RegistrationReceipt, AppError> {
        registration.validate()?;

        let questions = self
            .storage
            .get_questions(registration.neighborhood.trim())
            .await?;
        let responses = registration.responses(&questions)?;

        let id = self.unique_participant_id().await?;
        let now = self.clock.now();
        let participant = Participant::from_registration(id, registration, now);

        let answers: Vec<StoredAnswer> = responses
            .into_iter()
            .map(|(question, response)| {
                StoredAnswer::new(&participant.id, &participant.neighborhood, question, response)
                    .with_timestamp(now)
            })
            .collect();

        self.storage.save_registration(&participant, &answers).await?;

        tracing::info!(
            participant = %participant.id,
            round_table = %participant.round_table,
            answers = answers.len(),
            "Participant registered"
        );

        Ok(RegistrationReceipt {
            participant,
            answers: answers.len(),
        })
    }

    async fn unique_participant_id(&self) -> Result<String, AppError> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let candidate = generate_participant_id();
            if !self.storage.participant_exists(&candidate).await? {
                return Ok(candidate);
            }
            tracing::debug!(attempt, "Participant id collision, retrying");
        }
        Err(SurveyError::IdExhausted {
            attempts: MAX_ID_ATTEMPTS,
        }
        .into())
    }

    /// Define a registration question.
    ///
    /// Answers are keyed by question text, so the text must be unique within
    /// the neighborhood.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Survey`] if the question is malformed or already
    /// defined for the neighborhood.
    pub async fn add_question(&self, question: &Question) -> Result<(), AppError> {
        question.validate()?;
        let existing = self.storage.get_questions(&question.neighborhood).await?;
        if existing.iter().any(|q| q.text.trim() == question.text.trim()) {
            return Err(SurveyError::DuplicateQuestion {
                neighborhood: question.neighborhood.clone(),
                question: question.text.clone(),
            }
            .into());
        }
        self.storage.save_question(question).await?;
        tracing::info!(
            neighborhood = %question.neighborhood,
            kind = %question.kind,
            "Question added"
        );
        Ok(())
    }

    /// Registration questions of a neighborhood.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the lookup fails.
    pub async fn questions(&self, neighborhood: &str) -> Result<Vec<Question>, AppError> {
        Ok(self.storage.get_questions(neighborhood.trim()).await?)
    }

    /// Evaluate and store one AHP questionnaire.
    ///
    /// Without an explicit round table, a registered respondent's table is
    /// used, else [`UNSPECIFIED_ROUND_TABLE`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Ahp`] if the answers are invalid and
    /// [`AppError::Storage`] if persistence fails.
    pub async fn submit_ahp(&self, submission: &AhpSubmission) -> Result<AhpReceipt, AppError> {
        let evaluation = evaluate(
            &self.settings.criteria,
            &submission.answers,
            self.settings.missing_answer_policy,
            self.settings.eigen,
        )?;

        let respondent = submission
            .respondent
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(ANONYMOUS_RESPONDENT)
            .to_string();
        let round_table = match non_blank(submission.round_table.as_deref()) {
            Some(table) => table.to_string(),
            None => self
                .storage
                .get_participant(&respondent)
                .await?
                .map_or_else(|| UNSPECIFIED_ROUND_TABLE.to_string(), |p| p.round_table),
        };

        let stored = StoredAhpSubmission::from_evaluation(
            uuid::Uuid::new_v4().to_string(),
            &respondent,
            &round_table,
            &evaluation,
        )
        .with_timestamp(self.clock.now());
        self.storage.save_ahp_submission(&stored).await?;

        if !evaluation.consistency.is_acceptable() {
            tracing::warn!(
                respondent = %respondent,
                consistency_ratio = evaluation.consistency.consistency_ratio,
                "Inconsistent AHP judgments stored"
            );
        }
        tracing::info!(
            submission = %stored.id,
            round_table = %round_table,
            consistency_ratio = evaluation.consistency.consistency_ratio,
            "AHP submission stored"
        );

        Ok(AhpReceipt {
            submission_id: stored.id,
            round_table,
            stored_weights: stored.weights.labelled(&self.settings.criteria),
            evaluation,
        })
    }

    /// Consensus weights of a round table (or everyone) from the stored
    /// matrices.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Ahp`] when there is nothing to aggregate or every
    /// respondent fails the consistency threshold.
    pub async fn consensus(
        &self,
        round_table: Option<String>,
    ) -> Result<ConsensusReport, AppError> {
        let submissions = self.matching_submissions(round_table.clone()).await?;
        let matrices: Vec<PairwiseMatrix> =
            submissions.iter().map(|s| s.matrix.clone()).collect();

        let group = aggregate_consensus(
            &matrices,
            self.settings.consistency_threshold,
            self.settings.eigen,
        )?;

        Ok(ConsensusReport {
            round_table,
            respondents: group.included.len(),
            excluded: group
                .excluded
                .iter()
                .map(|&i| submissions[i].respondent.clone())
                .collect(),
            weights: group.weights.labelled(&self.settings.criteria),
            consistency: group.consistency,
            matrix: group.matrix,
        })
    }

    /// Mean stored weights per round table.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the lookup fails.
    pub async fn table_statistics(&self) -> Result<Vec<TableWeights>, AppError> {
        let submissions = self.storage.get_ahp_submissions(None).await?;
        Ok(mean_weights_by_table(&self.settings.criteria, &submissions)?)
    }

    /// One-way ANOVA of each criterion's stored weights across round tables.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Analysis`] when fewer than two round tables have
    /// at least two submissions each, and [`AppError::Storage`] if the lookup
    /// fails.
    pub async fn table_anova(&self) -> Result<TableAnova, AppError> {
        let submissions = self.storage.get_ahp_submissions(None).await?;
        let anova = anova_by_table(&self.settings.criteria, &submissions)?;
        for test in anova.criteria.iter().filter(|t| t.significant) {
            tracing::info!(
                criterion = %test.criterion,
                p_value = test.result.p_value,
                "Round tables differ significantly"
            );
        }
        Ok(anova)
    }

    /// Add or replace a park in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Survey`] if the park is malformed.
    pub async fn add_park(&self, park: &Park) -> Result<(), AppError> {
        park.validate()?;
        self.storage.save_park(park).await?;
        tracing::info!(park = %park.name, "Park saved");
        Ok(())
    }

    /// The park catalog.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the lookup fails.
    pub async fn parks(&self) -> Result<Vec<Park>, AppError> {
        Ok(self.storage.get_parks().await?)
    }

    /// Store a participant's park ratings.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] with
    /// [`StorageError::ParticipantNotFound`] for an unknown participant and
    /// [`AppError::Survey`] for invalid ratings.
    pub async fn submit_park_evaluations(
        &self,
        input: &ParkEvaluationInput,
    ) -> Result<Vec<StoredParkEvaluation>, AppError> {
        let participant = self
            .storage
            .get_participant(&input.participant_id)
            .await?
            .ok_or_else(|| StorageError::ParticipantNotFound {
                participant_id: input.participant_id.clone(),
            })?;

        let parks = self.storage.get_parks().await?;
        let resolved = input.submission.resolve(&self.settings.criteria, &parks)?;

        let round_table = non_blank(input.round_table.as_deref())
            .map_or_else(|| participant.round_table.clone(), ToString::to_string);
        let now = self.clock.now();

        let rows: Vec<StoredParkEvaluation> = resolved
            .into_iter()
            .map(|rating| {
                let scores = self
                    .settings
                    .criteria
                    .iter()
                    .map(ToString::to_string)
                    .zip(rating.scores)
                    .collect();
                let row = StoredParkEvaluation::new(
                    uuid::Uuid::new_v4().to_string(),
                    &participant.id,
                    &round_table,
                    rating.park,
                    scores,
                )
                .with_timestamp(now);
                match rating.feedback {
                    Some(feedback) => row.with_feedback(feedback),
                    None => row,
                }
            })
            .collect();

        self.storage.save_park_evaluations(&rows).await?;
        tracing::info!(
            participant = %participant.id,
            parks = rows.len(),
            "Park evaluations stored"
        );

        Ok(rows)
    }

    /// Park statistics and weighted ranking, optionally for one round table.
    ///
    /// Weights are the mean stored AHP weights of the same selection. With
    /// no AHP submissions, equal weights are used.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if a lookup fails.
    pub async fn park_report(
        &self,
        round_table: Option<String>,
    ) -> Result<ParkAnalysis, AppError> {
        let criteria = &self.settings.criteria;
        let evaluations = self
            .storage
            .get_park_evaluations(round_table.clone())
            .await?;
        let submissions = self.matching_submissions(round_table.clone()).await?;

        let weights = if submissions.is_empty() {
            tracing::warn!("No AHP submissions, scoring parks with equal weights");
            WeightVector::uniform(criteria.len())
        } else {
            let vectors: Vec<WeightVector> =
                submissions.iter().map(|s| s.weights.clone()).collect();
            mean_weights(&vectors)?
        };

        let statistics = park_statistics(criteria, &evaluations);
        let report = score_parks(
            criteria,
            &statistics,
            &weights,
            self.settings.outlier_std_threshold,
        )?;

        Ok(ParkAnalysis {
            round_table,
            statistics,
            report,
        })
    }

    async fn matching_submissions(
        &self,
        round_table: Option<String>,
    ) -> Result<Vec<StoredAhpSubmission>, AppError> {
        let submissions = self.storage.get_ahp_submissions(round_table).await?;
        Ok(submissions
            .into_iter()
            .filter(|s| s.criteria == self.settings.criteria)
            .collect())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
