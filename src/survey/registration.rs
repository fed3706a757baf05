//! Participant registration.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::questions::{require_text, AnswerValue, Question};
use crate::error::SurveyError;

/// Length of a generated participant id.
pub const PARTICIPANT_ID_LEN: usize = 16;

/// Youngest accepted participant.
pub const MIN_AGE: u8 = 16;

/// Oldest accepted participant.
pub const MAX_AGE: u8 = 100;

/// How a participant takes part in the workshop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    /// Resident.
    Citizen,
    /// Municipal technician.
    MunicipalTechnician,
    /// Representative of a local association.
    AssociationRepresentative,
    /// Environmental educator.
    EnvironmentalEducator,
}

impl ParticipantRole {
    /// Stored name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Citizen => "citizen",
            Self::MunicipalTechnician => "municipal_technician",
            Self::AssociationRepresentative => "association_representative",
            Self::EnvironmentalEducator => "environmental_educator",
        }
    }

    /// Parse a stored name.
    #[must_use]
    pub fn from_stored(s: &str) -> Option<Self> {
        [
            Self::Citizen,
            Self::MunicipalTechnician,
            Self::AssociationRepresentative,
            Self::EnvironmentalEducator,
        ]
        .into_iter()
        .find(|r| r.as_str() == s)
    }
}

impl fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values a participant identifies with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CoreValue {
    /// Innovation.
    Innovation,
    /// Collaboration.
    Collaboration,
    /// Responsibility.
    Responsibility,
    /// Inclusion.
    Inclusion,
    /// Sustainability.
    Sustainability,
}

impl CoreValue {
    /// Every value, in display order.
    pub const ALL: [Self; 5] = [
        Self::Innovation,
        Self::Collaboration,
        Self::Responsibility,
        Self::Inclusion,
        Self::Sustainability,
    ];

    /// Stored name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Innovation => "innovation",
            Self::Collaboration => "collaboration",
            Self::Responsibility => "responsibility",
            Self::Inclusion => "inclusion",
            Self::Sustainability => "sustainability",
        }
    }

    /// Parse a stored name.
    #[must_use]
    pub fn from_stored(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

/// Registration form as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Registration {
    /// Neighborhood (quartiere).
    pub neighborhood: String,
    /// Round table (tavola rotonda).
    pub round_table: String,
    /// Age in years.
    pub age: u8,
    /// Profession.
    #[serde(default)]
    pub profession: String,
    /// Workshop role.
    pub role: ParticipantRole,
    /// Why the participant takes part.
    #[serde(default)]
    pub motivation: String,
    /// What the participant wants to achieve.
    #[serde(default)]
    pub goal: String,
    /// Values the participant identifies with.
    #[serde(default)]
    pub values: Vec<CoreValue>,
    /// Answers to the neighborhood's dynamic questions, keyed by question text.
    #[serde(default)]
    pub answers: BTreeMap<String, AnswerValue>,
}

impl Registration {
    /// Validate the static fields.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError`] for a blank neighborhood or round table, an
    /// age outside 16..=100, or a repeated value.
    pub fn validate(&self) -> Result<(), SurveyError> {
        require_text("neighborhood", &self.neighborhood)?;
        require_text("round_table", &self.round_table)?;

        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(SurveyError::InvalidValue {
                field: "age".into(),
                reason: format!("must be between {MIN_AGE} and {MAX_AGE}"),
            });
        }

        let mut seen = BTreeSet::new();
        if let Some(dup) = self.values.iter().find(|v| !seen.insert(**v)) {
            return Err(SurveyError::InvalidValue {
                field: "values".into(),
                reason: format!("'{}' listed twice", dup.as_str()),
            });
        }

        Ok(())
    }

    /// Check the dynamic answers against `questions` and render each as
    /// `(question, response)` in question order.
    ///
    /// Questions without an answer take their default; a text question
    /// without an answer is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::InvalidValue`] for an answer to an unknown
    /// question or one that does not fit its question.
    pub fn responses(&self, questions: &[Question]) -> Result<Vec<(String, String)>, SurveyError> {
        if let Some(unknown) = self
            .answers
            .keys()
            .find(|key| !questions.iter().any(|q| &q.text == *key))
        {
            return Err(SurveyError::InvalidValue {
                field: unknown.clone(),
                reason: format!("no such question for {}", self.neighborhood),
            });
        }

        let mut rows = Vec::with_capacity(questions.len());
        for question in questions {
            let answer = match self.answers.get(&question.text) {
                Some(answer) => answer.clone(),
                None => match question.default_answer() {
                    Some(default) => default,
                    None => continue,
                },
            };
            rows.push((question.text.clone(), question.check_answer(&answer)?));
        }
        Ok(rows)
    }
}

/// A registered participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Generated id.
    pub id: String,
    /// Neighborhood (quartiere).
    pub neighborhood: String,
    /// Round table (tavola rotonda).
    pub round_table: String,
    /// Age in years.
    pub age: u8,
    /// Profession.
    pub profession: String,
    /// Workshop role.
    pub role: ParticipantRole,
    /// Motivation.
    pub motivation: String,
    /// Goal.
    pub goal: String,
    /// Values.
    pub values: Vec<CoreValue>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl Participant {
    /// Build a participant from a validated registration.
    #[must_use]
    pub fn from_registration(
        id: impl Into<String>,
        registration: &Registration,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            neighborhood: registration.neighborhood.trim().to_string(),
            round_table: registration.round_table.trim().to_string(),
            age: registration.age,
            profession: registration.profession.trim().to_string(),
            role: registration.role,
            motivation: registration.motivation.trim().to_string(),
            goal: registration.goal.trim().to_string(),
            values: registration.values.clone(),
            created_at,
        }
    }

    /// Values joined as stored.
    #[must_use]
    pub fn values_csv(&self) -> String {
        self.values
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Generate a 16-character ASCII alphanumeric participant id.
#[must_use]
pub fn generate_participant_id() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(PARTICIPANT_ID_LEN)
        .collect()
}

/// Whether `id` has the shape of a participant id.
#[must_use]
pub fn is_valid_participant_id(id: &str) -> bool {
    id.len() == PARTICIPANT_ID_LEN && id.bytes().all(|b| b.is_ascii_alphanumeric())
}
