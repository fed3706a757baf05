//! Park catalog and park evaluations.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::questions::require_text;
use crate::ahp::CriteriaSet;
use crate::error::SurveyError;

/// Lowest park score.
pub const MIN_SCORE: u8 = 1;

/// Highest park score.
pub const MAX_SCORE: u8 = 5;

/// Score of a criterion the participant did not touch.
pub const DEFAULT_SCORE: u8 = 3;

/// A park in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Park {
    /// Park name, unique in the catalog.
    pub name: String,
    /// Neighborhood the park is in.
    pub neighborhood: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Link to a picture.
    #[serde(default)]
    pub image_link: Option<String>,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Park {
    /// Check name and coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError`] for a blank name or out-of-range coordinates.
    pub fn validate(&self) -> Result<(), SurveyError> {
        require_text("name", &self.name)?;
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(SurveyError::InvalidValue {
                field: "latitude".into(),
                reason: format!("{} is outside -90..=90", self.latitude),
            });
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(SurveyError::InvalidValue {
                field: "longitude".into(),
                reason: format!("{} is outside -180..=180", self.longitude),
            });
        }
        Ok(())
    }

    /// Image link, if it is an http(s) URL.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_link
            .as_deref()
            .filter(|link| link.starts_with("http"))
    }
}

/// One participant's rating of one park, as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ParkRating {
    /// Park name.
    pub park: String,
    /// Score per criterion name; unlisted criteria get [`DEFAULT_SCORE`].
    #[serde(default)]
    pub scores: BTreeMap<String, u8>,
    /// Optional comment.
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Ratings for several parks submitted together.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ParkEvaluationSubmission {
    /// Ratings in submission order.
    pub ratings: Vec<ParkRating>,
}

/// A checked rating: one score per criterion, in criteria order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkScores {
    /// Park name.
    pub park: String,
    /// Scores aligned with the criteria set.
    pub scores: Vec<u8>,
    /// Comment, blank ones dropped.
    pub feedback: Option<String>,
}

impl ParkEvaluationSubmission {
    /// Check every rating against the catalog and criteria.
    ///
    /// A later rating of the same park replaces the earlier one, keeping
    /// the earlier position.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::EmptySubmission`] when there are no ratings,
    /// [`SurveyError::UnknownPark`] for a park outside `parks`,
    /// [`SurveyError::InvalidValue`] for an unknown criterion and
    /// [`SurveyError::ScoreOutOfRange`] for a score outside 1..=5.
    pub fn resolve(
        &self,
        criteria: &CriteriaSet,
        parks: &[Park],
    ) -> Result<Vec<ParkScores>, SurveyError> {
        if self.ratings.is_empty() {
            return Err(SurveyError::EmptySubmission);
        }

        let mut resolved: Vec<ParkScores> = Vec::with_capacity(self.ratings.len());
        for rating in &self.ratings {
            if !parks.iter().any(|p| p.name == rating.park) {
                return Err(SurveyError::UnknownPark {
                    name: rating.park.clone(),
                });
            }

            let scores = score_vector(criteria, &rating.scores)?;
            let feedback = rating
                .feedback
                .as_deref()
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from);
            let entry = ParkScores {
                park: rating.park.clone(),
                scores,
                feedback,
            };

            match resolved.iter_mut().find(|r| r.park == entry.park) {
                Some(existing) => *existing = entry,
                None => resolved.push(entry),
            }
        }

        Ok(resolved)
    }
}

fn score_vector(
    criteria: &CriteriaSet,
    scores: &BTreeMap<String, u8>,
) -> Result<Vec<u8>, SurveyError> {
    if let Some(unknown) = scores.keys().find(|name| criteria.position(name).is_none()) {
        return Err(SurveyError::InvalidValue {
            field: "scores".into(),
            reason: format!("unknown criterion '{unknown}'"),
        });
    }

    criteria
        .iter()
        .map(|name| {
            let score = scores.get(name).copied().unwrap_or(DEFAULT_SCORE);
            if (MIN_SCORE..=MAX_SCORE).contains(&score) {
                Ok(score)
            } else {
                Err(SurveyError::ScoreOutOfRange {
                    criterion: name.to_string(),
                    score,
                })
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn park(name: &str) -> Park {
        Park {
            name: name.into(),
            neighborhood: "Centro".into(),
            description: String::new(),
            image_link: None,
            latitude: 45.69,
            longitude: 9.67,
        }
    }

    fn rating(park: &str, scores: &[(&str, u8)]) -> ParkRating {
        ParkRating {
            park: park.into(),
            scores: scores.iter().map(|(k, v)| ((*k).to_string(), *v)).collect(),
            feedback: None,
        }
    }

    #[test]
    fn test_untouched_criteria_default_to_three() {
        let criteria = CriteriaSet::green_space();
        let submission = ParkEvaluationSubmission {
            ratings: vec![rating("Parco Suardi", &[("Biodiversity", 5)])],
        };
        let resolved = submission
            .resolve(&criteria, &[park("Parco Suardi")])
            .unwrap();
        assert_eq!(resolved[0].scores, vec![3, 5, 3, 3, 3]);
    }

    #[test]
    fn test_resubmission_replaces_earlier_entry() {
        let criteria = CriteriaSet::green_space();
        let mut second = rating("Parco Suardi", &[("Biodiversity", 1)]);
        second.feedback = Some("  troppo cemento ".into());
        let submission = ParkEvaluationSubmission {
            ratings: vec![
                rating("Parco Suardi", &[("Biodiversity", 5)]),
                rating("Parco Goisis", &[]),
                second,
            ],
        };
        let resolved = submission
            .resolve(&criteria, &[park("Parco Suardi"), park("Parco Goisis")])
            .unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].park, "Parco Suardi");
        assert_eq!(resolved[0].scores[1], 1);
        assert_eq!(resolved[0].feedback.as_deref(), Some("troppo cemento"));
        assert_eq!(resolved[1].park, "Parco Goisis");
    }

    #[test]
    fn test_unknown_park_rejected() {
        let submission = ParkEvaluationSubmission {
            ratings: vec![rating("Parco Fantasma", &[])],
        };
        assert_eq!(
            submission
                .resolve(&CriteriaSet::green_space(), &[park("Parco Suardi")])
                .unwrap_err(),
            SurveyError::UnknownPark {
                name: "Parco Fantasma".into()
            }
        );
    }

    #[test]
    fn test_score_out_of_range() {
        let submission = ParkEvaluationSubmission {
            ratings: vec![rating("Parco Suardi", &[("Social function", 6)])],
        };
        assert_eq!(
            submission
                .resolve(&CriteriaSet::green_space(), &[park("Parco Suardi")])
                .unwrap_err(),
            SurveyError::ScoreOutOfRange {
                criterion: "Social function".into(),
                score: 6
            }
        );
    }

    #[test]
    fn test_unknown_criterion_and_empty() {
        let criteria = CriteriaSet::green_space();
        let submission = ParkEvaluationSubmission {
            ratings: vec![rating("Parco Suardi", &[("Parking", 4)])],
        };
        assert!(submission.resolve(&criteria, &[park("Parco Suardi")]).is_err());
        assert_eq!(
            ParkEvaluationSubmission::default()
                .resolve(&criteria, &[])
                .unwrap_err(),
            SurveyError::EmptySubmission
        );
    }

    #[test]
    fn test_park_validate_and_image() {
        let mut p = park("Parco Suardi");
        assert!(p.validate().is_ok());
        assert_eq!(p.image_url(), None);
        p.image_link = Some("https://example.org/suardi.jpg".into());
        assert_eq!(p.image_url(), Some("https://example.org/suardi.jpg"));
        p.image_link = Some("suardi.jpg".into());
        assert_eq!(p.image_url(), None);
        p.latitude = 91.0;
        assert!(p.validate().is_err());
    }
}
