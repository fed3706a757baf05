//! Dynamic registration questions and answer validation.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SurveyError;

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Exactly one of the values (drop-down).
    Select,
    /// Exactly one of the values (radio buttons).
    Radio,
    /// Any subset of the values.
    Multiselect,
    /// An integer between the smallest and largest numeric value.
    Slider,
    /// Free text.
    Text,
}

impl QuestionKind {
    /// Stored name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Multiselect => "multiselect",
            Self::Slider => "slider",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown kinds are rendered as text inputs and parse as [`QuestionKind::Text`].
impl FromStr for QuestionKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "select" => Self::Select,
            "radio" => Self::Radio,
            "multiselect" => Self::Multiselect,
            "slider" => Self::Slider,
            _ => Self::Text,
        })
    }
}

/// A registration question shown to participants of one neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Question {
    /// Neighborhood the question belongs to.
    pub neighborhood: String,
    /// Question text, also the answer key.
    pub text: String,
    /// Input kind.
    pub kind: QuestionKind,
    /// Allowed values.
    #[serde(default)]
    pub values: Vec<String>,
}

impl Question {
    /// Create a question; `values` is a comma-separated list.
    #[must_use]
    pub fn new(
        neighborhood: impl Into<String>,
        text: impl Into<String>,
        kind: QuestionKind,
        values: &str,
    ) -> Self {
        Self {
            neighborhood: neighborhood.into(),
            text: text.into(),
            kind,
            values: split_values(values),
        }
    }

    /// Values joined back into their stored form.
    #[must_use]
    pub fn values_csv(&self) -> String {
        self.values.join(",")
    }

    /// Check that the question can be answered at all.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError`] for a blank neighborhood or text, a choice
    /// question without values, or a slider without numeric values.
    pub fn validate(&self) -> Result<(), SurveyError> {
        require_text("neighborhood", &self.neighborhood)?;
        require_text("question", &self.text)?;
        match self.kind {
            QuestionKind::Select | QuestionKind::Radio | QuestionKind::Multiselect
                if self.values.is_empty() =>
            {
                Err(SurveyError::InvalidValue {
                    field: self.text.clone(),
                    reason: format!("a {} question needs values", self.kind),
                })
            }
            QuestionKind::Slider if self.slider_range().is_none() => {
                Err(SurveyError::InvalidValue {
                    field: self.text.clone(),
                    reason: "a slider needs numeric values".into(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Bounds of a slider: min and max of the purely numeric values.
    #[must_use]
    pub fn slider_range(&self) -> Option<(i64, i64)> {
        let numbers: Vec<i64> = self
            .values
            .iter()
            .filter(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()))
            .filter_map(|v| v.parse().ok())
            .collect();
        Some((*numbers.iter().min()?, *numbers.iter().max()?))
    }

    /// Validate `answer` and render it as stored response text.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::InvalidValue`] if the answer does not fit the
    /// question kind.
    pub fn check_answer(&self, answer: &AnswerValue) -> Result<String, SurveyError> {
        let invalid = |reason: String| SurveyError::InvalidValue {
            field: self.text.clone(),
            reason,
        };

        match (self.kind, answer) {
            (QuestionKind::Select | QuestionKind::Radio, AnswerValue::Text(value)) => {
                if self.values.contains(value) {
                    Ok(value.clone())
                } else {
                    Err(invalid(format!("'{value}' is not one of the options")))
                }
            }
            (QuestionKind::Multiselect, AnswerValue::List(items)) => {
                if let Some(bad) = items.iter().find(|item| !self.values.contains(item)) {
                    return Err(invalid(format!("'{bad}' is not one of the options")));
                }
                Ok(answer.to_response())
            }
            (QuestionKind::Slider, AnswerValue::Number(value)) => {
                let (min, max) = self
                    .slider_range()
                    .ok_or_else(|| invalid("slider has no numeric values".into()))?;
                if (min..=max).contains(value) {
                    Ok(value.to_string())
                } else {
                    Err(invalid(format!("{value} is outside {min}..={max}")))
                }
            }
            (QuestionKind::Text, AnswerValue::Text(value)) => {
                if value.trim().is_empty() {
                    Err(invalid("must not be empty".into()))
                } else {
                    Ok(value.trim().to_string())
                }
            }
            (kind, _) => Err(invalid(format!("wrong answer type for a {kind} question"))),
        }
    }

    /// The answer a participant sees before touching the input, if any.
    #[must_use]
    pub fn default_answer(&self) -> Option<AnswerValue> {
        match self.kind {
            QuestionKind::Select | QuestionKind::Radio => {
                self.values.first().cloned().map(AnswerValue::Text)
            }
            QuestionKind::Multiselect => Some(AnswerValue::List(Vec::new())),
            QuestionKind::Slider => self
                .slider_range()
                .map(|(min, max)| AnswerValue::Number(min + (max - min) / 2)),
            QuestionKind::Text => None,
        }
    }
}

/// A participant's answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Slider position.
    Number(i64),
    /// Single choice or free text.
    Text(String),
    /// Multiple choice.
    List(Vec<String>),
}

impl AnswerValue {
    /// Stored response text; lists are joined with `", "`.
    #[must_use]
    pub fn to_response(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::List(items) => items.join(", "),
        }
    }
}

/// Split a comma-separated value list, trimming and dropping blanks.
#[must_use]
pub fn split_values(values: &str) -> Vec<String> {
    values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), SurveyError> {
    if value.trim().is_empty() {
        Err(SurveyError::MissingField {
            field: field.to_string(),
        })
    } else {
        Ok(())
    }
}
