//! Ordered criteria sets.

use std::borrow::Cow;
use std::collections::BTreeSet;

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};

use crate::error::AhpError;

/// Green-space criteria used by the workshop questionnaire.
pub const GREEN_SPACE_CRITERIA: [&str; 5] = [
    "Accessibility of green",
    "Biodiversity",
    "Maintenance and cleanliness",
    "Social function",
    "Environmental function",
];

/// An ordered set of distinct, non-empty criterion names (at least two).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct CriteriaSet {
    names: Vec<String>,
}

impl CriteriaSet {
    /// Build a criteria set.
    ///
    /// Names are trimmed; order is preserved and defines matrix indices.
    ///
    /// # Errors
    ///
    /// Returns [`AhpError`] if fewer than two names are given, a name is
    /// blank, or a name repeats.
    pub fn new<I, S>(names: I) -> Result<Self, AhpError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.into().trim().to_string())
            .collect();

        if names.len() < 2 {
            return Err(AhpError::TooFewCriteria { count: names.len() });
        }

        let mut seen = BTreeSet::new();
        for name in &names {
            if name.is_empty() {
                return Err(AhpError::EmptyCriterionName);
            }
            if !seen.insert(name.as_str()) {
                return Err(AhpError::DuplicateCriterion { name: name.clone() });
            }
        }

        Ok(Self { names })
    }

    /// The five green-space criteria of the workshop.
    #[must_use]
    pub fn green_space() -> Self {
        Self {
            names: GREEN_SPACE_CRITERIA.iter().map(ToString::to_string).collect(),
        }
    }

    /// Number of criteria.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false; a criteria set holds at least two names.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name at `index`.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Index of `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Iterate names in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Borrow the names.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Every unordered pair `(i, j)` with `i < j`, row by row.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> {
        let n = self.names.len();
        (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
    }

    /// Number of pairwise questions: n(n-1)/2.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        let n = self.names.len();
        n * (n - 1) / 2
    }
}

impl Default for CriteriaSet {
    fn default() -> Self {
        Self::green_space()
    }
}

impl TryFrom<Vec<String>> for CriteriaSet {
    type Error = AhpError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CriteriaSet> for Vec<String> {
    fn from(set: CriteriaSet) -> Self {
        set.names
    }
}

impl JsonSchema for CriteriaSet {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("CriteriaSet")
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        <Vec<String>>::json_schema(generator)
    }
}
