//! Pairwise comparison matrices.
//!
//! A [`PairwiseMatrix`] is always a positive reciprocal matrix: every
//! constructor validates that entries are finite and positive, that the
//! diagonal is 1, and that `A[i][j] * A[j][i] == 1`. Downstream code
//! (eigenvector extraction, aggregation) relies on this.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::criteria::CriteriaSet;
use super::scale::Choice;
use crate::error::AhpError;

/// Relative tolerance for the reciprocal and unit-diagonal checks.
pub const RECIPROCAL_TOLERANCE: f64 = 1e-9;

/// What to do when a pair has no answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MissingAnswerPolicy {
    /// Treat the pair as equally important (ratio 1).
    #[default]
    DefaultEqual,
    /// Fail with [`AhpError::MissingAnswer`].
    Reject,
}

impl fmt::Display for MissingAnswerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefaultEqual => f.write_str("equal"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

impl FromStr for MissingAnswerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" | "default_equal" => Ok(Self::DefaultEqual),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown missing answer policy '{other}'")),
        }
    }
}

/// One answered pair: how criterion `i` compares with criterion `j`.
///
/// `first` in the choice refers to `i`. Answers with `i > j` are accepted
/// and normalized by flipping the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PairwiseAnswer {
    /// Index of the first criterion.
    pub i: usize,
    /// Index of the second criterion.
    pub j: usize,
    /// The respondent's choice, e.g. `"equal"`, `"first:5"`, `"second:9"`.
    #[schemars(with = "String")]
    pub choice: Choice,
}

impl PairwiseAnswer {
    /// Create an answer.
    #[must_use]
    pub const fn new(i: usize, j: usize, choice: Choice) -> Self {
        Self { i, j, choice }
    }
}

/// Positive reciprocal n×n matrix, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct PairwiseMatrix {
    n: usize,
    data: Vec<f64>,
}

impl PairwiseMatrix {
    /// The all-ones matrix: every pair judged equal.
    ///
    /// # Errors
    ///
    /// Returns [`AhpError::TooFewCriteria`] if `n < 2`.
    pub fn equal(n: usize) -> Result<Self, AhpError> {
        if n < 2 {
            return Err(AhpError::TooFewCriteria { count: n });
        }
        Ok(Self {
            n,
            data: vec![1.0; n * n],
        })
    }

    /// Build a matrix from one respondent's answers.
    ///
    /// # Errors
    ///
    /// Returns [`AhpError`] if an answer references an invalid pair, a pair
    /// is answered twice, or (under [`MissingAnswerPolicy::Reject`]) a pair
    /// is unanswered.
    pub fn from_answers(
        criteria: &CriteriaSet,
        answers: &[PairwiseAnswer],
        policy: MissingAnswerPolicy,
    ) -> Result<Self, AhpError> {
        let n = criteria.len();
        let mut by_pair: BTreeMap<(usize, usize), Choice> = BTreeMap::new();

        for answer in answers {
            let (i, j, choice) = normalize(answer, n)?;
            if by_pair.insert((i, j), choice).is_some() {
                return Err(AhpError::DuplicateAnswer { i, j });
            }
        }

        let mut matrix = Self::equal(n)?;
        for (i, j) in criteria.pairs() {
            let choice = match by_pair.get(&(i, j)) {
                Some(choice) => *choice,
                None => match policy {
                    MissingAnswerPolicy::DefaultEqual => {
                        tracing::debug!(i, j, "Unanswered pair defaults to equal");
                        Choice::Equal
                    }
                    MissingAnswerPolicy::Reject => {
                        return Err(AhpError::MissingAnswer { i, j });
                    }
                },
            };
            matrix.set(i, j, choice.ratio());
            matrix.set(j, i, choice.flipped().ratio());
        }

        Ok(matrix)
    }

    /// Build a matrix from explicit rows, validating every invariant.
    ///
    /// # Errors
    ///
    /// Returns [`AhpError`] if the rows are not square, n < 2, an entry is
    /// not positive and finite, the diagonal is not 1, or reciprocity fails.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, AhpError> {
        let n = rows.len();
        if n < 2 {
            return Err(AhpError::TooFewCriteria { count: n });
        }

        let mut data = Vec::with_capacity(n * n);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != n {
                return Err(AhpError::NotSquare {
                    row,
                    len: values.len(),
                    expected: n,
                });
            }
            data.extend(values);
        }

        let matrix = Self { n, data };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Build from an upper triangle (row-major, `i < j`); the diagonal is 1
    /// and the lower triangle holds the reciprocals.
    ///
    /// # Errors
    ///
    /// Returns [`AhpError`] if `upper` has the wrong length or an entry is
    /// not positive and finite.
    pub fn from_upper_triangle(n: usize, upper: &[f64]) -> Result<Self, AhpError> {
        let mut matrix = Self::equal(n)?;
        let expected = n * (n - 1) / 2;
        if upper.len() != expected {
            return Err(AhpError::DimensionMismatch {
                expected,
                found: upper.len(),
            });
        }

        let pairs = (0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i, j)));
        for ((i, j), &value) in pairs.zip(upper) {
            if !(value.is_finite() && value > 0.0) {
                return Err(AhpError::NonPositiveEntry {
                    row: i,
                    col: j,
                    value,
                });
            }
            matrix.set_pair(i, j, value);
        }
        Ok(matrix)
    }

    /// Check the positive-reciprocal invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as an [`AhpError`].
    pub fn validate(&self) -> Result<(), AhpError> {
        for row in 0..self.n {
            for col in 0..self.n {
                let value = self.get(row, col);
                if !(value.is_finite() && value > 0.0) {
                    return Err(AhpError::NonPositiveEntry { row, col, value });
                }
            }
        }

        for row in 0..self.n {
            if !approx_one(self.get(row, row)) {
                return Err(AhpError::NotReciprocal { row, col: row });
            }
            for col in (row + 1)..self.n {
                if !approx_one(self.get(row, col) * self.get(col, row)) {
                    return Err(AhpError::NotReciprocal { row, col });
                }
            }
        }
        Ok(())
    }

    /// Dimension n.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.n
    }

    /// Entry `A[row][col]`.
    ///
    /// Indices must be `< size()`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    /// Row slice.
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.n..(row + 1) * self.n]
    }

    /// Copy out as nested rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.n).map(<[f64]>::to_vec).collect()
    }

    /// Upper triangle values in pair order.
    #[must_use]
    pub fn upper_triangle(&self) -> Vec<f64> {
        (0..self.n)
            .flat_map(|i| ((i + 1)..self.n).map(move |j| (i, j)))
            .map(|(i, j)| self.get(i, j))
            .collect()
    }

    /// `y = A x`.
    pub(crate) fn multiply(&self, x: &[f64]) -> Vec<f64> {
        self.data
            .chunks(self.n)
            .map(|row| row.iter().zip(x).map(|(a, b)| a * b).sum())
            .collect()
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.n + col] = value;
    }

    fn set_pair(&mut self, i: usize, j: usize, ratio: f64) {
        self.set(i, j, ratio);
        self.set(j, i, 1.0 / ratio);
    }
}

impl TryFrom<Vec<Vec<f64>>> for PairwiseMatrix {
    type Error = AhpError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<PairwiseMatrix> for Vec<Vec<f64>> {
    fn from(matrix: PairwiseMatrix) -> Self {
        matrix.to_rows()
    }
}

fn approx_one(value: f64) -> bool {
    (value - 1.0).abs() <= RECIPROCAL_TOLERANCE
}

fn normalize(answer: &PairwiseAnswer, n: usize) -> Result<(usize, usize, Choice), AhpError> {
    let PairwiseAnswer { i, j, choice } = *answer;
    if i == j || i >= n || j >= n {
        return Err(AhpError::InvalidPair { i, j, n });
    }
    if i < j {
        Ok((i, j, choice))
    } else {
        Ok((j, i, choice.flipped()))
    }
}
