//! Saaty scale choices for a single pairwise comparison.
//!
//! A respondent answers each pair of criteria with one of nine choices:
//! the two are equally important, or one of them is more important at one
//! of four intensities. Choices serialize as short labels:
//!
//! | Label           | Meaning                                 | Ratio |
//! |-----------------|-----------------------------------------|-------|
//! | `equal`         | equally important                       | 1     |
//! | `first:3`       | first slightly more important            | 3     |
//! | `first:strongly`| first strongly more important           | 7     |
//! | `second:9`      | second extremely more important         | 1/9   |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AhpError;

/// Intensity of a preference on the Saaty scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Intensity {
    /// Slightly more important (3).
    Slightly,
    /// Moderately more important (5).
    Moderately,
    /// Strongly more important (7).
    Strongly,
    /// Extremely more important (9).
    Extremely,
}

impl Intensity {
    /// All intensities, weakest first.
    pub const ALL: [Self; 4] = [
        Self::Slightly,
        Self::Moderately,
        Self::Strongly,
        Self::Extremely,
    ];

    /// Numeric Saaty value.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Slightly => 3,
            Self::Moderately => 5,
            Self::Strongly => 7,
            Self::Extremely => 9,
        }
    }

    /// Look up an intensity by its Saaty value.
    ///
    /// # Errors
    ///
    /// Returns [`AhpError::InvalidIntensity`] for anything but 3, 5, 7 or 9.
    pub const fn from_value(value: u8) -> Result<Self, AhpError> {
        match value {
            3 => Ok(Self::Slightly),
            5 => Ok(Self::Moderately),
            7 => Ok(Self::Strongly),
            9 => Ok(Self::Extremely),
            _ => Err(AhpError::InvalidIntensity { value }),
        }
    }

    /// Lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Slightly => "slightly",
            Self::Moderately => "moderately",
            Self::Strongly => "strongly",
            Self::Extremely => "extremely",
        }
    }
}

impl FromStr for Intensity {
    type Err = AhpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(value) = s.parse::<u8>() {
            return Self::from_value(value);
        }
        Self::ALL
            .into_iter()
            .find(|i| i.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| AhpError::InvalidChoice {
                input: s.to_string(),
            })
    }
}

/// Which criterion of the pair is favored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The criterion with the lower index.
    First,
    /// The criterion with the higher index.
    Second,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// One of the nine answers to a pairwise comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Choice {
    /// Both criteria are equally important.
    #[default]
    Equal,
    /// One criterion is more important than the other.
    Favors {
        /// The favored criterion.
        side: Side,
        /// How strongly it is favored.
        intensity: Intensity,
    },
}

impl Choice {
    /// Construct a choice favoring `side` at `intensity`.
    #[must_use]
    pub const fn favors(side: Side, intensity: Intensity) -> Self {
        Self::Favors { side, intensity }
    }

    /// All nine choices in questionnaire order: equal, then the four
    /// intensities favoring the first criterion, then the second.
    #[must_use]
    pub fn all() -> Vec<Self> {
        let mut choices = vec![Self::Equal];
        for side in [Side::First, Side::Second] {
            choices.extend(Intensity::ALL.into_iter().map(|i| Self::favors(side, i)));
        }
        choices
    }

    /// Ratio assigned to `A[i][j]` where `i` is the first criterion.
    #[must_use]
    pub fn ratio(self) -> f64 {
        match self {
            Self::Equal => 1.0,
            Self::Favors {
                side: Side::First,
                intensity,
            } => f64::from(intensity.value()),
            Self::Favors {
                side: Side::Second,
                intensity,
            } => 1.0 / f64::from(intensity.value()),
        }
    }

    /// The same judgment seen from the other criterion.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Equal => Self::Equal,
            Self::Favors { side, intensity } => Self::Favors {
                side: side.opposite(),
                intensity,
            },
        }
    }

    /// Recover the choice that produces `ratio`, if it lies on the scale.
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|c| (c.ratio() - ratio).abs() <= 1e-9 * ratio.abs().max(1.0))
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => f.write_str("equal"),
            Self::Favors { side, intensity } => {
                let side = match side {
                    Side::First => "first",
                    Side::Second => "second",
                };
                write!(f, "{side}:{}", intensity.value())
            }
        }
    }
}

impl FromStr for Choice {
    type Err = AhpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || AhpError::InvalidChoice {
            input: trimmed.to_string(),
        };

        if trimmed.eq_ignore_ascii_case("equal") || trimmed == "1" {
            return Ok(Self::Equal);
        }

        let (side, intensity) = trimmed.split_once(':').ok_or_else(invalid)?;
        let side = match side.trim().to_ascii_lowercase().as_str() {
            "first" | "i" => Side::First,
            "second" | "j" => Side::Second,
            _ => return Err(invalid()),
        };
        let intensity = intensity.parse::<Intensity>().map_err(|_| invalid())?;
        Ok(Self::favors(side, intensity))
    }
}

impl TryFrom<String> for Choice {
    type Error = AhpError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Choice> for String {
    fn from(choice: Choice) -> Self {
        choice.to_string()
    }
}
