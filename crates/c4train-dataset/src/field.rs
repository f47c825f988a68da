use std::str::FromStr;

use ndarray::Axis;
use serde::{Deserialize, Serialize};

/// Name of a per-sample array in a [`Dataset`](crate::Dataset).
///
/// The canonical names match the keys used by the training pipeline (`"X"`,
/// `"policy"`, `"value"`, ...). Fields are ordered by declaration, so iteration over
/// a dataset always visits `X`, `policy`, `value` first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::IsVariant,
    Serialize,
    Deserialize,
)]
pub enum Field {
    /// Occupancy planes, (N, 6, 7, 2).
    #[display("X")]
    #[serde(rename = "X")]
    X,
    /// Per-column move probabilities, (N, 7).
    #[display("policy")]
    #[serde(rename = "policy")]
    Policy,
    /// Game outcome target, (N, 1).
    #[display("value")]
    #[serde(rename = "value")]
    Value,
    /// Raw cell-state grid, (N, 6, 7).
    #[display("boards")]
    #[serde(rename = "boards")]
    Boards,
    /// Search visit counts per column, (N, 7).
    #[display("visits")]
    #[serde(rename = "visits")]
    Visits,
    /// Search scores per column, (N, 7).
    #[display("scores")]
    #[serde(rename = "scores")]
    Scores,
    /// Action values per column, (N, 7).
    #[display("q")]
    #[serde(rename = "q")]
    Q,
}

impl Field {
    /// Fields every training batch must carry.
    pub const REQUIRED: [Self; 3] = [Self::X, Self::Policy, Self::Value];
    /// Column-aligned fields carried only when the producer records them.
    pub const OPTIONAL: [Self; 4] = [Self::Boards, Self::Visits, Self::Scores, Self::Q];
    pub const ALL: [Self; 7] = [
        Self::X,
        Self::Policy,
        Self::Value,
        Self::Boards,
        Self::Visits,
        Self::Scores,
        Self::Q,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Policy => "policy",
            Self::Value => "value",
            Self::Boards => "boards",
            Self::Visits => "visits",
            Self::Scores => "scores",
            Self::Q => "q",
        }
    }

    #[must_use]
    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }

    /// Axis indexing board columns, counting the sample axis as axis 0.
    ///
    /// Returns `None` for fields that do not depend on board orientation.
    #[must_use]
    pub fn column_axis(self) -> Option<Axis> {
        match self {
            Self::X | Self::Boards => Some(Axis(2)),
            Self::Policy | Self::Visits | Self::Scores | Self::Q => Some(Axis(1)),
            Self::Value => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown dataset field `{name}`")]
pub struct ParseFieldError {
    pub name: String,
}

impl FromStr for Field {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| ParseFieldError { name: s.to_owned() })
    }
}
