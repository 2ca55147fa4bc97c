use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::result::is_passing;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown positioning status: {0}")]
pub struct PositioningStatusParseError(pub String);

/// Persisted state of a course's positioning (placement) test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositioningStatus {
    NotAttempted,
    Attempted,
    Passed,
    Failed,
}

impl PositioningStatus {
    /// Status recorded after grading a positioning test with `score`.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if is_passing(score) {
            Self::Passed
        } else {
            Self::Failed
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotAttempted => "not_attempted",
            Self::Attempted => "attempted",
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }

    #[must_use]
    pub fn is_attempted(self) -> bool {
        !matches!(self, Self::NotAttempted)
    }
}

impl fmt::Display for PositioningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PositioningStatus {
    type Err = PositioningStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_attempted" => Ok(Self::NotAttempted),
            "attempted" => Ok(Self::Attempted),
            "passed" => Ok(Self::Passed),
            "failed" => Ok(Self::Failed),
            other => Err(PositioningStatusParseError(other.to_string())),
        }
    }
}

/// Whether a positioning test is being taken for the first time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptKind {
    First,
    Retake,
}

impl AttemptKind {
    /// Derive the attempt kind from a persisted status, if any.
    #[must_use]
    pub fn from_status(status: Option<PositioningStatus>) -> Self {
        match status {
            Some(status) if status.is_attempted() => Self::Retake,
            _ => Self::First,
        }
    }

    #[must_use]
    pub fn is_first(self) -> bool {
        matches!(self, Self::First)
    }
}
