use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Fixed pass mark on the 0–100 score scale.
pub const PASSING_SCORE: f64 = 57.0;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ResultError {
    #[error("score {0} is outside 0..=100")]
    ScoreOutOfRange(f64),
}

/// Returns true when `score` meets the pass mark.
#[must_use]
pub fn is_passing(score: f64) -> bool {
    score >= PASSING_SCORE
}

/// Graded outcome of a submitted quiz.
///
/// Deserializing goes through [`SubmissionResult::from_score`]; a stored
/// `passed` flag is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredResult")]
pub struct SubmissionResult {
    score: f64,
    passed: bool,
    #[serde(default)]
    breakdown: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    study_guide: Option<String>,
}

#[derive(Deserialize)]
struct StoredResult {
    score: f64,
    #[serde(default)]
    breakdown: Vec<Value>,
    #[serde(default)]
    study_guide: Option<String>,
}

impl TryFrom<StoredResult> for SubmissionResult {
    type Error = ResultError;

    fn try_from(stored: StoredResult) -> Result<Self, Self::Error> {
        let result = Self::from_score(stored.score, stored.breakdown)?;
        Ok(match stored.study_guide {
            Some(guide) => result.with_study_guide(guide),
            None => result,
        })
    }
}

impl SubmissionResult {
    /// Build a result from a grader score; `passed` is derived from [`PASSING_SCORE`].
    ///
    /// # Errors
    ///
    /// Returns `ResultError::ScoreOutOfRange` for NaN or scores outside 0..=100.
    pub fn from_score(score: f64, breakdown: Vec<Value>) -> Result<Self, ResultError> {
        if !(0.0..=100.0).contains(&score) {
            return Err(ResultError::ScoreOutOfRange(score));
        }
        Ok(Self {
            score,
            passed: is_passing(score),
            breakdown,
            study_guide: None,
        })
    }

    #[must_use]
    pub fn with_study_guide(mut self, guide: impl Into<String>) -> Self {
        let guide = guide.into();
        self.study_guide = (!guide.trim().is_empty()).then_some(guide);
        self
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Per-question details exactly as the grader returned them.
    #[must_use]
    pub fn breakdown(&self) -> &[Value] {
        &self.breakdown
    }

    #[must_use]
    pub fn study_guide(&self) -> Option<&str> {
        self.study_guide.as_deref()
    }
}
