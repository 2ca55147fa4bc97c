use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::ModuleId;
use crate::model::result::is_passing;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ModuleProgressError {
    #[error("best score {0} is outside 0..=100")]
    InvalidBestScore(f64),

    #[error("a module with a best score must have at least one attempt")]
    MissingAttempts,
}

/// Where a learner stands in a course module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    InProgress,
    Completed,
}

impl ModuleStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Graded-attempt history for one module of a course.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleProgress {
    course: String,
    module: ModuleId,
    status: ModuleStatus,
    attempts: u32,
    best_score: Option<f64>,
    last_activity: Option<DateTime<Utc>>,
}

impl ModuleProgress {
    /// Progress for a module nobody has been graded on yet.
    #[must_use]
    pub fn untouched(course: impl Into<String>, module: ModuleId) -> Self {
        Self {
            course: course.into(),
            module,
            status: ModuleStatus::InProgress,
            attempts: 0,
            best_score: None,
            last_activity: None,
        }
    }

    /// Rehydrate progress from storage.
    ///
    /// # Errors
    ///
    /// Returns `ModuleProgressError` when the stored numbers are inconsistent.
    pub fn from_persisted(
        course: impl Into<String>,
        module: ModuleId,
        status: ModuleStatus,
        attempts: u32,
        best_score: Option<f64>,
        last_activity: Option<DateTime<Utc>>,
    ) -> Result<Self, ModuleProgressError> {
        if let Some(score) = best_score {
            if !(0.0..=100.0).contains(&score) {
                return Err(ModuleProgressError::InvalidBestScore(score));
            }
            if attempts == 0 {
                return Err(ModuleProgressError::MissingAttempts);
            }
        }
        Ok(Self {
            course: course.into(),
            module,
            status,
            attempts,
            best_score,
            last_activity,
        })
    }

    /// Fold one graded attempt into the history.
    ///
    /// A passing score completes the module; completion is never undone.
    pub fn record_attempt(&mut self, score: f64, at: DateTime<Utc>) {
        self.attempts = self.attempts.saturating_add(1);
        self.last_activity = Some(at);
        if self.best_score.is_none_or(|best| score > best) {
            self.best_score = Some(score);
        }
        if is_passing(score) {
            self.status = ModuleStatus::Completed;
        }
    }

    #[must_use]
    pub fn course(&self) -> &str {
        &self.course
    }

    #[must_use]
    pub fn module(&self) -> &ModuleId {
        &self.module
    }

    #[must_use]
    pub fn status(&self) -> ModuleStatus {
        self.status
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn best_score(&self) -> Option<f64> {
        self.best_score
    }

    #[must_use]
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_activity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn failing_attempt_keeps_module_in_progress() {
        let mut progress = ModuleProgress::untouched("Marketing", ModuleId::new("Module_1"));
        progress.record_attempt(40.0, fixed_now());
        assert_eq!(progress.status(), ModuleStatus::InProgress);
        assert_eq!(progress.attempts(), 1);
        assert_eq!(progress.best_score(), Some(40.0));
        assert_eq!(progress.last_activity(), Some(fixed_now()));
    }

    #[test]
    fn best_score_only_increases_and_completion_sticks() {
        let mut progress = ModuleProgress::untouched("Marketing", ModuleId::new("Module_1"));
        progress.record_attempt(70.0, fixed_now());
        progress.record_attempt(30.0, fixed_now());
        assert_eq!(progress.best_score(), Some(70.0));
        assert_eq!(progress.status(), ModuleStatus::Completed);
        assert_eq!(progress.attempts(), 2);
    }

    #[test]
    fn persisted_state_is_validated() {
        let module = ModuleId::new("Module_2");
        assert_eq!(
            ModuleProgress::from_persisted("c", module.clone(), ModuleStatus::InProgress, 0, Some(10.0), None),
            Err(ModuleProgressError::MissingAttempts)
        );
        assert!(
            ModuleProgress::from_persisted("c", module, ModuleStatus::Completed, 1, Some(101.0), None)
                .is_err()
        );
    }
}
