//! Contracts for the external evaluation collaborators.

use std::collections::HashMap;

use async_trait::async_trait;
use quiz_core::model::{Answer, Question, QuestionId, QuizContext, SubmissionResult};

use crate::error::{LoadFailure, SubmissionFailure};

/// Supplies the ordered question sequence for a quiz context.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch questions for a module/course/topics selection.
    ///
    /// # Errors
    ///
    /// Returns `LoadFailure` on network or validation failure.
    async fn fetch_questions(&self, context: &QuizContext) -> Result<Vec<Question>, LoadFailure>;
}

/// Grades a finished quiz.
#[async_trait]
pub trait GradingService: Send + Sync {
    /// Grade the snapshot in `request`.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionFailure` when grading could not be completed.
    async fn submit_answers(
        &self,
        request: &GradingRequest,
    ) -> Result<SubmissionResult, SubmissionFailure>;
}

/// Snapshot of a session sent for grading.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingRequest {
    pub context: QuizContext,
    pub questions: Vec<Question>,
    pub answers: HashMap<QuestionId, Answer>,
}

impl GradingRequest {
    /// Answers in question order, `None` where nothing usable was given.
    #[must_use]
    pub fn ordered_answers(&self) -> Vec<(&Question, Option<&Answer>)> {
        self.questions
            .iter()
            .map(|q| {
                let answer = self.answers.get(&q.id()).filter(|a| a.is_present());
                (q, answer)
            })
            .collect()
    }
}
