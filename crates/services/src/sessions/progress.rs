use std::collections::HashMap;

use quiz_core::model::{Answer, Question, QuestionId};

/// Attempt statistics derived from `(questions, answers)`; never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizProgress {
    pub total: usize,
    pub attempted: usize,
    pub unattempted: usize,
    pub percentage: f64,
}

impl QuizProgress {
    #[must_use]
    pub fn compute(questions: &[Question], answers: &HashMap<QuestionId, Answer>) -> Self {
        let total = questions.len();
        let attempted = questions
            .iter()
            .filter(|q| answers.get(&q.id()).is_some_and(Answer::is_present))
            .count();
        #[allow(clippy::cast_precision_loss)]
        let percentage = if total == 0 {
            0.0
        } else {
            attempted as f64 / total as f64 * 100.0
        };
        Self {
            total,
            attempted,
            unattempted: total - attempted,
            percentage,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.unattempted == 0
    }
}
