use quiz_core::model::{Answer, Question, SubmissionResult};

use super::progress::QuizProgress;
use super::service::{QuizSession, SessionStatus};
use crate::error::{LoadFailure, SessionError, SubmissionFailure};

/// Presentation-agnostic snapshot of everything a host renders.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no localization assumptions
///
/// Taken under the session lock so the host can render without holding it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub status: SessionStatus,
    pub is_positioning: bool,
    pub attempt: u32,
    pub current_index: usize,
    pub total_questions: usize,
    pub current_question: Option<Question>,
    pub current_answer: Option<Answer>,
    pub progress: QuizProgress,
    pub result: Option<SubmissionResult>,
    pub load_error: Option<LoadFailure>,
    pub submission_error: Option<SubmissionFailure>,
    pub last_rejection: Option<SessionError>,
}

impl SessionView {
    #[must_use]
    pub fn of(session: &QuizSession) -> Self {
        Self {
            status: session.status(),
            is_positioning: session.is_positioning(),
            attempt: session.attempt(),
            current_index: session.current_index(),
            total_questions: session.questions().len(),
            current_question: session.current_question().cloned(),
            current_answer: session.current_answer().cloned(),
            progress: session.progress(),
            result: session.result().cloned(),
            load_error: session.error().cloned(),
            submission_error: session.submission_error().cloned(),
            last_rejection: session.last_rejection().cloned(),
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.status.is_submitted()
    }

    /// Whether the cursor sits on the last question.
    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.total_questions > 0 && self.current_index + 1 == self.total_questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{ModuleId, QuestionId, QuizContext};
    use quiz_core::time::fixed_clock;

    #[test]
    fn snapshot_reflects_session_state() {
        let mut session = QuizSession::new(
            QuizContext::new(ModuleId::new("Module_2"), "Finance", Vec::new(), true),
            fixed_clock(),
        );
        let loading = SessionView::of(&session);
        assert!(loading.is_loading());
        assert!(loading.current_question.is_none());

        session.finish_load(Ok(vec![
            Question::open_text(QuestionId::new(1), "Define margin").unwrap(),
            Question::open_text(QuestionId::new(2), "Define markup").unwrap(),
        ]));
        session.go_to_next_question();
        session.save_current_answer(Answer::text("price minus cost")).unwrap();

        let view = SessionView::of(&session);
        assert!(view.is_positioning);
        assert!(view.is_last_question());
        assert_eq!(view.total_questions, 2);
        assert_eq!(view.current_answer, Some(Answer::text("price minus cost")));
        assert_eq!(view.progress.attempted, 1);
        assert_eq!(view.progress.percentage, 50.0);
    }
}
