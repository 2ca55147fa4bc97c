use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{Question, QuestionKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("answer does not fit question {question_id}: {reason}")]
    InvalidAnswerType {
        question_id: QuestionId,
        reason: &'static str,
    },
}

/// A learner's answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// Zero-based index into the question's options.
    Choice(usize),
    Text(String),
}

impl Answer {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Whether this answer counts as attempted.
    ///
    /// Whitespace-only text is the same as no answer.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Answer::Choice(_) => true,
            Answer::Text(text) => !text.trim().is_empty(),
        }
    }

    /// Check that this answer can be stored for `question`.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::InvalidAnswerType` when the answer kind does not
    /// match the question kind or the choice index is out of range.
    pub fn validate_for(&self, question: &Question) -> Result<(), AnswerError> {
        let invalid = |reason| AnswerError::InvalidAnswerType {
            question_id: question.id(),
            reason,
        };
        match (question.kind(), self) {
            (QuestionKind::MultipleChoice { options }, Answer::Choice(index)) => {
                if *index < options.len() {
                    Ok(())
                } else {
                    Err(invalid("option index out of range"))
                }
            }
            (QuestionKind::MultipleChoice { .. }, Answer::Text(_)) => {
                Err(invalid("multiple-choice questions take an option index"))
            }
            (QuestionKind::OpenText, Answer::Text(_)) => Ok(()),
            (QuestionKind::OpenText, Answer::Choice(_)) => {
                Err(invalid("open-text questions take free text"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mcq() -> Question {
        Question::multiple_choice(
            QuestionId::new(1),
            "Which one?",
            vec!["a".into(), "b".into(), "c".into()],
        )
        .unwrap()
    }

    #[test]
    fn choice_within_range_is_valid() {
        assert!(Answer::Choice(2).validate_for(&mcq()).is_ok());
    }

    #[test]
    fn choice_out_of_range_is_rejected() {
        let err = Answer::Choice(3).validate_for(&mcq()).unwrap_err();
        assert!(matches!(
            err,
            AnswerError::InvalidAnswerType { question_id, .. } if question_id == QuestionId::new(1)
        ));
    }

    #[test]
    fn kinds_must_match() {
        let open = Question::open_text(QuestionId::new(2), "Why?").unwrap();
        assert!(Answer::text("because").validate_for(&open).is_ok());
        assert!(Answer::text("").validate_for(&open).is_ok());
        assert!(Answer::Choice(0).validate_for(&open).is_err());
        assert!(Answer::text("a").validate_for(&mcq()).is_err());
    }

    #[test]
    fn blank_text_is_not_present() {
        assert!(!Answer::text("").is_present());
        assert!(!Answer::text("  \n").is_present());
        assert!(Answer::text("x").is_present());
        assert!(Answer::Choice(0).is_present());
    }
}
