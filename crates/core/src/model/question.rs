use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {0} has an empty prompt")]
    EmptyPrompt(QuestionId),

    #[error("multiple-choice question {0} has no options")]
    NoOptions(QuestionId),

    #[error("question id {0} appears more than once")]
    DuplicateId(QuestionId),
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// What kind of answer a question expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice { options: Vec<String> },
    OpenText,
}

/// A single quiz question, immutable once a session has loaded it.
///
/// `grading_payload` holds whatever the evaluation service sent for this
/// question (correct answer, references, ...). It is returned verbatim on
/// submission and never inspected here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    #[serde(flatten)]
    kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grading_payload: Option<Value>,
}

impl Question {
    /// Build a multiple-choice question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` for a blank prompt and
    /// `QuestionError::NoOptions` when `options` is empty.
    pub fn multiple_choice(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt(id));
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions(id));
        }
        Ok(Self {
            id,
            prompt,
            kind: QuestionKind::MultipleChoice { options },
            grading_payload: None,
        })
    }

    /// Build an open-text question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` for a blank prompt.
    pub fn open_text(id: QuestionId, prompt: impl Into<String>) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt(id));
        }
        Ok(Self {
            id,
            prompt,
            kind: QuestionKind::OpenText,
            grading_payload: None,
        })
    }

    #[must_use]
    pub fn with_grading_payload(mut self, payload: Value) -> Self {
        self.grading_payload = Some(payload);
        self
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// Option texts for multiple-choice questions, empty for open-text.
    #[must_use]
    pub fn options(&self) -> &[String] {
        match &self.kind {
            QuestionKind::MultipleChoice { options } => options,
            QuestionKind::OpenText => &[],
        }
    }

    #[must_use]
    pub fn is_multiple_choice(&self) -> bool {
        matches!(self.kind, QuestionKind::MultipleChoice { .. })
    }

    #[must_use]
    pub fn grading_payload(&self) -> Option<&Value> {
        self.grading_payload.as_ref()
    }
}

/// Check that a loaded sequence can back a session: ids must be unique.
///
/// # Errors
///
/// Returns `QuestionError::DuplicateId` for the first repeated id.
pub fn check_sequence(questions: &[Question]) -> Result<(), QuestionError> {
    let mut seen = HashSet::with_capacity(questions.len());
    for question in questions {
        if !seen.insert(question.id()) {
            return Err(QuestionError::DuplicateId(question.id()));
        }
    }
    Ok(())
}
