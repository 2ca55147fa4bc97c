//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{AnswerError, QuestionError};

use crate::sessions::SessionStatus;

/// Why a session could not load its questions.
///
/// Stored on the session (which moves to `Error`) rather than returned.
#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum LoadFailure {
    #[error("question service unreachable: {0}")]
    Unavailable(String),
    #[error("question service refused the request (status {status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("question service sent an unusable response: {0}")]
    Malformed(String),
    #[error(transparent)]
    InvalidQuestions(#[from] QuestionError),
}

/// Why grading a submitted quiz failed; the session returns to `Ready`.
#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum SubmissionFailure {
    #[error("grading service unreachable: {0}")]
    Unavailable(String),
    #[error("grading service refused the submission (status {status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("grading service sent an unusable response: {0}")]
    Malformed(String),
}

/// Locally rejected session operations. None of these reach the network.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    InvalidAnswerType(#[from] AnswerError),
    #[error("quiz already submitted")]
    Submitted,
    #[error("session is not accepting answers while {0:?}")]
    NotReady(SessionStatus),
    #[error("no current question")]
    NoCurrentQuestion,
}

/// Transport-level errors of the evaluation HTTP client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvaluationClientError {
    #[error("evaluation service returned status {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("invalid evaluation service url: {0}")]
    Url(#[from] url::ParseError),
}

impl From<EvaluationClientError> for LoadFailure {
    fn from(err: EvaluationClientError) -> Self {
        match err {
            EvaluationClientError::HttpStatus { status, body } => LoadFailure::Rejected {
                status: status.as_u16(),
                detail: body,
            },
            EvaluationClientError::Http(err) if err.is_decode() => {
                LoadFailure::Malformed(err.to_string())
            }
            other => LoadFailure::Unavailable(other.to_string()),
        }
    }
}

impl From<EvaluationClientError> for SubmissionFailure {
    fn from(err: EvaluationClientError) -> Self {
        match err {
            EvaluationClientError::HttpStatus { status, body } => SubmissionFailure::Rejected {
                status: status.as_u16(),
                detail: body,
            },
            EvaluationClientError::Http(err) if err.is_decode() => {
                SubmissionFailure::Malformed(err.to_string())
            }
            other => SubmissionFailure::Unavailable(other.to_string()),
        }
    }
}

/// Errors emitted while loading `QuizConfig`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {raw}")]
    InvalidValue { key: &'static str, raw: String },
    #[error("invalid api.base_url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
