#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod evaluation;
pub mod evaluation_client;
pub mod positioning;
pub mod progression;
pub mod sessions;
pub mod timer;

pub use quiz_core::Clock;
pub use sessions as session;

pub use config::QuizConfig;
pub use error::{
    ConfigError, EvaluationClientError, LoadFailure, SessionError, SubmissionFailure,
};
pub use evaluation::{GradingRequest, GradingService, QuestionSource};
pub use evaluation_client::HttpEvaluationClient;
pub use positioning::PositioningService;
pub use progression::ProgressTrackingGrader;
pub use timer::{Countdown, QuizTimer, Tick};

pub use sessions::{
    QuizProgress, QuizSession, SessionHandle, SessionStatus, SessionView, SubmissionTicket,
    SubmitOutcome,
};
