mod answer;
mod context;
mod ids;
mod positioning;
mod progress;
mod question;
mod result;

pub use ids::{ModuleId, ParseIdError, QuestionId, SessionId};

pub use answer::{Answer, AnswerError};
pub use context::QuizContext;
pub use positioning::{AttemptKind, PositioningStatus, PositioningStatusParseError};
pub use progress::{ModuleProgress, ModuleProgressError, ModuleStatus};
pub use question::{Question, QuestionError, QuestionKind, check_sequence};
pub use result::{PASSING_SCORE, ResultError, SubmissionResult, is_passing};
