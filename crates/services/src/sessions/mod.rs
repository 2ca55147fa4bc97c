mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::QuizProgress;
pub use service::{QuizSession, SessionStatus, SubmissionTicket, SubmitOutcome};
pub use view::SessionView;
pub use workflow::SessionHandle;
