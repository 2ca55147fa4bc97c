use std::sync::Arc;

use quiz_core::model::AttemptKind;
use storage::repository::ProgressRepository;

/// Answers "is this the learner's first positioning test for the course?".
///
/// Reads only. A store that cannot be read, or a record that cannot be
/// decoded, is treated as "never attempted".
#[derive(Clone)]
pub struct PositioningService {
    progress: Arc<dyn ProgressRepository>,
}

impl PositioningService {
    #[must_use]
    pub fn new(progress: Arc<dyn ProgressRepository>) -> Self {
        Self { progress }
    }

    pub async fn attempt_kind(&self, course: &str) -> AttemptKind {
        match self.progress.get_positioning_status(course).await {
            Ok(status) => AttemptKind::from_status(status),
            Err(err) => {
                tracing::warn!(course, error = %err, "positioning status unreadable, assuming first attempt");
                AttemptKind::First
            }
        }
    }

    pub async fn is_first_attempt(&self, course: &str) -> bool {
        self.attempt_kind(course).await.is_first()
    }
}
