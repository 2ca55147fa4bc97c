use serde::{Deserialize, Serialize};

use crate::model::ids::ModuleId;

/// What a quiz session is about: the selection a host makes before starting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizContext {
    module_id: ModuleId,
    course_title: String,
    topics: Vec<String>,
    is_positioning: bool,
}

impl QuizContext {
    #[must_use]
    pub fn new(
        module_id: ModuleId,
        course_title: impl Into<String>,
        topics: Vec<String>,
        is_positioning: bool,
    ) -> Self {
        Self {
            module_id,
            course_title: course_title.into(),
            topics,
            is_positioning,
        }
    }

    #[must_use]
    pub fn module_id(&self) -> &ModuleId {
        &self.module_id
    }

    #[must_use]
    pub fn course_title(&self) -> &str {
        &self.course_title
    }

    #[must_use]
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Positioning sessions are placement tests; fixed at construction.
    #[must_use]
    pub fn is_positioning(&self) -> bool {
        self.is_positioning
    }
}
