use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::Clock;
use quiz_core::model::SubmissionResult;
use storage::repository::ProgressRepository;

use crate::error::SubmissionFailure;
use crate::evaluation::{GradingRequest, GradingService};

/// Grader decorator that writes learner progress after a successful grading.
///
/// Positioning sessions record a course-level positioning result; module
/// sessions fold the score into the module's progress. A failed write is
/// logged and the graded result is still returned.
pub struct ProgressTrackingGrader<G> {
    inner: G,
    progress: Arc<dyn ProgressRepository>,
    clock: Clock,
}

impl<G: GradingService> ProgressTrackingGrader<G> {
    #[must_use]
    pub fn new(inner: G, progress: Arc<dyn ProgressRepository>, clock: Clock) -> Self {
        Self {
            inner,
            progress,
            clock,
        }
    }

    async fn record(&self, request: &GradingRequest, result: &SubmissionResult) {
        let context = &request.context;
        let course = context.course_title();
        let at = self.clock.now();

        if context.is_positioning() {
            match self
                .progress
                .record_positioning_result(course, result.score(), at)
                .await
            {
                Ok(record) => {
                    tracing::info!(course, status = %record.status, "positioning result recorded");
                }
                Err(err) => {
                    tracing::warn!(course, error = %err, "failed to record positioning result");
                }
            }
        } else {
            let module = context.module_id();
            match self
                .progress
                .record_module_result(course, module, result.score(), at)
                .await
            {
                Ok(progress) => {
                    tracing::info!(
                        course,
                        module = %module,
                        attempts = progress.attempts(),
                        status = progress.status().as_str(),
                        "module progress recorded"
                    );
                }
                Err(err) => {
                    tracing::warn!(course, module = %module, error = %err, "failed to record module progress");
                }
            }
        }
    }
}

#[async_trait]
impl<G: GradingService> GradingService for ProgressTrackingGrader<G> {
    async fn submit_answers(
        &self,
        request: &GradingRequest,
    ) -> Result<SubmissionResult, SubmissionFailure> {
        let result = self.inner.submit_answers(request).await?;
        self.record(request, &result).await;
        Ok(result)
    }
}
