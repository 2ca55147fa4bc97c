use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::watch;

use super::service::{QuizSession, SessionStatus, SubmitOutcome};
use super::view::SessionView;
use crate::evaluation::{GradingService, QuestionSource};

/// Shared, host-facing handle to a [`QuizSession`].
///
/// Network calls are made without holding the lock. The futures returned by
/// [`SessionHandle::load`] and [`SessionHandle::submit`] keep only a weak
/// reference, so dropping every handle tears the session down and whatever
/// arrives afterwards is dropped on the floor.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<QuizSession>>,
}

impl SessionHandle {
    #[must_use]
    pub fn new(session: QuizSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Run `f` against the session under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&QuizSession) -> R) -> R {
        f(&lock(&self.inner))
    }

    /// Run `f` against the session under the lock, mutably.
    pub fn update<R>(&self, f: impl FnOnce(&mut QuizSession) -> R) -> R {
        f(&mut lock(&self.inner))
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        self.read(SessionView::of)
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.read(QuizSession::status)
    }

    #[must_use]
    pub fn lifecycle(&self) -> watch::Receiver<SessionStatus> {
        self.read(QuizSession::lifecycle)
    }

    /// Fetch questions from `source` and apply them if the session still exists.
    pub fn load(&self, source: Arc<dyn QuestionSource>) -> impl Future<Output = ()> + Send + 'static {
        let context = self.read(|s| s.is_loading().then(|| s.context().clone()));
        let weak = Arc::downgrade(&self.inner);
        async move {
            let Some(context) = context else {
                return;
            };
            let fetched = source.fetch_questions(&context).await;
            match weak.upgrade() {
                Some(inner) => {
                    lock(&inner).finish_load(fetched);
                }
                None => tracing::debug!("session dropped before questions arrived"),
            }
        }
    }

    /// Start grading.
    ///
    /// The move to `Submitting` happens before this returns, so a second
    /// call made before the first future is polled is already ignored.
    pub fn submit(
        &self,
        grader: Arc<dyn GradingService>,
    ) -> impl Future<Output = SubmitOutcome> + Send + 'static {
        let started = self.update(QuizSession::begin_submission);
        let weak: Weak<Mutex<QuizSession>> = Arc::downgrade(&self.inner);
        async move {
            let (ticket, request) = match started {
                Ok(started) => started,
                Err(status) => return SubmitOutcome::Ignored(status),
            };
            let outcome = grader.submit_answers(&request).await;
            let Some(inner) = weak.upgrade() else {
                tracing::debug!("session dropped before grading finished");
                return SubmitOutcome::Discarded;
            };
            let mut session = lock(&inner);
            session.complete_submission(ticket, outcome)
        }
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("session", &*lock(&self.inner))
            .finish()
    }
}

fn lock(inner: &Mutex<QuizSession>) -> MutexGuard<'_, QuizSession> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}
