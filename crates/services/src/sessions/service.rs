use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use quiz_core::Clock;
use quiz_core::model::{
    Answer, Question, QuestionId, QuizContext, SessionId, SubmissionResult, check_sequence,
};
use tokio::sync::watch;

use super::progress::QuizProgress;
use crate::error::{LoadFailure, SessionError, SubmissionFailure};
use crate::evaluation::{GradingRequest, GradingService, QuestionSource};

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Lifecycle of a quiz session.
///
/// `Loading → Ready → Submitting → Graded`, `Graded → Ready` through reset,
/// `Loading → Error` when questions cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    Ready,
    Submitting,
    Graded,
    Error,
}

impl SessionStatus {
    #[must_use]
    pub fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn is_submitted(self) -> bool {
        matches!(self, Self::Graded)
    }
}

//
// ─── SUBMISSION ────────────────────────────────────────────────────────────────
//

/// Identifies one in-flight grading request.
///
/// A response is only applied when its ticket matches the session's latest
/// submission; anything else is a late answer for a request nobody awaits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket {
    session: SessionId,
    seq: u64,
}

/// What a call to submit ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Grading succeeded; the session is `Graded`.
    Graded,
    /// Grading failed; the session is back in `Ready` with answers intact.
    Failed(SubmissionFailure),
    /// No request was made; carries the status that blocked it.
    Ignored(SessionStatus),
    /// The response arrived for a request the session no longer waits on.
    Discarded,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One learner's pass through an ordered set of questions.
///
/// Owns the question sequence, the cursor, the answers and the graded
/// result. Statistics are derived on demand from questions and answers.
/// Status changes are published on a watch channel so a countdown can follow
/// the session without holding a reference to it.
pub struct QuizSession {
    id: SessionId,
    context: QuizContext,
    clock: Clock,
    status: SessionStatus,
    questions: Vec<Question>,
    current: usize,
    answers: HashMap<QuestionId, Answer>,
    result: Option<SubmissionResult>,
    load_error: Option<LoadFailure>,
    submission_error: Option<SubmissionFailure>,
    last_rejection: Option<SessionError>,
    attempt: u32,
    submission_seq: u64,
    started_at: Option<DateTime<Utc>>,
    submitted_at: Option<DateTime<Utc>>,
    lifecycle: watch::Sender<SessionStatus>,
}

impl QuizSession {
    /// Create a session in `Loading`; call [`QuizSession::load`] next.
    #[must_use]
    pub fn new(context: QuizContext, clock: Clock) -> Self {
        let (lifecycle, _) = watch::channel(SessionStatus::Loading);
        Self {
            id: SessionId::new_random(),
            context,
            clock,
            status: SessionStatus::Loading,
            questions: Vec::new(),
            current: 0,
            answers: HashMap::new(),
            result: None,
            load_error: None,
            submission_error: None,
            last_rejection: None,
            attempt: 1,
            submission_seq: 0,
            started_at: None,
            submitted_at: None,
            lifecycle,
        }
    }

    /// Create a session and load its questions in one step.
    ///
    /// The returned session is either `Ready` or `Error`.
    pub async fn open(context: QuizContext, clock: Clock, source: &dyn QuestionSource) -> Self {
        let mut session = Self::new(context, clock);
        session.load(source).await;
        session
    }

    /// Fetch questions from `source` and leave `Loading`.
    pub async fn load(&mut self, source: &dyn QuestionSource) {
        if !self.status.is_loading() {
            return;
        }
        let fetched = source.fetch_questions(&self.context).await;
        self.finish_load(fetched);
    }

    /// Apply the outcome of a question fetch.
    ///
    /// Ignored unless the session is still `Loading`. Questions are installed
    /// all at once or not at all.
    pub fn finish_load(&mut self, fetched: Result<Vec<Question>, LoadFailure>) {
        if !self.status.is_loading() {
            tracing::debug!(session = %self.id, status = ?self.status, "ignoring question load outside Loading");
            return;
        }

        let checked = fetched.and_then(|questions| {
            check_sequence(&questions)?;
            Ok(questions)
        });

        match checked {
            Ok(questions) => {
                tracing::info!(
                    session = %self.id,
                    course = self.context.course_title(),
                    module = %self.context.module_id(),
                    questions = questions.len(),
                    "quiz ready"
                );
                self.questions = questions;
                self.current = 0;
                self.started_at = Some(self.clock.now());
                self.set_status(SessionStatus::Ready);
            }
            Err(err) => {
                tracing::warn!(session = %self.id, error = %err, "quiz failed to load");
                self.load_error = Some(err);
                self.set_status(SessionStatus::Error);
            }
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn context(&self) -> &QuizContext {
        &self.context
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.status.is_submitted()
    }

    #[must_use]
    pub fn is_positioning(&self) -> bool {
        self.context.is_positioning()
    }

    /// Subscribe to status changes. The channel closes when the session is dropped.
    #[must_use]
    pub fn lifecycle(&self) -> watch::Receiver<SessionStatus> {
        self.lifecycle.subscribe()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn answers(&self) -> &HashMap<QuestionId, Answer> {
        &self.answers
    }

    #[must_use]
    pub fn answer_for(&self, id: QuestionId) -> Option<&Answer> {
        self.answers.get(&id)
    }

    #[must_use]
    pub fn current_answer(&self) -> Option<&Answer> {
        self.current_question().and_then(|q| self.answers.get(&q.id()))
    }

    #[must_use]
    pub fn result(&self) -> Option<&SubmissionResult> {
        self.result.as_ref()
    }

    /// Why loading failed, when the session is in `Error`.
    #[must_use]
    pub fn error(&self) -> Option<&LoadFailure> {
        self.load_error.as_ref()
    }

    /// The last grading failure, cleared by the next submission attempt.
    #[must_use]
    pub fn submission_error(&self) -> Option<&SubmissionFailure> {
        self.submission_error.as_ref()
    }

    /// The last rejected answer or operation, cleared by the next accepted answer.
    #[must_use]
    pub fn last_rejection(&self) -> Option<&SessionError> {
        self.last_rejection.as_ref()
    }

    /// Attempt number, starting at 1 and bumped by every reset.
    #[must_use]
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress::compute(&self.questions, &self.answers)
    }

    #[must_use]
    pub fn attempted_count(&self) -> usize {
        self.progress().attempted
    }

    #[must_use]
    pub fn unattempted_count(&self) -> usize {
        self.progress().unattempted
    }

    #[must_use]
    pub fn progress_percentage(&self) -> f64 {
        self.progress().percentage
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Move to the next question. Returns whether the cursor moved.
    pub fn go_to_next_question(&mut self) -> bool {
        self.go_to_question(self.current.saturating_add(1))
    }

    /// Move to the previous question. Returns whether the cursor moved.
    pub fn go_to_prev_question(&mut self) -> bool {
        match self.current.checked_sub(1) {
            Some(index) => self.go_to_question(index),
            None => false,
        }
    }

    /// Jump to `index`, clamped to the last question.
    ///
    /// Only moves while `Ready`; a graded session keeps its final position.
    pub fn go_to_question(&mut self, index: usize) -> bool {
        if self.status != SessionStatus::Ready || self.questions.is_empty() {
            return false;
        }
        let target = index.min(self.questions.len() - 1);
        let moved = target != self.current;
        self.current = target;
        moved
    }

    //
    // ─── ANSWERS ───────────────────────────────────────────────────────────────
    //

    /// Store `answer` for the current question; the last write wins.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submitted` once graded, `SessionError::NotReady`
    /// while loading/submitting/failed, `SessionError::NoCurrentQuestion` for an
    /// empty quiz and `SessionError::InvalidAnswerType` when the answer does not
    /// fit the question. The rejection is also kept in [`Self::last_rejection`].
    pub fn save_current_answer(&mut self, answer: Answer) -> Result<(), SessionError> {
        let outcome = self.try_save(answer);
        match &outcome {
            Ok(()) => self.last_rejection = None,
            Err(err) => {
                tracing::debug!(session = %self.id, error = %err, "answer rejected");
                self.last_rejection = Some(err.clone());
            }
        }
        outcome
    }

    fn try_save(&mut self, answer: Answer) -> Result<(), SessionError> {
        match self.status {
            SessionStatus::Ready => {}
            SessionStatus::Graded => return Err(SessionError::Submitted),
            other => return Err(SessionError::NotReady(other)),
        }
        let question = self
            .questions
            .get(self.current)
            .ok_or(SessionError::NoCurrentQuestion)?;
        answer.validate_for(question)?;
        self.answers.insert(question.id(), answer);
        Ok(())
    }

    //
    // ─── SUBMISSION ────────────────────────────────────────────────────────────
    //

    /// Grade the current answers through `grader`.
    ///
    /// Only acts from `Ready`; repeated calls while `Submitting` or after
    /// grading are reported as [`SubmitOutcome::Ignored`].
    pub async fn submit_quiz(&mut self, grader: &dyn GradingService) -> SubmitOutcome {
        let (ticket, request) = match self.begin_submission() {
            Ok(started) => started,
            Err(status) => return SubmitOutcome::Ignored(status),
        };
        let outcome = grader.submit_answers(&request).await;
        self.complete_submission(ticket, outcome)
    }

    /// Move to `Submitting` and snapshot what must be graded.
    ///
    /// # Errors
    ///
    /// Returns the blocking status when the session is not `Ready`.
    pub fn begin_submission(&mut self) -> Result<(SubmissionTicket, GradingRequest), SessionStatus> {
        if self.status != SessionStatus::Ready {
            tracing::debug!(session = %self.id, status = ?self.status, "submit ignored");
            return Err(self.status);
        }
        self.submission_seq += 1;
        self.submission_error = None;
        self.set_status(SessionStatus::Submitting);

        let progress = self.progress();
        tracing::info!(
            session = %self.id,
            attempted = progress.attempted,
            total = progress.total,
            "submitting quiz for grading"
        );

        let ticket = SubmissionTicket {
            session: self.id,
            seq: self.submission_seq,
        };
        let request = GradingRequest {
            context: self.context.clone(),
            questions: self.questions.clone(),
            answers: self.answers.clone(),
        };
        Ok((ticket, request))
    }

    /// Apply a grading outcome for `ticket`.
    ///
    /// Stale tickets are discarded without touching the session.
    pub fn complete_submission(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<SubmissionResult, SubmissionFailure>,
    ) -> SubmitOutcome {
        if self.status != SessionStatus::Submitting
            || ticket.session != self.id
            || ticket.seq != self.submission_seq
        {
            tracing::debug!(session = %self.id, ?ticket, "discarding stale grading response");
            return SubmitOutcome::Discarded;
        }

        match outcome {
            Ok(result) => {
                tracing::info!(
                    session = %self.id,
                    score = result.score(),
                    passed = result.passed(),
                    "quiz graded"
                );
                self.result = Some(result);
                self.submitted_at = Some(self.clock.now());
                self.set_status(SessionStatus::Graded);
                SubmitOutcome::Graded
            }
            Err(err) => {
                tracing::warn!(session = %self.id, error = %err, "grading failed");
                self.submission_error = Some(err.clone());
                self.set_status(SessionStatus::Ready);
                SubmitOutcome::Failed(err)
            }
        }
    }

    //
    // ─── RESET ─────────────────────────────────────────────────────────────────
    //

    /// Start a fresh attempt after grading: answers, cursor and result are cleared.
    ///
    /// Returns `false` (and changes nothing) unless the session is `Graded`.
    pub fn reset_to_first_question(&mut self) -> bool {
        if self.status != SessionStatus::Graded {
            return false;
        }
        self.answers.clear();
        self.current = 0;
        self.result = None;
        self.submitted_at = None;
        self.submission_error = None;
        self.last_rejection = None;
        self.attempt = self.attempt.saturating_add(1);
        self.started_at = Some(self.clock.now());
        self.set_status(SessionStatus::Ready);
        tracing::info!(session = %self.id, attempt = self.attempt, "quiz reset for a new attempt");
        true
    }

    fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
        self.lifecycle.send_replace(status);
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("attempt", &self.attempt)
            .field("started_at", &self.started_at)
            .field("submitted_at", &self.submitted_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiz_core::model::{AnswerError, ModuleId};
    use quiz_core::time::{fixed_clock, fixed_now};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn context() -> QuizContext {
        QuizContext::new(
            ModuleId::new("Module_1"),
            "Marketing",
            vec!["pricing".into()],
            false,
        )
    }

    fn mcq(id: u64) -> Question {
        Question::multiple_choice(
            QuestionId::new(id),
            format!("Question {id}"),
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
        )
        .unwrap()
    }

    fn ready_session(questions: Vec<Question>) -> QuizSession {
        let mut session = QuizSession::new(context(), fixed_clock());
        session.finish_load(Ok(questions));
        session
    }

    struct FixedGrader {
        score: f64,
        calls: AtomicUsize,
    }

    impl FixedGrader {
        fn new(score: f64) -> Self {
            Self {
                score,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GradingService for FixedGrader {
        async fn submit_answers(
            &self,
            _request: &GradingRequest,
        ) -> Result<SubmissionResult, SubmissionFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SubmissionResult::from_score(self.score, Vec::new()).unwrap())
        }
    }

    struct FailingGrader;

    #[async_trait]
    impl GradingService for FailingGrader {
        async fn submit_answers(
            &self,
            _request: &GradingRequest,
        ) -> Result<SubmissionResult, SubmissionFailure> {
            Err(SubmissionFailure::Unavailable("connection refused".into()))
        }
    }

    #[test]
    fn new_session_is_loading_and_empty() {
        let session = QuizSession::new(context(), fixed_clock());
        assert_eq!(session.status(), SessionStatus::Loading);
        assert!(session.current_question().is_none());
        assert_eq!(session.progress_percentage(), 0.0);
    }

    #[test]
    fn successful_load_enters_ready_at_first_question() {
        let session = ready_session(vec![mcq(1), mcq(2)]);
        assert_eq!(session.status(), SessionStatus::Ready);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.current_question().unwrap().id(), QuestionId::new(1));
        assert!(session.answers().is_empty());
        assert_eq!(session.started_at(), Some(fixed_now()));
    }

    #[test]
    fn failed_load_enters_error_without_questions() {
        let mut session = QuizSession::new(context(), fixed_clock());
        session.finish_load(Err(LoadFailure::Unavailable("timeout".into())));
        assert_eq!(session.status(), SessionStatus::Error);
        assert!(session.questions().is_empty());
        assert_eq!(
            session.error(),
            Some(&LoadFailure::Unavailable("timeout".into()))
        );
    }

    #[test]
    fn duplicate_question_ids_fail_the_load_entirely() {
        let mut session = QuizSession::new(context(), fixed_clock());
        session.finish_load(Ok(vec![mcq(1), mcq(1)]));
        assert_eq!(session.status(), SessionStatus::Error);
        assert!(session.questions().is_empty());
        assert!(matches!(session.error(), Some(LoadFailure::InvalidQuestions(_))));
    }

    #[test]
    fn second_load_is_ignored() {
        let mut session = ready_session(vec![mcq(1)]);
        session.finish_load(Ok(vec![mcq(7), mcq(8)]));
        assert_eq!(session.questions().len(), 1);
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut session = ready_session(vec![mcq(1), mcq(2), mcq(3)]);
        assert!(!session.go_to_prev_question());
        assert_eq!(session.current_index(), 0);

        assert!(session.go_to_next_question());
        assert!(session.go_to_next_question());
        assert!(!session.go_to_next_question());
        assert_eq!(session.current_index(), 2);

        assert!(session.go_to_question(0));
        assert!(session.go_to_question(99));
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn navigation_on_empty_quiz_is_a_no_op() {
        let mut session = ready_session(Vec::new());
        assert!(!session.go_to_next_question());
        assert!(!session.go_to_prev_question());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn invalid_answer_is_rejected_and_recorded() {
        let mut session = ready_session(vec![mcq(1)]);
        let err = session.save_current_answer(Answer::Choice(4)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidAnswerType(AnswerError::InvalidAnswerType { .. })
        ));
        assert!(session.answers().is_empty());
        assert_eq!(session.last_rejection(), Some(&err));

        session.save_current_answer(Answer::Choice(1)).unwrap();
        assert!(session.last_rejection().is_none());
    }

    #[test]
    fn last_write_wins_per_question() {
        let mut session = ready_session(vec![mcq(1)]);
        session.save_current_answer(Answer::Choice(0)).unwrap();
        session.save_current_answer(Answer::Choice(3)).unwrap();
        assert_eq!(session.current_answer(), Some(&Answer::Choice(3)));
        assert_eq!(session.attempted_count(), 1);
    }

    #[test]
    fn empty_open_text_is_stored_but_not_counted() {
        let open = Question::open_text(QuestionId::new(1), "Explain").unwrap();
        let mut session = ready_session(vec![open]);
        session.save_current_answer(Answer::text("")).unwrap();
        assert!(session.answer_for(QuestionId::new(1)).is_some());
        assert_eq!(session.attempted_count(), 0);
        assert_eq!(session.unattempted_count(), 1);
    }

    #[test]
    fn answering_while_loading_is_rejected() {
        let mut session = QuizSession::new(context(), fixed_clock());
        assert_eq!(
            session.save_current_answer(Answer::Choice(0)),
            Err(SessionError::NotReady(SessionStatus::Loading))
        );
    }

    #[tokio::test]
    async fn submit_grades_and_freezes_the_session() {
        let mut session = ready_session(vec![mcq(1), mcq(2)]);
        session.save_current_answer(Answer::Choice(0)).unwrap();
        session.go_to_next_question();

        let grader = FixedGrader::new(62.0);
        assert_eq!(session.submit_quiz(&grader).await, SubmitOutcome::Graded);
        assert!(session.is_submitted());
        assert!(session.result().unwrap().passed());
        assert_eq!(session.submitted_at(), Some(fixed_now()));

        assert!(!session.go_to_prev_question());
        assert_eq!(session.current_index(), 1);
        assert_eq!(
            session.save_current_answer(Answer::Choice(1)),
            Err(SessionError::Submitted)
        );
    }

    #[tokio::test]
    async fn submit_after_grading_is_ignored() {
        let mut session = ready_session(vec![mcq(1)]);
        let grader = FixedGrader::new(40.0);
        session.submit_quiz(&grader).await;
        assert!(!session.result().unwrap().passed());

        assert_eq!(
            session.submit_quiz(&grader).await,
            SubmitOutcome::Ignored(SessionStatus::Graded)
        );
        assert_eq!(grader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn submit_while_submitting_makes_no_second_request() {
        let mut session = ready_session(vec![mcq(1)]);
        let grader = FixedGrader::new(80.0);
        let (ticket, _request) = session.begin_submission().unwrap();
        assert_eq!(session.status(), SessionStatus::Submitting);

        assert_eq!(
            session.submit_quiz(&grader).await,
            SubmitOutcome::Ignored(SessionStatus::Submitting)
        );
        assert_eq!(grader.calls.load(Ordering::SeqCst), 0);

        let result = SubmissionResult::from_score(80.0, Vec::new()).unwrap();
        assert_eq!(
            session.complete_submission(ticket, Ok(result)),
            SubmitOutcome::Graded
        );
    }

    #[tokio::test]
    async fn failed_submission_returns_to_ready_with_answers() {
        let mut session = ready_session(vec![mcq(1)]);
        session.save_current_answer(Answer::Choice(2)).unwrap();

        let outcome = session.submit_quiz(&FailingGrader).await;
        assert!(matches!(outcome, SubmitOutcome::Failed(SubmissionFailure::Unavailable(_))));
        assert_eq!(session.status(), SessionStatus::Ready);
        assert!(session.submission_error().is_some());
        assert_eq!(session.current_answer(), Some(&Answer::Choice(2)));

        let grader = FixedGrader::new(90.0);
        assert_eq!(session.submit_quiz(&grader).await, SubmitOutcome::Graded);
        assert!(session.submission_error().is_none());
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let mut session = ready_session(vec![mcq(1)]);
        let (first, _) = session.begin_submission().unwrap();
        session.complete_submission(
            first,
            Err(SubmissionFailure::Unavailable("down".into())),
        );
        let (_second, _) = session.begin_submission().unwrap();

        let late = SubmissionResult::from_score(99.0, Vec::new()).unwrap();
        assert_eq!(
            session.complete_submission(first, Ok(late)),
            SubmitOutcome::Discarded
        );
        assert_eq!(session.status(), SessionStatus::Submitting);
        assert!(session.result().is_none());
    }

    #[tokio::test]
    async fn reset_only_works_from_graded() {
        let mut session = ready_session(vec![mcq(1), mcq(2)]);
        session.save_current_answer(Answer::Choice(0)).unwrap();
        session.go_to_next_question();
        assert!(!session.reset_to_first_question());
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.answers().len(), 1);

        session.submit_quiz(&FixedGrader::new(70.0)).await;
        assert!(session.reset_to_first_question());
        assert_eq!(session.status(), SessionStatus::Ready);
        assert_eq!(session.current_index(), 0);
        assert!(session.answers().is_empty());
        assert!(session.result().is_none());
        assert!(!session.is_submitted());
        assert_eq!(session.attempt(), 2);
    }

    #[test]
    fn lifecycle_channel_follows_status() {
        let mut session = QuizSession::new(context(), fixed_clock());
        let rx = session.lifecycle();
        assert_eq!(*rx.borrow(), SessionStatus::Loading);
        session.finish_load(Ok(vec![mcq(1)]));
        assert_eq!(*rx.borrow(), SessionStatus::Ready);
    }
}
