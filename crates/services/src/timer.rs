//! Countdown bound to a quiz session's lifecycle.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::sessions::SessionStatus;

const TICK: Duration = Duration::from_secs(1);

/// Result of feeding one elapsed second into a [`Countdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The session is loading or submitting; time does not run.
    Paused,
    /// One second elapsed; carries the seconds left.
    Ticked(u64),
    /// Time ran out on this tick. Reported once.
    Expired,
    /// The countdown is over (graded, failed to load, or already expired).
    Stopped,
}

/// Pure countdown state, driven one second at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u64,
    finished: bool,
}

impl Countdown {
    #[must_use]
    pub fn new(total_secs: u64) -> Self {
        Self {
            remaining: total_secs,
            finished: false,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Account for one elapsed second while the session is in `status`.
    pub fn tick(&mut self, status: SessionStatus) -> Tick {
        if self.finished {
            return Tick::Stopped;
        }
        match status {
            SessionStatus::Loading | SessionStatus::Submitting => Tick::Paused,
            SessionStatus::Graded | SessionStatus::Error => {
                self.finished = true;
                Tick::Stopped
            }
            SessionStatus::Ready => {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    self.finished = true;
                    Tick::Expired
                } else {
                    Tick::Ticked(self.remaining)
                }
            }
        }
    }
}

/// Background countdown for one session.
///
/// Follows the session through its lifecycle channel, publishes the remaining
/// seconds and calls `on_timeout` at most once. The callback is expected to
/// ask the learner for confirmation, not to submit. Dropping the timer (or the
/// session) stops it; no callback runs afterwards.
pub struct QuizTimer {
    remaining: watch::Receiver<u64>,
    task: JoinHandle<()>,
}

impl QuizTimer {
    /// Spawn the countdown on the current tokio runtime.
    pub fn start<F>(
        total_secs: u64,
        mut lifecycle: watch::Receiver<SessionStatus>,
        on_timeout: F,
    ) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let (remaining_tx, remaining) = watch::channel(total_secs);

        let task = tokio::spawn(async move {
            let mut countdown = Countdown::new(total_secs);
            let mut ticks = time::interval_at(Instant::now() + TICK, TICK);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let expired = loop {
                tokio::select! {
                    _ = ticks.tick() => {
                        let status = *lifecycle.borrow();
                        match countdown.tick(status) {
                            Tick::Paused => {}
                            Tick::Ticked(left) => {
                                remaining_tx.send_replace(left);
                            }
                            Tick::Expired => {
                                remaining_tx.send_replace(0);
                                break true;
                            }
                            Tick::Stopped => break false,
                        }
                    }
                    changed = lifecycle.changed() => {
                        if changed.is_err() {
                            tracing::debug!("session gone, stopping timer");
                            break false;
                        }
                        let status = *lifecycle.borrow_and_update();
                        if matches!(status, SessionStatus::Graded | SessionStatus::Error) {
                            break false;
                        }
                    }
                }
            };

            if expired {
                tracing::info!(total_secs, "quiz time expired");
                on_timeout();
            }
        });

        Self { remaining, task }
    }

    /// Whole seconds left.
    #[must_use]
    pub fn remaining_seconds(&self) -> u64 {
        *self.remaining.borrow()
    }

    /// Whether the countdown has stopped for good.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for QuizTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl std::fmt::Debug for QuizTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizTimer")
            .field("remaining", &self.remaining_seconds())
            .field("finished", &self.is_finished())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let fired = Arc::new(AtomicUsize::new(0));
        let hook = fired.clone();
        (fired, move || {
            hook.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn countdown_expires_once() {
        let mut countdown = Countdown::new(2);
        assert_eq!(countdown.tick(SessionStatus::Ready), Tick::Ticked(1));
        assert_eq!(countdown.tick(SessionStatus::Ready), Tick::Expired);
        assert_eq!(countdown.tick(SessionStatus::Ready), Tick::Stopped);
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn countdown_pauses_while_loading_or_submitting() {
        let mut countdown = Countdown::new(3);
        assert_eq!(countdown.tick(SessionStatus::Loading), Tick::Paused);
        assert_eq!(countdown.tick(SessionStatus::Submitting), Tick::Paused);
        assert_eq!(countdown.remaining(), 3);
    }

    #[test]
    fn countdown_stops_for_good_once_graded() {
        let mut countdown = Countdown::new(3);
        countdown.tick(SessionStatus::Ready);
        assert_eq!(countdown.tick(SessionStatus::Graded), Tick::Stopped);
        assert_eq!(countdown.tick(SessionStatus::Ready), Tick::Stopped);
        assert_eq!(countdown.remaining(), 2);
    }

    #[test]
    fn zero_second_countdown_expires_on_first_running_tick() {
        let mut countdown = Countdown::new(0);
        assert_eq!(countdown.tick(SessionStatus::Loading), Tick::Paused);
        assert_eq!(countdown.tick(SessionStatus::Ready), Tick::Expired);
    }

    #[tokio::test(start_paused = true)]
    async fn one_second_timer_fires_once() {
        let (_tx, rx) = watch::channel(SessionStatus::Ready);
        let (fired, hook) = counter();
        let timer = QuizTimer::start(1, rx, hook);

        time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(timer.remaining_seconds(), 0);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn timer_waits_for_questions_to_load() {
        let (tx, rx) = watch::channel(SessionStatus::Loading);
        let (fired, hook) = counter();
        let timer = QuizTimer::start(10, rx, hook);

        time::sleep(Duration::from_millis(5500)).await;
        assert_eq!(timer.remaining_seconds(), 10);

        tx.send_replace(SessionStatus::Ready);
        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(timer.remaining_seconds(), 8);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn grading_stops_the_timer_without_firing() {
        let (tx, rx) = watch::channel(SessionStatus::Ready);
        let (fired, hook) = counter();
        let timer = QuizTimer::start(3, rx, hook);

        time::sleep(Duration::from_millis(1500)).await;
        tx.send_replace(SessionStatus::Graded);
        time::sleep(Duration::from_secs(5)).await;

        assert_eq!(timer.remaining_seconds(), 2);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_timer_cancels_the_callback() {
        let (_tx, rx) = watch::channel(SessionStatus::Ready);
        let (fired, hook) = counter();
        let timer = QuizTimer::start(2, rx, hook);

        time::sleep(Duration::from_millis(500)).await;
        drop(timer);
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_session_stops_the_timer() {
        let (tx, rx) = watch::channel(SessionStatus::Ready);
        let (fired, hook) = counter();
        let timer = QuizTimer::start(2, rx, hook);

        drop(tx);
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(timer.is_finished());
    }
}
