use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use quiz_core::Clock;

use super::service::{QuizSession, TickOutcome};

/// A session shared between its owner and the ticker task. Every mutating
/// call runs to completion under the lock, so ticks and user-triggered
/// operations never interleave.
pub type SharedSession = Arc<Mutex<QuizSession>>;

/// Owned handle for the once-per-second countdown of one session.
///
/// Whoever starts a session owns its ticker, and must cancel it before
/// discarding the session: dropping or `cancel()`-ing the handle aborts the
/// task, so no tick can ever fire against a discarded session. The loop also
/// stops itself once the session finishes, but that is a backstop, not the
/// teardown discipline.
pub struct SessionTicker {
    handle: JoinHandle<()>,
}

impl SessionTicker {
    /// Spawn the countdown task for `session`.
    ///
    /// The task exits on its own once the session reports itself finished or
    /// its lock is poisoned.
    #[must_use]
    pub fn spawn(session: SharedSession, clock: Clock) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first interval tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let outcome = {
                    let Ok(mut guard) = session.lock() else {
                        break;
                    };
                    guard.tick(clock.now())
                };
                match outcome {
                    TickOutcome::Running(_) => {}
                    TickOutcome::Expired | TickOutcome::Ignored => break,
                }
            }
        });
        Self { handle }
    }

    /// Stop the countdown. Idempotent.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Whether the task has stopped, by cancellation or on its own.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SessionTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionPlanBuilder;
    use quiz_core::model::{Question, QuestionId, QuizDefinition, QuizId};
    use quiz_core::time::{fixed_clock, fixed_now};

    fn shared_session(time_limit_secs: u32) -> SharedSession {
        let questions = (0..3)
            .map(|i| {
                Question::new(
                    QuestionId::new(format!("q{i}")),
                    format!("Question {i}?"),
                    vec!["a".into(), "b".into()],
                    0,
                    "General",
                )
                .unwrap()
            })
            .collect();
        let quiz = QuizDefinition::new(
            QuizId::new("quiz"),
            "Quiz",
            questions,
            time_limit_secs,
            fixed_now(),
        )
        .unwrap();
        let plan = SessionPlanBuilder::new().with_shuffle(false).build(&quiz);
        Arc::new(Mutex::new(
            QuizSession::new(&quiz, plan, fixed_now()).unwrap(),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_expires_the_session() {
        let session = shared_session(3);
        let ticker = SessionTicker::spawn(Arc::clone(&session), fixed_clock());

        time::sleep(Duration::from_secs(5)).await;

        let guard = session.lock().unwrap();
        assert!(guard.is_finished());
        assert_eq!(guard.result().unwrap().total(), 3);
        drop(guard);
        ticker.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_stops_itself_after_expiry() {
        let session = shared_session(2);
        let ticker = SessionTicker::spawn(Arc::clone(&session), fixed_clock());

        time::sleep(Duration::from_secs(4)).await;
        tokio::task::yield_now().await;
        assert!(ticker.is_stopped());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_halts_the_countdown() {
        let session = shared_session(60);
        let ticker = SessionTicker::spawn(Arc::clone(&session), fixed_clock());

        time::sleep(Duration::from_secs(3)).await;
        ticker.cancel();
        let frozen = session.lock().unwrap().remaining_secs();

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(session.lock().unwrap().remaining_secs(), frozen);
        assert!(!session.lock().unwrap().is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels_as_teardown() {
        let session = shared_session(60);
        {
            let _ticker = SessionTicker::spawn(Arc::clone(&session), fixed_clock());
            time::sleep(Duration::from_secs(2)).await;
        }
        let frozen = session.lock().unwrap().remaining_secs();
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(session.lock().unwrap().remaining_secs(), frozen);
    }
}
