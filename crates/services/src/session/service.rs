use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::collections::{HistoryStack, KeyedTable};
use quiz_core::model::{AnswerDetail, Question, QuestionId, QuizDefinition, QuizId, QuizResult};

use super::plan::SessionPlan;
use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── STATES ────────────────────────────────────────────────────────────────────
//

/// Lifecycle of a session. `Finished` is terminal; a retake is a brand-new
/// session, never a resurrected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Finished,
}

/// What a single countdown tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown continues with this many seconds left.
    Running(u32),
    /// This tick exhausted the budget and the session submitted itself.
    Expired,
    /// The session was already finished; nothing changed.
    Ignored,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state machine for one quiz attempt.
///
/// Holds a working subset of the quiz's questions, the current position, an
/// answer map, a navigation history, and the remaining time. All timestamps
/// come from the services layer clock. Navigation, answer capture, and ticks
/// never fail: out-of-range or post-finish calls are silent no-ops with a
/// failure indicator.
pub struct QuizSession {
    quiz_id: QuizId,
    quiz_title: String,
    questions: Vec<Question>,
    current: usize,
    answers: KeyedTable<usize>,
    history: HistoryStack<usize>,
    started_at: DateTime<Utc>,
    remaining_secs: u32,
    state: SessionState,
    result: Option<QuizResult>,
}

impl QuizSession {
    /// Create a session over a prepared working set.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when the plan holds no questions and
    /// `SessionError::TooManyQuestions` when its size cannot be scored.
    pub fn new(
        quiz: &QuizDefinition,
        plan: SessionPlan,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if plan.is_empty() {
            return Err(SessionError::Empty);
        }
        if u32::try_from(plan.len()).is_err() {
            return Err(SessionError::TooManyQuestions { len: plan.len() });
        }

        Ok(Self {
            quiz_id: quiz.id().clone(),
            quiz_title: quiz.title().to_owned(),
            questions: plan.into_questions(),
            current: 0,
            answers: KeyedTable::new(),
            history: HistoryStack::new(),
            started_at,
            remaining_secs: quiz.time_limit_secs(),
            state: SessionState::Active,
            result: None,
        })
    }

    // Accessors
    #[must_use]
    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz_id
    }

    #[must_use]
    pub fn quiz_title(&self) -> &str {
        &self.quiz_title
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    /// Total number of questions in the working set.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    /// Number of questions with a recorded answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// The recorded answer for a question, if any.
    #[must_use]
    pub fn answer_for(&self, id: &QuestionId) -> Option<usize> {
        self.answers.get(id.as_str()).copied()
    }

    /// Indices visited before each navigation move, most recent on top.
    #[must_use]
    pub fn nav_history(&self) -> &HistoryStack<usize> {
        &self.history
    }

    /// The computed result, present once the session is finished.
    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.questions.len(),
            answered: self.answers.len(),
            current: self.current,
            remaining_secs: self.remaining_secs,
            is_finished: self.is_finished(),
        }
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Jump to the question at `index`.
    ///
    /// Valid only while active, in range, and for a different index; the
    /// prior position is pushed onto the history on success. No-op `false`
    /// otherwise.
    pub fn go_to(&mut self, index: usize) -> bool {
        if self.state != SessionState::Active {
            return false;
        }
        if index >= self.questions.len() || index == self.current {
            return false;
        }
        self.history.push(self.current);
        self.current = index;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current + 1)
    }

    pub fn prev(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.go_to(self.current - 1)
    }

    /// Undo the most recent navigation move by popping the history.
    pub fn back(&mut self) -> bool {
        if self.state != SessionState::Active {
            return false;
        }
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    //
    // ─── ANSWERS ───────────────────────────────────────────────────────────────
    //

    /// Record (or overwrite) the answer for a question in the working set.
    ///
    /// Idempotent upsert; does not move the current position or touch the
    /// navigation history. Unknown question ids and finished sessions are
    /// no-ops returning `false`.
    pub fn record_answer(&mut self, id: &QuestionId, option_index: usize) -> bool {
        if self.state != SessionState::Active {
            return false;
        }
        if !self.questions.iter().any(|q| q.id() == id) {
            return false;
        }
        self.answers.set(id.as_str(), option_index);
        true
    }

    /// Record the answer for the question currently in view.
    pub fn answer_current(&mut self, option_index: usize) -> bool {
        let id = self.questions[self.current].id().clone();
        self.record_answer(&id, option_index)
    }

    //
    // ─── COUNTDOWN & SUBMISSION ────────────────────────────────────────────────
    //

    /// Apply one one-second countdown tick.
    ///
    /// Reaching zero forces the transition to `Finished` with an implicit
    /// submit. Ticks against a finished session change nothing.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.state != SessionState::Active {
            return TickOutcome::Ignored;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            // implicit submit; the session was validated small enough to score
            let _ = self.submit(now);
            return TickOutcome::Expired;
        }
        TickOutcome::Running(self.remaining_secs)
    }

    /// Score the attempt and finish the session.
    ///
    /// One pass over the working set: an absent answer scores as unanswered
    /// and therefore incorrect.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` when the session already finished.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<&QuizResult, SessionError> {
        if self.state != SessionState::Active {
            return Err(SessionError::Completed);
        }

        let details: Vec<AnswerDetail> = self
            .questions
            .iter()
            .map(|question| {
                let user_answer = self.answers.get(question.id().as_str()).copied();
                AnswerDetail::new(question, user_answer)
            })
            .collect();

        let result = QuizResult::from_details(
            self.quiz_id.clone(),
            self.quiz_title.clone(),
            details,
            elapsed_secs(self.started_at, now),
            now,
        )?;

        self.state = SessionState::Finished;
        Ok(self.result.insert(result))
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", &self.quiz_id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answers.len())
            .field("remaining_secs", &self.remaining_secs)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn elapsed_secs(started_at: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    u32::try_from((now - started_at).num_seconds().max(0)).unwrap_or(u32::MAX)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionPlanBuilder;
    use quiz_core::time::fixed_now;

    fn build_quiz(question_count: usize, time_limit_secs: u32) -> QuizDefinition {
        let questions = (0..question_count)
            .map(|i| {
                Question::new(
                    QuestionId::new(format!("q{i}")),
                    format!("Question {i}?"),
                    vec!["a".into(), "b".into(), "c".into()],
                    i % 3,
                    "General",
                )
                .unwrap()
            })
            .collect();
        QuizDefinition::new(
            QuizId::new("quiz"),
            "Quiz",
            questions,
            time_limit_secs,
            fixed_now(),
        )
        .unwrap()
    }

    fn start_session(question_count: usize, time_limit_secs: u32) -> QuizSession {
        let quiz = build_quiz(question_count, time_limit_secs);
        let plan = SessionPlanBuilder::new().with_shuffle(false).build(&quiz);
        QuizSession::new(&quiz, plan, fixed_now()).unwrap()
    }

    #[test]
    fn empty_plan_is_rejected() {
        let quiz = build_quiz(3, 60);
        let plan = SessionPlanBuilder::new().with_count(0).build(&quiz);
        let err = QuizSession::new(&quiz, plan, fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::Empty));
    }

    #[test]
    fn navigation_pushes_history_and_respects_bounds() {
        let mut session = start_session(3, 60);

        assert!(session.is_first());
        assert!(!session.prev());
        assert!(session.next());
        assert_eq!(session.current_index(), 1);
        assert!(session.go_to(2));
        assert!(session.is_last());
        assert!(!session.next());
        assert!(!session.go_to(2)); // same index is a no-op
        assert!(!session.go_to(99));

        assert_eq!(session.nav_history().len(), 2);
        assert_eq!(session.nav_history().peek(), Some(&1));
    }

    #[test]
    fn back_restores_the_previous_position() {
        let mut session = start_session(3, 60);
        session.go_to(2);
        session.go_to(1);
        assert!(session.back());
        assert_eq!(session.current_index(), 2);
        assert!(session.back());
        assert_eq!(session.current_index(), 0);
        assert!(!session.back());
    }

    #[test]
    fn answers_upsert_idempotently() {
        let mut session = start_session(3, 60);

        assert!(session.answer_current(1));
        assert_eq!(session.answered_count(), 1);
        assert!(session.answer_current(2));
        assert_eq!(session.answered_count(), 1);
        assert_eq!(
            session.answer_for(&QuestionId::new("q0")),
            Some(2)
        );

        // answering does not move the position or consume history
        assert_eq!(session.current_index(), 0);
        assert!(session.nav_history().is_empty());
    }

    #[test]
    fn answers_for_unknown_questions_are_rejected() {
        let mut session = start_session(2, 60);
        assert!(!session.record_answer(&QuestionId::new("ghost"), 0));
        assert_eq!(session.answered_count(), 0);
    }

    #[test]
    fn submit_scores_in_one_pass() {
        let mut session = start_session(3, 60);
        // correct answers are 0, 1, 2 by construction
        session.answer_current(0);
        session.go_to(1);
        session.answer_current(0);
        // q2 left unanswered

        let result = session.submit(fixed_now() + chrono::Duration::seconds(30)).unwrap();
        assert_eq!(result.score(), 1);
        assert_eq!(result.total(), 3);
        assert_eq!(result.percentage(), 33);
        assert_eq!(result.time_taken_secs(), 30);
        assert_eq!(result.answers()[2].user_answer, None);
        assert!(!result.answers()[2].is_correct);
    }

    #[test]
    fn ticks_run_down_and_force_finish() {
        let mut session = start_session(3, 3);

        assert_eq!(session.tick(fixed_now()), TickOutcome::Running(2));
        assert_eq!(session.tick(fixed_now()), TickOutcome::Running(1));
        assert_eq!(session.tick(fixed_now()), TickOutcome::Expired);

        assert!(session.is_finished());
        let result = session.result().unwrap();
        assert_eq!(result.total(), 3);
        assert_eq!(result.score(), 0);

        // the session is sealed now
        assert_eq!(session.tick(fixed_now()), TickOutcome::Ignored);
        assert!(!session.next());
        assert!(!session.go_to(1));
        assert!(!session.answer_current(0));
        assert!(matches!(
            session.submit(fixed_now()),
            Err(SessionError::Completed)
        ));
    }

    #[test]
    fn submit_twice_is_rejected_and_result_is_stable() {
        let mut session = start_session(2, 60);
        session.answer_current(0);
        let score = session.submit(fixed_now()).unwrap().score();
        assert!(matches!(
            session.submit(fixed_now()),
            Err(SessionError::Completed)
        ));
        assert_eq!(session.result().unwrap().score(), score);
    }

    #[test]
    fn progress_reflects_the_machine() {
        let mut session = start_session(4, 120);
        session.answer_current(0);
        session.next();

        let progress = session.progress();
        assert_eq!(progress.total, 4);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.current, 1);
        assert_eq!(progress.remaining_secs, 120);
        assert!(!progress.is_finished);
        assert!((progress.fraction() - 0.5).abs() < f64::EPSILON);
    }
}
