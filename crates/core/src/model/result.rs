use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{QuestionId, QuizId, ResultId};
use crate::model::question::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResultError {
    #[error("a result needs at least one answer detail")]
    EmptyDetails,

    #[error("too many answer details for a single result: {len}")]
    TooManyDetails { len: usize },

    #[error("total ({total}) does not match detail count ({details})")]
    CountMismatch { total: u32, details: usize },

    #[error("score ({stored}) does not match correct details ({derived})")]
    ScoreMismatch { stored: u32, derived: u32 },
}

//
// ─── ANSWER DETAIL ─────────────────────────────────────────────────────────────
//

/// Per-question outcome inside a finished result.
///
/// `user_answer` is `None` when the question was never answered; `None` can
/// never compare equal to a correct index, so an unanswered question can
/// never score as correct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerDetail {
    pub question_id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub user_answer: Option<usize>,
    pub is_correct: bool,
}

impl AnswerDetail {
    /// Builds the detail for one question, deriving correctness.
    #[must_use]
    pub fn new(question: &Question, user_answer: Option<usize>) -> Self {
        Self {
            question_id: question.id().clone(),
            text: question.text().to_owned(),
            options: question.options().to_vec(),
            correct_index: question.correct_index(),
            user_answer,
            is_correct: user_answer == Some(question.correct_index()),
        }
    }
}

//
// ─── QUIZ RESULT ───────────────────────────────────────────────────────────────
//

/// The scored outcome of one finished session. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResult {
    id: ResultId,
    quiz_id: QuizId,
    quiz_title: String,
    score: u32,
    total: u32,
    percentage: u32,
    answers: Vec<AnswerDetail>,
    time_taken_secs: u32,
    completed_at: DateTime<Utc>,
}

impl QuizResult {
    /// Builds a result from per-question details, deriving score, total, and
    /// percentage so the scoring invariants hold by construction.
    ///
    /// # Errors
    ///
    /// Returns `ResultError::EmptyDetails` when no details are supplied and
    /// `ResultError::TooManyDetails` when the count cannot fit in `u32`.
    pub fn from_details(
        quiz_id: QuizId,
        quiz_title: impl Into<String>,
        answers: Vec<AnswerDetail>,
        time_taken_secs: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, ResultError> {
        if answers.is_empty() {
            return Err(ResultError::EmptyDetails);
        }
        let total = u32::try_from(answers.len())
            .map_err(|_| ResultError::TooManyDetails { len: answers.len() })?;
        let score = derived_score(&answers);

        Ok(Self {
            id: ResultId::generate(),
            quiz_id,
            quiz_title: quiz_title.into(),
            score,
            total,
            percentage: percentage_of(score, total),
            answers,
            time_taken_secs,
            completed_at,
        })
    }

    /// Rehydrates a result from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `ResultError::CountMismatch` or `ResultError::ScoreMismatch`
    /// when the stored counters disagree with the stored details.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: ResultId,
        quiz_id: QuizId,
        quiz_title: impl Into<String>,
        score: u32,
        total: u32,
        answers: Vec<AnswerDetail>,
        time_taken_secs: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, ResultError> {
        if answers.is_empty() {
            return Err(ResultError::EmptyDetails);
        }
        if usize::try_from(total).map_or(true, |t| t != answers.len()) {
            return Err(ResultError::CountMismatch {
                total,
                details: answers.len(),
            });
        }
        let derived = derived_score(&answers);
        if derived != score {
            return Err(ResultError::ScoreMismatch {
                stored: score,
                derived,
            });
        }

        Ok(Self {
            id,
            quiz_id,
            quiz_title: quiz_title.into(),
            score,
            total,
            percentage: percentage_of(score, total),
            answers,
            time_taken_secs,
            completed_at,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &ResultId {
        &self.id
    }

    #[must_use]
    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz_id
    }

    #[must_use]
    pub fn quiz_title(&self) -> &str {
        &self.quiz_title
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// `round(score / total × 100)`; always within 0..=100.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerDetail] {
        &self.answers
    }

    #[must_use]
    pub fn time_taken_secs(&self) -> u32 {
        self.time_taken_secs
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Questions that were never answered.
    #[must_use]
    pub fn skipped(&self) -> u32 {
        let skipped = self
            .answers
            .iter()
            .filter(|a| a.user_answer.is_none())
            .count();
        u32::try_from(skipped).unwrap_or(u32::MAX)
    }
}

fn derived_score(answers: &[AnswerDetail]) -> u32 {
    let correct = answers.iter().filter(|a| a.is_correct).count();
    u32::try_from(correct).unwrap_or(u32::MAX)
}

fn percentage_of(score: u32, total: u32) -> u32 {
    (f64::from(score) / f64::from(total) * 100.0).round() as u32
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
