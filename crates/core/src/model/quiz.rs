use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::QuizId;
use crate::model::question::{DEFAULT_CATEGORY, Question};

/// Fallback time budget when a quiz does not specify one.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 900;

const DEFAULT_ICON: &str = "📝";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("quiz needs at least one question")]
    NoQuestions,

    #[error("time limit must be > 0 seconds")]
    InvalidTimeLimit,
}

//
// ─── QUIZ DEFINITION ───────────────────────────────────────────────────────────
//

/// A quiz: an ordered question list plus a time budget and display metadata.
///
/// The definition owns its questions exclusively and outlives any session
/// built from it; sessions work on copied subsets.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizDefinition {
    id: QuizId,
    title: String,
    questions: Vec<Question>,
    time_limit_secs: u32,
    category: String,
    icon: String,
    created_at: DateTime<Utc>,
    is_custom: bool,
}

impl QuizDefinition {
    /// Creates a new quiz definition with the default category and icon.
    ///
    /// `created_at` should come from the services layer clock to keep time
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the title is blank, the question list is
    /// empty, or the time limit is zero.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        questions: Vec<Question>,
        time_limit_secs: u32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        if time_limit_secs == 0 {
            return Err(QuizError::InvalidTimeLimit);
        }

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            questions,
            time_limit_secs,
            category: DEFAULT_CATEGORY.to_owned(),
            icon: DEFAULT_ICON.to_owned(),
            created_at,
            is_custom: false,
        })
    }

    /// Replaces the category label; blanks keep the default.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        if !category.trim().is_empty() {
            self.category = category.trim().to_owned();
        }
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        let icon = icon.into();
        if !icon.trim().is_empty() {
            self.icon = icon.trim().to_owned();
        }
        self
    }

    /// Marks this definition as created from an imported question set.
    #[must_use]
    pub fn as_custom(mut self) -> Self {
        self.is_custom = true;
        self
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &QuizId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.is_custom
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
