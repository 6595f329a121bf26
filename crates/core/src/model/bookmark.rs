use chrono::{DateTime, Utc};

use crate::model::ids::QuestionId;
use crate::model::question::Question;

/// A question saved for later review, stamped with when it was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    question: Question,
    bookmarked_at: DateTime<Utc>,
}

impl Bookmark {
    #[must_use]
    pub fn new(question: Question, bookmarked_at: DateTime<Utc>) -> Self {
        Self {
            question,
            bookmarked_at,
        }
    }

    #[must_use]
    pub fn question_id(&self) -> &QuestionId {
        self.question.id()
    }

    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }

    #[must_use]
    pub fn bookmarked_at(&self) -> DateTime<Utc> {
        self.bookmarked_at
    }
}
