use thiserror::Error;

use crate::model::ids::QuestionId;

pub(crate) const MIN_OPTIONS: usize = 2;
pub(crate) const MAX_OPTIONS: usize = 4;
pub(crate) const DEFAULT_CATEGORY: &str = "General";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question needs at least {MIN_OPTIONS} options, got {got}")]
    TooFewOptions { got: usize },

    #[error("question allows at most {MAX_OPTIONS} options, got {got}")]
    TooManyOptions { got: usize },

    #[error("option {index} is empty")]
    EmptyOption { index: usize },

    #[error("correct index {index} is out of range for {options} options")]
    CorrectIndexOutOfRange { index: usize, options: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_index: usize,
    category: String,
}

impl Question {
    /// Creates a new Question.
    ///
    /// Text and options are trimmed; a blank category falls back to
    /// "General".
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is empty, the option count is
    /// outside 2..=4, any option is blank, or the correct index does not
    /// address an option.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        category: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }

        if options.len() < MIN_OPTIONS {
            return Err(QuestionError::TooFewOptions { got: options.len() });
        }
        if options.len() > MAX_OPTIONS {
            return Err(QuestionError::TooManyOptions { got: options.len() });
        }

        let mut trimmed = Vec::with_capacity(options.len());
        for (index, option) in options.into_iter().enumerate() {
            let option = option.trim().to_owned();
            if option.is_empty() {
                return Err(QuestionError::EmptyOption { index });
            }
            trimmed.push(option);
        }

        if correct_index >= trimmed.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_index,
                options: trimmed.len(),
            });
        }

        let category = category.into();
        let category = category.trim();
        let category = if category.is_empty() {
            DEFAULT_CATEGORY.to_owned()
        } else {
            category.to_owned()
        };

        Ok(Self {
            id,
            text: text.trim().to_owned(),
            options: trimmed,
            correct_index,
            category,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Whether the given option index is the correct answer.
    #[must_use]
    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_index
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[test]
    fn new_happy_path() {
        let q = Question::new(
            QuestionId::new("s1"),
            "What is the chemical symbol for gold?",
            options(&["Au", "Ag", "Fe", "Cu"]),
            0,
            "Science",
        )
        .unwrap();

        assert_eq!(q.id().as_str(), "s1");
        assert_eq!(q.options().len(), 4);
        assert!(q.is_correct(0));
        assert!(!q.is_correct(1));
        assert_eq!(q.category(), "Science");
    }

    #[test]
    fn rejects_empty_text() {
        let err = Question::new(
            QuestionId::new("q"),
            "   ",
            options(&["a", "b"]),
            0,
            "General",
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn rejects_bad_option_counts() {
        let err = Question::new(QuestionId::new("q"), "Q?", options(&["a"]), 0, "")
            .unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { got: 1 });

        let err = Question::new(
            QuestionId::new("q"),
            "Q?",
            options(&["a", "b", "c", "d", "e"]),
            0,
            "",
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::TooManyOptions { got: 5 });
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        let err = Question::new(QuestionId::new("q"), "Q?", options(&["a", "b"]), 2, "")
            .unwrap_err();
        assert_eq!(
            err,
            QuestionError::CorrectIndexOutOfRange { index: 2, options: 2 }
        );
    }

    #[test]
    fn blank_category_falls_back_to_general() {
        let q = Question::new(QuestionId::new("q"), "Q?", options(&["a", "b"]), 1, "  ")
            .unwrap();
        assert_eq!(q.category(), "General");
    }

    #[test]
    fn trims_text_and_options() {
        let q = Question::new(
            QuestionId::new("q"),
            "  Q?  ",
            options(&[" a ", "b "]),
            0,
            "Math",
        )
        .unwrap();
        assert_eq!(q.text(), "Q?");
        assert_eq!(q.options(), ["a", "b"]);
    }
}
