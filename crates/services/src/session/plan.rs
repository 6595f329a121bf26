use rand::seq::SliceRandom;
use rand::thread_rng;

use quiz_core::model::{Question, QuizDefinition};

/// The working question set for one session: a shuffled and/or truncated
/// copy of a quiz's question list.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    questions: Vec<Question>,
}

impl SessionPlan {
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub(crate) fn into_questions(self) -> Vec<Question> {
        self.questions
    }
}

/// Builds the working set for a session.
///
/// Shuffling uses a uniform Fisher–Yates pass; truncation caps the set at a
/// requested question count. The default matches how sessions start from the
/// quiz list: shuffled, full set.
#[derive(Debug, Clone)]
pub struct SessionPlanBuilder {
    shuffle: bool,
    count: Option<usize>,
}

impl SessionPlanBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shuffle: true,
            count: None,
        }
    }

    /// Enable or disable shuffling of the copied question list.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Cap the working set at `count` questions, applied after shuffling.
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Build the working set from the quiz's questions.
    #[must_use]
    pub fn build(self, quiz: &QuizDefinition) -> SessionPlan {
        let mut questions = quiz.questions().to_vec();
        if self.shuffle {
            let mut rng = thread_rng();
            questions.as_mut_slice().shuffle(&mut rng);
        }
        if let Some(count) = self.count {
            questions.truncate(count);
        }
        SessionPlan { questions }
    }
}

impl Default for SessionPlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
