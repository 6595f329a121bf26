use quiz_core::model::{QuestionId, QuizResult};

use super::progress::SessionProgress;
use super::service::QuizSession;

/// One selectable option, with whether the user currently has it picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub index: usize,
    pub text: String,
    pub is_selected: bool,
}

/// The question currently in view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentQuestionView {
    pub question_id: QuestionId,
    /// 1-based position within the working set.
    pub number: usize,
    pub text: String,
    pub category: String,
    pub options: Vec<OptionView>,
}

/// Read-only snapshot of a session for rendering.
///
/// This is intentionally **not** a UI view-model: no pre-formatted strings,
/// no layout assumptions. Capture a fresh snapshot after every mutating call
/// instead of mutating one in place.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub quiz_title: String,
    pub progress: SessionProgress,
    pub is_first: bool,
    pub is_last: bool,
    /// Present while the session is active.
    pub current: Option<CurrentQuestionView>,
    /// Present once the session is finished.
    pub result: Option<QuizResult>,
}

impl SessionView {
    /// Recompute the full snapshot from the session's current state.
    #[must_use]
    pub fn capture(session: &QuizSession) -> Self {
        let current = if session.is_finished() {
            None
        } else {
            let question = session.current_question();
            let selected = session.answer_for(question.id());
            let options = question
                .options()
                .iter()
                .enumerate()
                .map(|(index, text)| OptionView {
                    index,
                    text: text.clone(),
                    is_selected: selected == Some(index),
                })
                .collect();
            Some(CurrentQuestionView {
                question_id: question.id().clone(),
                number: session.current_index() + 1,
                text: question.text().to_owned(),
                category: question.category().to_owned(),
                options,
            })
        };

        Self {
            quiz_title: session.quiz_title().to_owned(),
            progress: session.progress(),
            is_first: session.is_first(),
            is_last: session.is_last(),
            current,
            result: session.result().cloned(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionPlanBuilder;
    use quiz_core::model::{Question, QuizDefinition, QuizId};
    use quiz_core::time::fixed_now;

    fn build_session() -> QuizSession {
        let questions = (0..2)
            .map(|i| {
                Question::new(
                    QuestionId::new(format!("q{i}")),
                    format!("Question {i}?"),
                    vec!["yes".into(), "no".into()],
                    0,
                    "GK",
                )
                .unwrap()
            })
            .collect();
        let quiz = QuizDefinition::new(
            QuizId::new("quiz"),
            "General Knowledge",
            questions,
            60,
            fixed_now(),
        )
        .unwrap();
        let plan = SessionPlanBuilder::new().with_shuffle(false).build(&quiz);
        QuizSession::new(&quiz, plan, fixed_now()).unwrap()
    }

    #[test]
    fn snapshot_reflects_selection_state() {
        let mut session = build_session();
        session.answer_current(1);

        let view = SessionView::capture(&session);
        let current = view.current.unwrap();
        assert_eq!(current.number, 1);
        assert_eq!(current.question_id.as_str(), "q0");
        assert!(!current.options[0].is_selected);
        assert!(current.options[1].is_selected);
        assert!(view.is_first);
        assert!(!view.is_last);
        assert!(view.result.is_none());
    }

    #[test]
    fn snapshot_is_recomputed_not_shared() {
        let mut session = build_session();
        let before = SessionView::capture(&session);
        session.answer_current(0);
        let after = SessionView::capture(&session);

        assert!(!before.current.unwrap().options[0].is_selected);
        assert!(after.current.unwrap().options[0].is_selected);
    }

    #[test]
    fn finished_snapshot_carries_the_result_details() {
        let mut session = build_session();
        session.answer_current(0);
        session.submit(fixed_now()).unwrap();

        let view = SessionView::capture(&session);
        assert!(view.current.is_none());
        let result = view.result.unwrap();
        assert_eq!(result.answers().len(), 2);
        assert_eq!(result.score(), 1);
        assert!(view.progress.is_finished);
    }
}
