use std::sync::Arc;

use tracing::info;

use quiz_core::Clock;
use quiz_core::collections::KeyedTable;
use quiz_core::model::{DEFAULT_TIME_LIMIT_SECS, Question, QuizDefinition, QuizId};
use storage::repository::QuizRepository;

use crate::defaults::bundled_quizzes;
use crate::error::{CatalogError, SessionError};
use crate::session::{QuizSession, SessionPlanBuilder};

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// In-memory registry of quiz definitions, keyed by quiz id.
#[derive(Debug, Default)]
pub struct QuizCatalog {
    quizzes: KeyedTable<QuizDefinition>,
}

impl QuizCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a definition.
    pub fn install(&mut self, quiz: QuizDefinition) {
        let key = quiz.id().as_str().to_owned();
        self.quizzes.set(key, quiz);
    }

    #[must_use]
    pub fn get(&self, id: &QuizId) -> Option<&QuizDefinition> {
        self.quizzes.get(id.as_str())
    }

    pub fn remove(&mut self, id: &QuizId) -> bool {
        self.quizzes.delete(id.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }

    /// Definitions for display: custom quizzes first, then newest first.
    #[must_use]
    pub fn list(&self) -> Vec<&QuizDefinition> {
        let mut quizzes: Vec<&QuizDefinition> = self.quizzes.values().collect();
        quizzes.sort_by(|a, b| {
            b.is_custom()
                .cmp(&a.is_custom())
                .then(b.created_at().cmp(&a.created_at()))
        });
        quizzes
    }

    /// Only the custom (imported) definitions.
    #[must_use]
    pub fn customs(&self) -> Vec<&QuizDefinition> {
        self.quizzes.values().filter(|q| q.is_custom()).collect()
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Catalog facade that owns the time source and persistence access.
///
/// The in-memory registry is updated first on every mutation; the repository
/// write follows, so persisted state trails memory rather than gating it.
/// Only custom quizzes are persisted; bundled content is re-seeded at
/// construction.
pub struct QuizCatalogService {
    clock: Clock,
    catalog: QuizCatalog,
    quizzes: Arc<dyn QuizRepository>,
}

impl QuizCatalogService {
    /// Builds a catalog seeded with the bundled quizzes.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled content fails validation.
    pub fn new(clock: Clock, quizzes: Arc<dyn QuizRepository>) -> Result<Self, CatalogError> {
        let mut catalog = QuizCatalog::new();
        for quiz in bundled_quizzes(clock.now())? {
            catalog.install(quiz);
        }
        Ok(Self {
            clock,
            catalog,
            quizzes,
        })
    }

    /// Rehydrates previously persisted custom quizzes into the registry.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` on repository failures.
    pub async fn load_custom(&mut self) -> Result<usize, CatalogError> {
        let stored = self.quizzes.list_quizzes().await?;
        let count = stored.len();
        for quiz in stored {
            self.catalog.install(quiz);
        }
        Ok(count)
    }

    #[must_use]
    pub fn catalog(&self) -> &QuizCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn get(&self, id: &QuizId) -> Option<&QuizDefinition> {
        self.catalog.get(id)
    }

    #[must_use]
    pub fn list(&self) -> Vec<&QuizDefinition> {
        self.catalog.list()
    }

    /// Creates a custom quiz from an imported question set and persists it.
    ///
    /// The definition keeps the full question list; a per-session question
    /// count is applied by the session plan instead. A zero time limit falls
    /// back to the 15-minute default.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the definition fails validation or the
    /// repository write fails.
    pub async fn create_custom(
        &mut self,
        title: impl Into<String>,
        questions: Vec<Question>,
        time_limit_secs: u32,
    ) -> Result<QuizId, CatalogError> {
        let time_limit_secs = if time_limit_secs == 0 {
            DEFAULT_TIME_LIMIT_SECS
        } else {
            time_limit_secs
        };
        let now = self.clock.now();
        let id = QuizId::new(format!("custom_{}", now.timestamp_millis()));
        let quiz = QuizDefinition::new(id.clone(), title, questions, time_limit_secs, now)?
            .with_category("Custom")
            .with_icon("✨")
            .as_custom();

        self.catalog.install(quiz.clone());
        self.quizzes.upsert_quiz(&quiz).await?;

        info!(quiz_id = %id, questions = quiz.question_count(), "created custom quiz");
        Ok(id)
    }

    /// Removes a quiz from the registry (and from storage when custom).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` on repository failures.
    pub async fn delete(&mut self, id: &QuizId) -> Result<bool, CatalogError> {
        let was_custom = self.catalog.get(id).is_some_and(QuizDefinition::is_custom);
        let removed = self.catalog.remove(id);
        if removed && was_custom {
            self.quizzes.delete_quiz(id).await?;
            info!(quiz_id = %id, "deleted custom quiz");
        }
        Ok(removed)
    }

    /// Starts a session over a catalog quiz with the given plan.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownQuiz` for ids not in the registry, or
    /// session construction failures.
    pub fn start_session(
        &self,
        id: &QuizId,
        plan: SessionPlanBuilder,
    ) -> Result<QuizSession, SessionError> {
        let quiz = self.catalog.get(id).ok_or(SessionError::UnknownQuiz)?;
        QuizSession::new(quiz, plan.build(quiz), self.clock.now())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionId;
    use quiz_core::time::{fixed_clock, fixed_now};
    use storage::repository::InMemoryRepository;

    fn build_questions(count: usize) -> Vec<Question> {
        (0..count)
            .map(|i| {
                Question::new(
                    QuestionId::new(format!("iq{i}")),
                    format!("Imported {i}?"),
                    vec!["a".into(), "b".into()],
                    0,
                    "Custom",
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn catalog_lists_customs_first_then_newest() {
        let mut catalog = QuizCatalog::new();
        let older = QuizDefinition::new(
            QuizId::new("old"),
            "Old",
            build_questions(2),
            600,
            fixed_now(),
        )
        .unwrap();
        let newer = QuizDefinition::new(
            QuizId::new("new"),
            "New",
            build_questions(2),
            600,
            fixed_now() + chrono::Duration::days(1),
        )
        .unwrap();
        let custom = QuizDefinition::new(
            QuizId::new("custom_1"),
            "Mine",
            build_questions(2),
            600,
            fixed_now() - chrono::Duration::days(1),
        )
        .unwrap()
        .as_custom();

        catalog.install(older);
        catalog.install(newer);
        catalog.install(custom);

        let ids: Vec<&str> = catalog.list().iter().map(|q| q.id().as_str()).collect();
        assert_eq!(ids, vec!["custom_1", "new", "old"]);
    }

    #[tokio::test]
    async fn service_seeds_bundled_quizzes() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = QuizCatalogService::new(fixed_clock(), repo).unwrap();
        assert_eq!(service.list().len(), 5);
        assert!(service.get(&QuizId::new("quiz_sci")).is_some());
    }

    #[tokio::test]
    async fn create_custom_persists_and_reloads() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut service = QuizCatalogService::new(fixed_clock(), repo.clone()).unwrap();

        let id = service
            .create_custom("My Mock", build_questions(3), 300)
            .await
            .unwrap();
        assert!(service.get(&id).unwrap().is_custom());

        // a fresh service over the same backend sees the custom quiz again
        let mut rebooted = QuizCatalogService::new(fixed_clock(), repo).unwrap();
        assert!(rebooted.get(&id).is_none());
        let loaded = rebooted.load_custom().await.unwrap();
        assert_eq!(loaded, 1);
        assert_eq!(rebooted.get(&id).unwrap().title(), "My Mock");
    }

    #[tokio::test]
    async fn delete_removes_custom_from_storage_too() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut service = QuizCatalogService::new(fixed_clock(), repo.clone()).unwrap();
        let id = service
            .create_custom("Doomed", build_questions(2), 300)
            .await
            .unwrap();

        assert!(service.delete(&id).await.unwrap());
        assert!(service.get(&id).is_none());

        let mut rebooted = QuizCatalogService::new(fixed_clock(), repo).unwrap();
        assert_eq!(rebooted.load_custom().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn zero_time_limit_falls_back_to_default() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut service = QuizCatalogService::new(fixed_clock(), repo).unwrap();
        let id = service
            .create_custom("Untimed", build_questions(2), 0)
            .await
            .unwrap();
        assert_eq!(service.get(&id).unwrap().time_limit_secs(), 900);
    }

    #[tokio::test]
    async fn deleting_bundled_quiz_skips_storage() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut service = QuizCatalogService::new(fixed_clock(), repo).unwrap();
        assert!(service.delete(&QuizId::new("quiz_math")).await.unwrap());
        assert!(!service.delete(&QuizId::new("quiz_math")).await.unwrap());
    }

    #[tokio::test]
    async fn start_session_uses_the_catalog_quiz() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = QuizCatalogService::new(fixed_clock(), repo).unwrap();

        let session = service
            .start_session(
                &QuizId::new("quiz_sci"),
                SessionPlanBuilder::new().with_shuffle(false).with_count(3),
            )
            .unwrap();
        assert_eq!(session.question_count(), 3);
        assert_eq!(session.quiz_title(), "Science Challenge");

        let err = service
            .start_session(&QuizId::new("nope"), SessionPlanBuilder::new())
            .unwrap_err();
        assert!(matches!(err, SessionError::UnknownQuiz));
    }
}
