use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::{
    AnswerDetail, Bookmark, Question, QuestionError, QuestionId, QuizDefinition, QuizError,
    QuizId, QuizResult, ResultError, ResultId,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Errors raised when persisted records fail domain validation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecordError {
    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error(transparent)]
    Result(#[from] ResultError),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Persisted shape for a question.
///
/// Records mirror the domain types so adapters can serialize/deserialize
/// without leaking storage concerns into the domain layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub category: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.id().as_str().to_owned(),
            text: question.text().to_owned(),
            options: question.options().to_vec(),
            correct_index: question.correct_index(),
            category: question.category().to_owned(),
        }
    }

    /// Convert the record back into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` if the stored fields fail validation.
    pub fn into_question(self) -> Result<Question, RecordError> {
        Ok(Question::new(
            QuestionId::new(self.id),
            self.text,
            self.options,
            self.correct_index,
            self.category,
        )?)
    }
}

/// Persisted shape for a quiz definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizRecord {
    pub id: String,
    pub title: String,
    pub questions: Vec<QuestionRecord>,
    pub time_limit_secs: u32,
    pub category: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
    pub is_custom: bool,
}

impl QuizRecord {
    #[must_use]
    pub fn from_quiz(quiz: &QuizDefinition) -> Self {
        Self {
            id: quiz.id().as_str().to_owned(),
            title: quiz.title().to_owned(),
            questions: quiz
                .questions()
                .iter()
                .map(QuestionRecord::from_question)
                .collect(),
            time_limit_secs: quiz.time_limit_secs(),
            category: quiz.category().to_owned(),
            icon: quiz.icon().to_owned(),
            created_at: quiz.created_at(),
            is_custom: quiz.is_custom(),
        }
    }

    /// Convert the record back into a domain `QuizDefinition`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` if any stored question or the quiz itself fails
    /// validation.
    pub fn into_quiz(self) -> Result<QuizDefinition, RecordError> {
        let questions = self
            .questions
            .into_iter()
            .map(QuestionRecord::into_question)
            .collect::<Result<Vec<_>, _>>()?;

        let mut quiz = QuizDefinition::new(
            QuizId::new(self.id),
            self.title,
            questions,
            self.time_limit_secs,
            self.created_at,
        )?
        .with_category(self.category)
        .with_icon(self.icon);
        if self.is_custom {
            quiz = quiz.as_custom();
        }
        Ok(quiz)
    }
}

/// Persisted shape for one answer detail inside a result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub user_answer: Option<usize>,
}

impl AnswerRecord {
    #[must_use]
    pub fn from_detail(detail: &AnswerDetail) -> Self {
        Self {
            question_id: detail.question_id.as_str().to_owned(),
            text: detail.text.clone(),
            options: detail.options.clone(),
            correct_index: detail.correct_index,
            user_answer: detail.user_answer,
        }
    }

    /// Correctness is recomputed rather than stored.
    #[must_use]
    pub fn into_detail(self) -> AnswerDetail {
        AnswerDetail {
            question_id: QuestionId::new(self.question_id),
            text: self.text,
            options: self.options,
            correct_index: self.correct_index,
            is_correct: self.user_answer == Some(self.correct_index),
            user_answer: self.user_answer,
        }
    }
}

/// Persisted shape for a finished quiz result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: String,
    pub quiz_id: String,
    pub quiz_title: String,
    pub score: u32,
    pub total: u32,
    pub answers: Vec<AnswerRecord>,
    pub time_taken_secs: u32,
    pub completed_at: DateTime<Utc>,
}

impl ResultRecord {
    #[must_use]
    pub fn from_result(result: &QuizResult) -> Self {
        Self {
            id: result.id().as_str().to_owned(),
            quiz_id: result.quiz_id().as_str().to_owned(),
            quiz_title: result.quiz_title().to_owned(),
            score: result.score(),
            total: result.total(),
            answers: result.answers().iter().map(AnswerRecord::from_detail).collect(),
            time_taken_secs: result.time_taken_secs(),
            completed_at: result.completed_at(),
        }
    }

    /// Convert the record back into a domain `QuizResult`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` if the stored counters disagree with the stored
    /// details.
    pub fn into_result(self) -> Result<QuizResult, RecordError> {
        let answers = self.answers.into_iter().map(AnswerRecord::into_detail).collect();
        Ok(QuizResult::from_persisted(
            ResultId::new(self.id),
            QuizId::new(self.quiz_id),
            self.quiz_title,
            self.score,
            self.total,
            answers,
            self.time_taken_secs,
            self.completed_at,
        )?)
    }
}

/// Persisted shape for a bookmarked question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub question: QuestionRecord,
    pub bookmarked_at: DateTime<Utc>,
}

impl BookmarkRecord {
    #[must_use]
    pub fn from_bookmark(bookmark: &Bookmark) -> Self {
        Self {
            question: QuestionRecord::from_question(bookmark.question()),
            bookmarked_at: bookmark.bookmarked_at(),
        }
    }

    /// Convert the record back into a domain `Bookmark`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` if the stored question fails validation.
    pub fn into_bookmark(self) -> Result<Bookmark, RecordError> {
        Ok(Bookmark::new(
            self.question.into_question()?,
            self.bookmarked_at,
        ))
    }
}

//
// ─── REPOSITORY CONTRACTS ──────────────────────────────────────────────────────
//

/// Repository contract for quiz definitions.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Persist or update a quiz.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn upsert_quiz(&self, quiz: &QuizDefinition) -> Result<(), StorageError>;

    /// Fetch a quiz by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_quiz(&self, id: &QuizId) -> Result<QuizDefinition, StorageError>;

    /// All stored quizzes, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn list_quizzes(&self) -> Result<Vec<QuizDefinition>, StorageError>;

    /// Remove a quiz; returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn delete_quiz(&self, id: &QuizId) -> Result<bool, StorageError>;

    /// Remove every stored quiz.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn clear_quizzes(&self) -> Result<(), StorageError>;
}

/// Repository contract for finished results.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Append a finished result to the history.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn append_result(&self, result: &QuizResult) -> Result<(), StorageError>;

    /// Full result history in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn list_results(&self) -> Result<Vec<QuizResult>, StorageError>;

    /// Remove every stored result.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn clear_results(&self) -> Result<(), StorageError>;
}

/// Repository contract for bookmarked questions.
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// Persist or update a bookmark keyed by its question id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bookmark cannot be stored.
    async fn upsert_bookmark(&self, bookmark: &Bookmark) -> Result<(), StorageError>;

    /// Remove a bookmark; returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn delete_bookmark(&self, id: &QuestionId) -> Result<bool, StorageError>;

    /// All stored bookmarks, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn list_bookmarks(&self) -> Result<Vec<Bookmark>, StorageError>;
}

//
// ─── IN-MEMORY ADAPTER ─────────────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    quizzes: Arc<Mutex<HashMap<String, QuizDefinition>>>,
    results: Arc<Mutex<Vec<QuizResult>>>,
    bookmarks: Arc<Mutex<HashMap<String, Bookmark>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn upsert_quiz(&self, quiz: &QuizDefinition) -> Result<(), StorageError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(quiz.id().as_str().to_owned(), quiz.clone());
        Ok(())
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<QuizDefinition, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(id.as_str()).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_quizzes(&self) -> Result<Vec<QuizDefinition>, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.values().cloned().collect())
    }

    async fn delete_quiz(&self, id: &QuizId) -> Result<bool, StorageError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.remove(id.as_str()).is_some())
    }

    async fn clear_quizzes(&self) -> Result<(), StorageError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.clear();
        Ok(())
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn append_result(&self, result: &QuizResult) -> Result<(), StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(result.clone());
        Ok(())
    }

    async fn list_results(&self) -> Result<Vec<QuizResult>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn clear_results(&self) -> Result<(), StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.clear();
        Ok(())
    }
}

#[async_trait]
impl BookmarkRepository for InMemoryRepository {
    async fn upsert_bookmark(&self, bookmark: &Bookmark) -> Result<(), StorageError> {
        let mut guard = self
            .bookmarks
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(bookmark.question_id().as_str().to_owned(), bookmark.clone());
        Ok(())
    }

    async fn delete_bookmark(&self, id: &QuestionId) -> Result<bool, StorageError> {
        let mut guard = self
            .bookmarks
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.remove(id.as_str()).is_some())
    }

    async fn list_bookmarks(&self) -> Result<Vec<Bookmark>, StorageError> {
        let guard = self
            .bookmarks
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.values().cloned().collect())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
    pub results: Arc<dyn ResultRepository>,
    pub bookmarks: Arc<dyn BookmarkRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let quizzes: Arc<dyn QuizRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ResultRepository> = Arc::new(repo.clone());
        let bookmarks: Arc<dyn BookmarkRepository> = Arc::new(repo);
        Self {
            quizzes,
            results,
            bookmarks,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::AnswerDetail;
    use quiz_core::time::fixed_now;

    fn build_question(id: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Question {id}?"),
            vec!["a".into(), "b".into(), "c".into()],
            1,
            "Science",
        )
        .unwrap()
    }

    fn build_quiz(id: &str) -> QuizDefinition {
        QuizDefinition::new(
            QuizId::new(id),
            format!("Quiz {id}"),
            vec![build_question("q1"), build_question("q2")],
            600,
            fixed_now(),
        )
        .unwrap()
    }

    fn build_result() -> QuizResult {
        let q = build_question("q1");
        QuizResult::from_details(
            QuizId::new("quiz_sci"),
            "Science Challenge",
            vec![
                AnswerDetail::new(&q, Some(1)),
                AnswerDetail::new(&q, None),
            ],
            30,
            fixed_now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn quiz_round_trip() {
        let repo = InMemoryRepository::new();
        let quiz = build_quiz("quiz_sci");

        repo.upsert_quiz(&quiz).await.unwrap();
        let fetched = repo.get_quiz(quiz.id()).await.unwrap();
        assert_eq!(fetched, quiz);

        assert!(repo.delete_quiz(quiz.id()).await.unwrap());
        assert!(matches!(
            repo.get_quiz(quiz.id()).await,
            Err(StorageError::NotFound)
        ));
        assert!(!repo.delete_quiz(quiz.id()).await.unwrap());
    }

    #[tokio::test]
    async fn results_keep_insertion_order() {
        let repo = InMemoryRepository::new();
        let first = build_result();
        let second = build_result();

        repo.append_result(&first).await.unwrap();
        repo.append_result(&second).await.unwrap();

        let listed = repo.list_results().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id(), first.id());
        assert_eq!(listed[1].id(), second.id());
    }

    #[tokio::test]
    async fn bookmark_round_trip() {
        let repo = InMemoryRepository::new();
        let bookmark = Bookmark::new(build_question("q1"), fixed_now());

        repo.upsert_bookmark(&bookmark).await.unwrap();
        let listed = repo.list_bookmarks().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].question_id().as_str(), "q1");

        assert!(repo.delete_bookmark(bookmark.question_id()).await.unwrap());
        assert!(repo.list_bookmarks().await.unwrap().is_empty());
    }

    #[test]
    fn quiz_record_serde_round_trip() {
        let quiz = build_quiz("quiz_sci").with_category("Science").as_custom();
        let record = QuizRecord::from_quiz(&quiz);

        let json = serde_json::to_string(&record).unwrap();
        let decoded: QuizRecord = serde_json::from_str(&json).unwrap();
        let rebuilt = decoded.into_quiz().unwrap();

        assert_eq!(rebuilt, quiz);
    }

    #[test]
    fn result_record_recomputes_correctness() {
        let result = build_result();
        let record = ResultRecord::from_result(&result);

        let json = serde_json::to_string(&record).unwrap();
        let decoded: ResultRecord = serde_json::from_str(&json).unwrap();
        let rebuilt = decoded.into_result().unwrap();

        assert_eq!(rebuilt.score(), result.score());
        assert_eq!(rebuilt.total(), result.total());
        assert_eq!(rebuilt.percentage(), result.percentage());
        assert!(rebuilt.answers()[0].is_correct);
        assert!(!rebuilt.answers()[1].is_correct);
    }

    #[test]
    fn tampered_result_record_is_rejected() {
        let mut record = ResultRecord::from_result(&build_result());
        record.score = 2;
        assert!(record.into_result().is_err());
    }

    #[tokio::test]
    async fn storage_aggregate_shares_one_backend() {
        let storage = Storage::in_memory();
        let quiz = build_quiz("quiz_sci");
        storage.quizzes.upsert_quiz(&quiz).await.unwrap();
        assert_eq!(storage.quizzes.list_quizzes().await.unwrap().len(), 1);
    }
}
