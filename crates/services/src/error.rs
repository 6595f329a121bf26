//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuestionError, QuizError, ResultError};
use quiz_core::parser::FormatError;
use storage::repository::StorageError;

/// Rejected sheet input; nothing was fetched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputError {
    #[error("unrecognized sheet URL or identifier: {input}")]
    UnrecognizedSheet { input: String },

    #[error("invalid sheets base URL: {0}")]
    InvalidBaseUrl(String),
}

/// The import source answered, but not with usable text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("sheet request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `SheetImportService`.
///
/// All variants are terminal for the import call; retrying means a fresh
/// call, never an internal loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,

    #[error("session already finished")]
    Completed,

    #[error("quiz not found")]
    UnknownQuiz,

    #[error("too many questions for a single session: {len}")]
    TooManyQuestions { len: usize },

    #[error(transparent)]
    Result(#[from] ResultError),
}

/// Errors emitted by `QuizCatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `LedgerService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LedgerError {
    #[error(transparent)]
    Result(#[from] ResultError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `BookmarkShelfService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BookmarkError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
