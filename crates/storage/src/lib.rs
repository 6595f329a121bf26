#![forbid(unsafe_code)]

pub mod repository;

pub use repository::{
    AnswerRecord, BookmarkRecord, BookmarkRepository, InMemoryRepository, QuestionRecord,
    QuizRecord, QuizRepository, RecordError, ResultRecord, ResultRepository, Storage,
    StorageError,
};
