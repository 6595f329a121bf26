mod bookmark;
mod ids;
mod question;
mod quiz;
mod result;

pub use bookmark::Bookmark;
pub use ids::{QuestionId, QuizId, ResultId};
pub use question::{Question, QuestionError};
pub use quiz::{DEFAULT_TIME_LIMIT_SECS, QuizDefinition, QuizError};
pub use result::{AnswerDetail, QuizResult, ResultError};
