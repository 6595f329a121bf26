mod plan;
mod progress;
mod service;
mod ticker;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{SessionPlan, SessionPlanBuilder};
pub use progress::SessionProgress;
pub use service::{QuizSession, SessionState, TickOutcome};
pub use ticker::{SessionTicker, SharedSession};
pub use view::{CurrentQuestionView, OptionView, SessionView};
