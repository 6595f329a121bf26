#![forbid(unsafe_code)]

pub mod bookmarks;
pub mod catalog;
pub mod defaults;
pub mod error;
pub mod import;
pub mod ledger;
pub mod session;

pub use quiz_core::Clock;

pub use error::{
    BookmarkError, CatalogError, FetchError, ImportError, InputError, LedgerError, SessionError,
};

pub use bookmarks::{BookmarkShelf, BookmarkShelfService};
pub use catalog::{QuizCatalog, QuizCatalogService};
pub use import::{SheetImportConfig, SheetImportService, extract_sheet_id};
pub use ledger::{LedgerService, LedgerStats, ResultLedger};
pub use session::{
    CurrentQuestionView, OptionView, QuizSession, SessionPlan, SessionPlanBuilder,
    SessionProgress, SessionState, SessionTicker, SessionView, SharedSession, TickOutcome,
};
