mod loader;
mod tabular;

pub use loader::{FormatError, load_questions};
pub use tabular::parse_rows;
