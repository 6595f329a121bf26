use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Question, QuestionId};

const MIN_FIELDS: usize = 6;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormatError {
    #[error("no data rows found")]
    NotEnoughRows,

    #[error("no valid questions found")]
    NoValidQuestions,
}

//
// ─── LOADER ────────────────────────────────────────────────────────────────────
//

/// Maps parsed rows into validated questions.
///
/// Row 0 is treated as a header and skipped. Rows with fewer than six fields
/// or a blank question text are dropped, as are rows left with fewer than two
/// non-empty options. Question ids are derived from `imported_at` and the
/// row number.
///
/// # Errors
///
/// Returns `FormatError::NotEnoughRows` for inputs with fewer than two rows
/// and `FormatError::NoValidQuestions` when nothing survives filtering.
pub fn load_questions(
    rows: &[Vec<String>],
    imported_at: DateTime<Utc>,
) -> Result<Vec<Question>, FormatError> {
    if rows.len() < 2 {
        return Err(FormatError::NotEnoughRows);
    }

    let stamp = imported_at.timestamp_millis();
    let mut questions = Vec::new();
    for (row_number, row) in rows.iter().enumerate().skip(1) {
        if let Some(question) = question_from_row(row, stamp, row_number) {
            questions.push(question);
        }
    }

    if questions.is_empty() {
        return Err(FormatError::NoValidQuestions);
    }
    Ok(questions)
}

fn question_from_row(row: &[String], stamp: i64, row_number: usize) -> Option<Question> {
    if row.len() < MIN_FIELDS || row[0].trim().is_empty() {
        return None;
    }

    let options: Vec<String> = row[1..5]
        .iter()
        .map(|option| option.trim().to_owned())
        .filter(|option| !option.is_empty())
        .collect();
    if options.len() < 2 {
        return None;
    }

    let correct_index = normalize_answer(&row[5], &options);
    let category = row.get(6).map(|c| c.trim()).unwrap_or_default();
    let id = QuestionId::new(format!("sq_{stamp}_{row_number}"));

    Question::new(id, row[0].trim(), options, correct_index, category).ok()
}

/// Resolves the answer column to an option index.
///
/// `A`/`1` through `D`/`4` map positionally; anything else is matched
/// case-insensitively against the option text. Unrecognized encodings fall
/// back to index 0, matching the historical import behavior.
fn normalize_answer(raw: &str, options: &[String]) -> usize {
    let normalized = raw.trim().to_uppercase();
    let positional = match normalized.as_str() {
        "A" | "1" => Some(0),
        "B" | "2" => Some(1),
        "C" | "3" => Some(2),
        "D" | "4" => Some(3),
        _ => None,
    };
    if let Some(index) = positional.filter(|index| *index < options.len()) {
        return index;
    }

    let lowered = raw.trim().to_lowercase();
    options
        .iter()
        .position(|option| option.to_lowercase() == lowered)
        .unwrap_or(0)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
