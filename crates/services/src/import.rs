use std::env;

use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use quiz_core::model::Question;
use quiz_core::parser::{load_questions, parse_rows};

use crate::error::{FetchError, ImportError, InputError};

const BASE_URL_ENV: &str = "QUIZMASTER_SHEETS_BASE_URL";
const DEFAULT_BASE_URL: &str = "https://docs.google.com/spreadsheets";
const MIN_BARE_ID_LEN: usize = 20;

/// Pulls the sheet identifier out of a share URL or a bare id.
///
/// Accepts any input containing a `/d/<id>` segment, or a bare token of 20+
/// alphanumeric/`-`/`_` characters.
///
/// # Errors
///
/// Returns `InputError::UnrecognizedSheet` when neither form matches.
pub fn extract_sheet_id(input: &str) -> Result<String, InputError> {
    for (position, _) in input.match_indices("/d/") {
        let id: String = input[position + 3..]
            .chars()
            .take_while(|c| is_id_char(*c))
            .collect();
        if !id.is_empty() {
            return Ok(id);
        }
    }

    let trimmed = input.trim();
    if trimmed.len() >= MIN_BARE_ID_LEN && trimmed.chars().all(is_id_char) {
        return Ok(trimmed.to_owned());
    }

    Err(InputError::UnrecognizedSheet {
        input: input.to_owned(),
    })
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

//
// ─── IMPORT SERVICE ────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct SheetImportConfig {
    pub base_url: String,
}

impl SheetImportConfig {
    /// Reads the base URL override from the environment, falling back to the
    /// public sheets host.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self { base_url }
    }
}

impl Default for SheetImportConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

/// Imports question sets published as CSV from a spreadsheet host.
///
/// The contract starts at "raw text in" and ends at "questions out or a
/// distinct `ImportError`". Nothing is retried internally; a failed import
/// means a fresh call.
#[derive(Clone)]
pub struct SheetImportService {
    client: Client,
    config: SheetImportConfig,
}

impl SheetImportService {
    #[must_use]
    pub fn new(config: SheetImportConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(SheetImportConfig::from_env())
    }

    /// The CSV export endpoint for a sheet, with the optional worksheet name
    /// percent-encoded into the query.
    fn export_url(&self, sheet_id: &str, sheet_name: Option<&str>) -> Result<Url, InputError> {
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/d/{sheet_id}/gviz/tq"))
            .map_err(|_| InputError::InvalidBaseUrl(self.config.base_url.clone()))?;
        url.query_pairs_mut().append_pair("tqx", "out:csv");
        if let Some(name) = sheet_name.map(str::trim).filter(|name| !name.is_empty()) {
            url.query_pairs_mut().append_pair("sheet", name);
        }
        Ok(url)
    }

    /// Fetches the published CSV and splits it into rows.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::Input` for unusable identifiers and
    /// `ImportError::Fetch` for transport failures or non-success statuses.
    pub async fn fetch_rows(
        &self,
        input: &str,
        sheet_name: Option<&str>,
    ) -> Result<Vec<Vec<String>>, ImportError> {
        let sheet_id = extract_sheet_id(input)?;
        let url = self.export_url(&sheet_id, sheet_name)?;
        debug!(%url, "fetching question sheet");

        let response = self.client.get(url).send().await.map_err(FetchError::Http)?;
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status()).into());
        }
        let csv = response.text().await.map_err(FetchError::Http)?;

        Ok(parse_rows(&csv))
    }

    /// Full import pipeline: fetch, parse, and map rows into questions.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::Format` on top of the fetch failures when fewer
    /// than two rows arrive or no valid questions survive filtering.
    pub async fn import_questions(
        &self,
        input: &str,
        sheet_name: Option<&str>,
        imported_at: DateTime<Utc>,
    ) -> Result<Vec<Question>, ImportError> {
        let rows = self.fetch_rows(input, sheet_name).await?;
        let questions = load_questions(&rows, imported_at)?;
        info!(count = questions.len(), "imported question set");
        Ok(questions)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
