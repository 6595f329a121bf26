use std::sync::Arc;

use tracing::info;

use quiz_core::collections::RankHeap;
use quiz_core::model::QuizResult;
use storage::repository::ResultRepository;

use crate::error::LedgerError;

const DEFAULT_TOP_SCORES: usize = 5;

//
// ─── STATS ─────────────────────────────────────────────────────────────────────
//

/// Aggregates over the full result history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerStats {
    pub quizzes_taken: usize,
    /// Mean of the per-result percentages, rounded.
    pub mean_percentage: u32,
    pub best_percentage: u32,
    pub total_questions: u32,
    pub total_correct: u32,
    /// `round(total_correct / total_questions × 100)`.
    pub accuracy: u32,
}

//
// ─── LEDGER ────────────────────────────────────────────────────────────────────
//

/// Ordered history of finished results plus a heap ranking them by
/// percentage.
pub struct ResultLedger {
    history: Vec<QuizResult>,
    ranked: RankHeap<QuizResult>,
}

impl ResultLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            ranked: RankHeap::new(|a: &QuizResult, b: &QuizResult| {
                a.percentage().cmp(&b.percentage())
            }),
        }
    }

    /// Appends to the history and ranks the result.
    pub fn record(&mut self, result: QuizResult) {
        self.ranked.insert(result.clone());
        self.history.push(result);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// History newest-first.
    #[must_use]
    pub fn recent(&self) -> Vec<&QuizResult> {
        self.history.iter().rev().collect()
    }

    /// The top `n` results by percentage, best first.
    #[must_use]
    pub fn top_scores(&self, n: usize) -> Vec<QuizResult> {
        self.ranked.to_sorted_vec().into_iter().take(n).collect()
    }

    /// The default leaderboard cut.
    #[must_use]
    pub fn top_five(&self) -> Vec<QuizResult> {
        self.top_scores(DEFAULT_TOP_SCORES)
    }

    /// Aggregate statistics, or `None` while the history is empty.
    #[must_use]
    pub fn stats(&self) -> Option<LedgerStats> {
        if self.history.is_empty() {
            return None;
        }

        let quizzes_taken = self.history.len();
        let percentage_sum: u32 = self.history.iter().map(QuizResult::percentage).sum();
        let best_percentage = self
            .history
            .iter()
            .map(QuizResult::percentage)
            .max()
            .unwrap_or(0);
        let total_questions: u32 = self.history.iter().map(QuizResult::total).sum();
        let total_correct: u32 = self.history.iter().map(QuizResult::score).sum();

        Some(LedgerStats {
            quizzes_taken,
            mean_percentage: rounded_ratio(percentage_sum, quizzes_taken as u32, 1),
            best_percentage,
            total_questions,
            total_correct,
            accuracy: rounded_ratio(total_correct, total_questions, 100),
        })
    }
}

impl Default for ResultLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn rounded_ratio(numerator: u32, denominator: u32, scale: u32) -> u32 {
    (f64::from(numerator) / f64::from(denominator) * f64::from(scale)).round() as u32
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Ledger facade that persists every recorded result.
///
/// The in-memory ledger is updated first; the repository append follows, so
/// persisted history trails memory rather than gating it.
pub struct LedgerService {
    results: Arc<dyn ResultRepository>,
    ledger: ResultLedger,
}

impl LedgerService {
    #[must_use]
    pub fn new(results: Arc<dyn ResultRepository>) -> Self {
        Self {
            results,
            ledger: ResultLedger::new(),
        }
    }

    /// Rehydrates the ledger from the stored history.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` on repository failures.
    pub async fn load(results: Arc<dyn ResultRepository>) -> Result<Self, LedgerError> {
        let mut ledger = ResultLedger::new();
        for result in results.list_results().await? {
            ledger.record(result);
        }
        Ok(Self { results, ledger })
    }

    /// Records a finished result and persists it.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` when the repository append fails; the
    /// in-memory ledger has already been updated by then.
    pub async fn record(&mut self, result: QuizResult) -> Result<(), LedgerError> {
        self.ledger.record(result.clone());
        self.results.append_result(&result).await?;
        info!(
            result_id = %result.id(),
            percentage = result.percentage(),
            "recorded quiz result"
        );
        Ok(())
    }

    #[must_use]
    pub fn ledger(&self) -> &ResultLedger {
        &self.ledger
    }

    #[must_use]
    pub fn stats(&self) -> Option<LedgerStats> {
        self.ledger.stats()
    }

    #[must_use]
    pub fn top_scores(&self, n: usize) -> Vec<QuizResult> {
        self.ledger.top_scores(n)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
