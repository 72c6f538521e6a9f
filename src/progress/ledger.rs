//! Completed levels and best scores per subcategory

use crate::curriculum::Difficulty;
use crate::state::SubcatProgress;

/// What a single result changed in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerUpdate {
    /// The level was passed for the first time
    pub newly_completed: bool,
    /// Best score for the level after this result
    pub best_score: u8,
}

/// Fold one scored run of a 1-based `level` into the ledger
///
/// A level counts towards its tier only on its first pass; best scores ratchet
/// up whether or not the run passed.
pub fn record_result(
    progress: &mut SubcatProgress,
    level: u8,
    difficulty: Difficulty,
    score: u8,
    passed: bool,
) -> LedgerUpdate {
    let newly_completed = passed && progress.completed_levels.insert(level);
    if newly_completed {
        *progress.diff_done.entry(difficulty).or_insert(0) += 1;
    }

    let best = progress.best_scores.entry(level).or_insert(0);
    *best = (*best).max(score);

    LedgerUpdate { newly_completed, best_score: *best }
}
