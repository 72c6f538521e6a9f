//! Folding a finished run into the persisted document

use chrono::{DateTime, TimeZone};

use super::session::{LevelContext, SessionResult};
use crate::economy::plays_for_score;
use crate::progress::{apply_badge_gate, apply_daily_streak, record_result};
use crate::state::{Attempt, PersistedState};

/// Everything a single commit changed, for the result screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
    pub plays_earned: u32,
    /// Balance after the award
    pub plays: u32,
    pub newly_completed: bool,
    pub badge_unlocked: bool,
    pub best_score: u8,
    pub streak_days: u32,
    /// The result screen offers the mini-game only after a pass with plays left
    pub can_play_game: bool,
}

/// Apply a finished run to `state`
///
/// Meant to run inside [`StateStore::commit`] so the award, ledger, badge,
/// streak and history updates land together or not at all.
///
/// [`StateStore::commit`]: crate::state::StateStore::commit
pub fn commit_attempt<Tz: TimeZone>(
    state: &mut PersistedState,
    result: &SessionResult,
    context: &LevelContext,
    now: &DateTime<Tz>,
) -> CommitOutcome {
    let plays_earned = plays_for_score(result.score);
    state.plays = state.plays.saturating_add(plays_earned);

    let ledger = record_result(
        state.progress_mut(&context.subcat),
        context.level(),
        context.difficulty,
        result.score,
        result.passed,
    );
    let badge_unlocked = apply_badge_gate(state, &context.subcat, context.difficulty);

    apply_daily_streak(&mut state.streak, now);

    state.history.push(Attempt {
        subcat: context.subcat.clone(),
        level_index: context.level_index,
        difficulty: context.difficulty,
        score: result.score,
        passed: result.passed,
        time: now.timestamp_millis(),
    });

    CommitOutcome {
        plays_earned,
        plays: state.plays,
        newly_completed: ledger.newly_completed,
        badge_unlocked,
        best_score: ledger.best_score,
        streak_days: state.streak.days,
        can_play_game: state.plays > 0 && result.passed,
    }
}
