//! Handoff to the external mini-game
//!
//! The mini-game owns the balance while it runs. It receives the starting
//! balance and the mode's high score, and reports back at most once through a
//! [`ResultReporter`]. If it never reports, the stored balance is left as it
//! was before launch.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::CoreError;
use crate::state::{GameMode, PersistedState};

/// What the mini-game is started with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub mode: GameMode,
    pub high_score: u32,
    pub initial_plays: u32,
}

/// Final report from a completed mini-game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    /// Balance remaining after play
    pub plays_left: u32,
    pub final_score: u32,
    pub game_mode: GameMode,
}

/// Single-use channel back to the core
#[derive(Debug)]
pub struct ResultReporter {
    tx: oneshot::Sender<GameResult>,
}

impl ResultReporter {
    /// Report completion; returns false if the core stopped listening
    pub fn report(self, result: GameResult) -> bool {
        self.tx.send(result).is_ok()
    }
}

/// The external mini-game
pub trait MiniGame {
    /// Start a run; the game must call `reporter.report` when it completes
    fn launch(&mut self, config: GameConfig, reporter: ResultReporter);

    /// Force-stop without necessarily reporting
    fn terminate(&mut self);
}

/// How a mini-game session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Completed(GameResult),
    /// Closed before reporting; no currency reconciliation happens
    Abandoned,
}

/// Clears the active flag when the session goes away
#[derive(Debug)]
struct ActiveGuard(Arc<AtomicBool>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A running mini-game, waiting for its report
#[derive(Debug)]
pub struct MiniGameSession {
    mode: GameMode,
    rx: oneshot::Receiver<GameResult>,
    _active: ActiveGuard,
}

impl MiniGameSession {
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Wait for the game to finish
    pub async fn outcome(self) -> GameOutcome {
        match self.rx.await {
            Ok(result) => GameOutcome::Completed(result),
            Err(_) => GameOutcome::Abandoned,
        }
    }

    /// Take a report that has already arrived, without waiting
    pub fn take_reported(mut self) -> GameOutcome {
        match self.rx.try_recv() {
            Ok(result) => GameOutcome::Completed(result),
            Err(_) => GameOutcome::Abandoned,
        }
    }
}

/// Allows one mini-game at a time
#[derive(Debug, Clone, Default)]
pub struct MiniGameGate {
    active: Arc<AtomicBool>,
}

impl MiniGameGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a session is currently running
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Launch `game` for `mode` if the balance allows it
    ///
    /// Refuses without touching anything when the balance is zero or another
    /// session is still running.
    pub fn launch(
        &self,
        state: &PersistedState,
        mode: GameMode,
        game: &mut dyn MiniGame,
    ) -> Result<MiniGameSession, CoreError> {
        if state.plays == 0 {
            tracing::warn!("Mini-game launch refused: no plays left");
            return Err(CoreError::NoPlaysLeft);
        }

        if self.active.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_err() {
            tracing::warn!("Mini-game launch refused: a session is already running");
            return Err(CoreError::MiniGameActive);
        }
        let guard = ActiveGuard(Arc::clone(&self.active));

        let config =
            GameConfig { mode, high_score: state.high_score(mode), initial_plays: state.plays };
        let (tx, rx) = oneshot::channel();

        tracing::info!(mode = mode.name(), plays = state.plays, "Launching mini-game");
        game.launch(config, ResultReporter { tx });

        Ok(MiniGameSession { mode, rx, _active: guard })
    }
}

/// Effect of a completed mini-game on the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub plays_before: u32,
    pub plays_after: u32,
    pub new_high_score: bool,
}

/// Apply a completion report: the reported balance replaces the stored one
/// and the mode's high score only ever goes up
pub fn settle(state: &mut PersistedState, result: &GameResult) -> Settlement {
    let plays_before = state.plays;
    state.plays = result.plays_left;

    let best = state.high_scores.entry(result.game_mode).or_insert(0);
    let new_high_score = result.final_score > *best;
    if new_high_score {
        *best = result.final_score;
    }

    Settlement { plays_before, plays_after: state.plays, new_high_score }
}
