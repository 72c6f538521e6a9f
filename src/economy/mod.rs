//! Play currency
//!
//! Plays are earned by passing levels and spent inside the mini-game. The
//! quiz commit only ever adds to the balance; only a mini-game settlement can
//! lower it.

pub mod minigame;

pub use minigame::{
    GameConfig, GameOutcome, GameResult, MiniGame, MiniGameGate, MiniGameSession, ResultReporter,
    Settlement, settle,
};

/// Plays awarded for a quiz score
pub fn plays_for_score(score: u8) -> u32 {
    match score {
        5.. => 3,
        4 => 2,
        3 => 1,
        _ => 0,
    }
}
