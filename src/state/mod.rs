//! Persistent learner state
//!
//! A single JSON document holds everything: theme, streak, play balance,
//! badges, per-subcategory progress, attempt history and mini-game high
//! scores. [`StateStore`] owns it and is the only place it is written.

pub mod backend;
pub mod model;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, StateBackend};
pub use model::{
    Attempt, GameMode, PersistedState, STARTING_PLAYS, Streak, SubcatProgress, Theme,
};
pub use store::{LoadOutcome, STATE_KEY, StateStore};
