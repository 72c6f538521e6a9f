//! Ownership and persistence of the progress document

use anyhow::{Context, Result};

use super::backend::StateBackend;
use super::model::PersistedState;

/// Fixed key the document lives under
pub const STATE_KEY: &str = "SATGAME_V1";

/// Holds the document for the process lifetime and persists every commit
pub struct StateStore {
    backend: Box<dyn StateBackend>,
    state: PersistedState,
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore").field("state", &self.state).finish_non_exhaustive()
    }
}

/// How a stored document was interpreted on load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored yet; a default document was written
    Fresh,
    /// Stored document parsed as-is
    Loaded,
    /// Parsed, but `highScores` had to be backfilled
    Repaired,
    /// Stored document was unreadable and replaced with the default
    Reset,
}

impl StateStore {
    /// Load the document from `backend`, creating or repairing it as needed
    ///
    /// A missing or corrupt document never fails the load; only a failed write
    /// of the replacement does.
    pub fn open(backend: impl StateBackend + 'static) -> Result<(Self, LoadOutcome)> {
        let raw = backend.read(STATE_KEY).unwrap_or_else(|e| {
            tracing::warn!("Could not read stored progress: {:#}", e);
            Some(String::new())
        });

        let (state, outcome) = match raw {
            None => (PersistedState::default(), LoadOutcome::Fresh),
            Some(raw) => match parse_document(&raw) {
                Ok((state, true)) => (state, LoadOutcome::Repaired),
                Ok((state, false)) => (state, LoadOutcome::Loaded),
                Err(e) => {
                    tracing::warn!("Discarding corrupt progress document: {:#}", e);
                    (PersistedState::default(), LoadOutcome::Reset)
                }
            },
        };

        let mut store = Self { backend: Box::new(backend), state };
        if outcome != LoadOutcome::Loaded {
            let current = store.state.clone();
            store.write(&current)?;
        }

        tracing::info!(
            ?outcome,
            plays = store.state.plays,
            attempts = store.state.history.len(),
            "Progress loaded"
        );
        Ok((store, outcome))
    }

    /// Read-only view of the document
    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    /// Apply a mutation transactionally
    ///
    /// `apply` runs against a working copy. The copy is written to the backend
    /// and only then replaces the held document, so a failed write leaves the
    /// previous state in place.
    pub fn commit<T>(&mut self, apply: impl FnOnce(&mut PersistedState) -> T) -> Result<T> {
        let mut next = self.state.clone();
        let output = apply(&mut next);
        self.write(&next)?;
        self.state = next;
        Ok(output)
    }

    fn write(&mut self, state: &PersistedState) -> Result<()> {
        let contents = serde_json::to_string(state).context("Failed to serialize progress")?;
        self.backend.write(STATE_KEY, &contents)
    }
}

/// Parse a stored document, reporting whether `highScores` was absent
fn parse_document(raw: &str) -> Result<(PersistedState, bool)> {
    let value: serde_json::Value = serde_json::from_str(raw).context("Invalid JSON")?;
    let backfilled = value.get("highScores").is_none();
    let state = serde_json::from_value(value).context("Unexpected document shape")?;
    Ok((state, backfilled))
}
