//! Progress bookkeeping and read-side analytics
//!
//! The ledger, badge gate and streak tracker mutate a [`PersistedState`]
//! working copy during a commit. Weakness ranking and totals are pure
//! projections recomputed on demand.
//!
//! [`PersistedState`]: crate::state::PersistedState

pub mod badges;
pub mod ledger;
pub mod streak;
pub mod totals;
pub mod weakness;

pub use badges::{BADGE_THRESHOLD, apply_badge_gate, unlocked_badges};
pub use ledger::{LedgerUpdate, record_result};
pub use streak::apply_daily_streak;
pub use totals::{CategoryTotal, LevelRow, SubcatSummary};
pub use weakness::{WEAKNESS_THRESHOLD, Weakness, find_weaknesses};
