//! Tier badges

use crate::curriculum::Difficulty;
use crate::state::PersistedState;

/// First-time passes of a tier needed to unlock its badge
pub const BADGE_THRESHOLD: u32 = 5;

/// Unlock the (subcat, tier) badge if the ledger has reached the threshold
///
/// Returns true only on the commit that unlocks it. Unlocked badges are never
/// cleared.
pub fn apply_badge_gate(state: &mut PersistedState, subcat: &str, difficulty: Difficulty) -> bool {
    let passes = state.subcat_progress(subcat).map(|p| p.tier_passes(difficulty)).unwrap_or(0);
    if passes < BADGE_THRESHOLD {
        return false;
    }

    let unlocked =
        state.badges.entry(subcat.to_string()).or_default().entry(difficulty).or_insert(false);
    let newly = !*unlocked;
    *unlocked = true;

    if newly {
        tracing::info!(subcat, %difficulty, "Badge unlocked");
    }
    newly
}

/// Unlocked badges for a subcategory, in tier order
pub fn unlocked_badges(state: &PersistedState, subcat: &str) -> Vec<Difficulty> {
    Difficulty::all().iter().copied().filter(|&d| state.has_badge(subcat, d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ledger::record_result;

    fn pass_level(state: &mut PersistedState, subcat: &str, level: u8) -> bool {
        let difficulty = Difficulty::for_level(level);
        record_result(state.progress_mut(subcat), level, difficulty, 5, true);
        apply_badge_gate(state, subcat, difficulty)
    }

    #[test]
    fn unlocks_on_fifth_first_pass() {
        let mut state = PersistedState::default();
        for level in 1..=4 {
            assert!(!pass_level(&mut state, "Algebra", level));
        }
        assert!(unlocked_badges(&state, "Algebra").is_empty());

        assert!(pass_level(&mut state, "Algebra", 5));
        assert_eq!(unlocked_badges(&state, "Algebra"), vec![Difficulty::Easy]);
    }

    #[test]
    fn retries_do_not_count_towards_badge() {
        let mut state = PersistedState::default();
        for _ in 0..6 {
            pass_level(&mut state, "Algebra", 1);
        }
        assert!(!state.has_badge("Algebra", Difficulty::Easy));
    }

    #[test]
    fn badge_survives_later_failures_and_is_not_reannounced() {
        let mut state = PersistedState::default();
        for level in 6..=10 {
            pass_level(&mut state, "Geometry", level);
        }
        assert!(state.has_badge("Geometry", Difficulty::Medium));

        record_result(state.progress_mut("Geometry"), 8, Difficulty::Medium, 0, false);
        assert!(!apply_badge_gate(&mut state, "Geometry", Difficulty::Medium));
        assert!(state.has_badge("Geometry", Difficulty::Medium));
    }

    #[test]
    fn badges_list_in_tier_order() {
        let mut state = PersistedState::default();
        state.badges.entry("Algebra".into()).or_default().insert(Difficulty::Mastery, true);
        state.badges.entry("Algebra".into()).or_default().insert(Difficulty::Easy, true);
        state.badges.entry("Algebra".into()).or_default().insert(Difficulty::Hard, false);

        assert_eq!(
            unlocked_badges(&state, "Algebra"),
            vec![Difficulty::Easy, Difficulty::Mastery]
        );
    }
}
