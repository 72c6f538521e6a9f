//! Dashboard and level-select projections

use crate::curriculum::{Difficulty, LEVELS_PER_SUBCATEGORY, QuestionBank, has_questions_for_level};
use crate::state::{Attempt, PersistedState};

/// Completed levels of a category out of its capacity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub done: usize,
    pub max: usize,
}

impl CategoryTotal {
    /// Rounded completion percentage
    pub fn percent(&self) -> u32 {
        percent(self.done, self.max)
    }
}

/// Completion of one subcategory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcatSummary {
    pub name: String,
    pub completed: usize,
    pub percent: u32,
}

/// One row on the level-select screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRow {
    /// 1-based level number
    pub level: u8,
    pub difficulty: Difficulty,
    pub completed: bool,
    pub best_score: Option<u8>,
    /// False means the level shows as "Soon"
    pub has_questions: bool,
}

/// `done / total` as a rounded percentage; a zero total counts as one
pub fn percent(done: usize, total: usize) -> u32 {
    (100.0 * done as f64 / total.max(1) as f64).round() as u32
}

/// Per-category totals in bank order
pub fn category_totals(state: &PersistedState, bank: &QuestionBank) -> Vec<CategoryTotal> {
    bank.categories
        .iter()
        .map(|(name, category)| {
            let done = category.subcategories.keys().map(|sc| state.completed_count(sc)).sum();
            let max = category.subcategories.len() * usize::from(LEVELS_PER_SUBCATEGORY);
            CategoryTotal { category: name.clone(), done, max }
        })
        .collect()
}

/// Subcategory completion for one category
pub fn subcategory_summaries(
    state: &PersistedState,
    bank: &QuestionBank,
    category: &str,
) -> Vec<SubcatSummary> {
    bank.subcategory_names(category)
        .into_iter()
        .map(|name| {
            let completed = state.completed_count(name);
            SubcatSummary {
                name: name.to_string(),
                completed,
                percent: percent(completed, usize::from(LEVELS_PER_SUBCATEGORY)),
            }
        })
        .collect()
}

/// All 20 level rows of a subcategory
pub fn level_rows(state: &PersistedState, bank: &QuestionBank, subcat: &str) -> Vec<LevelRow> {
    let progress = state.subcat_progress(subcat);

    (1..=LEVELS_PER_SUBCATEGORY)
        .map(|level| LevelRow {
            level,
            difficulty: Difficulty::for_level(level),
            completed: progress.is_some_and(|p| p.completed_levels.contains(&level)),
            best_score: progress.and_then(|p| p.best_score(level)),
            has_questions: has_questions_for_level(bank, subcat, level - 1),
        })
        .collect()
}

/// The last `n` attempts, newest first
pub fn recent_attempts(state: &PersistedState, n: usize) -> Vec<&Attempt> {
    state.history.iter().rev().take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::bank::tests::{bank_with, question};
    use crate::progress::ledger::record_result;
    use pretty_assertions::assert_eq;

    #[test]
    fn zero_capacity_does_not_divide_by_zero() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(1, 8), 13);
    }

    #[test]
    fn category_totals_sum_subcategories() {
        let bank = bank_with("Quantitative", &[("Algebra", vec![]), ("Geometry", vec![])]);
        let mut state = PersistedState::default();
        for level in 1..=3 {
            record_result(state.progress_mut("Algebra"), level, Difficulty::Easy, 4, true);
        }
        record_result(state.progress_mut("Geometry"), 1, Difficulty::Easy, 5, true);

        let totals = category_totals(&state, &bank);
        assert_eq!(
            totals,
            vec![CategoryTotal { category: "Quantitative".into(), done: 4, max: 40 }]
        );
        assert_eq!(totals[0].percent(), 10);
    }

    #[test]
    fn empty_category_reports_zero_percent() {
        let mut bank = QuestionBank::default();
        bank.categories.insert("Verbal".into(), Default::default());
        let totals = category_totals(&PersistedState::default(), &bank);
        assert_eq!(totals[0].max, 0);
        assert_eq!(totals[0].percent(), 0);
    }

    #[test]
    fn level_rows_reflect_progress_and_content() {
        let bank = bank_with("Quantitative", &[("Algebra", vec![question("q", Difficulty::Easy)])]);
        let mut state = PersistedState::default();
        record_result(state.progress_mut("Algebra"), 2, Difficulty::Easy, 5, true);
        record_result(state.progress_mut("Algebra"), 3, Difficulty::Easy, 1, false);

        let rows = level_rows(&state, &bank, "Algebra");
        assert_eq!(rows.len(), 20);
        assert!(rows[1].completed);
        assert_eq!(rows[1].best_score, Some(5));
        assert!(!rows[2].completed);
        assert_eq!(rows[2].best_score, Some(1));
        assert_eq!(rows[0].best_score, None);
        assert!(rows[4].has_questions);
        assert!(!rows[5].has_questions);
        assert_eq!(rows[19].difficulty, Difficulty::Mastery);
    }

    #[test]
    fn subcategory_summaries_use_twenty_levels() {
        let bank = bank_with("Verbal", &[("Reading", vec![])]);
        let mut state = PersistedState::default();
        for level in 1..=5 {
            record_result(state.progress_mut("Reading"), level, Difficulty::Easy, 3, true);
        }

        let summaries = subcategory_summaries(&state, &bank, "Verbal");
        assert_eq!(
            summaries,
            vec![SubcatSummary { name: "Reading".into(), completed: 5, percent: 25 }]
        );
    }

    #[test]
    fn recent_attempts_newest_first() {
        let mut state = PersistedState::default();
        for i in 0..7u8 {
            state.history.push(Attempt {
                subcat: "Algebra".into(),
                level_index: i,
                difficulty: Difficulty::Easy,
                score: 3,
                passed: true,
                time: i64::from(i),
            });
        }

        let recent: Vec<u8> = recent_attempts(&state, 5).iter().map(|a| a.level_index).collect();
        assert_eq!(recent, vec![6, 5, 4, 3, 2]);
    }
}
