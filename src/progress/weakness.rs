//! Focus areas derived from attempt history

use std::collections::HashMap;

use crate::curriculum::QuestionBank;
use crate::state::Attempt;

/// Average score below which a subcategory can be flagged
pub const WEAKNESS_THRESHOLD: f64 = 3.5;

/// A subcategory that needs practice
#[derive(Debug, Clone, PartialEq)]
pub struct Weakness {
    pub subcat: String,

    /// Owning category, if the bank still knows the subcategory
    pub category: Option<String>,

    /// Mean score over every attempt in the subcategory
    pub avg_score: f64,

    /// Latest failing attempt per level, in order of first failure
    pub failed_levels: Vec<Attempt>,
}

#[derive(Default)]
struct Tally<'a> {
    total: u32,
    attempts: u32,
    failed: Vec<&'a Attempt>,
}

/// Rank weak subcategories, worst average first
///
/// A subcategory qualifies when its average is below [`WEAKNESS_THRESHOLD`]
/// and some level's most recent failure is on record. A pass does not clear
/// the failure for that level. Equal averages keep the order in which the
/// subcategories first appear in history.
pub fn find_weaknesses(history: &[Attempt], bank: &QuestionBank) -> Vec<Weakness> {
    let mut order: Vec<&str> = Vec::new();
    let mut tallies: HashMap<&str, Tally> = HashMap::new();

    for attempt in history {
        let tally = tallies.entry(attempt.subcat.as_str()).or_insert_with(|| {
            order.push(attempt.subcat.as_str());
            Tally::default()
        });
        tally.total += u32::from(attempt.score);
        tally.attempts += 1;

        if !attempt.passed {
            match tally.failed.iter_mut().find(|f| f.level_index == attempt.level_index) {
                Some(slot) => *slot = attempt,
                None => tally.failed.push(attempt),
            }
        }
    }

    let mut weaknesses: Vec<Weakness> = order
        .into_iter()
        .filter_map(|subcat| {
            let tally = tallies.remove(subcat)?;
            let avg_score = f64::from(tally.total) / f64::from(tally.attempts.max(1));
            if avg_score >= WEAKNESS_THRESHOLD || tally.failed.is_empty() {
                return None;
            }
            Some(Weakness {
                subcat: subcat.to_string(),
                category: bank.category_of(subcat).map(str::to_string),
                avg_score,
                failed_levels: tally.failed.into_iter().cloned().collect(),
            })
        })
        .collect();

    weaknesses.sort_by(|a, b| a.avg_score.total_cmp(&b.avg_score));
    weaknesses
}
