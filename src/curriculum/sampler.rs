//! Drawing a level's question set

use rand::seq::SliceRandom;

use super::{Difficulty, Question, QuestionBank};

/// Upper bound on questions per quiz run
pub const QUESTIONS_PER_LEVEL: usize = 5;

/// Draw up to five distinct questions for a 0-based level index
///
/// The pool is the subcategory's questions tagged with the level's tier. Pools
/// smaller than five are returned whole in random order; an empty pool yields an
/// empty vec and the caller must not start a session.
pub fn sample_questions(bank: &QuestionBank, subcat: &str, level_index: u8) -> Vec<Question> {
    sample_questions_with(bank, subcat, level_index, &mut rand::rng())
}

/// [`sample_questions`] with a caller-supplied RNG
pub fn sample_questions_with<R: rand::Rng + ?Sized>(
    bank: &QuestionBank,
    subcat: &str,
    level_index: u8,
    rng: &mut R,
) -> Vec<Question> {
    let difficulty = Difficulty::for_level(level_index.saturating_add(1));
    let mut pool: Vec<&Question> =
        bank.questions(subcat).iter().filter(|q| q.difficulty == difficulty).collect();

    pool.shuffle(rng);
    pool.truncate(QUESTIONS_PER_LEVEL);

    tracing::debug!(subcat, level_index, %difficulty, drawn = pool.len(), "Sampled questions");
    pool.into_iter().cloned().collect()
}

/// Whether a level has any content at all
pub fn has_questions_for_level(bank: &QuestionBank, subcat: &str, level_index: u8) -> bool {
    let difficulty = Difficulty::for_level(level_index.saturating_add(1));
    bank.questions(subcat).iter().any(|q| q.difficulty == difficulty)
}
