//! Curriculum structure: difficulty tiers, the question bank and sampling
//!
//! Every subcategory holds [`LEVELS_PER_SUBCATEGORY`] levels. A level's tier is
//! derived from its number alone, so the bank only needs to tag questions with
//! a tier for the sampler to find them.

pub mod bank;
pub mod sampler;

pub use bank::{Question, QuestionBank};
pub use sampler::{QUESTIONS_PER_LEVEL, has_questions_for_level, sample_questions};

use serde::{Deserialize, Serialize};

/// Number of levels in every subcategory
pub const LEVELS_PER_SUBCATEGORY: u8 = 20;

/// Difficulty tier of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Levels 1-5
    Easy,
    /// Levels 6-10
    Medium,
    /// Levels 11-15
    Hard,
    /// Levels 16-20
    Mastery,
}

impl Difficulty {
    /// Map a 1-based level number to its tier
    ///
    /// Total over `u8`: anything below 6 is Easy and anything from 16 up is
    /// Mastery.
    pub fn for_level(level: u8) -> Self {
        match level {
            16.. => Self::Mastery,
            11..=15 => Self::Hard,
            6..=10 => Self::Medium,
            _ => Self::Easy,
        }
    }

    /// Display name, matching the serialized form
    pub fn name(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Mastery => "Mastery",
        }
    }

    /// All tiers in ascending order
    pub fn all() -> &'static [Difficulty] {
        &[Self::Easy, Self::Medium, Self::Hard, Self::Mastery]
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// Check that a 1-based level number exists in a subcategory
pub fn is_valid_level(level: u8) -> bool {
    (1..=LEVELS_PER_SUBCATEGORY).contains(&level)
}

/// 0-based index of a 1-based level number, if the level exists
pub fn level_index(level: u8) -> Option<u8> {
    is_valid_level(level).then(|| level - 1)
}
