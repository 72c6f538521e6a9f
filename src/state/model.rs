//! The persisted progress document
//!
//! Field names are camelCase on the wire so documents written by earlier
//! builds keep loading.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::curriculum::Difficulty;

/// Balance granted to a brand new learner
pub const STARTING_PLAYS: u32 = 5;

/// Colour scheme preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            _ => Err(format!("Unknown theme: {}. Options: dark, light", s)),
        }
    }
}

/// Mini-game modes, each with its own high score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Normal,
    Faster,
    Reverse,
}

impl GameMode {
    /// All modes in menu order
    pub fn all() -> &'static [GameMode] {
        &[Self::Normal, Self::Faster, Self::Reverse]
    }

    /// Display name, matching the serialized form
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Faster => "Faster",
            Self::Reverse => "Reverse",
        }
    }
}

impl std::str::FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown game mode: {}. Options: Normal, Faster, Reverse", s))
    }
}

/// Daily activity counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    /// Consecutive calendar days with at least one attempt
    pub days: u32,

    /// Epoch milliseconds of the last recorded attempt
    pub last: Option<i64>,
}

/// Per-subcategory ledger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcatProgress {
    /// 1-based levels passed at least once
    #[serde(default)]
    pub completed_levels: BTreeSet<u8>,

    /// Best score ever reached per 1-based level
    #[serde(default)]
    pub best_scores: BTreeMap<u8, u8>,

    /// Levels of each tier passed for the first time
    #[serde(default)]
    pub diff_done: BTreeMap<Difficulty, u32>,
}

impl SubcatProgress {
    /// Passed-level count for a tier
    pub fn tier_passes(&self, difficulty: Difficulty) -> u32 {
        self.diff_done.get(&difficulty).copied().unwrap_or(0)
    }

    /// Best score for a 1-based level, if it was ever attempted
    pub fn best_score(&self, level: u8) -> Option<u8> {
        self.best_scores.get(&level).copied()
    }
}

/// One finished run through a level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub subcat: String,

    /// 0-based level index
    pub level_index: u8,

    pub difficulty: Difficulty,

    /// Correct answers, 0..=5
    pub score: u8,

    pub passed: bool,

    /// Epoch milliseconds when the attempt was committed
    pub time: i64,
}

impl Attempt {
    /// 1-based level number
    pub fn level(&self) -> u8 {
        self.level_index + 1
    }
}

/// The single persisted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub theme: Theme,

    pub streak: Streak,

    /// Play-currency balance
    pub plays: u32,

    /// Unlocked badges (subcategory -> tier -> unlocked)
    #[serde(default)]
    pub badges: HashMap<String, BTreeMap<Difficulty, bool>>,

    #[serde(default)]
    pub progress: HashMap<String, SubcatProgress>,

    /// Every committed attempt, oldest first
    #[serde(default)]
    pub history: Vec<Attempt>,

    /// Best mini-game score per mode
    #[serde(default = "default_high_scores")]
    pub high_scores: BTreeMap<GameMode, u32>,
}

pub(crate) fn default_high_scores() -> BTreeMap<GameMode, u32> {
    GameMode::all().iter().map(|&mode| (mode, 0)).collect()
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            streak: Streak::default(),
            plays: STARTING_PLAYS,
            badges: HashMap::new(),
            progress: HashMap::new(),
            history: Vec::new(),
            high_scores: default_high_scores(),
        }
    }
}

impl PersistedState {
    /// Ledger for a subcategory (if it has ever been attempted)
    pub fn subcat_progress(&self, subcat: &str) -> Option<&SubcatProgress> {
        self.progress.get(subcat)
    }

    /// Get or create the ledger for a subcategory
    pub fn progress_mut(&mut self, subcat: &str) -> &mut SubcatProgress {
        self.progress.entry(subcat.to_string()).or_default()
    }

    /// Number of distinct levels passed in a subcategory
    pub fn completed_count(&self, subcat: &str) -> usize {
        self.progress.get(subcat).map(|p| p.completed_levels.len()).unwrap_or(0)
    }

    /// Whether a badge is unlocked
    pub fn has_badge(&self, subcat: &str, difficulty: Difficulty) -> bool {
        self.badges.get(subcat).and_then(|b| b.get(&difficulty)).copied().unwrap_or(false)
    }

    /// Stored high score for a mode, 0 when never played
    pub fn high_score(&self, mode: GameMode) -> u32 {
        self.high_scores.get(&mode).copied().unwrap_or(0)
    }
}
