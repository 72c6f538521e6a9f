//! Read-only question bank
//!
//! The bank is supplied as JSON shaped
//! `{"categories": {cat: {"subcategories": {sc: {"questions": {"items": [..]}}}}}}`
//! and is never mutated after loading.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::Difficulty;

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Prompt text
    #[serde(rename = "q")]
    pub prompt: String,

    /// Option texts, in display order
    pub options: Vec<String>,

    /// Index into `options` of the correct answer
    #[serde(rename = "answerIndex")]
    pub answer_index: usize,

    /// Worked explanation shown on review
    #[serde(default)]
    pub explanation: String,

    /// Tier this question belongs to
    pub difficulty: Difficulty,
}

impl Question {
    /// Check a chosen option against the answer key
    pub fn is_correct(&self, chosen: usize) -> bool {
        chosen == self.answer_index
    }
}

/// Items wrapper, kept to match the bank's JSON layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionList {
    #[serde(default)]
    pub items: Vec<Question>,
}

/// A named topic area with 20 levels
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subcategory {
    #[serde(default)]
    pub questions: QuestionList,
}

/// A top-level grouping of subcategories
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub subcategories: BTreeMap<String, Subcategory>,
}

/// The whole question database
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionBank {
    #[serde(default)]
    pub categories: BTreeMap<String, Category>,
}

impl QuestionBank {
    /// Load a bank from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read question bank from {:?}", path))?;
        let bank = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse question bank {:?}", path))?;
        tracing::info!(
            categories = bank.categories.len(),
            questions = bank.question_count(),
            "Loaded question bank"
        );
        Ok(bank)
    }

    /// Parse a bank from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Find a subcategory by name along with its owning category
    pub fn find_subcat(&self, subcat: &str) -> Option<(&str, &Subcategory)> {
        self.categories
            .iter()
            .find_map(|(name, cat)| cat.subcategories.get(subcat).map(|sc| (name.as_str(), sc)))
    }

    /// Name of the category that owns `subcat`
    pub fn category_of(&self, subcat: &str) -> Option<&str> {
        self.find_subcat(subcat).map(|(cat, _)| cat)
    }

    /// All questions of a subcategory; empty if it is unknown
    pub fn questions(&self, subcat: &str) -> &[Question] {
        self.find_subcat(subcat).map(|(_, sc)| sc.questions.items.as_slice()).unwrap_or(&[])
    }

    /// Subcategory names of a category; empty if the category is unknown
    pub fn subcategory_names<'a>(&'a self, category: &str) -> Vec<&'a str> {
        self.categories
            .get(category)
            .map(|cat| cat.subcategories.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Total number of questions across the bank
    pub fn question_count(&self) -> usize {
        self.categories
            .values()
            .flat_map(|cat| cat.subcategories.values())
            .map(|sc| sc.questions.items.len())
            .sum()
    }
}
