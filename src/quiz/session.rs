//! Per-attempt quiz state machine
//!
//! ```text
//! Presenting(i) --submit_answer--> Locked(i) --advance--> Presenting(i+1)
//!                                            \-(last)--> Finished
//! ```

use crate::curriculum::{Difficulty, QUESTIONS_PER_LEVEL, Question};
use crate::error::CoreError;

/// Correct answers needed to pass a level
pub const PASS_MARK: u8 = 3;

/// Encouragement shown from the second consecutive correct answer onwards
pub const COMPLIMENTS: [&str; 4] =
    ["You're doing good!", "Bravo!", "Excellent!", "Perfect! You're a genius!"];

/// Whether a score passes its level
pub fn is_pass(score: u8) -> bool {
    score >= PASS_MARK
}

/// Compliment for a run of consecutive correct answers, if it earns one
pub fn compliment_for(streak: u32) -> Option<&'static str> {
    let tier = streak.checked_sub(2)? as usize;
    Some(COMPLIMENTS[tier.min(COMPLIMENTS.len() - 1)])
}

/// Which level a session is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelContext {
    /// Owning category, when known to the bank
    pub category: Option<String>,
    pub subcat: String,
    /// 0-based level index
    pub level_index: u8,
    pub difficulty: Difficulty,
}

impl LevelContext {
    pub fn new(category: Option<String>, subcat: impl Into<String>, level_index: u8) -> Self {
        Self {
            category,
            subcat: subcat.into(),
            level_index,
            difficulty: Difficulty::for_level(level_index.saturating_add(1)),
        }
    }

    /// 1-based level number
    pub fn level(&self) -> u8 {
        self.level_index.saturating_add(1)
    }
}

/// Where the session is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for an answer to question i
    Presenting(usize),
    /// Question i answered; further input is ignored until `advance`
    Locked(usize),
    Finished,
}

/// Immediate feedback for an accepted answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question: usize,
    pub correct: bool,
    /// Consecutive correct answers after this one
    pub streak: u32,
    pub compliment: Option<&'static str>,
}

/// Review data for one question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub prompt: String,
    pub options: Vec<String>,
    pub chosen: Option<usize>,
    pub correct: usize,
    pub explanation: String,
}

impl ReviewItem {
    pub fn answered_correctly(&self) -> bool {
        self.chosen == Some(self.correct)
    }
}

/// Outcome of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    pub score: u8,
    pub passed: bool,
    /// Number of questions in the run
    pub total: usize,
    pub review: Vec<ReviewItem>,
}

/// State of one run through a level
#[derive(Debug, Clone)]
pub struct QuizSession {
    context: LevelContext,
    questions: Vec<Question>,
    answers: Vec<Option<usize>>,
    phase: Phase,
    correct: u8,
    streak: u32,
}

impl QuizSession {
    /// Start a run; an empty question set cannot be played
    ///
    /// Only the first [`QUESTIONS_PER_LEVEL`] questions are kept, so a score
    /// never exceeds five.
    pub fn start(context: LevelContext, mut questions: Vec<Question>) -> Result<Self, CoreError> {
        questions.truncate(QUESTIONS_PER_LEVEL);
        if questions.is_empty() {
            let level = context.level();
            return Err(CoreError::NoQuestions { subcat: context.subcat, level });
        }

        Ok(Self {
            answers: vec![None; questions.len()],
            context,
            questions,
            phase: Phase::Presenting(0),
            correct: 0,
            streak: 0,
        })
    }

    pub fn context(&self) -> &LevelContext {
        &self.context
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question awaiting an answer, if any
    pub fn current_question(&self) -> Option<(usize, &Question)> {
        match self.phase {
            Phase::Presenting(i) => self.questions.get(i).map(|q| (i, q)),
            _ => None,
        }
    }

    /// Correct answers so far
    pub fn correct_count(&self) -> u8 {
        self.correct
    }

    /// Consecutive correct answers so far
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Answer question `index`
    ///
    /// Only the first answer to the question being presented counts; anything
    /// else returns `None` and changes nothing.
    pub fn submit_answer(&mut self, index: usize, chosen: usize) -> Option<AnswerFeedback> {
        if self.phase != Phase::Presenting(index) || self.answers[index].is_some() {
            tracing::debug!(index, phase = ?self.phase, "Ignoring answer");
            return None;
        }

        self.answers[index] = Some(chosen);
        let correct = self.questions[index].is_correct(chosen);
        if correct {
            self.correct += 1;
            self.streak += 1;
        } else {
            self.streak = 0;
        }
        self.phase = Phase::Locked(index);

        Some(AnswerFeedback {
            question: index,
            correct,
            streak: self.streak,
            compliment: if correct { compliment_for(self.streak) } else { None },
        })
    }

    /// Move past a locked question
    pub fn advance(&mut self) -> Phase {
        if let Phase::Locked(i) = self.phase {
            self.phase =
                if i + 1 < self.questions.len() { Phase::Presenting(i + 1) } else { Phase::Finished };
        }
        self.phase
    }

    /// Score and review data, once finished
    pub fn result(&self) -> Option<SessionResult> {
        if self.phase != Phase::Finished {
            return None;
        }

        let review = self
            .questions
            .iter()
            .zip(&self.answers)
            .map(|(q, chosen)| ReviewItem {
                prompt: q.prompt.clone(),
                options: q.options.clone(),
                chosen: *chosen,
                correct: q.answer_index,
                explanation: q.explanation.clone(),
            })
            .collect();

        Some(SessionResult {
            score: self.correct,
            passed: is_pass(self.correct),
            total: self.questions.len(),
            review,
        })
    }
}
