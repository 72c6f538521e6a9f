//! Error types for the progress engine

use thiserror::Error;

/// Errors surfaced by the command entry points of [`crate::App`]
#[derive(Debug, Error)]
pub enum CoreError {
    /// The question bank has nothing at this level's difficulty
    #[error("No questions available yet for {subcat} level {level}")]
    NoQuestions {
        /// Subcategory that was requested
        subcat: String,
        /// 1-based level number
        level: u8,
    },

    /// Mini-game launch attempted with an empty balance
    #[error("You have no plays left. Pass a level to earn more!")]
    NoPlaysLeft,

    /// A mini-game session is already running
    #[error("A mini-game is already running")]
    MiniGameActive,

    /// Answer or finish requested without a running quiz
    #[error("No quiz session in progress")]
    NoActiveSession,

    /// Finish requested before every question was answered
    #[error("Quiz session has unanswered questions")]
    SessionNotFinished,

    /// Level number outside 1..=20
    #[error("Level {0} is outside 1..=20")]
    UnknownLevel(u8),

    /// Reading or writing the persisted document failed
    #[error("Persistence error: {0:#}")]
    Persistence(#[from] anyhow::Error),
}

impl CoreError {
    /// Check if the user can carry on without any intervention
    ///
    /// Everything except a failed write is a notice for the view layer.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CoreError::Persistence(_))
    }

    /// Check if this should send the user back to level selection
    pub fn returns_to_levels(&self) -> bool {
        matches!(self, CoreError::NoQuestions { .. } | CoreError::UnknownLevel(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_are_recoverable() {
        assert!(CoreError::NoPlaysLeft.is_recoverable());
        assert!(CoreError::MiniGameActive.is_recoverable());
        assert!(!CoreError::Persistence(anyhow::anyhow!("disk full")).is_recoverable());
    }

    #[test]
    fn missing_content_returns_to_levels() {
        let err = CoreError::NoQuestions { subcat: "Algebra".into(), level: 7 };
        assert!(err.returns_to_levels());
        assert_eq!(err.to_string(), "No questions available yet for Algebra level 7");
        assert!(!CoreError::NoPlaysLeft.returns_to_levels());
    }
}
