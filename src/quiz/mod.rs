//! Quiz runs: the per-attempt state machine, feedback pacing and the commit
//! that records a finished run

pub mod commit;
pub mod pacing;
pub mod session;

pub use commit::{CommitOutcome, commit_attempt};
pub use pacing::{DEFAULT_FEEDBACK_DELAY, FeedbackPacer};
pub use session::{
    AnswerFeedback, COMPLIMENTS, LevelContext, PASS_MARK, Phase, QuizSession, ReviewItem,
    SessionResult, compliment_for, is_pass,
};
