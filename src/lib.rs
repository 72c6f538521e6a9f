//! satgame - tiered SAT practice with progress tracking
//!
//! Learners work through 20 levels per subcategory. Passing levels earns
//! plays for a mini-game, unlocks tier badges and keeps a daily streak going,
//! while the attempt history feeds a ranked list of focus areas.

pub mod app;
pub mod config;
pub mod curriculum;
pub mod economy;
pub mod error;
pub mod progress;
pub mod quiz;
pub mod state;

pub use app::App;
pub use config::Config;
pub use error::CoreError;
