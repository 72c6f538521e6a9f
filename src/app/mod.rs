//! Application facade
//!
//! [`App`] is what a front end talks to: read accessors for the dashboard,
//! level select and focus areas, and the commands that start a level, answer
//! questions, finish a run and hand plays to the mini-game.

pub mod clock;

use anyhow::Result;

use crate::config::Config;
use crate::curriculum::{Difficulty, QuestionBank, is_valid_level, sample_questions};
use crate::economy::{self, GameOutcome, MiniGame, MiniGameGate, MiniGameSession, Settlement};
use crate::error::CoreError;
use crate::progress::{self, CategoryTotal, LevelRow, SubcatSummary, Weakness};
use crate::quiz::{
    AnswerFeedback, CommitOutcome, FeedbackPacer, LevelContext, Phase, QuizSession, SessionResult,
    commit_attempt,
};
use crate::state::{Attempt, FileBackend, GameMode, PersistedState, StateStore, Theme};
pub use clock::{Clock, ManualClock, SystemClock};

/// Attempts shown under "Recent Results"
pub const RECENT_RESULTS: usize = 5;

/// Everything the dashboard shows
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard<'a> {
    pub plays: u32,
    pub streak_days: u32,
    pub categories: Vec<CategoryTotal>,
    pub weaknesses: Vec<Weakness>,
    pub recent: Vec<&'a Attempt>,
}

/// The progress engine
pub struct App {
    store: StateStore,
    bank: QuestionBank,
    session: Option<QuizSession>,
    pacer: FeedbackPacer,
    games: MiniGameGate,
    clock: Box<dyn Clock>,
}

impl App {
    /// Create an engine over an opened store
    pub fn new(store: StateStore, bank: QuestionBank) -> Self {
        Self {
            store,
            bank,
            session: None,
            pacer: FeedbackPacer::default(),
            games: MiniGameGate::new(),
            clock: Box::new(SystemClock),
        }
    }

    /// Open the on-disk store named by `config`
    pub fn open(config: &Config, bank: QuestionBank) -> Result<Self> {
        let (store, _) = StateStore::open(FileBackend::new(config.data_dir()?))?;
        Ok(Self::new(store, bank).with_pacer(FeedbackPacer::new(config.feedback_delay())))
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_pacer(mut self, pacer: FeedbackPacer) -> Self {
        self.pacer = pacer;
        self
    }

    // ---- read side ----

    pub fn state(&self) -> &PersistedState {
        self.store.state()
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn plays(&self) -> u32 {
        self.state().plays
    }

    pub fn streak_days(&self) -> u32 {
        self.state().streak.days
    }

    pub fn theme(&self) -> Theme {
        self.state().theme
    }

    pub fn high_score(&self, mode: GameMode) -> u32 {
        self.state().high_score(mode)
    }

    pub fn dashboard(&self) -> Dashboard<'_> {
        Dashboard {
            plays: self.plays(),
            streak_days: self.streak_days(),
            categories: self.category_totals(),
            weaknesses: self.weaknesses(),
            recent: self.recent_attempts(RECENT_RESULTS),
        }
    }

    pub fn category_totals(&self) -> Vec<CategoryTotal> {
        progress::totals::category_totals(self.state(), &self.bank)
    }

    pub fn subcategories(&self, category: &str) -> Vec<SubcatSummary> {
        progress::totals::subcategory_summaries(self.state(), &self.bank, category)
    }

    pub fn levels(&self, subcat: &str) -> Vec<LevelRow> {
        progress::totals::level_rows(self.state(), &self.bank, subcat)
    }

    pub fn badges(&self, subcat: &str) -> Vec<Difficulty> {
        progress::unlocked_badges(self.state(), subcat)
    }

    pub fn weaknesses(&self) -> Vec<Weakness> {
        progress::find_weaknesses(&self.state().history, &self.bank)
    }

    pub fn recent_attempts(&self, n: usize) -> Vec<&Attempt> {
        progress::totals::recent_attempts(self.state(), n)
    }

    /// The run in progress, if any
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    /// Handle for skipping the feedback pause from elsewhere
    pub fn pacer(&self) -> FeedbackPacer {
        self.pacer.clone()
    }

    pub fn is_mini_game_active(&self) -> bool {
        self.games.is_active()
    }

    // ---- quiz commands ----

    /// Draw questions for a 0-based level and start a run
    ///
    /// Any unfinished run is discarded without being recorded.
    pub fn start_level(
        &mut self,
        subcat: &str,
        level_index: u8,
    ) -> Result<&QuizSession, CoreError> {
        let level = level_index.saturating_add(1);
        if !is_valid_level(level) {
            return Err(CoreError::UnknownLevel(level));
        }

        let category = self.bank.category_of(subcat).map(str::to_string);
        let context = LevelContext::new(category, subcat, level_index);
        let questions = sample_questions(&self.bank, subcat, level_index);
        let session = QuizSession::start(context, questions)?;

        tracing::info!(subcat, level, questions = session.questions().len(), "Starting level");
        Ok(&*self.session.insert(session))
    }

    /// Answer the presented question, wait out the feedback pause, then move on
    ///
    /// Returns `None` when the answer was ignored. If this future is dropped
    /// during the pause, the locked question is moved past on the next
    /// `submit_answer` or `finish_session`.
    pub async fn submit_answer(
        &mut self,
        index: usize,
        chosen: usize,
    ) -> Result<Option<AnswerFeedback>, CoreError> {
        self.advance_locked();
        let session = self.session.as_mut().ok_or(CoreError::NoActiveSession)?;
        let Some(feedback) = session.submit_answer(index, chosen) else {
            return Ok(None);
        };

        self.pacer.pause().await;
        if let Some(session) = self.session.as_mut() {
            session.advance();
        }
        Ok(Some(feedback))
    }

    /// Move past a question whose feedback pause never completed
    fn advance_locked(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if matches!(session.phase(), Phase::Locked(_)) {
                session.advance();
            }
        }
    }

    /// Leave the run without recording it
    pub fn abandon_session(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!(subcat = %session.context().subcat, "Quiz abandoned");
        }
    }

    /// Score the finished run and commit it
    ///
    /// The run stays in place if it is unfinished or the write fails, so the
    /// call can be retried.
    pub fn finish_session(&mut self) -> Result<(SessionResult, CommitOutcome), CoreError> {
        self.advance_locked();
        let session = self.session.as_ref().ok_or(CoreError::NoActiveSession)?;
        if session.phase() != Phase::Finished {
            return Err(CoreError::SessionNotFinished);
        }
        let result = session.result().ok_or(CoreError::SessionNotFinished)?;
        let context = session.context().clone();
        let now = self.clock.now();

        let outcome =
            self.store.commit(|state| commit_attempt(state, &result, &context, &now))?;
        self.session = None;

        tracing::info!(
            subcat = %context.subcat,
            level = context.level(),
            score = result.score,
            passed = result.passed,
            plays = outcome.plays,
            "Attempt committed"
        );
        Ok((result, outcome))
    }

    // ---- mini-game ----

    /// Hand the balance to the mini-game
    pub fn launch_mini_game(
        &self,
        mode: GameMode,
        game: &mut dyn MiniGame,
    ) -> Result<MiniGameSession, CoreError> {
        self.games.launch(self.state(), mode, game)
    }

    /// Wait for the mini-game to finish and reconcile its report
    pub async fn settle_mini_game(
        &mut self,
        session: MiniGameSession,
    ) -> Result<GameOutcome, CoreError> {
        let outcome = session.outcome().await;
        self.reconcile(outcome)?;
        Ok(outcome)
    }

    /// Force-stop the mini-game
    ///
    /// A report that already arrived is still reconciled; otherwise the
    /// balance stays what it was at launch.
    pub fn abandon_mini_game(
        &mut self,
        session: MiniGameSession,
        game: &mut dyn MiniGame,
    ) -> Result<GameOutcome, CoreError> {
        game.terminate();
        let outcome = session.take_reported();
        self.reconcile(outcome)?;
        Ok(outcome)
    }

    fn reconcile(&mut self, outcome: GameOutcome) -> Result<(), CoreError> {
        match outcome {
            GameOutcome::Completed(result) => {
                let settlement: Settlement =
                    self.store.commit(|state| economy::settle(state, &result))?;
                tracing::info!(
                    mode = result.game_mode.name(),
                    plays_before = settlement.plays_before,
                    plays_after = settlement.plays_after,
                    new_high_score = settlement.new_high_score,
                    "Mini-game settled"
                );
            }
            GameOutcome::Abandoned => {
                tracing::info!(plays = self.plays(), "Mini-game abandoned, balance unchanged");
            }
        }
        Ok(())
    }

    // ---- preferences ----

    pub fn set_theme(&mut self, theme: Theme) -> Result<Theme, CoreError> {
        self.store.commit(|state| state.theme = theme)?;
        Ok(theme)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, CoreError> {
        self.set_theme(self.theme().toggled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::bank::tests::{bank_with, question};
    use crate::economy::GameResult;
    use crate::economy::minigame::tests::ScriptedGame;
    use crate::state::{MemoryBackend, STATE_KEY};
    use chrono::{Local, TimeZone};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn bank() -> QuestionBank {
        let easy = (0..8).map(|i| question(&format!("easy {i}"), Difficulty::Easy)).collect();
        let hard = (0..3).map(|i| question(&format!("hard {i}"), Difficulty::Hard)).collect();
        bank_with("Quantitative", &[("Algebra", easy), ("Geometry", hard)])
    }

    fn app_with(backend: MemoryBackend) -> (App, ManualClock) {
        let clock = ManualClock::new(Local.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap());
        let (store, _) = StateStore::open(backend).unwrap();
        let app = App::new(store, bank())
            .with_pacer(FeedbackPacer::new(Duration::ZERO))
            .with_clock(clock.clone());
        (app, clock)
    }

    /// Play the current run, answering right for the first `right` questions
    async fn play_run(app: &mut App, right: usize) {
        let total = app.session().unwrap().questions().len();
        for i in 0..total {
            let chosen = if i < right { 0 } else { 1 };
            app.submit_answer(i, chosen).await.unwrap().unwrap();
        }
    }

    #[tokio::test]
    async fn passing_a_level_end_to_end() {
        let backend = MemoryBackend::new();
        let (mut app, _) = app_with(backend.clone());

        app.start_level("Algebra", 0).unwrap();
        play_run(&mut app, 5).await;
        let (result, outcome) = app.finish_session().unwrap();

        assert_eq!(result.score, 5);
        assert_eq!(outcome.plays, 8);
        assert_eq!(app.plays(), 8);
        assert_eq!(app.streak_days(), 1);
        let progress = app.state().subcat_progress("Algebra").unwrap();
        assert!(progress.completed_levels.contains(&1));
        assert_eq!(progress.best_score(1), Some(5));
        assert_eq!(app.state().history.len(), 1);
        assert!(app.state().history[0].passed);
        assert!(app.session().is_none());

        let stored: PersistedState =
            serde_json::from_str(&backend.get(STATE_KEY).unwrap()).unwrap();
        assert_eq!(&stored, app.state());
    }

    #[tokio::test]
    async fn short_pool_runs_whole_pool() {
        let (mut app, _) = app_with(MemoryBackend::new());
        app.start_level("Geometry", 12).unwrap();
        assert_eq!(app.session().unwrap().questions().len(), 3);

        play_run(&mut app, 3).await;
        let (result, outcome) = app.finish_session().unwrap();
        assert_eq!(result.score, 3);
        assert_eq!(outcome.plays_earned, 1);
    }

    #[test]
    fn level_without_content_does_not_start() {
        let (mut app, _) = app_with(MemoryBackend::new());
        let err = app.start_level("Geometry", 0).unwrap_err();
        assert!(err.returns_to_levels());
        assert!(app.session().is_none());

        assert!(matches!(app.start_level("Algebra", 20), Err(CoreError::UnknownLevel(21))));
    }

    #[tokio::test]
    async fn finishing_early_is_refused() {
        let (mut app, _) = app_with(MemoryBackend::new());
        assert!(matches!(app.finish_session(), Err(CoreError::NoActiveSession)));

        app.start_level("Algebra", 0).unwrap();
        app.submit_answer(0, 0).await.unwrap();
        assert!(matches!(app.finish_session(), Err(CoreError::SessionNotFinished)));
        assert!(app.state().history.is_empty());
    }

    #[tokio::test]
    async fn duplicate_answer_is_ignored() {
        let (mut app, _) = app_with(MemoryBackend::new());
        app.start_level("Algebra", 0).unwrap();
        assert!(app.submit_answer(0, 1).await.unwrap().is_some());
        assert!(app.submit_answer(0, 0).await.unwrap().is_none());
        assert_eq!(app.session().unwrap().correct_count(), 0);
    }

    #[tokio::test]
    async fn streak_counts_calendar_days_across_runs() {
        let (mut app, clock) = app_with(MemoryBackend::new());

        for (day, expected) in [(3, 1), (3, 1), (4, 2), (7, 1)] {
            clock.set(Local.with_ymd_and_hms(2024, 6, day, 18, 0, 0).unwrap());
            app.start_level("Algebra", 1).unwrap();
            play_run(&mut app, 1).await;
            let (_, outcome) = app.finish_session().unwrap();
            assert_eq!(outcome.streak_days, expected, "day {day}");
        }
    }

    #[tokio::test]
    async fn weak_subcategory_shows_on_dashboard() {
        let (mut app, _) = app_with(MemoryBackend::new());
        app.start_level("Algebra", 3).unwrap();
        play_run(&mut app, 1).await;
        app.finish_session().unwrap();

        let dashboard = app.dashboard();
        assert_eq!(dashboard.weaknesses.len(), 1);
        assert_eq!(dashboard.weaknesses[0].category.as_deref(), Some("Quantitative"));
        assert_eq!(dashboard.recent.len(), 1);
        assert_eq!(dashboard.categories[0].done, 0);
        assert_eq!(dashboard.categories[0].max, 40);
    }

    #[tokio::test]
    async fn dropped_feedback_pause_does_not_strand_the_run() {
        let (store, _) = StateStore::open(MemoryBackend::new()).unwrap();
        let mut app =
            App::new(store, bank()).with_pacer(FeedbackPacer::new(Duration::from_secs(60)));
        app.start_level("Algebra", 0).unwrap();

        for i in 0..5 {
            let answer =
                tokio::time::timeout(Duration::from_millis(20), app.submit_answer(i, 0)).await;
            assert!(answer.is_err(), "question {i} should still be pausing");
        }
        assert_eq!(app.session().unwrap().phase(), Phase::Locked(4));

        let (result, outcome) = app.finish_session().unwrap();
        assert_eq!(result.score, 5);
        assert_eq!(outcome.plays, 8);
        assert!(app.session().is_none());
    }

    #[tokio::test]
    async fn abandoning_mid_run_records_nothing() {
        let backend = MemoryBackend::new();
        let (mut app, _) = app_with(backend.clone());
        let before = backend.get(STATE_KEY);

        app.start_level("Algebra", 0).unwrap();
        app.submit_answer(0, 0).await.unwrap();
        app.submit_answer(1, 0).await.unwrap();
        app.abandon_session();

        assert!(app.session().is_none());
        assert!(app.state().history.is_empty());
        assert_eq!(app.plays(), 5);
        assert_eq!(app.streak_days(), 0);
        assert_eq!(backend.get(STATE_KEY), before);
        assert!(matches!(app.finish_session(), Err(CoreError::NoActiveSession)));
    }

    #[test]
    fn mini_game_refused_with_zero_plays() {
        let seeded = PersistedState { plays: 0, ..Default::default() };
        let backend =
            MemoryBackend::new().with_entry(STATE_KEY, &serde_json::to_string(&seeded).unwrap());
        let (app, _) = app_with(backend.clone());
        let before = backend.get(STATE_KEY);

        let mut game = ScriptedGame::holding();
        let err = app.launch_mini_game(GameMode::Normal, &mut game).unwrap_err();

        assert!(matches!(err, CoreError::NoPlaysLeft));
        assert!(game.launched_with.is_empty());
        assert_eq!(backend.get(STATE_KEY), before);
        assert!(app.state().history.is_empty());
        assert_eq!(app.high_score(GameMode::Normal), 0);
    }

    #[tokio::test]
    async fn completed_mini_game_settles_balance_and_high_score() {
        let (mut app, _) = app_with(MemoryBackend::new());
        let report = GameResult { plays_left: 2, final_score: 17, game_mode: GameMode::Reverse };
        let mut game = ScriptedGame::reporting(report);

        let session = app.launch_mini_game(GameMode::Reverse, &mut game).unwrap();
        assert!(app.is_mini_game_active());
        let outcome = app.settle_mini_game(session).await.unwrap();

        assert_eq!(outcome, GameOutcome::Completed(report));
        assert_eq!(app.plays(), 2);
        assert_eq!(app.high_score(GameMode::Reverse), 17);
        assert!(!app.is_mini_game_active());
    }

    #[test]
    fn abandoned_mini_game_leaves_balance() {
        let (mut app, _) = app_with(MemoryBackend::new());
        let mut game = ScriptedGame::holding();

        let session = app.launch_mini_game(GameMode::Normal, &mut game).unwrap();
        let outcome = app.abandon_mini_game(session, &mut game).unwrap();

        assert_eq!(outcome, GameOutcome::Abandoned);
        assert!(game.terminated);
        assert_eq!(app.plays(), 5);
        assert!(!app.is_mini_game_active());
    }

    #[test]
    fn theme_toggle_persists() {
        let backend = MemoryBackend::new();
        let (mut app, _) = app_with(backend.clone());
        assert_eq!(app.toggle_theme().unwrap(), Theme::Light);
        assert!(backend.get(STATE_KEY).unwrap().contains("\"theme\":\"light\""));
    }
}
