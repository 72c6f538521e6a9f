//! Pause between answer feedback and the next question

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Default pause after an answer
pub const DEFAULT_FEEDBACK_DELAY: Duration = Duration::from_millis(450);

/// Cancellable feedback pause
///
/// Clones share the pause in flight, so a front end can hold one clone and
/// call [`FeedbackPacer::skip`] while another awaits [`FeedbackPacer::pause`].
#[derive(Debug, Clone)]
pub struct FeedbackPacer {
    delay: Duration,
    current: Arc<Mutex<CancellationToken>>,
}

impl Default for FeedbackPacer {
    fn default() -> Self {
        Self::new(DEFAULT_FEEDBACK_DELAY)
    }
}

impl FeedbackPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, current: Arc::new(Mutex::new(CancellationToken::new())) }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the delay; returns false if it was skipped
    pub async fn pause(&self) -> bool {
        let token = CancellationToken::new();
        if let Ok(mut current) = self.current.lock() {
            *current = token.clone();
        }

        tokio::select! {
            _ = token.cancelled() => false,
            _ = tokio::time::sleep(self.delay) => true,
        }
    }

    /// Cut the pause in flight short
    pub fn skip(&self) {
        if let Ok(current) = self.current.lock() {
            current.cancel();
        }
    }
}
