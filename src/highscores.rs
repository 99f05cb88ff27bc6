//! Best score tracking
//!
//! Volatile: lives for the process only. It round-trips through JSON so an
//! enclosing application can persist it wherever it likes.

use serde::{Deserialize, Serialize};

/// Best score seen across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    best: u32,
    /// The current session has beaten the previous best
    #[serde(skip)]
    beaten_this_session: bool,
}

impl HighScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a previously persisted best
    pub fn with_best(best: u32) -> Self {
        Self {
            best,
            beaten_this_session: false,
        }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Fold in a score; returns true if it set a new best
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.best {
            self.best = score;
            self.beaten_this_session = true;
            true
        } else {
            false
        }
    }

    /// Whether the running session has set a new best
    pub fn is_new_best(&self) -> bool {
        self.beaten_this_session
    }

    /// Clear the per-session flag (the best itself is kept)
    pub fn begin_session(&mut self) {
        self.beaten_this_session = false;
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
