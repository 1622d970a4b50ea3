//! Per-game session state
//!
//! One session per running game instance: running flag, tick counter, score
//! and terminal reason. Score is monotonically non-decreasing until reset.

use serde::{Deserialize, Serialize};

/// Why a session ended. Terminal conditions are ordinary state transitions,
/// not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalReason {
    /// Actor left the playable bounds.
    WallCollision,
    /// Snake head entered its own body.
    SelfCollision,
    /// Runner overlapped an obstacle.
    ObstacleCollision,
    /// Countdown reached zero.
    Timeout,
    /// Board fully solved / all pairs matched.
    Cleared,
}

/// One-shot notifications surfaced to the embedder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Score increased to the given total.
    Scored { score: u32 },
    /// Final score beat the persisted best.
    HighScore { score: u32 },
    /// Session ended.
    GameOver { reason: TerminalReason, score: u32 },
}

/// Session state shared by every game controller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    running: bool,
    /// Ticks applied since start.
    pub ticks: u64,
    score: u32,
    terminal: Option<TerminalReason>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin the session. Returns false (and changes nothing) if already
    /// running - starting a second timer must be a no-op.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.ticks = 0;
        self.score = 0;
        self.terminal = None;
        true
    }

    /// Clear back to the idle state. Idempotent while stopped: score and
    /// tick displays still reset.
    pub fn reset(&mut self) {
        self.running = false;
        self.ticks = 0;
        self.score = 0;
        self.terminal = None;
    }

    /// Transition to the stopped state with a terminal reason.
    pub fn finish(&mut self, reason: TerminalReason) {
        self.running = false;
        self.terminal = Some(reason);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn terminal(&self) -> Option<TerminalReason> {
        self.terminal
    }

    /// Add points. Score never decreases within a session.
    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_guarded() {
        let mut s = Session::new();
        assert!(s.start());
        s.add_score(3);
        // Second start is a no-op - score untouched.
        assert!(!s.start());
        assert_eq!(s.score(), 3);
    }

    #[test]
    fn test_reset_clears_while_stopped() {
        let mut s = Session::new();
        s.start();
        s.add_score(5);
        s.finish(TerminalReason::Timeout);
        assert!(!s.is_running());
        assert_eq!(s.score(), 5);

        s.reset();
        assert_eq!(s.score(), 0);
        assert_eq!(s.terminal(), None);
    }

    #[test]
    fn test_score_monotonic() {
        let mut s = Session::new();
        s.start();
        let mut last = 0;
        for points in [0, 2, 0, 7, 1] {
            s.add_score(points);
            assert!(s.score() >= last);
            last = s.score();
        }
    }
}
