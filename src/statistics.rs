//! Lifetime play statistics
//!
//! Snapshots are immutable; recording a result produces a new value.

use serde::{Deserialize, Serialize};

use crate::sim::GameResult;

/// Aggregated results across every scored stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Highest stage ever scored (starts at 1)
    pub highest_stage: u32,
    pub total_games: u32,
    pub correct_answers: u32,
    pub total_answers: u32,
    /// Best single-stage points
    pub best_score: u32,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            highest_stage: 1,
            total_games: 0,
            correct_answers: 0,
            total_answers: 0,
            best_score: 0,
        }
    }
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one result into a new snapshot
    pub fn record(&self, result: &GameResult) -> Self {
        Self {
            highest_stage: self.highest_stage.max(result.stage),
            total_games: self.total_games + 1,
            correct_answers: self.correct_answers + u32::from(result.is_correct),
            total_answers: self.total_answers + 1,
            best_score: self.best_score.max(result.points()),
        }
    }

    /// Percentage of correct answers, 0 when nothing has been answered
    pub fn accuracy_rate(&self) -> f32 {
        if self.total_answers == 0 {
            return 0.0;
        }
        self.correct_answers as f32 / self.total_answers as f32 * 100.0
    }

    /// Snapshot with `best_score` raised to `score` if higher
    pub fn with_high_score(&self, score: u32) -> Self {
        Self {
            best_score: self.best_score.max(score),
            ..*self
        }
    }

    /// True until the first stage is scored
    pub fn is_empty(&self) -> bool {
        self.total_answers == 0
    }
}
