//! Stage outcome and scoring

use serde::{Deserialize, Serialize};

use super::item::ItemKind;
use crate::consts::{BASE_POINTS, BONUS_PER_SECOND, BONUS_WINDOW_SECS};

/// Which game is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Watch, then type how many
    Counting,
    /// Tap every item of the target kind before time runs out
    Tapping,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Counting => "counting",
            GameMode::Tapping => "tapping",
        }
    }
}

/// Outcome of one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub stage: u32,
    pub mode: GameMode,
    /// `None` when every item was counted
    pub target: Option<ItemKind>,
    pub correct_answer: u32,
    /// Submitted count, or items tapped in tapping mode
    pub user_answer: u32,
    pub is_correct: bool,
    /// Seconds of stage time used
    pub time_spent: u32,
    pub total_items: u32,
    pub count_all: bool,
}

impl GameResult {
    /// Points earned: a flat base plus a bonus for answering quickly
    pub fn points(&self) -> u32 {
        if !self.is_correct {
            return 0;
        }
        BASE_POINTS + BONUS_WINDOW_SECS.saturating_sub(self.time_spent) * BONUS_PER_SECOND
    }
}
