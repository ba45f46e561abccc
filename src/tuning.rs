//! Data-driven game balance
//!
//! Defaults mirror `consts`; any field may be overridden from JSON.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable parameters for a `Game`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena_width: f32,
    pub arena_height: f32,
    pub item_footprint: f32,
    /// Item diameter at scale 1.0
    pub item_size: f32,
    pub daily_credits: u32,
    pub starting_lives: u8,
    pub countdown_period_ms: u64,
    pub motion_period_ms: u64,
    pub max_substeps: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            item_footprint: ITEM_FOOTPRINT,
            item_size: ITEM_BASE_SIZE,
            daily_credits: DAILY_CREDITS,
            starting_lives: STARTING_LIVES,
            countdown_period_ms: COUNTDOWN_PERIOD_MS,
            motion_period_ms: MOTION_PERIOD_MS,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Motion step length in seconds
    pub fn motion_dt(&self) -> f32 {
        self.motion_period_ms as f32 / 1000.0
    }

    /// Clamp values that would stall the timers
    fn sanitized(mut self) -> Self {
        self.countdown_period_ms = self.countdown_period_ms.max(1);
        self.motion_period_ms = self.motion_period_ms.max(1);
        self.max_substeps = self.max_substeps.max(1);
        self
    }
}
