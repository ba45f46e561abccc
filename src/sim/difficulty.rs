//! Stage difficulty table

use serde::{Deserialize, Serialize};

/// What the player is asked to count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountMode {
    /// Count every item regardless of kind
    All,
    /// Count only items of one target kind
    Specific,
}

/// Difficulty parameters for one stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub stage: u32,
    pub item_count: u32,
    /// Velocity multiplier
    pub speed: f32,
    /// Seconds
    pub time_limit: u32,
    pub rotation: bool,
    pub opacity_variation: bool,
    pub scale_variation: bool,
    /// Draw kinds from the lookalike subset only
    pub near_duplicates: bool,
    pub count_mode: CountMode,
}

/// Rotation range in degrees when rotation is enabled
pub const ROTATION_RANGE: (f32, f32) = (0.0, 360.0);
/// Scale range when scale variation is enabled
pub const SCALE_RANGE: (f32, f32) = (1.0, 1.4);
/// Opacity range when opacity variation is enabled
pub const OPACITY_RANGE: (f32, f32) = (0.7, 1.0);

impl Difficulty {
    /// Difficulty for a stage (1-based). Stage 0 is treated as stage 1's tier.
    pub fn for_stage(stage: u32) -> Self {
        match stage {
            ..=3 => Self {
                stage,
                item_count: 5 + stage,
                speed: 1.0,
                time_limit: 8,
                rotation: false,
                opacity_variation: false,
                scale_variation: false,
                near_duplicates: false,
                count_mode: CountMode::All,
            },
            4..=6 => Self {
                stage,
                item_count: 8 + stage,
                speed: 1.2,
                time_limit: 7,
                rotation: true,
                opacity_variation: false,
                scale_variation: false,
                near_duplicates: false,
                count_mode: CountMode::All,
            },
            7..=10 => Self {
                stage,
                item_count: 12 + stage,
                speed: 1.5,
                time_limit: 6,
                rotation: true,
                opacity_variation: true,
                scale_variation: false,
                near_duplicates: false,
                count_mode: CountMode::All,
            },
            11..=15 => Self {
                stage,
                item_count: 18 + stage,
                speed: 1.8,
                time_limit: 5,
                rotation: true,
                opacity_variation: true,
                scale_variation: true,
                near_duplicates: false,
                count_mode: CountMode::Specific,
            },
            _ => {
                let over = stage - 15;
                Self {
                    stage,
                    item_count: 25 + 2 * over,
                    speed: 2.0 + 0.1 * over as f32,
                    time_limit: 4,
                    rotation: true,
                    opacity_variation: true,
                    scale_variation: true,
                    near_duplicates: true,
                    count_mode: CountMode::Specific,
                }
            }
        }
    }

    pub fn counts_all(&self) -> bool {
        self.count_mode == CountMode::All
    }

    /// (min, max) scale for items at this difficulty
    pub fn scale_range(&self) -> (f32, f32) {
        if self.scale_variation { SCALE_RANGE } else { (1.0, 1.0) }
    }

    /// (min, max) opacity for items at this difficulty
    pub fn opacity_range(&self) -> (f32, f32) {
        if self.opacity_variation { OPACITY_RANGE } else { (1.0, 1.0) }
    }
}
