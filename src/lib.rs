//! Count Rush - a floating-item counting game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (items, motion, collisions, session phases)
//! - `game`: Command boundary that drives a session and its timers
//! - `platform`: Clock and periodic timer abstractions
//! - `persistence`: Repository collaborator (sessions, stats, settings, credits)
//! - `tuning`: Data-driven game balance

pub mod credits;
pub mod error;
pub mod game;
pub mod observe;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod statistics;
pub mod tuning;

pub use credits::{CreditLedger, Credits};
pub use error::{Command, GameError, RepositoryError};
pub use game::Game;
pub use persistence::{MemoryRepository, Repository};
pub use settings::Settings;
pub use statistics::Statistics;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Arena dimensions (logical pixels)
    pub const ARENA_WIDTH: f32 = 400.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Space reserved at the far edge of each axis when clamping positions
    pub const ITEM_FOOTPRINT: f32 = 50.0;
    /// Base item diameter before scale; collision radius is half of this
    pub const ITEM_BASE_SIZE: f32 = 48.0;

    /// Velocity units per unit of difficulty speed (pixels/s)
    pub const SPEED_SCALE: f32 = 100.0;

    /// Credits granted at each UTC day boundary
    pub const DAILY_CREDITS: u32 = 10;
    /// Credits spent per game start or retry
    pub const GAME_COST: u32 = 1;
    pub const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

    pub const STARTING_LIVES: u8 = 3;

    /// Countdown driver period (one second of stage time per step)
    pub const COUNTDOWN_PERIOD_MS: u64 = 1000;
    /// Motion driver period (~60 Hz)
    pub const MOTION_PERIOD_MS: u64 = 16;
    /// Maximum motion steps per `advance` call to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Points for any correct answer
    pub const BASE_POINTS: u32 = 100;
    /// Answers faster than this many seconds earn a bonus
    pub const BONUS_WINDOW_SECS: u32 = 10;
    pub const BONUS_PER_SECOND: u32 = 10;
}
