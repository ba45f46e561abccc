//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by item index)
//! - No rendering, timers, or storage

pub mod collision;
pub mod difficulty;
pub mod generate;
pub mod item;
pub mod result;
pub mod state;
pub mod tick;

pub use collision::{Contact, disc_contact, resolve_collisions, resolve_pair};
pub use difficulty::{CountMode, Difficulty};
pub use generate::{Layout, generate, generate_items, pick_target};
pub use item::{Item, ItemKind, count_kind};
pub use result::{GameMode, GameResult};
pub use state::{Countdown, Phase, Round, Session, TapOutcome};
pub use tick::{Arena, tick};
