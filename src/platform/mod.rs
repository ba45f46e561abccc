//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Wall-clock time (epoch milliseconds)
//! - Periodic timers driven by elapsed time

pub mod clock;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use timer::PeriodicTimer;
