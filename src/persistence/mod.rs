//! Repository collaborator
//!
//! The session driver talks to storage only through `Repository`:
//! - Single session snapshot (save / load / clear)
//! - Statistics, settings and credits, each observable
//!
//! Durability is the implementation's concern. `MemoryRepository` keeps
//! everything in process memory.

pub mod memory;

use std::sync::mpsc::Receiver;

pub use memory::MemoryRepository;

use crate::credits::Credits;
use crate::error::RepositoryError;
use crate::settings::Settings;
use crate::sim::{GameResult, Session};
use crate::statistics::Statistics;

pub trait Repository {
    // Session snapshot
    fn save_session(&mut self, session: &Session) -> Result<(), RepositoryError>;
    fn load_session(&self) -> Result<Option<Session>, RepositoryError>;
    fn clear_session(&mut self) -> Result<(), RepositoryError>;

    // Statistics
    fn statistics(&self) -> Result<Statistics, RepositoryError>;
    fn record_result(&mut self, result: &GameResult) -> Result<Statistics, RepositoryError>;
    fn clear_statistics(&mut self) -> Result<(), RepositoryError>;
    fn subscribe_statistics(&mut self) -> Receiver<Statistics>;

    /// Best single-stage points recorded so far
    fn high_score(&self) -> Result<u32, RepositoryError> {
        Ok(self.statistics()?.best_score)
    }
    fn update_high_score(&mut self, score: u32) -> Result<(), RepositoryError>;

    // Settings
    fn settings(&self) -> Result<Settings, RepositoryError>;
    fn update_settings(&mut self, settings: Settings) -> Result<(), RepositoryError>;
    fn subscribe_settings(&mut self) -> Receiver<Settings>;

    // Credits; reads and spends refill first when a reset is due
    fn credits(&mut self) -> Result<Credits, RepositoryError>;
    fn update_credits(&mut self, credits: Credits) -> Result<(), RepositoryError>;
    fn consume_credit(&mut self) -> Result<bool, RepositoryError>;
    fn grant_daily_credits(&mut self) -> Result<Credits, RepositoryError>;
    fn subscribe_credits(&mut self) -> Receiver<Credits>;
}
