//! In-memory repository
//!
//! Session snapshots are kept as JSON, the same envelope a LocalStorage or
//! file-backed store would hold, so a corrupt or incompatible snapshot
//! surfaces as a `RepositoryError` on load.

use std::sync::mpsc::Receiver;

use super::Repository;
use crate::credits::{CreditLedger, Credits};
use crate::error::RepositoryError;
use crate::observe::Observable;
use crate::platform::{Clock, SystemClock};
use crate::settings::Settings;
use crate::sim::{GameResult, Session};
use crate::statistics::Statistics;

/// Volatile repository; nothing survives the process
pub struct MemoryRepository<C: Clock = SystemClock> {
    clock: C,
    session_json: Option<String>,
    statistics: Observable<Statistics>,
    settings: Observable<Settings>,
    ledger: CreditLedger,
    credits: Observable<Credits>,
}

impl MemoryRepository<SystemClock> {
    pub fn new(daily_credits: u32) -> Self {
        Self::with_clock(SystemClock, daily_credits)
    }
}

impl<C: Clock> MemoryRepository<C> {
    /// A repository with a full credit balance as of `clock`'s current time
    pub fn with_clock(clock: C, daily_credits: u32) -> Self {
        let ledger = CreditLedger::new(daily_credits, clock.now_millis());
        let credits = Observable::new(ledger.peek());
        Self {
            clock,
            session_json: None,
            statistics: Observable::default(),
            settings: Observable::default(),
            ledger,
            credits,
        }
    }

    /// Store a raw snapshot (used to import saves)
    pub fn put_session_json(&mut self, json: impl Into<String>) {
        self.session_json = Some(json.into());
    }

    /// Publish the ledger's snapshot if it changed
    fn sync_credits(&mut self) {
        let current = self.ledger.peek();
        if *self.credits.get() != current {
            self.credits.publish(current);
        }
    }
}

impl<C: Clock> Repository for MemoryRepository<C> {
    fn save_session(&mut self, session: &Session) -> Result<(), RepositoryError> {
        self.session_json = Some(serde_json::to_string(session)?);
        log::debug!("Session saved (stage {}, {:?})", session.stage, session.phase);
        Ok(())
    }

    fn load_session(&self) -> Result<Option<Session>, RepositoryError> {
        match &self.session_json {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn clear_session(&mut self) -> Result<(), RepositoryError> {
        self.session_json = None;
        log::debug!("Saved session cleared");
        Ok(())
    }

    fn statistics(&self) -> Result<Statistics, RepositoryError> {
        Ok(*self.statistics.get())
    }

    fn record_result(&mut self, result: &GameResult) -> Result<Statistics, RepositoryError> {
        let next = self.statistics.get().record(result);
        self.statistics.publish(next);
        Ok(next)
    }

    fn clear_statistics(&mut self) -> Result<(), RepositoryError> {
        self.statistics.publish(Statistics::default());
        Ok(())
    }

    fn subscribe_statistics(&mut self) -> Receiver<Statistics> {
        self.statistics.subscribe()
    }

    fn update_high_score(&mut self, score: u32) -> Result<(), RepositoryError> {
        let current = *self.statistics.get();
        if score > current.best_score {
            self.statistics.publish(current.with_high_score(score));
        }
        Ok(())
    }

    fn settings(&self) -> Result<Settings, RepositoryError> {
        Ok(self.settings.get().clone())
    }

    fn update_settings(&mut self, settings: Settings) -> Result<(), RepositoryError> {
        self.settings.publish(settings);
        Ok(())
    }

    fn subscribe_settings(&mut self) -> Receiver<Settings> {
        self.settings.subscribe()
    }

    fn credits(&mut self) -> Result<Credits, RepositoryError> {
        let credits = self.ledger.get(self.clock.now_millis());
        self.sync_credits();
        Ok(credits)
    }

    fn update_credits(&mut self, credits: Credits) -> Result<(), RepositoryError> {
        self.ledger.set(credits);
        self.sync_credits();
        Ok(())
    }

    fn consume_credit(&mut self) -> Result<bool, RepositoryError> {
        let spent = self.ledger.consume(self.clock.now_millis());
        self.sync_credits();
        Ok(spent)
    }

    fn grant_daily_credits(&mut self) -> Result<Credits, RepositoryError> {
        let credits = self.ledger.grant_daily(self.clock.now_millis());
        self.sync_credits();
        Ok(credits)
    }

    fn subscribe_credits(&mut self) -> Receiver<Credits> {
        self.credits.subscribe()
    }
}
