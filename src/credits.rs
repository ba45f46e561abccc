//! Daily credit ledger
//!
//! A token bucket refilled once per UTC day. Every read or spend first
//! checks whether the stored reset time has passed and refills if so.

use serde::{Deserialize, Serialize};

use crate::consts::{DAILY_CREDITS, GAME_COST, MILLIS_PER_DAY};

/// Credit balance snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    pub current: u32,
    /// Next refill time (UTC epoch milliseconds, always a day boundary)
    pub next_reset_millis: u64,
}

/// Start of the UTC day after the one containing `now_millis`
#[inline]
pub fn next_midnight_millis(now_millis: u64) -> u64 {
    (now_millis / MILLIS_PER_DAY + 1) * MILLIS_PER_DAY
}

/// Owns the credit balance and its refill schedule
#[derive(Debug, Clone)]
pub struct CreditLedger {
    credits: Credits,
    daily_grant: u32,
}

impl CreditLedger {
    /// A full ledger whose first refill is the next UTC midnight
    pub fn new(daily_grant: u32, now_millis: u64) -> Self {
        Self {
            credits: Credits {
                current: daily_grant,
                next_reset_millis: next_midnight_millis(now_millis),
            },
            daily_grant,
        }
    }

    pub fn with_default_grant(now_millis: u64) -> Self {
        Self::new(DAILY_CREDITS, now_millis)
    }

    pub fn daily_grant(&self) -> u32 {
        self.daily_grant
    }

    /// Current balance, refilling first if the reset time has passed
    pub fn get(&mut self, now_millis: u64) -> Credits {
        self.refresh(now_millis);
        self.credits
    }

    /// Spend one game's worth of credits; false when the balance is short
    pub fn consume(&mut self, now_millis: u64) -> bool {
        self.refresh(now_millis);

        if self.credits.current < GAME_COST {
            return false;
        }
        self.credits = Credits {
            current: self.credits.current - GAME_COST,
            ..self.credits
        };
        true
    }

    /// Refill to the daily amount and schedule the next refill
    pub fn grant_daily(&mut self, now_millis: u64) -> Credits {
        self.credits = Credits {
            current: self.daily_grant,
            next_reset_millis: next_midnight_millis(now_millis),
        };
        log::info!(
            "Granted {} daily credits, next reset at {}",
            self.daily_grant,
            self.credits.next_reset_millis
        );
        self.credits
    }

    /// Replace the stored snapshot
    pub fn set(&mut self, credits: Credits) {
        self.credits = credits;
    }

    /// Snapshot without the refill check
    pub fn peek(&self) -> Credits {
        self.credits
    }

    /// Refill if due; returns true when a refill happened
    pub fn refresh(&mut self, now_millis: u64) -> bool {
        if now_millis >= self.credits.next_reset_millis {
            self.grant_daily(now_millis);
            return true;
        }
        false
    }
}
