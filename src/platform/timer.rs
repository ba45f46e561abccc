//! Cancellable periodic timer
//!
//! The host feeds elapsed wall time in; the timer reports how many whole
//! periods became due. A cancelled timer reports nothing and drops any
//! partial period, so a restarted timer begins a fresh period.

/// Periodic driver advanced by elapsed milliseconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodicTimer {
    period_ms: u64,
    accumulated_ms: u64,
    running: bool,
}

impl PeriodicTimer {
    /// A stopped timer; `period_ms` of 0 is treated as 1
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            accumulated_ms: 0,
            running: false,
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start (or restart) from the beginning of a period
    pub fn start(&mut self) {
        self.running = true;
        self.accumulated_ms = 0;
    }

    /// Stop the timer; cancelling a stopped timer does nothing
    pub fn cancel(&mut self) {
        self.running = false;
        self.accumulated_ms = 0;
    }

    /// Feed elapsed time; returns the number of periods that elapsed
    pub fn advance(&mut self, elapsed_ms: u64) -> u32 {
        if !self.running {
            return 0;
        }
        self.accumulated_ms += elapsed_ms;
        let due = self.accumulated_ms / self.period_ms;
        self.accumulated_ms %= self.period_ms;
        due.min(u32::MAX as u64) as u32
    }
}
