//! Time-gated no-op helper
//!
//! An [`IntervalGate`] answers "is it time yet?" without ever blocking. The
//! timestamp only advances when the gate is taken, so a component that is
//! not due pays nothing.

/// Convert a millisecond interval to microseconds
pub const fn millis_to_micros(ms: u32) -> u64 {
    ms as u64 * 1_000
}

/// Minimum-interval gate over a monotonic microsecond clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntervalGate {
    /// Minimum spacing between actions, `None` = never due
    interval_us: Option<u64>,
    /// Timestamp of the last action taken through this gate
    last_us: u64,
}

impl IntervalGate {
    /// Create a gate that first opens `interval_us` after time zero
    pub const fn new(interval_us: u64) -> Self {
        Self {
            interval_us: Some(interval_us),
            last_us: 0,
        }
    }

    /// Create a gate that never opens
    pub const fn never() -> Self {
        Self {
            interval_us: None,
            last_us: 0,
        }
    }

    /// Current interval, `None` if the gate is closed for good
    pub fn interval_us(&self) -> Option<u64> {
        self.interval_us
    }

    /// Replace the interval without touching the last-action timestamp
    pub fn set_interval(&mut self, interval_us: Option<u64>) {
        self.interval_us = interval_us;
    }

    /// Check whether the gate would open at `now_us`
    pub fn is_due(&self, now_us: u64) -> bool {
        match self.interval_us {
            Some(interval) => now_us.saturating_sub(self.last_us) >= interval,
            None => false,
        }
    }

    /// Open the gate if due, recording `now_us` as the last action
    ///
    /// Returns `true` when the caller should perform its unit of work.
    pub fn try_take(&mut self, now_us: u64) -> bool {
        if self.is_due(now_us) {
            self.last_us = now_us;
            true
        } else {
            false
        }
    }
}
