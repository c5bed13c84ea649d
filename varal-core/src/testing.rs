//! Mock hardware shared by the unit tests

use crate::config::MotorConfig;
use crate::traits::{CoilDriver, CoilPattern, Endstop};

/// Coil outputs that remember what was written
#[derive(Debug, Default)]
pub struct MockCoils {
    pub last: Option<CoilPattern>,
    pub writes: usize,
}

impl CoilDriver for MockCoils {
    fn energize(&mut self, pattern: CoilPattern) {
        self.last = Some(pattern);
        self.writes += 1;
    }
}

/// End-stop that triggers on the Nth poll (1-based), or never
#[derive(Debug, Default)]
pub struct MockEndstop {
    pub trigger_on_poll: Option<u32>,
    pub polls: u32,
}

impl MockEndstop {
    pub fn never() -> Self {
        Self::default()
    }

    pub fn after(polls: u32) -> Self {
        Self {
            trigger_on_poll: Some(polls),
            polls: 0,
        }
    }
}

impl Endstop for MockEndstop {
    fn is_triggered(&mut self) -> bool {
        self.polls += 1;
        matches!(self.trigger_on_poll, Some(n) if self.polls >= n)
    }
}

/// Reference motor: 4096 half-steps, one step per microsecond
pub fn fast_motor() -> MotorConfig {
    MotorConfig {
        speed_steps_per_s: 1_000_000.0,
        ..MotorConfig::default()
    }
}
