//! Half-step coil sequencing
//!
//! Eight phases, alternating one and two energized coils. Walking the table
//! forward turns the rotor clockwise by one half-step per entry.

use crate::traits::{CoilDriver, CoilPattern, Direction};

/// Number of phases in the half-step cycle
pub const PHASE_COUNT: u8 = 8;

/// Coil levels (IN1..IN4) for each half-step phase
pub const HALFSTEP_SEQUENCE: [CoilPattern; PHASE_COUNT as usize] = [
    [true, false, false, false],
    [true, true, false, false],
    [false, true, false, false],
    [false, true, true, false],
    [false, false, true, false],
    [false, false, true, true],
    [false, false, false, true],
    [true, false, false, true],
];

/// Tracks the current phase and writes its pattern to the coils
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepSequencer {
    phase: u8,
}

impl StepSequencer {
    /// Start at phase 0
    pub const fn new() -> Self {
        Self { phase: 0 }
    }

    /// Current phase index, always in `[0, 8)`
    pub fn phase(&self) -> u8 {
        self.phase
    }

    /// Pattern for an arbitrary phase index (reduced mod 8)
    pub fn pattern(phase: u8) -> CoilPattern {
        HALFSTEP_SEQUENCE[(phase % PHASE_COUNT) as usize]
    }

    /// Re-apply the current phase without moving
    pub fn apply<D: CoilDriver>(&self, driver: &mut D) {
        driver.energize(Self::pattern(self.phase));
    }

    /// Move one phase in `direction` and energize the coils for it
    pub fn advance<D: CoilDriver>(&mut self, direction: Direction, driver: &mut D) {
        self.phase = match direction {
            Direction::Clockwise => (self.phase + 1) % PHASE_COUNT,
            Direction::CounterClockwise => (self.phase + PHASE_COUNT - 1) % PHASE_COUNT,
        };
        self.apply(driver);
    }
}
