//! Homing bookkeeping
//!
//! The controller steps toward the end-stop; this type counts the steps and
//! decides when the search is over. `homed` only becomes true when a step
//! reports the switch as triggered, and the search gives up once the step
//! limit is reached.

/// Result of recording one homing step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingOutcome {
    /// Switch not seen yet, keep searching
    Searching,
    /// Switch seen, position may be zeroed
    Found,
    /// Step limit reached without seeing the switch
    Exhausted,
}

/// Progress of the current (or last) homing attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingProgress {
    /// Half-steps taken in the current attempt
    pub steps_taken: u32,
    /// Absolute zero has been established
    pub homed: bool,
}

impl HomingProgress {
    /// Progress for a controller that starts with a known (or unknown) zero
    pub const fn new(homed: bool) -> Self {
        Self {
            steps_taken: 0,
            homed,
        }
    }

    /// Begin a fresh attempt, forgetting any previous zero
    pub fn restart(&mut self) {
        self.steps_taken = 0;
        self.homed = false;
    }

    /// Record one half-step of the search
    ///
    /// `triggered` is the switch state sampled after the step. A trigger on
    /// the final allowed step still counts as found.
    pub fn record_step(&mut self, triggered: bool, step_limit: u32) -> HomingOutcome {
        self.steps_taken = self.steps_taken.saturating_add(1);

        if triggered {
            self.homed = true;
            HomingOutcome::Found
        } else if self.steps_taken >= step_limit {
            self.homed = false;
            HomingOutcome::Exhausted
        } else {
            HomingOutcome::Searching
        }
    }
}
