//! Events reported by the motion controller
//!
//! One event per `tick()`. The firmware logs the interesting ones; the
//! library itself stays silent.

/// Outcome of one motion tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionEvent {
    /// Motor idle, nothing to do
    Idle,
    /// Busy, but the step interval has not elapsed (or speed is zero)
    Waiting,
    /// Took one half-step toward the target
    Stepped {
        /// Position after the step
        position: u32,
    },
    /// Target reached, motor is now idle
    Arrived {
        /// Final position
        position: u32,
    },
    /// Took one half-step of the homing search
    HomingStep {
        /// Half-steps taken in this homing attempt
        steps_taken: u32,
    },
    /// Reference switch found, position re-zeroed
    Homed {
        /// Half-steps it took to find the switch
        steps_taken: u32,
    },
    /// Safety bound reached without seeing the switch
    HomingAborted {
        /// Half-steps taken before giving up
        steps_taken: u32,
    },
}

impl MotionEvent {
    /// Check if a half-step was taken this tick
    pub fn stepped(&self) -> bool {
        !matches!(self, MotionEvent::Idle | MotionEvent::Waiting)
    }
}
