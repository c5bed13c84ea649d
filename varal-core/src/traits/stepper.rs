//! Stepper output and reference switch traits
//!
//! The motion core drives a unipolar stepper through four coil outputs
//! (ULN2003-style darlington array) and optionally reads a single end-stop.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Energization state of the four coils, IN1..IN4
pub type CoilPattern = [bool; 4];

/// Motor rotation direction
///
/// Clockwise advances the half-step phase (+1 mod 8) and increments the
/// absolute position; counter-clockwise does the opposite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Clockwise rotation
    #[cfg_attr(feature = "serde", serde(rename = "cw", alias = "clockwise"))]
    Clockwise,
    /// Counter-clockwise rotation
    #[cfg_attr(feature = "serde", serde(rename = "ccw", alias = "counter_clockwise"))]
    CounterClockwise,
}

impl Direction {
    /// Parse the short config spelling (`cw` / `ccw`)
    pub fn from_config_str(value: &str) -> Option<Self> {
        match value {
            "cw" | "clockwise" => Some(Direction::Clockwise),
            "ccw" | "counter_clockwise" => Some(Direction::CounterClockwise),
            _ => None,
        }
    }
}

/// Four-wire coil output stage
///
/// Implementations write the pattern to the hardware immediately. Writing
/// is infallible: a pattern is always accepted.
pub trait CoilDriver {
    /// Drive IN1..IN4 to the given levels
    fn energize(&mut self, pattern: CoilPattern);
}

/// Reference (end-stop) switch used for homing
pub trait Endstop {
    /// Check whether the switch is currently actuated
    ///
    /// Active-level handling (pull-up, inverted wiring) is the
    /// implementation's concern.
    fn is_triggered(&mut self) -> bool;
}

/// Placeholder for mechanisms built without a reference switch
///
/// Never reports a trigger. Controllers built with
/// [`PositionController::without_endstop`](crate::motion::PositionController::without_endstop)
/// use this type and never enter homing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEndstop;

impl Endstop for NoEndstop {
    fn is_triggered(&mut self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_config_str() {
        assert_eq!(Direction::from_config_str("cw"), Some(Direction::Clockwise));
        assert_eq!(
            Direction::from_config_str("ccw"),
            Some(Direction::CounterClockwise)
        );
        assert_eq!(Direction::from_config_str("up"), None);
    }

    #[test]
    fn test_no_endstop_never_triggers() {
        let mut endstop = NoEndstop;
        for _ in 0..10 {
            assert!(!endstop.is_triggered());
        }
    }
}
