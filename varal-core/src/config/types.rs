//! Configuration type definitions
//!
//! Defaults match the reference build: a 28BYJ-48 geared stepper on a
//! ULN2003 board, driven in half-step mode.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::scheduler::millis_to_micros;
use crate::traits::Direction;

/// Half-steps per output revolution of a 28BYJ-48
pub const DEFAULT_STEPS_PER_REV: u32 = 4096;

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct VaralConfig {
    /// Stepper and homing parameters
    pub motor: MotorConfig,
    /// Open/close decision parameters
    pub varal: DecisionConfig,
    /// Rain sensor parameters
    pub rain: RainConfig,
}

/// Stepper motor configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct MotorConfig {
    /// Half-steps per full output revolution (position modulus)
    pub steps_per_rev: u32,
    /// Step rate in half-steps per second (<= 0 stalls the motor)
    pub speed_steps_per_s: f32,
    /// Rotation used while searching for the end-stop
    pub homing_direction: Direction,
    /// Revolutions to search before homing gives up
    pub homing_revolutions: u8,
    /// A reference switch is fitted
    pub has_endstop: bool,
    /// The switch pulls its input low when actuated
    pub endstop_active_low: bool,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            steps_per_rev: DEFAULT_STEPS_PER_REV,
            speed_steps_per_s: 400.0,
            homing_direction: Direction::CounterClockwise,
            homing_revolutions: 3,
            has_endstop: true,
            endstop_active_low: true,
        }
    }
}

impl MotorConfig {
    /// Half-steps the homing search may take before aborting
    pub fn homing_step_limit(&self) -> u32 {
        self.steps_per_rev
            .saturating_mul(self.homing_revolutions as u32)
    }
}

/// Decision engine configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct DecisionConfig {
    /// Motor angle of the closed (rest) position
    pub closed_angle_deg: f32,
    /// Motor angle of the open position
    pub open_angle_deg: f32,
    /// Minimum time between two decisions
    pub decision_interval_ms: u32,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            closed_angle_deg: 0.0,
            open_angle_deg: 270.0,
            decision_interval_ms: 2_000,
        }
    }
}

impl DecisionConfig {
    /// Decision interval in microseconds
    pub fn decision_interval_us(&self) -> u64 {
        millis_to_micros(self.decision_interval_ms)
    }
}

/// Rain sensor configuration
///
/// Thresholds apply to the inverted analog reading (`adc_max - raw`), so a
/// wetter plate gives a larger value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct RainConfig {
    /// Minimum time between two sensor reads
    pub read_interval_ms: u32,
    /// Full-scale ADC reading (4095 for 12-bit)
    pub adc_max: u16,
    /// Inverted reading at which rain counts as light
    pub light_threshold: u16,
    /// Inverted reading at which rain counts as moderate
    pub moderate_threshold: u16,
    /// Inverted reading at which rain counts as heavy
    pub heavy_threshold: u16,
    /// The comparator output goes low when wet
    pub digital_active_low: bool,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            read_interval_ms: 1_000,
            adc_max: 4_095,
            light_threshold: 300,
            moderate_threshold: 1_200,
            heavy_threshold: 2_400,
            digital_active_low: true,
        }
    }
}

impl RainConfig {
    /// Read interval in microseconds
    pub fn read_interval_us(&self) -> u64 {
        millis_to_micros(self.read_interval_ms)
    }

    /// Check that the threshold ladder is strictly increasing and in range
    pub fn thresholds_valid(&self) -> bool {
        self.light_threshold < self.moderate_threshold
            && self.moderate_threshold < self.heavy_threshold
            && self.heavy_threshold <= self.adc_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motor_defaults() {
        let motor = MotorConfig::default();
        assert_eq!(motor.steps_per_rev, 4096);
        assert_eq!(motor.homing_step_limit(), 12_288);
        assert_eq!(motor.homing_direction, Direction::CounterClockwise);
        assert!(motor.has_endstop);
    }

    #[test]
    fn test_homing_limit_saturates() {
        let motor = MotorConfig {
            steps_per_rev: u32::MAX,
            homing_revolutions: 3,
            ..Default::default()
        };
        assert_eq!(motor.homing_step_limit(), u32::MAX);
    }

    #[test]
    fn test_decision_defaults() {
        let varal = DecisionConfig::default();
        assert_eq!(varal.closed_angle_deg, 0.0);
        assert_eq!(varal.open_angle_deg, 270.0);
        assert_eq!(varal.decision_interval_us(), 2_000_000);
    }

    #[test]
    fn test_rain_thresholds() {
        let rain = RainConfig::default();
        assert!(rain.thresholds_valid());
        assert_eq!(rain.read_interval_us(), 1_000_000);

        let broken = RainConfig {
            moderate_threshold: 200,
            ..Default::default()
        };
        assert!(!broken.thresholds_valid());
    }
}
