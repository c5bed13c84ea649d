//! Sensor drivers

pub mod endstop;
pub mod rain;

pub use endstop::EndstopSwitch;
pub use rain::{AdcReader, RainLevel, RainPoll, RainReading, RainSensor, SensorError};
