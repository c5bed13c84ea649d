//! Board-agnostic core logic for the Varal clothesline firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (coil outputs, end-stop switch)
//! - Half-step sequencing and non-blocking position control
//! - Homing against a reference switch with a safety bound
//! - The open/close decision engine (automatic and forced modes)
//! - Interval gates for cooperative, time-sliced scheduling
//! - Configuration type definitions and parser
//!
//! Nothing in here blocks or logs. Every `tick()` takes the current monotonic
//! time in microseconds and returns an outcome the caller may log.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod control;
pub mod motion;
pub mod scheduler;
pub mod state;
pub mod system;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use system::{TickReport, VaralStatus, VaralSystem};
