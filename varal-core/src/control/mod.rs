//! Open/close decision logic
//!
//! The operating mode selects between following the rain signal and a
//! forced position; the decision engine turns that into at most one door
//! command per decision tick.

pub mod engine;
pub mod mode;

pub use engine::{Action, Decision, DoorCommand, MotorSnapshot, VaralDecisionEngine};
pub use mode::{CommandError, OperatingMode};
