//! Motion control
//!
//! Half-step sequencing, non-blocking position control and homing against a
//! reference switch.

pub mod homing;
pub mod position;
pub mod sequencer;

pub use homing::{HomingOutcome, HomingProgress};
pub use position::{angle_to_steps, PositionController};
pub use sequencer::{StepSequencer, HALFSTEP_SEQUENCE};
