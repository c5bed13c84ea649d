//! Motor and door state
//!
//! Small, explicit state enums shared by the motion controller and the
//! decision engine, plus the events the motion controller reports.

pub mod events;
pub mod machine;

pub use events::MotionEvent;
pub use machine::{DoorState, MotorState};
