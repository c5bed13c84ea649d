//! Hardware abstraction traits
//!
//! These traits define the interface between the motion logic and the
//! board-specific pin drivers.

pub mod stepper;

pub use stepper::{CoilDriver, CoilPattern, Direction, Endstop, NoEndstop};
