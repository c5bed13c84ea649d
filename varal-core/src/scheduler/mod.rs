//! Cooperative scheduling primitives
//!
//! The firmware runs one control loop; each component decides for itself
//! whether it is due by comparing the loop's monotonic time against its own
//! last-action timestamp.

pub mod gate;

pub use gate::{millis_to_micros, IntervalGate};
