//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod command_rx;
pub mod control;

pub use command_rx::command_rx_task;
pub use control::control_task;
