//! Inter-task communication channels
//!
//! The command receiver writes the requested operating mode; the control
//! task takes it at the start of its next cycle. Last write wins.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use varal_core::control::OperatingMode;

/// Mode requested over the command channel
pub static MODE_CMD: Signal<CriticalSectionRawMutex, OperatingMode> = Signal::new();
