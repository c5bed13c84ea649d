//! Configuration types
//!
//! Board-agnostic configuration structures, loaded from the `varal.toml`
//! embedded in the firmware.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
