//! Device configuration
//!
//! `varal.toml` is compiled into the firmware and parsed at boot. build.rs
//! has already checked it, so a parse failure here means the parser and the
//! file disagree; the built-in defaults are used in that case.

use defmt::*;

use varal_core::config::{parse_config, VaralConfig};

/// Embedded configuration (compiled into firmware)
/// Edit varal.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../varal.toml");

/// Load the embedded configuration, falling back to defaults
pub fn load() -> VaralConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Loaded embedded configuration");
            config
        }
        Err(e) => {
            warn!("Embedded configuration rejected ({:?}), using defaults", e);
            VaralConfig::default()
        }
    }
}
