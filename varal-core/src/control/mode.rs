//! Operating mode and the remote command vocabulary

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the decision engine picks the desired door state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OperatingMode {
    /// Close when raining, open when dry
    #[default]
    Auto,
    /// Stay open regardless of rain
    ForceOpen,
    /// Stay closed regardless of rain
    ForceClose,
}

/// Rejected remote command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Not one of `OPEN`, `CLOSE`, `AUTO`
    Unknown,
}

impl OperatingMode {
    /// Parse a remote command word
    ///
    /// Surrounding whitespace is ignored and matching is case-insensitive:
    /// `OPEN` forces open, `CLOSE` forces closed, `AUTO` returns to
    /// automatic operation.
    pub fn from_command(command: &str) -> Result<Self, CommandError> {
        let command = command.trim();
        if command.eq_ignore_ascii_case("OPEN") {
            Ok(OperatingMode::ForceOpen)
        } else if command.eq_ignore_ascii_case("CLOSE") {
            Ok(OperatingMode::ForceClose)
        } else if command.eq_ignore_ascii_case("AUTO") {
            Ok(OperatingMode::Auto)
        } else {
            Err(CommandError::Unknown)
        }
    }

    /// Status string for telemetry
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingMode::Auto => "AUTO",
            OperatingMode::ForceOpen => "FORCE_OPEN",
            OperatingMode::ForceClose => "FORCE_CLOSE",
        }
    }
}
