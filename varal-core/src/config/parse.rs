//! Simple TOML parser for device configuration
//!
//! A minimal, allocation-free parser that handles only the subset needed for
//! `varal.toml`. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - `[section]` headers (`motor`, `varal`, `rain`)
//! - Key = value pairs (string, integer, float, boolean)
//! - Comments (`# ...`), including trailing comments
//!
//! Keys that are absent keep their default value.

use super::types::{DecisionConfig, MotorConfig, RainConfig, VaralConfig};
use crate::traits::Direction;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection { line: usize },
    /// Key not valid in its section
    UnknownKey { line: usize },
    /// Line is not a `key = value` pair, or the value has the wrong type
    InvalidValue { line: usize },
    /// Values parse but describe an unusable device
    Inconsistent,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Motor,
    Varal,
    Rain,
}

/// Parse TOML configuration into [`VaralConfig`]
pub fn parse_config(input: &str) -> Result<VaralConfig, ParseError> {
    let mut config = VaralConfig::default();
    let mut section = Section::Root;

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(raw).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        // Check for section header
        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])
                .ok_or(ParseError::InvalidSection { line: line_no })?;
            continue;
        }

        let (key, value) =
            parse_key_value(line).ok_or(ParseError::InvalidValue { line: line_no })?;

        match section {
            Section::Root => return Err(ParseError::UnknownKey { line: line_no }),
            Section::Motor => apply_motor(&mut config.motor, key, value, line_no)?,
            Section::Varal => apply_varal(&mut config.varal, key, value, line_no)?,
            Section::Rain => apply_rain(&mut config.rain, key, value, line_no)?,
        }
    }

    validate(&config)?;
    Ok(config)
}

/// Reject configurations the motion core cannot work with
fn validate(config: &VaralConfig) -> Result<(), ParseError> {
    if config.motor.steps_per_rev == 0 || config.motor.homing_revolutions == 0 {
        return Err(ParseError::Inconsistent);
    }
    if config.varal.decision_interval_ms == 0 {
        return Err(ParseError::Inconsistent);
    }
    if !config.rain.thresholds_valid() {
        return Err(ParseError::Inconsistent);
    }
    Ok(())
}

/// Parse section header like "motor" or "rain"
fn parse_section_header(header: &str) -> Option<Section> {
    match header.trim() {
        "motor" => Some(Section::Motor),
        "varal" => Some(Section::Varal),
        "rain" => Some(Section::Rain),
        _ => None,
    }
}

/// Drop a trailing `# comment` that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Split `key = value`
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_u32(value: &str, line: usize) -> Result<u32, ParseError> {
    let digits = value.replace_underscores();
    digits
        .as_str()
        .parse()
        .map_err(|_| ParseError::InvalidValue { line })
}

fn parse_u16(value: &str, line: usize) -> Result<u16, ParseError> {
    let v = parse_u32(value, line)?;
    u16::try_from(v).map_err(|_| ParseError::InvalidValue { line })
}

fn parse_u8(value: &str, line: usize) -> Result<u8, ParseError> {
    let v = parse_u32(value, line)?;
    u8::try_from(v).map_err(|_| ParseError::InvalidValue { line })
}

fn parse_f32(value: &str, line: usize) -> Result<f32, ParseError> {
    let digits = value.replace_underscores();
    let v: f32 = digits
        .as_str()
        .parse()
        .map_err(|_| ParseError::InvalidValue { line })?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ParseError::InvalidValue { line })
    }
}

fn parse_bool(value: &str, line: usize) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue { line }),
    }
}

fn parse_string(value: &str, line: usize) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue { line })
}

fn apply_motor(
    motor: &mut MotorConfig,
    key: &str,
    value: &str,
    line: usize,
) -> Result<(), ParseError> {
    match key {
        "steps_per_rev" => motor.steps_per_rev = parse_u32(value, line)?,
        "speed_steps_per_s" => motor.speed_steps_per_s = parse_f32(value, line)?,
        "homing_direction" => {
            motor.homing_direction = Direction::from_config_str(parse_string(value, line)?)
                .ok_or(ParseError::InvalidValue { line })?;
        }
        "homing_revolutions" => motor.homing_revolutions = parse_u8(value, line)?,
        "has_endstop" => motor.has_endstop = parse_bool(value, line)?,
        "endstop_active_low" => motor.endstop_active_low = parse_bool(value, line)?,
        _ => return Err(ParseError::UnknownKey { line }),
    }
    Ok(())
}

fn apply_varal(
    varal: &mut DecisionConfig,
    key: &str,
    value: &str,
    line: usize,
) -> Result<(), ParseError> {
    match key {
        "closed_angle_deg" => varal.closed_angle_deg = parse_f32(value, line)?,
        "open_angle_deg" => varal.open_angle_deg = parse_f32(value, line)?,
        "decision_interval_ms" => varal.decision_interval_ms = parse_u32(value, line)?,
        _ => return Err(ParseError::UnknownKey { line }),
    }
    Ok(())
}

fn apply_rain(
    rain: &mut RainConfig,
    key: &str,
    value: &str,
    line: usize,
) -> Result<(), ParseError> {
    match key {
        "read_interval_ms" => rain.read_interval_ms = parse_u32(value, line)?,
        "adc_max" => rain.adc_max = parse_u16(value, line)?,
        "light_threshold" => rain.light_threshold = parse_u16(value, line)?,
        "moderate_threshold" => rain.moderate_threshold = parse_u16(value, line)?,
        "heavy_threshold" => rain.heavy_threshold = parse_u16(value, line)?,
        "digital_active_low" => rain.digital_active_low = parse_bool(value, line)?,
        _ => return Err(ParseError::UnknownKey { line }),
    }
    Ok(())
}

/// Numeric literal with TOML digit separators removed
///
/// Fixed-capacity so parsing stays allocation-free; literals longer than the
/// buffer are rejected by the numeric parse that follows.
struct Digits {
    buf: [u8; 24],
    len: usize,
}

impl Digits {
    fn as_str(&self) -> &str {
        // Only ASCII bytes copied from a &str are stored
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }
}

trait ReplaceUnderscores {
    fn replace_underscores(&self) -> Digits;
}

impl ReplaceUnderscores for str {
    fn replace_underscores(&self) -> Digits {
        let mut digits = Digits {
            buf: [0; 24],
            len: 0,
        };
        for &b in self.as_bytes() {
            if b == b'_' {
                continue;
            }
            if !b.is_ascii() || digits.len == digits.buf.len() {
                digits.len = 0;
                return digits;
            }
            digits.buf[digits.len] = b;
            digits.len += 1;
        }
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Reference build
[motor]
steps_per_rev = 4_096
speed_steps_per_s = 500.0   # a bit faster
homing_direction = "cw"
homing_revolutions = 2
has_endstop = true
endstop_active_low = false

[varal]
closed_angle_deg = 10.0
open_angle_deg = 200
decision_interval_ms = 1500

[rain]
read_interval_ms = 750
adc_max = 4095
light_threshold = 250
moderate_threshold = 1000
heavy_threshold = 2000
digital_active_low = true
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(SAMPLE).unwrap();

        assert_eq!(config.motor.steps_per_rev, 4096);
        assert_eq!(config.motor.speed_steps_per_s, 500.0);
        assert_eq!(config.motor.homing_direction, Direction::Clockwise);
        assert_eq!(config.motor.homing_revolutions, 2);
        assert!(!config.motor.endstop_active_low);

        assert_eq!(config.varal.closed_angle_deg, 10.0);
        assert_eq!(config.varal.open_angle_deg, 200.0);
        assert_eq!(config.varal.decision_interval_ms, 1500);

        assert_eq!(config.rain.read_interval_ms, 750);
        assert_eq!(config.rain.light_threshold, 250);
        assert_eq!(config.rain.heavy_threshold, 2000);
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), VaralConfig::default());
        assert_eq!(
            parse_config("# nothing here\n\n").unwrap(),
            VaralConfig::default()
        );
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = parse_config("[varal]\nopen_angle_deg = 180.0\n").unwrap();
        assert_eq!(config.varal.open_angle_deg, 180.0);
        assert_eq!(config.varal.closed_angle_deg, 0.0);
        assert_eq!(config.motor, MotorConfig::default());
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(
            parse_config("[heater]\n"),
            Err(ParseError::InvalidSection { line: 1 })
        );
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            parse_config("[motor]\nmicrosteps = 16\n"),
            Err(ParseError::UnknownKey { line: 2 })
        );
        // Keys outside any section are not allowed
        assert_eq!(
            parse_config("speed = 1\n"),
            Err(ParseError::UnknownKey { line: 1 })
        );
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse_config("[motor]\nhas_endstop = yes\n"),
            Err(ParseError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[motor]\nhoming_direction = \"up\"\n"),
            Err(ParseError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[motor]\nhoming_revolutions = 300\n"),
            Err(ParseError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[motor]\nsteps_per_rev\n"),
            Err(ParseError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[varal]\nopen_angle_deg = inf\n"),
            Err(ParseError::InvalidValue { line: 2 })
        );
    }

    #[test]
    fn test_inconsistent_config() {
        assert_eq!(
            parse_config("[motor]\nsteps_per_rev = 0\n"),
            Err(ParseError::Inconsistent)
        );
        assert_eq!(
            parse_config("[rain]\nlight_threshold = 3000\n"),
            Err(ParseError::Inconsistent)
        );
    }

    #[test]
    fn test_negative_speed_is_accepted() {
        // A stalled motor is a valid configuration
        let config = parse_config("[motor]\nspeed_steps_per_s = -1.0\n").unwrap();
        assert_eq!(config.motor.speed_steps_per_s, -1.0);
        let config = parse_config("[motor]\nspeed_steps_per_s = 0.0\n").unwrap();
        assert_eq!(config.motor.speed_steps_per_s, 0.0);
    }

    #[test]
    fn test_hash_inside_string_is_not_a_comment() {
        assert_eq!(strip_comment("a = \"x#y\" # c"), "a = \"x#y\" ");
    }
}
