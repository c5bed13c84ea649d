//! Build script for varal-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates varal.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use varal_core::config::{parse_config, VaralConfig};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).expect("create memory.x in OUT_DIR");
    f.write_all(memory_x).expect("write memory.x");

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate varal.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=varal.toml");

    let config_path = Path::new("varal.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: varal.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds varal.toml as its configuration.            ║\n\
            ║  Please create one in the varal-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read varal.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Full TOML parse into the same types the firmware uses
    let config: VaralConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid varal.toml                                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let errors = validate_values(&config);
    if !errors.is_empty() {
        report_errors("Invalid configuration values", &errors);
    }

    // Accepted at boot too: the motor holds position until a speed is set
    let speed = config.motor.speed_steps_per_s;
    if !speed.is_finite() || speed <= 0.0 {
        println!("cargo:warning=[motor] speed_steps_per_s is not positive, the motor will stay stalled");
    }

    // The firmware reads the file with its own small parser at boot;
    // make sure it accepts the file and sees the same values.
    match parse_config(&config_content) {
        Ok(parsed) if parsed == config => {}
        Ok(_) => report_errors(
            "Firmware parser disagrees with TOML",
            &["Avoid TOML features beyond key = value pairs".to_string()],
        ),
        Err(e) => report_errors(
            "Firmware parser rejected varal.toml",
            &[format!("{:?}", e)],
        ),
    }

    println!("cargo:warning=varal.toml validated successfully");
}

/// Range checks that serde cannot express
fn validate_values(config: &VaralConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if config.motor.steps_per_rev == 0 {
        errors.push("[motor] steps_per_rev must be greater than 0".to_string());
    }
    if config.motor.homing_revolutions == 0 {
        errors.push("[motor] homing_revolutions must be at least 1".to_string());
    }
    if config.varal.decision_interval_ms == 0 {
        errors.push("[varal] decision_interval_ms must be greater than 0".to_string());
    }
    for (key, angle) in [
        ("closed_angle_deg", config.varal.closed_angle_deg),
        ("open_angle_deg", config.varal.open_angle_deg),
    ] {
        if !angle.is_finite() {
            errors.push(format!("[varal] {} must be a finite number", key));
        }
    }
    if !config.rain.thresholds_valid() {
        errors.push(
            "[rain] thresholds must satisfy light < moderate < heavy <= adc_max".to_string(),
        );
    }

    errors
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn report_errors(title: &str, errors: &[String]) {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
