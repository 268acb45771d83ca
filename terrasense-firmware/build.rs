//! Build script for terrasense-firmware
//!
//! - Passes the esp-hal and defmt linker scripts to the linker
//! - Validates node.toml at compile time
//! - Exports its values to the firmware as `TERRASENSE_*` environment variables

use std::env;
use std::fs;
use std::path::Path;

fn main() {
    setup_linker();
    let config = load_config();
    validate_config(&config);
    export_config(&config);
}

fn setup_linker() {
    println!("cargo:rustc-link-arg=-Tlinkall.x");
    println!("cargo:rustc-link-arg=-Tdefmt.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and parse node.toml
fn load_config() -> toml::Value {
    println!("cargo:rerun-if-changed=node.toml");

    let config_path = Path::new("node.toml");
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: node.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a node.toml configuration file.           ║\n\
            ║  Please create one in the terrasense-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read node.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in node.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    }
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

fn report(section: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: Invalid {:<49}║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        format!("{} configuration", section),
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn string_of<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a str> {
    config.get(section)?.get(key)?.as_str()
}

fn integer_of(config: &toml::Value, section: &str, key: &str) -> Option<i64> {
    config.get(section)?.get(key)?.as_integer()
}

/// Check every value the firmware reads
fn validate_config(config: &toml::Value) {
    let mut errors = Vec::new();
    for section in ["wifi", "node", "moisture", "temperature", "blink"] {
        if !matches!(config.get(section), Some(toml::Value::Table(_))) {
            errors.push(format!("Missing [{}] section", section));
        }
    }
    report("node.toml", &errors);

    let mut errors = Vec::new();
    for key in ["ssid", "password"] {
        if string_of(config, "wifi", key).is_none() {
            errors.push(format!("[wifi] '{}' must be a string", key));
        }
    }
    report("wifi", &errors);

    let mut errors = Vec::new();
    for key in ["instance_id", "domain_suffix", "job"] {
        match string_of(config, "node", key) {
            Some(value) if value.is_empty() => {
                errors.push(format!("[node] '{}' cannot be empty", key));
            }
            Some(value) if value.contains(|c: char| c == '"' || c == '\\' || c.is_whitespace()) => {
                errors.push(format!("[node] '{}' cannot contain quotes or spaces", key));
            }
            Some(_) => {}
            None => errors.push(format!("[node] missing '{}'", key)),
        }
    }
    report("node", &errors);

    let mut errors = Vec::new();
    let mut raw = |key: &str| match integer_of(config, "moisture", key) {
        Some(v) if (0..=1023).contains(&v) => Some(v),
        Some(_) => {
            errors.push(format!("[moisture] '{}' must be 0-1023", key));
            None
        }
        None => {
            errors.push(format!("[moisture] missing '{}'", key));
            None
        }
    };
    let air = raw("air");
    let water = raw("water");
    raw("blink_threshold");
    if let (Some(air), Some(water)) = (air, water) {
        if air <= water {
            errors.push("[moisture] 'air' must be above 'water'".to_string());
        }
    }
    match integer_of(config, "moisture", "interval_ms") {
        Some(v) if v > 0 && v <= i64::from(u32::MAX) => {}
        _ => errors.push("[moisture] 'interval_ms' must be a positive u32".to_string()),
    }
    report("moisture", &errors);

    let mut errors = Vec::new();
    match integer_of(config, "temperature", "resolution") {
        Some(9..=12) => {}
        _ => errors.push("[temperature] 'resolution' must be 9-12".to_string()),
    }
    report("temperature", &errors);

    let mut errors = Vec::new();
    match integer_of(config, "blink", "period_ms") {
        Some(v) if v > 0 && v <= i64::from(u32::MAX) => {}
        _ => errors.push("[blink] 'period_ms' must be a positive u32".to_string()),
    }
    report("blink", &errors);

    println!("cargo:warning=node.toml validated successfully");
}

/// Pass the validated values to the firmware crate
fn export_config(config: &toml::Value) {
    for (var, key) in [
        ("TERRASENSE_WIFI_SSID", "ssid"),
        ("TERRASENSE_WIFI_PASSWORD", "password"),
    ] {
        println!("cargo:rerun-if-env-changed={}", var);
        let value = env::var(var)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| string_of(config, "wifi", key).map(str::to_string))
            .unwrap_or_default();
        if key == "ssid" && value.is_empty() {
            println!("cargo:warning=no Wi-Fi SSID configured, the node will not join a network");
        }
        println!("cargo:rustc-env={}={}", var, value);
    }

    for (var, key) in [
        ("TERRASENSE_INSTANCE_ID", "instance_id"),
        ("TERRASENSE_DOMAIN_SUFFIX", "domain_suffix"),
        ("TERRASENSE_JOB", "job"),
    ] {
        let value = string_of(config, "node", key).unwrap_or_default();
        println!("cargo:rustc-env={}={}", var, value);
    }

    for (var, section, key) in [
        ("TERRASENSE_MOISTURE_AIR", "moisture", "air"),
        ("TERRASENSE_MOISTURE_WATER", "moisture", "water"),
        ("TERRASENSE_BLINK_THRESHOLD", "moisture", "blink_threshold"),
        ("TERRASENSE_MOISTURE_INTERVAL_MS", "moisture", "interval_ms"),
        ("TERRASENSE_RESOLUTION", "temperature", "resolution"),
        ("TERRASENSE_BLINK_PERIOD_MS", "blink", "period_ms"),
    ] {
        let value = integer_of(config, section, key).unwrap_or_default();
        println!("cargo:rustc-env={}={}", var, value);
    }
}
