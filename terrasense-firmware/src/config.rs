//! Build-time node configuration
//!
//! build.rs validates node.toml and exports its values as `TERRASENSE_*`
//! environment variables; they are baked in here as constants.

use terrasense_core::config::{
    BlinkConfig, Features, Identity, MoistureConfig, NodeConfig, TemperatureConfig,
};

pub const WIFI_SSID: &str = env!("TERRASENSE_WIFI_SSID");
pub const WIFI_PASSWORD: &str = env!("TERRASENSE_WIFI_PASSWORD");

pub const INSTANCE_ID: &str = env!("TERRASENSE_INSTANCE_ID");
pub const DOMAIN_SUFFIX: &str = env!("TERRASENSE_DOMAIN_SUFFIX");
pub const JOB: &str = env!("TERRASENSE_JOB");

const MOISTURE_AIR: u16 = parse_u32(env!("TERRASENSE_MOISTURE_AIR")) as u16;
const MOISTURE_WATER: u16 = parse_u32(env!("TERRASENSE_MOISTURE_WATER")) as u16;
const BLINK_THRESHOLD: u16 = parse_u32(env!("TERRASENSE_BLINK_THRESHOLD")) as u16;
const MOISTURE_INTERVAL_MS: u32 = parse_u32(env!("TERRASENSE_MOISTURE_INTERVAL_MS"));
const RESOLUTION: u8 = parse_u32(env!("TERRASENSE_RESOLUTION")) as u8;
const BLINK_PERIOD_MS: u32 = parse_u32(env!("TERRASENSE_BLINK_PERIOD_MS"));

/// Parse a decimal number at compile time
///
/// build.rs only exports integers it has range-checked, so a bad digit is a
/// build error rather than a runtime one.
const fn parse_u32(s: &str) -> u32 {
    let bytes = s.as_bytes();
    let mut value = 0u32;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        assert!(digit.is_ascii_digit(), "TERRASENSE_* value is not a number");
        value = value * 10 + (digit - b'0') as u32;
        i += 1;
    }
    value
}

/// The node configuration this firmware was built with
pub const fn node_config() -> NodeConfig {
    NodeConfig {
        moisture: MoistureConfig {
            air: MOISTURE_AIR,
            water: MOISTURE_WATER,
            blink_threshold: BLINK_THRESHOLD,
            interval_ms: MOISTURE_INTERVAL_MS,
        },
        temperature: TemperatureConfig {
            resolution: RESOLUTION,
        },
        blink: BlinkConfig {
            period_ms: BLINK_PERIOD_MS,
        },
        identity: Identity {
            instance_id: INSTANCE_ID,
            domain_suffix: DOMAIN_SUFFIX,
            job: JOB,
            version: env!("CARGO_PKG_VERSION"),
        },
        features: Features {
            moisture: cfg!(feature = "moisture"),
            temperature: cfg!(feature = "temperature"),
        },
    }
}
