//! Configuration type definitions
//!
//! All configuration is fixed at build time. The firmware fills a
//! [`NodeConfig`] from values exported by its build script and hands it to
//! the scheduler, which refuses anything [`NodeConfig::validate`] rejects.

use super::calibration::{MoistureCalibration, MOISTURE_AIR, MOISTURE_WATER};

/// Raw moisture reading above which the status LED blinks
pub const BLINK_THRESHOLD: u16 = 500;

/// Moisture sampling interval
pub const MOISTURE_INTERVAL_MS: u32 = 1_000;

/// Half-period of the status LED blink
pub const BLINK_TIME_MS: u32 = 500;

/// Highest DS18B20-class probe resolution
pub const MAX_RESOLUTION: u8 = 12;

/// Lowest DS18B20-class probe resolution
pub const MIN_RESOLUTION: u8 = 9;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Air reading is not above the water reading
    InvalidCalibration,
    /// Probe resolution outside 9..=12 bits
    InvalidResolution,
    /// Moisture sampling interval is zero
    ZeroSampleInterval,
    /// Blink period is zero
    ZeroBlinkPeriod,
}

/// Moisture subsystem settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoistureConfig {
    /// Raw reading in dry air
    pub air: u16,
    /// Raw reading in water
    pub water: u16,
    /// Raw reading above which the LED blinks
    pub blink_threshold: u16,
    /// Sampling interval in milliseconds
    pub interval_ms: u32,
}

impl Default for MoistureConfig {
    fn default() -> Self {
        Self {
            air: MOISTURE_AIR,
            water: MOISTURE_WATER,
            blink_threshold: BLINK_THRESHOLD,
            interval_ms: MOISTURE_INTERVAL_MS,
        }
    }
}

impl MoistureConfig {
    pub const fn calibration(&self) -> MoistureCalibration {
        MoistureCalibration::new(self.air, self.water)
    }
}

/// Temperature subsystem settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureConfig {
    /// Probe resolution in bits (9..=12)
    pub resolution: u8,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            resolution: MAX_RESOLUTION,
        }
    }
}

/// Status LED settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkConfig {
    /// Time between toggles in milliseconds
    pub period_ms: u32,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            period_ms: BLINK_TIME_MS,
        }
    }
}

/// How the node names itself in renderings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Identity {
    /// Short instance name, e.g. `sensor-01`
    pub instance_id: &'static str,
    /// Domain appended to the instance in metric labels
    pub domain_suffix: &'static str,
    /// Value of the `job` metric label
    pub job: &'static str,
    /// Firmware version shown on the page
    pub version: &'static str,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            instance_id: "sensor",
            domain_suffix: "kingdom.local",
            job: "esp32-sensor",
            version: "1.0",
        }
    }
}

/// Which subsystems are compiled in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Features {
    pub moisture: bool,
    pub temperature: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            moisture: true,
            temperature: true,
        }
    }
}

/// Complete node configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeConfig {
    pub moisture: MoistureConfig,
    pub temperature: TemperatureConfig,
    pub blink: BlinkConfig,
    pub identity: Identity,
    pub features: Features,
}

impl NodeConfig {
    /// Check the configuration for values the scheduler cannot run with
    ///
    /// Settings of a disabled subsystem are not checked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.features.moisture {
            if !self.moisture.calibration().is_valid() {
                return Err(ConfigError::InvalidCalibration);
            }
            if self.moisture.interval_ms == 0 {
                return Err(ConfigError::ZeroSampleInterval);
            }
            if self.blink.period_ms == 0 {
                return Err(ConfigError::ZeroBlinkPeriod);
            }
        }

        if self.features.temperature
            && !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&self.temperature.resolution)
        {
            return Err(ConfigError::InvalidResolution);
        }

        Ok(())
    }
}
