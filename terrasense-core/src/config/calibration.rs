//! Moisture probe calibration
//!
//! A capacitive probe reads high in dry air and low in water. The two
//! reference readings define a linear map onto a 0-100 percent scale.

/// Typical raw reading with the probe held in air
pub const MOISTURE_AIR: u16 = 720;

/// Typical raw reading with the probe submerged in water
pub const MOISTURE_WATER: u16 = 270;

/// Two-point linear calibration for the moisture probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoistureCalibration {
    /// Raw reading in dry air (0%)
    pub air: u16,
    /// Raw reading in water (100%)
    pub water: u16,
}

impl Default for MoistureCalibration {
    fn default() -> Self {
        Self::new(MOISTURE_AIR, MOISTURE_WATER)
    }
}

impl MoistureCalibration {
    pub const fn new(air: u16, water: u16) -> Self {
        Self { air, water }
    }

    /// A usable calibration needs the air reading above the water reading
    pub const fn is_valid(&self) -> bool {
        self.air > self.water
    }

    /// Map a raw reading to percent moisture
    ///
    /// The result is not clamped: readings drier than `air` go negative and
    /// readings wetter than `water` exceed 100.
    pub fn percent(&self, raw: u16) -> f32 {
        let normalized = i32::from(raw) - i32::from(self.water);
        let span = i32::from(self.air) - i32::from(self.water);
        100.0 - (normalized as f32 * 100.0 / span as f32)
    }
}
