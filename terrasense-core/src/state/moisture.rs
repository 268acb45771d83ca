//! Moisture sampling

use crate::clock::Instant;
use crate::config::{MoistureCalibration, MoistureConfig};
use crate::scheduler::timer::IntervalTimer;
use crate::traits::SensorPort;

/// One moisture sample and its calibrated percentage
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoistureReading {
    /// Raw reading, 0-1023
    pub raw: u16,
    /// Calibrated moisture, not clamped
    pub percent: f32,
}

impl MoistureReading {
    pub fn from_raw(raw: u16, calibration: &MoistureCalibration) -> Self {
        Self {
            raw,
            percent: calibration.percent(raw),
        }
    }
}

/// Latest moisture reading plus its sampling timer
#[derive(Debug, Clone)]
pub struct MoistureState {
    calibration: MoistureCalibration,
    timer: IntervalTimer,
    reading: MoistureReading,
}

impl MoistureState {
    /// Take the first sample and start the sampling interval at `now`
    pub fn start<S: SensorPort>(port: &mut S, config: &MoistureConfig, now: Instant) -> Self {
        let calibration = config.calibration();
        let raw = port.read_moisture_raw();
        Self {
            calibration,
            timer: IntervalTimer::new(config.interval_ms, now),
            reading: MoistureReading::from_raw(raw, &calibration),
        }
    }

    /// Read the probe and replace the stored reading
    pub fn sample<S: SensorPort>(&mut self, port: &mut S) -> MoistureReading {
        let raw = port.read_moisture_raw();
        self.reading = MoistureReading::from_raw(raw, &self.calibration);
        self.reading
    }

    /// Sample if the interval has elapsed
    pub fn step<S: SensorPort>(&mut self, now: Instant, port: &mut S) -> Option<MoistureReading> {
        if self.timer.poll(now) {
            Some(self.sample(port))
        } else {
            None
        }
    }

    pub fn reading(&self) -> MoistureReading {
        self.reading
    }
}
