//! Temperature conversion polling
//!
//! Probe conversions take up to 750 ms at full resolution. Rather than wait,
//! the poller starts a conversion, lets the loop run, and harvests every
//! probe once the resolution-dependent delay has passed. A fresh conversion
//! is started straight after each harvest, so exactly one is ever in flight.
//!
//! ```text
//! Idle ──begin──▶ AwaitingConversion ──delay elapsed──▶ Harvest
//!                        ▲                                 │
//!                        └────────── begin_conversion ─────┘
//! ```

use alloc::boxed::Box;

use crate::clock::Instant;
use crate::config::{MAX_RESOLUTION, MIN_RESOLUTION};
use crate::scheduler::timer::IntervalTimer;
use crate::traits::SensorPort;

/// Conversion time at full resolution
pub const BASE_DELAY_MS: u32 = 750;

/// Time to wait after starting a conversion at the given resolution
///
/// Halves for every bit below 12: 750, 375, 187 and 93 ms.
pub const fn conversion_delay_ms(resolution: u8) -> u32 {
    let bits = if resolution > MAX_RESOLUTION {
        MAX_RESOLUTION
    } else if resolution < MIN_RESOLUTION {
        MIN_RESOLUTION
    } else {
        resolution
    };
    BASE_DELAY_MS >> (MAX_RESOLUTION - bits)
}

/// Where the poller is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollPhase {
    /// No conversion started yet
    Idle,
    /// A conversion is running on the probes
    AwaitingConversion,
    /// Reading results off the probes
    Harvest,
}

/// Last harvested value of one probe
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureReading {
    /// Position on the bus, 0-based
    pub index: usize,
    pub celsius: f32,
    pub fahrenheit: f32,
}

impl TemperatureReading {
    /// Placeholder until the first harvest lands
    pub const fn unread(index: usize) -> Self {
        Self {
            index,
            celsius: 0.0,
            fahrenheit: 0.0,
        }
    }
}

/// Non-blocking temperature poller
#[derive(Debug, Clone)]
pub struct TemperaturePollState {
    phase: PollPhase,
    timer: IntervalTimer,
    readings: Box<[TemperatureReading]>,
    conversions: u32,
    harvests: u32,
}

impl TemperaturePollState {
    /// Size the reading table from the probes found on the bus
    pub fn new<S: SensorPort>(port: &mut S, resolution: u8, now: Instant) -> Self {
        let count = port.probe_count();
        Self {
            phase: PollPhase::Idle,
            timer: IntervalTimer::new(conversion_delay_ms(resolution), now),
            readings: (0..count).map(TemperatureReading::unread).collect(),
            conversions: 0,
            harvests: 0,
        }
    }

    /// Discover probes and start the first conversion
    pub fn start<S: SensorPort>(port: &mut S, resolution: u8, now: Instant) -> Self {
        let mut state = Self::new(port, resolution, now);
        state.begin(port, now);
        state
    }

    fn begin<S: SensorPort>(&mut self, port: &mut S, now: Instant) {
        port.begin_conversion();
        self.conversions = self.conversions.wrapping_add(1);
        self.timer.restart(now);
        self.phase = PollPhase::AwaitingConversion;
    }

    /// Harvest and restart the conversion if the delay has elapsed
    ///
    /// Returns true when a harvest happened this call.
    pub fn step<S: SensorPort>(&mut self, now: Instant, port: &mut S) -> bool {
        match self.phase {
            PollPhase::Idle => {
                self.begin(port, now);
                false
            }
            PollPhase::AwaitingConversion | PollPhase::Harvest => {
                if !self.timer.is_due(now) {
                    return false;
                }
                self.phase = PollPhase::Harvest;
                for reading in self.readings.iter_mut() {
                    reading.celsius = port.celsius_of(reading.index);
                    reading.fahrenheit = port.fahrenheit_of(reading.index);
                }
                self.harvests = self.harvests.wrapping_add(1);
                self.begin(port, now);
                true
            }
        }
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    pub fn readings(&self) -> &[TemperatureReading] {
        &self.readings
    }

    pub fn probe_count(&self) -> usize {
        self.readings.len()
    }

    pub fn delay_ms(&self) -> u32 {
        self.timer.interval_ms()
    }

    /// Conversions started since boot
    pub fn conversions(&self) -> u32 {
        self.conversions
    }

    /// Harvests completed since boot
    pub fn harvests(&self) -> u32 {
        self.harvests
    }
}
