//! DS18B20 digital temperature probes
//!
//! All probes share one 1-Wire bus. A conversion is started on every probe
//! at once and runs for up to 750 ms at 12 bits; the driver never waits
//! for it. Results are read later probe by probe from the scratchpad.
//! Probe indices follow ROM search order.

use alloc::vec::Vec;

use ds18b20::{Ds18b20, Resolution};
use embedded_hal_02::blocking::delay::DelayUs;
use embedded_hal_02::digital::v2::{InputPin, OutputPin};
use one_wire_bus::{Address, OneWire, OneWireError, OneWireResult};

use terrasense_core::traits::{DISCONNECTED_C, DISCONNECTED_F};

use crate::onewire;

/// Resolution for a configured bit count
pub const fn resolution_from_bits(bits: u8) -> Option<Resolution> {
    match bits {
        9 => Some(Resolution::Bits9),
        10 => Some(Resolution::Bits10),
        11 => Some(Resolution::Bits11),
        12 => Some(Resolution::Bits12),
        _ => None,
    }
}

/// Why a probe could not be read
#[derive(Debug)]
pub enum ProbeError<E> {
    /// Bus-level failure, including a scratchpad CRC mismatch
    Bus(OneWireError<E>),
    /// No probe at that index
    UnknownProbe,
}

impl<E> From<OneWireError<E>> for ProbeError<E> {
    fn from(err: OneWireError<E>) -> Self {
        ProbeError::Bus(err)
    }
}

/// Convert degrees Celsius to Fahrenheit, keeping the disconnected sentinel
pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    if celsius == DISCONNECTED_C {
        DISCONNECTED_F
    } else {
        celsius * 1.8 + 32.0
    }
}

/// The DS18B20 probes found on one bus
pub struct ProbeBus<P, D> {
    bus: OneWire<P>,
    delay: D,
    probes: Vec<Address>,
    resolution: Resolution,
}

impl<P, D, E> ProbeBus<P, D>
where
    P: InputPin<Error = E> + OutputPin<Error = E>,
    D: DelayUs<u16>,
{
    /// Take the data pin and release the line
    pub fn new(pin: P, delay: D, resolution: Resolution) -> OneWireResult<Self, E> {
        Ok(Self {
            bus: OneWire::new(pin)?,
            delay,
            probes: Vec::new(),
            resolution,
        })
    }

    /// Enumerate DS18B20 probes and set their resolution
    ///
    /// Other device families and corrupt ROM codes are skipped. Returns
    /// the number of probes found.
    pub fn discover(&mut self) -> usize {
        let mut probes = Vec::new();
        onewire::scan(&mut self.bus, &mut self.delay, |address| {
            if address.family_code() == ds18b20::FAMILY_CODE {
                probes.push(address);
            }
        });
        self.probes = probes;

        for i in 0..self.probes.len() {
            let address = self.probes[i];
            if self.configure(address).is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("probe {=u64:x} resolution not set", address.0);
            }
        }

        self.probes.len()
    }

    /// Write the resolution into one probe, keeping its alarm bytes
    fn configure(&mut self, address: Address) -> OneWireResult<(), E> {
        let sensor = Ds18b20::new::<E>(address)?;
        let data = sensor.read_data(&mut self.bus, &mut self.delay)?;
        sensor.set_config(
            data.alarm_temp_low,
            data.alarm_temp_high,
            self.resolution,
            &mut self.bus,
            &mut self.delay,
        )
    }

    /// Start a conversion on every probe and return immediately
    pub fn begin_conversion(&mut self) -> OneWireResult<(), E> {
        ds18b20::start_simultaneous_temp_measurement(&mut self.bus, &mut self.delay)
    }

    /// Read the last conversion result of probe `index`
    ///
    /// A scratchpad failing its CRC is read once more before giving up.
    pub fn read_celsius(&mut self, index: usize) -> Result<f32, ProbeError<E>> {
        let address = *self.probes.get(index).ok_or(ProbeError::UnknownProbe)?;
        let sensor = Ds18b20::new::<E>(address)?;
        let data = match sensor.read_data(&mut self.bus, &mut self.delay) {
            Err(OneWireError::CrcMismatch) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("probe {} scratchpad corrupt, retrying", index);
                sensor.read_data(&mut self.bus, &mut self.delay)?
            }
            other => other?,
        };
        Ok(data.temperature)
    }

    /// Like [`read_celsius`](Self::read_celsius), with failures mapped to
    /// the disconnected sentinel
    pub fn celsius_or_sentinel(&mut self, index: usize) -> f32 {
        match self.read_celsius(index) {
            Ok(celsius) => celsius,
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("probe {} read failed", index);
                DISCONNECTED_C
            }
        }
    }

    pub fn probes(&self) -> &[Address] {
        &self.probes
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }
}
