//! Sensor board
//!
//! Combines the moisture probe and the DS18B20 bus into the single
//! [`SensorPort`] the scheduler samples. Either half may be absent when the
//! firmware is built without it.

use embedded_hal_02::blocking::delay::DelayUs;
use embedded_hal_02::digital::v2::{InputPin, OutputPin};

use terrasense_core::traits::{SensorPort, DISCONNECTED_C};

use crate::sensor::ds18b20::celsius_to_fahrenheit;
use crate::sensor::{AdcReader, CapacitiveProbe, ProbeBus};

/// The node's sensors
pub struct SensorBoard<A, P, D> {
    moisture: Option<CapacitiveProbe<A>>,
    temperature: Option<ProbeBus<P, D>>,
    /// Celsius value most recently read from the bus, by probe index
    last_read: Option<(usize, f32)>,
}

impl<A, P, D, E> SensorBoard<A, P, D>
where
    A: AdcReader,
    P: InputPin<Error = E> + OutputPin<Error = E>,
    D: DelayUs<u16>,
{
    pub fn new(
        moisture: Option<CapacitiveProbe<A>>,
        temperature: Option<ProbeBus<P, D>>,
    ) -> Self {
        Self {
            moisture,
            temperature,
            last_read: None,
        }
    }

    pub fn moisture_probe(&mut self) -> Option<&mut CapacitiveProbe<A>> {
        self.moisture.as_mut()
    }

    pub fn probe_bus(&mut self) -> Option<&mut ProbeBus<P, D>> {
        self.temperature.as_mut()
    }

    fn read_celsius(&mut self, index: usize) -> f32 {
        if let Some((cached, celsius)) = self.last_read {
            if cached == index {
                return celsius;
            }
        }
        let celsius = match self.temperature.as_mut() {
            Some(bus) => bus.celsius_or_sentinel(index),
            None => DISCONNECTED_C,
        };
        self.last_read = Some((index, celsius));
        celsius
    }
}

impl<A, P, D, E> SensorPort for SensorBoard<A, P, D>
where
    A: AdcReader,
    P: InputPin<Error = E> + OutputPin<Error = E>,
    D: DelayUs<u16>,
{
    fn read_moisture_raw(&mut self) -> u16 {
        self.moisture.as_mut().map_or(0, CapacitiveProbe::read_raw)
    }

    fn probe_count(&mut self) -> usize {
        let Some(bus) = self.temperature.as_mut() else {
            return 0;
        };
        let count = bus.discover();
        #[cfg(feature = "defmt")]
        defmt::info!("found {} temperature probes", count);
        count
    }

    fn begin_conversion(&mut self) {
        self.last_read = None;
        if let Some(bus) = self.temperature.as_mut() {
            if bus.begin_conversion().is_err() {
                #[cfg(feature = "defmt")]
                defmt::debug!("conversion not started");
            }
        }
    }

    fn celsius_of(&mut self, index: usize) -> f32 {
        self.read_celsius(index)
    }

    // Reuses the Celsius read of the same probe so a harvest costs one
    // scratchpad read per probe
    fn fahrenheit_of(&mut self, index: usize) -> f32 {
        celsius_to_fahrenheit(self.read_celsius(index))
    }
}
