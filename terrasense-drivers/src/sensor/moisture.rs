//! Capacitive soil moisture probe
//!
//! The probe outputs an analog voltage that falls as the soil gets wetter.
//! Readings are rescaled from the ADC's native width onto the 0-1023 range
//! the calibration constants are expressed in.

/// Full scale of the rescaled reading
pub const MOISTURE_FULL_SCALE: u16 = 1023;

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read one sample at the ADC's native width
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

/// Capacitive probe on one ADC channel
pub struct CapacitiveProbe<ADC> {
    adc: ADC,
    /// Largest value the ADC can return
    adc_max: u16,
    /// Last successful rescaled reading
    last: u16,
}

impl<ADC: AdcReader> CapacitiveProbe<ADC> {
    /// Create a probe on an ADC with the given resolution in bits
    pub fn new(adc: ADC, adc_bits: u8) -> Self {
        let bits = adc_bits.clamp(1, 16);
        Self {
            adc,
            adc_max: u16::MAX >> (16 - bits),
            last: 0,
        }
    }

    /// Rescale a native ADC sample onto 0-1023
    pub fn rescale(&self, sample: u16) -> u16 {
        let sample = u32::from(sample.min(self.adc_max));
        (sample * u32::from(MOISTURE_FULL_SCALE) / u32::from(self.adc_max)) as u16
    }

    /// Sample the probe
    ///
    /// A failed ADC read repeats the last good reading.
    pub fn read_raw(&mut self) -> u16 {
        match self.adc.read() {
            Ok(sample) => {
                self.last = self.rescale(sample);
            }
            Err(()) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("moisture ADC read failed, repeating {}", self.last);
            }
        }
        self.last
    }
}

/// Dummy ADC for testing (returns a fixed value, or fails on `None`)
#[cfg(test)]
pub struct DummyAdc(pub Option<u16>);

#[cfg(test)]
impl AdcReader for DummyAdc {
    fn read(&mut self) -> Result<u16, ()> {
        self.0.ok_or(())
    }
}
