//! ESP32-C3 sensor wiring
//!
//! | Signal        | Pin    |
//! |---------------|--------|
//! | Moisture ADC  | GPIO2  |
//! | 1-Wire data   | GPIO4  |
//! | Status LED    | GPIO8  |

#![cfg_attr(not(all(feature = "moisture", feature = "temperature")), allow(unused_imports))]

use core::cell::RefCell;

use embedded_hal_compat::{Reverse, ReverseCompat};
use esp_hal::analog::adc::{Adc, AdcConfig, AdcPin, Attenuation};
use esp_hal::delay::Delay;
use esp_hal::gpio::{DriveMode, Flex, Level, Output, OutputConfig, Pull};
use esp_hal::peripherals::{ADC1, GPIO2, GPIO4, GPIO8};
use esp_hal::Blocking;

use terrasense_drivers::led::GpioLed;
use terrasense_drivers::sensor::{
    resolution_from_bits, AdcReader, CapacitiveProbe, ProbeBus, Resolution,
};
use terrasense_drivers::SensorBoard;

/// ADC1 resolution on the C3
pub const ADC_BITS: u8 = 12;

/// Conversion attempts before a moisture read is reported as failed
const ADC_MAX_POLLS: u32 = 1_000;

pub type MoistureAdcPin = AdcPin<GPIO2<'static>, ADC1<'static>>;
/// The 1-Wire crates take embedded-hal 0.2 pins and delays
pub type OneWirePin = Reverse<RefCell<Flex<'static>>>;
pub type OneWireDelay = Reverse<Delay>;
pub type Probes = ProbeBus<OneWirePin, OneWireDelay>;
pub type Board = SensorBoard<EspMoistureAdc, OneWirePin, OneWireDelay>;
pub type StatusLed = GpioLed<Output<'static>>;

/// Oneshot reads of the moisture probe on ADC1
pub struct EspMoistureAdc {
    adc: Adc<'static, ADC1<'static>, Blocking>,
    pin: MoistureAdcPin,
}

impl EspMoistureAdc {
    pub fn new(adc1: ADC1<'static>, gpio: GPIO2<'static>) -> Self {
        let mut config = AdcConfig::new();
        // Full 0-3.3 V swing of the capacitive probe
        let pin = config.enable_pin(gpio, Attenuation::_11dB);
        Self {
            adc: Adc::new(adc1, config),
            pin,
        }
    }
}

impl AdcReader for EspMoistureAdc {
    fn read(&mut self) -> Result<u16, ()> {
        // The oneshot driver answers WouldBlock until the conversion is done
        for _ in 0..ADC_MAX_POLLS {
            if let Ok(sample) = self.adc.read_oneshot(&mut self.pin) {
                return Ok(sample);
            }
        }
        Err(())
    }
}

/// Open-drain 1-Wire line; the board supplies the 4.7k pull-up
pub fn probe_bus(gpio: GPIO4<'static>, resolution: Resolution) -> Option<Probes> {
    let mut pin = Flex::new(gpio);
    pin.apply_output_config(
        &OutputConfig::default()
            .with_drive_mode(DriveMode::OpenDrain)
            .with_pull(Pull::None),
    );
    pin.set_input_enable(true);
    pin.set_output_enable(true);
    ProbeBus::new(pin.reverse_cell(), Delay::new().reverse(), resolution).ok()
}

/// Assemble the sensor board from the compiled-in subsystems
#[allow(unused_variables)]
pub fn board(
    adc1: ADC1<'static>,
    moisture: GPIO2<'static>,
    onewire: GPIO4<'static>,
    resolution_bits: u8,
) -> Board {
    #[cfg(feature = "moisture")]
    let moisture = Some(CapacitiveProbe::new(
        EspMoistureAdc::new(adc1, moisture),
        ADC_BITS,
    ));
    #[cfg(not(feature = "moisture"))]
    let moisture = None;

    #[cfg(feature = "temperature")]
    let temperature = probe_bus(
        onewire,
        resolution_from_bits(resolution_bits).unwrap_or(Resolution::Bits12),
    );
    #[cfg(not(feature = "temperature"))]
    let temperature = None;

    SensorBoard::new(moisture, temperature)
}

/// Status LED; lit when the pin is driven low
pub fn status_led(gpio: GPIO8<'static>) -> StatusLed {
    GpioLed::new_active_low(Output::new(gpio, Level::High, OutputConfig::default()))
}
