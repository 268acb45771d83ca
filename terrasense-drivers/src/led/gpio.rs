//! GPIO status LED
//!
//! An LED on a plain GPIO pin, wired either to light when the pin is high
//! or, as on most dev boards, when it is low.

use embedded_hal::digital::OutputPin;

use terrasense_core::traits::{LedLevel, StatusLed};

/// GPIO status LED
pub struct GpioLed<P> {
    pin: P,
    /// If true, LED lit = pin LOW
    inverted: bool,
    level: LedLevel,
}

impl<P: OutputPin> GpioLed<P> {
    /// Create a new LED output, initially off
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut led = Self {
            pin,
            inverted,
            level: LedLevel::Off,
        };
        led.set_level(LedLevel::Off);
        led
    }

    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    pub fn level(&self) -> LedLevel {
        self.level
    }
}

impl<P: OutputPin> StatusLed for GpioLed<P> {
    fn set_level(&mut self, level: LedLevel) {
        self.level = level;
        let lit = level == LedLevel::On;
        // A failed pin write leaves the LED as it was
        let _ = if lit != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
    }
}
