//! Sensor capability trait

/// Celsius value reported for a probe that did not answer
pub const DISCONNECTED_C: f32 = -127.0;

/// Fahrenheit value reported for a probe that did not answer
pub const DISCONNECTED_F: f32 = -196.6;

/// Access to the node's moisture input and temperature probe bus
///
/// Implementations never fail: a probe that cannot be read reports the
/// disconnected sentinel and the next cycle simply tries again.
pub trait SensorPort {
    /// Sample the moisture input on a 0-1023 scale
    fn read_moisture_raw(&mut self) -> u16;

    /// Number of temperature probes found at startup
    ///
    /// Called once; the answer is treated as fixed for the life of the node.
    fn probe_count(&mut self) -> usize;

    /// Start a conversion on every probe without waiting for it
    fn begin_conversion(&mut self);

    /// Result of the last conversion of probe `index` in degrees Celsius
    fn celsius_of(&mut self, index: usize) -> f32;

    /// Result of the last conversion of probe `index` in degrees Fahrenheit
    fn fahrenheit_of(&mut self, index: usize) -> f32;
}
