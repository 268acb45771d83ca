//! Sensor node state
//!
//! The node owns one [`NodeState`] aggregate. The scheduler mutates it from
//! its timer steps; renderers and request handlers only borrow it.

pub mod blink;
pub mod moisture;
pub mod temperature;

pub use blink::BlinkController;
pub use moisture::{MoistureReading, MoistureState};
pub use temperature::{
    conversion_delay_ms, PollPhase, TemperaturePollState, TemperatureReading, BASE_DELAY_MS,
};

use crate::clock::Instant;
use crate::config::NodeConfig;
use crate::traits::SensorPort;

/// Everything the node knows about its sensors and LED
///
/// A subsystem left out by the build's feature set is `None` and never
/// touched.
#[derive(Debug, Clone)]
pub struct NodeState {
    pub moisture: Option<MoistureState>,
    pub temperature: Option<TemperaturePollState>,
    pub blink: BlinkController,
}

impl NodeState {
    /// Bring up every enabled subsystem at `now`
    ///
    /// Moisture takes its first sample, which also sets the initial blink
    /// policy. Temperature discovers its probes and starts a conversion.
    pub fn start<S: SensorPort>(config: &NodeConfig, port: &mut S, now: Instant) -> Self {
        let mut blink = BlinkController::new(
            config.moisture.blink_threshold,
            config.blink.period_ms,
            now,
        );

        let moisture = config.features.moisture.then(|| {
            let state = MoistureState::start(port, &config.moisture, now);
            blink.apply_sample(state.reading().raw, now);
            state
        });

        let temperature = config
            .features
            .temperature
            .then(|| TemperaturePollState::start(port, config.temperature.resolution, now));

        Self {
            moisture,
            temperature,
            blink,
        }
    }

    /// Latest moisture reading, if the subsystem is active
    pub fn moisture_reading(&self) -> Option<MoistureReading> {
        self.moisture.as_ref().map(MoistureState::reading)
    }

    /// Latest probe readings; empty when the subsystem is inactive
    pub fn temperatures(&self) -> &[TemperatureReading] {
        self.temperature
            .as_ref()
            .map(TemperaturePollState::readings)
            .unwrap_or(&[])
    }
}
