//! Cooperative loop pass
//!
//! The firmware calls [`Scheduler::pass`] forever. A pass services the
//! network, then runs each timer-gated activity that is due:
//!
//! 1. Temperature: harvest all probes and start the next conversion
//! 2. Moisture: sample and re-decide the blink policy
//! 3. Blink: flip the LED
//!
//! The clock is read once per pass, after servicing, so a slow request
//! does not leave the timers looking at a stale time. No step waits on
//! hardware, so a pass is bounded by the listener's own time limit.

use crate::clock::Instant;
use crate::config::{ConfigError, Identity, NodeConfig};
use crate::http::Responder;
use crate::state::{MoistureReading, NodeState};
use crate::traits::{LedLevel, RequestListener, SensorPort, StatusLed, SystemInfo};

/// What the timer steps did during one pass
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PassReport {
    /// Probes were harvested and a new conversion started
    pub harvested: bool,
    /// A fresh moisture sample, if one was taken
    pub sampled: Option<MoistureReading>,
    /// Level written to the LED, if any
    pub led: Option<LedLevel>,
}

impl PassReport {
    /// True when no activity was due
    pub fn is_idle(&self) -> bool {
        !self.harvested && self.sampled.is_none() && self.led.is_none()
    }
}

/// Owns the node state and the hardware it steps
pub struct Scheduler<S, L> {
    sensors: S,
    led: L,
    state: NodeState,
    identity: Identity,
}

impl<S: SensorPort, L: StatusLed> Scheduler<S, L> {
    /// Validate the configuration and bring the node up at `now`
    ///
    /// The LED is switched on first, then every enabled subsystem takes its
    /// initial reading or starts its first conversion.
    pub fn start(
        config: &NodeConfig,
        mut sensors: S,
        mut led: L,
        now: Instant,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        led.set_level(LedLevel::On);
        let state = NodeState::start(config, &mut sensors, now);
        led.set_level(state.blink.level());

        Ok(Self {
            sensors,
            led,
            state,
            identity: config.identity,
        })
    }

    /// Run one full loop pass
    pub async fn pass<R, Y>(&mut self, listener: &mut R, system: &Y) -> PassReport
    where
        R: RequestListener,
        Y: SystemInfo,
    {
        self.service(listener, system).await;
        self.run_timers(system.now())
    }

    /// Service whatever requests are pending, reading state only
    pub async fn service<R, Y>(&self, listener: &mut R, system: &Y)
    where
        R: RequestListener,
        Y: SystemInfo,
    {
        let responder = Responder::new(&self.state, &self.identity, system);
        listener.service_once(&responder).await;
    }

    /// Run every timer-gated activity that is due at `now`
    pub fn run_timers(&mut self, now: Instant) -> PassReport {
        let mut report = PassReport::default();

        if let Some(temperature) = self.state.temperature.as_mut() {
            report.harvested = temperature.step(now, &mut self.sensors);
        }

        if let Some(moisture) = self.state.moisture.as_mut() {
            if let Some(reading) = moisture.step(now, &mut self.sensors) {
                report.sampled = Some(reading);
                report.led = self.state.blink.apply_sample(reading.raw, now);
            }
        }

        if let Some(level) = self.state.blink.step(now) {
            report.led = Some(level);
        }

        if let Some(level) = report.led {
            self.led.set_level(level);
        }

        report
    }

    pub fn state(&self) -> &NodeState {
        &self.state
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn sensors(&self) -> &S {
        &self.sensors
    }

    pub fn led(&self) -> &L {
        &self.led
    }
}
