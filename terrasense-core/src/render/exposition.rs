//! Metrics exposition rendering
//!
//! One line per series:
//!
//! ```text
//! sensor_moisture_percent{job="esp32-sensor",instance="sensor-01.kingdom.local"} 50.00
//! ```

use alloc::string::String;
use core::fmt::{self, Display, Write};

use crate::config::Identity;
use crate::state::NodeState;
use crate::traits::SystemSnapshot;

/// Writes metric lines sharing one label set
struct MetricWriter<'a> {
    out: &'a mut String,
    identity: &'a Identity,
}

impl MetricWriter<'_> {
    fn line(&mut self, name: fmt::Arguments<'_>, value: impl Display) {
        // Writing into a String cannot fail.
        let _ = writeln!(
            self.out,
            "{}{{job=\"{}\",instance=\"{}.{}\"}} {}",
            name,
            self.identity.job,
            self.identity.instance_id,
            self.identity.domain_suffix,
            value,
        );
    }
}

/// Fixed two-decimal rendering for float gauges
struct Fixed2(f32);

impl Display for Fixed2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Render the metrics exposition for the current state
///
/// Uptime and free heap are always present. Moisture and per-probe
/// temperature series appear only when their subsystem is active.
pub fn render_exposition(
    state: &NodeState,
    identity: &Identity,
    system: &SystemSnapshot,
) -> String {
    let mut out = String::new();
    let mut w = MetricWriter {
        out: &mut out,
        identity,
    };

    w.line(format_args!("uptime_milliseconds_total"), system.uptime_ms);
    w.line(format_args!("heap_free_bytes"), system.heap_free_bytes);

    if let Some(reading) = state.moisture_reading() {
        w.line(format_args!("sensor_moisture_absolute"), reading.raw);
        w.line(format_args!("sensor_moisture_percent"), Fixed2(reading.percent));
    }

    for t in state.temperatures() {
        w.line(format_args!("sensor_temperature_c_{}", t.index), Fixed2(t.celsius));
        w.line(format_args!("sensor_temperature_f_{}", t.index), Fixed2(t.fahrenheit));
    }

    out
}
