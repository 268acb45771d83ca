//! Text renderings of the node state
//!
//! Both renderers are pure: they read the state they are given, never the
//! sensors, and produce the same text for the same inputs.

pub mod exposition;
pub mod html;

pub use exposition::render_exposition;
pub use html::{render_human, REFRESH_SECS};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Instant;
    use crate::config::{Features, Identity, NodeConfig};
    use crate::state::tests::MockPort;
    use crate::state::NodeState;
    use crate::traits::{SystemSnapshot, DISCONNECTED_C};

    const IDENTITY: Identity = Identity {
        instance_id: "sensor-01",
        domain_suffix: "kingdom.local",
        job: "esp32-sensor",
        version: "1.0",
    };

    const SYSTEM: SystemSnapshot = SystemSnapshot {
        uptime_ms: 123_456,
        heap_free_bytes: 40_960,
    };

    fn config(moisture: bool, temperature: bool) -> NodeConfig {
        NodeConfig {
            identity: IDENTITY,
            features: Features {
                moisture,
                temperature,
            },
            ..Default::default()
        }
    }

    /// State with one harvest completed
    fn harvested_state(cfg: &NodeConfig, port: &mut MockPort) -> NodeState {
        let mut state = NodeState::start(cfg, port, Instant::from_millis(0));
        if let Some(t) = state.temperature.as_mut() {
            t.step(Instant::from_millis(750), port);
        }
        state
    }

    #[test]
    fn test_exposition_moisture_only() {
        let cfg = config(true, false);
        let mut port = MockPort::new(495, 2);
        let state = harvested_state(&cfg, &mut port);

        let text = render_exposition(&state, &cfg.identity, &SYSTEM);
        assert_eq!(
            text,
            "uptime_milliseconds_total{job=\"esp32-sensor\",instance=\"sensor-01.kingdom.local\"} 123456\n\
             heap_free_bytes{job=\"esp32-sensor\",instance=\"sensor-01.kingdom.local\"} 40960\n\
             sensor_moisture_absolute{job=\"esp32-sensor\",instance=\"sensor-01.kingdom.local\"} 495\n\
             sensor_moisture_percent{job=\"esp32-sensor\",instance=\"sensor-01.kingdom.local\"} 50.00\n"
        );
    }

    #[test]
    fn test_exposition_gauges_only_when_nothing_active() {
        let cfg = config(false, false);
        let mut port = MockPort::new(495, 2);
        let state = harvested_state(&cfg, &mut port);

        let text = render_exposition(&state, &cfg.identity, &SYSTEM);
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("uptime_milliseconds_total{"));
    }

    #[test]
    fn test_exposition_per_probe_lines() {
        let cfg = config(false, true);
        let mut port = MockPort::new(0, 2);
        port.celsius = vec![21.5, DISCONNECTED_C];
        let state = harvested_state(&cfg, &mut port);

        let text = render_exposition(&state, &cfg.identity, &SYSTEM);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[2],
            "sensor_temperature_c_0{job=\"esp32-sensor\",instance=\"sensor-01.kingdom.local\"} 21.50"
        );
        assert!(lines[3].starts_with("sensor_temperature_f_0{") && lines[3].ends_with(" 70.70"));
        assert!(lines[4].starts_with("sensor_temperature_c_1{") && lines[4].ends_with(" -127.00"));
        assert!(lines[5].starts_with("sensor_temperature_f_1{") && lines[5].ends_with(" -196.60"));
    }

    #[test]
    fn test_exposition_negative_percent_unclamped() {
        let cfg = config(true, false);
        let mut port = MockPort::new(750, 0);
        let state = harvested_state(&cfg, &mut port);
        let text = render_exposition(&state, &cfg.identity, &SYSTEM);
        assert!(text.contains("sensor_moisture_percent{job=\"esp32-sensor\",instance=\"sensor-01.kingdom.local\"} -6.67\n"));
    }

    #[test]
    fn test_human_page_layout() {
        let cfg = config(true, true);
        let mut port = MockPort::new(495, 1);
        port.celsius = vec![DISCONNECTED_C];
        let state = harvested_state(&cfg, &mut port);

        let page = render_human(&state, &cfg.identity);
        assert!(page.starts_with("<!DOCTYPE html><html>\n"));
        assert!(page.contains("<meta http-equiv=\"refresh\" content=\"5\">"));
        assert!(page.contains("<link rel=\"icon\" href=\"data:,\">"));
        assert!(page.contains("<h1>Sensor Node - sensor-01</h1>"));
        assert!(page.contains("<span class=\"version\">Version 1.0</span>"));
        assert!(page.contains("<h2>Moisture is 495 - 50.00%</h2>"));
        assert!(page.contains("<h2>Temperature(0) - -196.60&deg;F</h2>"));
        assert!(page.ends_with("</body></html>\n\n"));
    }

    #[test]
    fn test_human_page_without_subsystems() {
        let cfg = config(false, false);
        let mut port = MockPort::new(495, 1);
        let state = harvested_state(&cfg, &mut port);
        let page = render_human(&state, &cfg.identity);
        assert!(!page.contains("<h2>"));
    }

    #[test]
    fn test_renderers_are_idempotent() {
        let cfg = config(true, true);
        let mut port = MockPort::new(612, 3);
        let state = harvested_state(&cfg, &mut port);
        let reads = port.moisture_reads;

        assert_eq!(
            render_exposition(&state, &cfg.identity, &SYSTEM),
            render_exposition(&state, &cfg.identity, &SYSTEM)
        );
        assert_eq!(
            render_human(&state, &cfg.identity),
            render_human(&state, &cfg.identity)
        );
        assert_eq!(port.moisture_reads, reads);
    }
}
