//! Human-readable status page

use alloc::string::String;
use core::fmt::Write;

use crate::config::Identity;
use crate::state::NodeState;

/// Seconds between browser reloads
pub const REFRESH_SECS: u32 = 5;

/// Render the self-refreshing status page
pub fn render_human(state: &NodeState, identity: &Identity) -> String {
    let mut page = String::new();
    // Writing into a String cannot fail.
    let _ = write_page(&mut page, state, identity);
    page
}

fn write_page<W: Write>(out: &mut W, state: &NodeState, identity: &Identity) -> core::fmt::Result {
    out.write_str("<!DOCTYPE html><html>\n")?;
    out.write_str(
        "<head><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    )?;
    writeln!(out, "<meta http-equiv=\"refresh\" content=\"{}\">", REFRESH_SECS)?;
    out.write_str("<link rel=\"icon\" href=\"data:,\">\n")?;
    writeln!(out, "<body><h1>Sensor Node - {}</h1>", identity.instance_id)?;
    writeln!(out, "<span class=\"version\">Version {}</span>", identity.version)?;

    if let Some(reading) = state.moisture_reading() {
        writeln!(
            out,
            "<h2>Moisture is {} - {:.2}%</h2>",
            reading.raw, reading.percent
        )?;
    }

    for t in state.temperatures() {
        writeln!(
            out,
            "<h2>Temperature({}) - {:.2}&deg;F</h2>",
            t.index, t.fahrenheit
        )?;
    }

    out.write_str("</body></html>\n\n")
}
