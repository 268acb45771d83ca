//! System gauge trait

use crate::clock::Instant;

/// Uptime and memory gauges exported on the metrics endpoint
pub trait SystemInfo {
    /// Milliseconds since boot, not wrapping
    fn uptime_ms(&self) -> u64;

    /// Bytes currently free on the heap
    fn heap_free_bytes(&self) -> u32;

    /// Loop clock, truncated from the uptime
    fn now(&self) -> Instant {
        Instant::from_uptime_ms(self.uptime_ms())
    }

    /// Capture both gauges at once
    fn snapshot(&self) -> SystemSnapshot {
        SystemSnapshot {
            uptime_ms: self.uptime_ms(),
            heap_free_bytes: self.heap_free_bytes(),
        }
    }
}

/// Gauge values at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemSnapshot {
    pub uptime_ms: u64,
    pub heap_free_bytes: u32,
}
