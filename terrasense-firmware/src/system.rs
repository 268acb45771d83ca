//! Uptime and heap gauges

use terrasense_core::traits::SystemInfo;

/// Gauges backed by the embassy time driver and the esp-alloc heap
pub struct EspSystem;

impl SystemInfo for EspSystem {
    fn uptime_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }

    fn heap_free_bytes(&self) -> u32 {
        u32::try_from(esp_alloc::HEAP.free()).unwrap_or(u32::MAX)
    }
}
