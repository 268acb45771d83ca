//! Wrapping millisecond clock
//!
//! Timestamps are `u32` milliseconds since boot and wrap after about
//! 49.7 days. Elapsed time is always computed with wrapping subtraction, so
//! due-time checks stay correct across the wrap as long as no interval
//! exceeds half the clock range.

/// A point on the wrapping millisecond clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Instant(u32);

impl Instant {
    pub const fn from_millis(ms: u32) -> Self {
        Self(ms)
    }

    /// Truncate a 64-bit uptime onto the wrapping clock
    pub const fn from_uptime_ms(ms: u64) -> Self {
        Self(ms as u32)
    }

    pub const fn as_millis(&self) -> u32 {
        self.0
    }

    /// Milliseconds from `earlier` to `self`, modulo 2^32
    pub const fn elapsed_since(&self, earlier: Instant) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    pub const fn wrapping_add(&self, ms: u32) -> Self {
        Self(self.0.wrapping_add(ms))
    }
}
