//! Interval timers for timer-gated activities

use crate::clock::Instant;

/// Gates an activity to run at most once per interval
///
/// An activity is due once `now - last_fired >= interval` on the wrapping
/// clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntervalTimer {
    last_fired: Instant,
    interval_ms: u32,
}

impl IntervalTimer {
    /// Create a timer that first becomes due one interval after `now`
    pub const fn new(interval_ms: u32, now: Instant) -> Self {
        Self {
            last_fired: now,
            interval_ms,
        }
    }

    pub const fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub const fn last_fired(&self) -> Instant {
        self.last_fired
    }

    pub const fn is_due(&self, now: Instant) -> bool {
        now.elapsed_since(self.last_fired) >= self.interval_ms
    }

    /// Start a new interval at `now`
    pub fn restart(&mut self, now: Instant) {
        self.last_fired = now;
    }

    /// If due, restart the interval at `now` and return true
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.restart(now);
            true
        } else {
            false
        }
    }

    /// If due, advance by exactly one interval and return true
    ///
    /// Keeps firings on a fixed grid so pass jitter does not accumulate.
    /// A timer more than one full interval behind resynchronises to `now`.
    pub fn poll_locked(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.last_fired = self.last_fired.wrapping_add(self.interval_ms);
        if self.is_due(now) {
            self.last_fired = now;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u32) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_not_due_before_interval() {
        let t = IntervalTimer::new(1_000, at(0));
        assert!(!t.is_due(at(999)));
        assert!(t.is_due(at(1_000)));
    }

    #[test]
    fn test_poll_restarts_at_now() {
        let mut t = IntervalTimer::new(750, at(100));
        assert!(!t.poll(at(849)));
        assert!(t.poll(at(900)));
        assert_eq!(t.last_fired(), at(900));
        assert!(!t.poll(at(1_649)));
        assert!(t.poll(at(1_650)));
    }

    #[test]
    fn test_poll_across_wrap() {
        let start = at(u32::MAX - 200);
        let mut t = IntervalTimer::new(500, start);
        assert!(!t.poll(start.wrapping_add(499)));
        assert!(t.poll(start.wrapping_add(500)));
        assert_eq!(t.last_fired().as_millis(), 299);
    }

    #[test]
    fn test_poll_locked_keeps_grid() {
        let mut t = IntervalTimer::new(500, at(0));
        assert!(t.poll_locked(at(530)));
        assert_eq!(t.last_fired(), at(500));
        assert!(!t.poll_locked(at(999)));
        assert!(t.poll_locked(at(1_020)));
        assert_eq!(t.last_fired(), at(1_000));
    }

    #[test]
    fn test_poll_locked_resyncs_after_stall() {
        let mut t = IntervalTimer::new(500, at(0));
        assert!(t.poll_locked(at(2_300)));
        assert_eq!(t.last_fired(), at(2_300));
    }
}
