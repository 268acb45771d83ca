//! Dry-soil status LED blinking
//!
//! Each moisture sample decides whether the LED blinks: a raw reading above
//! the threshold means dry soil. While blinking, the LED flips once per
//! period on a fixed grid anchored at the moment blinking began. Otherwise
//! it is held on.

use crate::clock::Instant;
use crate::scheduler::timer::IntervalTimer;
use crate::traits::LedLevel;

/// Blink policy and toggle timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkController {
    threshold: u16,
    enabled: bool,
    level: LedLevel,
    timer: IntervalTimer,
}

impl BlinkController {
    /// Create a disabled controller with the LED on
    pub const fn new(threshold: u16, period_ms: u32, now: Instant) -> Self {
        Self {
            threshold,
            enabled: false,
            level: LedLevel::On,
            timer: IntervalTimer::new(period_ms, now),
        }
    }

    /// Apply the policy to a new moisture sample
    ///
    /// Returns the level to drive when the LED is forced on. Becoming
    /// enabled starts the toggle timer without flipping.
    pub fn apply_sample(&mut self, raw: u16, now: Instant) -> Option<LedLevel> {
        let dry = raw > self.threshold;
        match (self.enabled, dry) {
            (false, true) => {
                self.enabled = true;
                self.timer.restart(now);
                None
            }
            (true, true) => None,
            (_, false) => {
                self.enabled = false;
                self.level = LedLevel::On;
                Some(LedLevel::On)
            }
        }
    }

    /// Flip the LED if blinking and a period has elapsed
    pub fn step(&mut self, now: Instant) -> Option<LedLevel> {
        if self.enabled && self.timer.poll_locked(now) {
            self.level = self.level.toggled();
            Some(self.level)
        } else {
            None
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current LED level; always `On` while disabled
    pub fn level(&self) -> LedLevel {
        self.level
    }

    pub fn last_toggle(&self) -> Instant {
        self.timer.last_fired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(ms: u32) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_starts_disabled_and_on() {
        let blink = BlinkController::new(500, 500, at(0));
        assert!(!blink.is_enabled());
        assert_eq!(blink.level(), LedLevel::On);
    }

    #[test]
    fn test_wet_sample_forces_on() {
        let mut blink = BlinkController::new(500, 500, at(0));
        assert_eq!(blink.apply_sample(400, at(0)), Some(LedLevel::On));
        assert_eq!(blink.apply_sample(500, at(1_000)), Some(LedLevel::On));
        assert_eq!(blink.step(at(5_000)), None);
    }

    #[test]
    fn test_enabling_does_not_toggle() {
        let mut blink = BlinkController::new(500, 500, at(0));
        assert_eq!(blink.apply_sample(600, at(1_000)), None);
        assert!(blink.is_enabled());
        assert_eq!(blink.level(), LedLevel::On);
        assert_eq!(blink.step(at(1_499)), None);
        assert_eq!(blink.step(at(1_500)), Some(LedLevel::Off));
        assert_eq!(blink.step(at(2_000)), Some(LedLevel::On));
    }

    #[test]
    fn test_staying_dry_keeps_phase() {
        let mut blink = BlinkController::new(500, 500, at(0));
        blink.apply_sample(600, at(0));
        assert_eq!(blink.step(at(500)), Some(LedLevel::Off));
        assert_eq!(blink.apply_sample(650, at(1_000)), None);
        assert_eq!(blink.step(at(1_000)), Some(LedLevel::On));
        assert_eq!(blink.last_toggle(), at(1_000));
    }

    #[test]
    fn test_disabling_restores_on() {
        let mut blink = BlinkController::new(500, 500, at(0));
        blink.apply_sample(600, at(0));
        assert_eq!(blink.step(at(500)), Some(LedLevel::Off));
        assert_eq!(blink.apply_sample(300, at(1_000)), Some(LedLevel::On));
        assert_eq!(blink.level(), LedLevel::On);
        assert!(!blink.is_enabled());
    }

    proptest! {
        #[test]
        fn prop_flip_count_matches_duration(
            start in any::<u32>(),
            period in 2u32..2_000,
            step_frac in 1u32..100,
            duration in 0u32..20_000,
        ) {
            let step = (period * step_frac / 100).max(1);
            let origin = Instant::from_millis(start);
            let mut blink = BlinkController::new(500, period, origin);
            blink.apply_sample(900, origin);

            let mut flips = 0;
            let mut offset = step;
            while offset < duration {
                if blink.step(origin.wrapping_add(offset)).is_some() {
                    flips += 1;
                }
                offset += step;
            }
            if blink.step(origin.wrapping_add(duration)).is_some() {
                flips += 1;
            }

            prop_assert_eq!(flips, duration / period);
        }
    }
}
