//! Status LED trait

/// Status LED drive level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedLevel {
    On,
    Off,
}

impl LedLevel {
    /// The opposite level
    pub const fn toggled(self) -> Self {
        match self {
            LedLevel::On => LedLevel::Off,
            LedLevel::Off => LedLevel::On,
        }
    }
}

/// Trait for the status LED output
///
/// Implementations handle pin polarity; `On` means visibly lit.
pub trait StatusLed {
    fn set_level(&mut self, level: LedLevel);
}
