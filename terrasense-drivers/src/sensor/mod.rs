//! Sensor drivers

pub mod ds18b20;
pub mod moisture;

pub use self::ds18b20::{resolution_from_bits, ProbeBus, ProbeError};
pub use ::ds18b20::Resolution;
pub use moisture::{AdcReader, CapacitiveProbe};
