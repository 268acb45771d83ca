//! Configuration types
//!
//! Board-agnostic configuration structures, fixed at build time.

pub mod calibration;
pub mod types;

pub use calibration::*;
pub use types::*;
