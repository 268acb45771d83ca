//! Board-agnostic core logic for the sensor node firmware
//!
//! This crate contains everything that does not touch hardware or the
//! network stack:
//!
//! - Capability traits for sensors, the status LED, system gauges and the
//!   request listener
//! - Timer-gated subsystems (moisture sampling, temperature conversion
//!   polling, LED blinking)
//! - The cooperative scheduler pass that drives them
//! - Human and metrics renderings of the current sensor state
//! - Request routing
//! - Configuration types and validation

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod clock;
pub mod config;
pub mod http;
pub mod render;
pub mod scheduler;
pub mod state;
pub mod traits;

pub use clock::Instant;
pub use config::{ConfigError, NodeConfig};
pub use scheduler::{PassReport, Scheduler};
