//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in terrasense-core for the node's hardware:
//!
//! - DS18B20 temperature probes on a 1-Wire bus (`one-wire-bus`, `ds18b20`)
//! - ROM discovery that skips devices with corrupt ROM codes
//! - Capacitive soil moisture probe on an ADC channel
//! - GPIO status LED
//! - [`SensorBoard`], which combines the sensors into a `SensorPort`

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod board;
pub mod led;
pub mod onewire;
pub mod sensor;

pub use board::SensorBoard;
