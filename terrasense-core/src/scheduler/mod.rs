//! Cooperative scheduler
//!
//! Interleaves the node's timer-gated activities with request service on a
//! single thread of control.

pub mod executor;
pub mod timer;

pub use executor::{PassReport, Scheduler};
pub use timer::IntervalTimer;
