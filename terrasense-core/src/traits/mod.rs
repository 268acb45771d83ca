//! Hardware and transport abstraction traits
//!
//! These traits define the interface between the scheduler and the
//! board-specific collaborators that sample sensors, drive the LED,
//! report system gauges and move bytes over the network.

pub mod led;
pub mod listener;
pub mod sensor;
pub mod system;

pub use led::{LedLevel, StatusLed};
pub use listener::{RequestHandler, RequestListener};
pub use sensor::{SensorPort, DISCONNECTED_C, DISCONNECTED_F};
pub use system::{SystemInfo, SystemSnapshot};
