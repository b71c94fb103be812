//! Per-tick orchestration of the mecbot actuator control core.
//!
//! [`ControlLoop`] runs the fixed stage order against a
//! [`DeviceSet`][mecbot_hal::DeviceSet] once per tick; [`TickRunner`] drives
//! it at a fixed cadence; [`telemetry::init_tracing`] wires up the diagnostic
//! log subscriber.

pub mod control_loop;
pub mod scheduler;
pub mod telemetry;

pub use control_loop::{ControlLoop, RobotConfig};
pub use scheduler::TickRunner;
