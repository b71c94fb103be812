//! Hardware abstraction layer for the mecbot control core.
//!
//! Defines the capability traits the control loop consumes ([`PowerActuator`],
//! [`PositionEncoder`], [`Gamepad`], [`TelemetrySink`]), the
//! [`DeviceRegistry`] that constructs every handle once at startup with
//! per-device fault isolation, and simulated stub drivers for headless tests.

pub mod actuator;
pub mod encoder;
pub mod gamepad;
pub mod registry;
pub mod sim;
pub mod telemetry;

pub use actuator::PowerActuator;
pub use encoder::PositionEncoder;
pub use gamepad::Gamepad;
pub use registry::{DeviceRegistry, DeviceSet};
pub use telemetry::TelemetrySink;
