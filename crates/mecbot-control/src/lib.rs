//! Actuator control core: stateless power curves, the holonomic drive mapper,
//! the lift position profile, and the gripper pulse state machine.
//!
//! Everything in this crate is hardware-agnostic and synchronous: pure
//! functions of (input, owned state) → output, exercised by the control loop
//! in `mecbot-runtime` against the HAL handles.

pub mod curve;
pub mod drive;
pub mod position;
pub mod pulse;

pub use curve::{binary_choice, signed_square};
pub use drive::{drive_vector, wheel_powers};
pub use position::{PositionConfig, PositionController};
pub use pulse::{PulseConfig, PulseController, PulseState};
