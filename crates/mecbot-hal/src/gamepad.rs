//! Generic `Gamepad` trait for the operator's handheld controller.
//!
//! The control loop takes exactly one [`GamepadSnapshot`] per tick and never
//! re-reads mid-tick, so every mapper sees the same input state.

use mecbot_types::GamepadSnapshot;

/// The operator controller capability.
///
/// `snapshot` latches the current axis and button state into an immutable
/// [`GamepadSnapshot`].  Edge-triggered fields (`a_pressed`, `b_pressed`)
/// must be true only for the first snapshot after the button went down.
pub trait Gamepad: Send {
    /// Latch and return the current controller state.
    fn snapshot(&mut self) -> GamepadSnapshot;
}
