//! Simulated stub drivers for headless tests and CI.
//!
//! Every stub implements the corresponding HAL trait, records the commands it
//! receives, and always succeeds.  [`SimRig`] assembles a fully simulated
//! [`DeviceSet`] so the whole control loop can run without hardware.
//!
//! | Stub | Behaviour |
//! |---|---|
//! | [`SimActuator`] | Stores every commanded power; `power()` returns the last. |
//! | [`SimEncoder`] | Returns a reading settable from outside via [`SimEncoderHandle`]. |
//! | [`SimGamepad`] | Replays a queue of snapshots, then neutral input. |

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use mecbot_types::{BotError, EncoderReading, GamepadSnapshot};

use crate::actuator::PowerActuator;
use crate::encoder::PositionEncoder;
use crate::gamepad::Gamepad;
use crate::registry::{ActuatorSlot, DeviceSet};

// ────────────────────────────────────────────────────────────────────────────
// Stub actuator
// ────────────────────────────────────────────────────────────────────────────

/// A simulated power actuator that records every commanded value.
/// Always succeeds.
pub struct SimActuator {
    id: String,
    history: Vec<f64>,
}

impl SimActuator {
    /// Create a new simulated actuator with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            history: Vec::new(),
        }
    }

    /// Create a boxed simulated actuator, ready for a [`DeviceSet`] slot.
    pub fn boxed(id: impl Into<String>) -> Box<Self> {
        Box::new(Self::new(id))
    }

    /// Every power value commanded so far, oldest first.
    pub fn history(&self) -> &[f64] {
        &self.history
    }
}

impl PowerActuator for SimActuator {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_power(&mut self, power: f64) -> Result<(), BotError> {
        self.history.push(power);
        Ok(())
    }

    fn power(&self) -> f64 {
        self.history.last().copied().unwrap_or(0.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stub encoder
// ────────────────────────────────────────────────────────────────────────────

/// A simulated position encoder whose reading can be driven from the test via
/// a [`SimEncoderHandle`].
pub struct SimEncoder {
    id: String,
    reading: Arc<Mutex<EncoderReading>>,
}

/// External handle that updates the reading of a [`SimEncoder`] that has
/// already been moved into a [`DeviceSet`].
#[derive(Clone)]
pub struct SimEncoderHandle {
    reading: Arc<Mutex<EncoderReading>>,
}

impl SimEncoderHandle {
    /// Replace the whole reading.
    pub fn set(&self, reading: EncoderReading) {
        *lock(&self.reading) = reading;
    }

    /// Update only the distance field.
    pub fn set_distance(&self, distance: f64) {
        lock(&self.reading).distance = distance;
    }
}

impl SimEncoder {
    /// Create a boxed simulated encoder reading all-zero.
    pub fn boxed(id: impl Into<String>) -> Box<Self> {
        Self::shared(id).0
    }

    /// Create a boxed simulated encoder together with the handle that drives
    /// its reading.
    pub fn shared(id: impl Into<String>) -> (Box<Self>, SimEncoderHandle) {
        let reading = Arc::new(Mutex::new(EncoderReading {
            raw: 0,
            distance: 0.0,
            forward: true,
        }));
        let handle = SimEncoderHandle {
            reading: Arc::clone(&reading),
        };
        (
            Box::new(Self {
                id: id.into(),
                reading,
            }),
            handle,
        )
    }
}

impl PositionEncoder for SimEncoder {
    fn id(&self) -> &str {
        &self.id
    }

    fn read(&self) -> EncoderReading {
        *lock(&self.reading)
    }
}

// Poison recovery: a panicked test thread must not wedge the sim.
fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

// ────────────────────────────────────────────────────────────────────────────
// Stub gamepad
// ────────────────────────────────────────────────────────────────────────────

/// A simulated gamepad that replays queued snapshots, then neutral input.
#[derive(Default)]
pub struct SimGamepad {
    queue: VecDeque<GamepadSnapshot>,
}

impl SimGamepad {
    /// Create a gamepad with an empty queue (every snapshot is neutral).
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `pad` to be returned by a later [`Gamepad::snapshot`] call.
    pub fn push(&mut self, pad: GamepadSnapshot) {
        self.queue.push_back(pad);
    }
}

impl Gamepad for SimGamepad {
    fn snapshot(&mut self) -> GamepadSnapshot {
        self.queue.pop_front().unwrap_or_default()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SimRig builder
// ────────────────────────────────────────────────────────────────────────────

/// Builder for a fully simulated [`DeviceSet`].
///
/// By default every slot is populated with a stub; call the `without_*`
/// methods to leave specific slots absent and exercise degraded operation.
///
/// # Example
///
/// ```rust
/// use mecbot_hal::registry::ActuatorSlot;
/// use mecbot_hal::sim::SimRig;
///
/// let devices = SimRig::new().without_actuator(ActuatorSlot::Lift).build();
/// assert!(devices.lift.is_none());
/// assert!(devices.drive_ready());
/// ```
#[derive(Default)]
pub struct SimRig {
    skipped: Vec<ActuatorSlot>,
    skip_encoder: bool,
}

impl SimRig {
    /// Create a rig with every device present.
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave `slot` absent in the built [`DeviceSet`].
    pub fn without_actuator(mut self, slot: ActuatorSlot) -> Self {
        self.skipped.push(slot);
        self
    }

    /// Leave the encoder absent in the built [`DeviceSet`].
    pub fn without_encoder(mut self) -> Self {
        self.skip_encoder = true;
        self
    }

    /// Build the simulated [`DeviceSet`].
    pub fn build(self) -> DeviceSet {
        let mut devices = DeviceSet::default();
        let slots = [
            ActuatorSlot::FrontLeft,
            ActuatorSlot::FrontRight,
            ActuatorSlot::RearLeft,
            ActuatorSlot::RearRight,
            ActuatorSlot::Lift,
            ActuatorSlot::Clamp,
            ActuatorSlot::TestMotor,
            ActuatorSlot::Gripper,
        ];
        for slot in slots {
            if self.skipped.contains(&slot) {
                continue;
            }
            let handle = SimActuator::boxed(slot.name());
            match slot {
                ActuatorSlot::FrontLeft => devices.front_left = Some(handle),
                ActuatorSlot::FrontRight => devices.front_right = Some(handle),
                ActuatorSlot::RearLeft => devices.rear_left = Some(handle),
                ActuatorSlot::RearRight => devices.rear_right = Some(handle),
                ActuatorSlot::Lift => devices.lift = Some(handle),
                ActuatorSlot::Clamp => devices.clamp = Some(handle),
                ActuatorSlot::TestMotor => devices.test_motor = Some(handle),
                ActuatorSlot::Gripper => devices.gripper = Some(handle),
            }
        }
        if !self.skip_encoder {
            devices.encoder = Some(SimEncoder::boxed("lift_encoder"));
        }
        devices
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
