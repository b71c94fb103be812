//! [`DeviceRegistry`] – one-shot device construction with per-device fault
//! isolation.
//!
//! Every actuator and sensor handle is built exactly once at startup.  Each
//! device is constructed from its own fallible factory; a failure is logged
//! once and collapses that slot to `None`, and never prevents construction of
//! any other device.  The resulting [`DeviceSet`] is the degraded-but-running
//! hardware view the control loop works against for the rest of the process
//! lifetime: absent devices are permanent, never retried.
//!
//! # Example
//!
//! ```rust
//! use mecbot_hal::registry::{ActuatorSlot, DeviceRegistry};
//! use mecbot_hal::sim::SimActuator;
//!
//! let devices = DeviceRegistry::new()
//!     .with_actuator(ActuatorSlot::Lift, || Ok(SimActuator::boxed("lift")))
//!     .initialize_all();
//!
//! assert!(devices.lift.is_some());
//! assert!(devices.gripper.is_none()); // no factory supplied
//! ```

use mecbot_types::BotError;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::actuator::PowerActuator;
use crate::encoder::PositionEncoder;

/// Fallible constructor for one actuator handle.
pub type ActuatorFactory = Box<dyn FnOnce() -> Result<Box<dyn PowerActuator>, BotError>>;

/// Fallible constructor for the position encoder.
pub type EncoderFactory = Box<dyn FnOnce() -> Result<Box<dyn PositionEncoder>, BotError>>;

/// The logical actuator positions the control loop knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActuatorSlot {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
    Lift,
    Clamp,
    TestMotor,
    Gripper,
}

impl ActuatorSlot {
    /// Slot name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ActuatorSlot::FrontLeft => "front_left",
            ActuatorSlot::FrontRight => "front_right",
            ActuatorSlot::RearLeft => "rear_left",
            ActuatorSlot::RearRight => "rear_right",
            ActuatorSlot::Lift => "lift",
            ActuatorSlot::Clamp => "clamp",
            ActuatorSlot::TestMotor => "test_motor",
            ActuatorSlot::Gripper => "gripper",
        }
    }
}

/// Construction order: drive corners first, then mechanisms.
const SLOT_ORDER: [ActuatorSlot; 8] = [
    ActuatorSlot::FrontLeft,
    ActuatorSlot::FrontRight,
    ActuatorSlot::RearLeft,
    ActuatorSlot::RearRight,
    ActuatorSlot::Lift,
    ActuatorSlot::Clamp,
    ActuatorSlot::TestMotor,
    ActuatorSlot::Gripper,
];

/// One optional handle per logical device.
///
/// `None` means the device failed construction (or was never configured) and
/// is permanently absent for this process; consumers must check presence
/// before use.
#[derive(Default)]
pub struct DeviceSet {
    pub front_left: Option<Box<dyn PowerActuator>>,
    pub front_right: Option<Box<dyn PowerActuator>>,
    pub rear_left: Option<Box<dyn PowerActuator>>,
    pub rear_right: Option<Box<dyn PowerActuator>>,
    pub lift: Option<Box<dyn PowerActuator>>,
    pub clamp: Option<Box<dyn PowerActuator>>,
    pub test_motor: Option<Box<dyn PowerActuator>>,
    pub gripper: Option<Box<dyn PowerActuator>>,
    pub encoder: Option<Box<dyn PositionEncoder>>,
}

impl DeviceSet {
    /// `true` when all four drive wheels are present.  A partial drivetrain
    /// is treated as absent: the drive mapper never runs against it.
    pub fn drive_ready(&self) -> bool {
        self.front_left.is_some()
            && self.front_right.is_some()
            && self.rear_left.is_some()
            && self.rear_right.is_some()
    }

    fn slot_mut(&mut self, slot: ActuatorSlot) -> &mut Option<Box<dyn PowerActuator>> {
        match slot {
            ActuatorSlot::FrontLeft => &mut self.front_left,
            ActuatorSlot::FrontRight => &mut self.front_right,
            ActuatorSlot::RearLeft => &mut self.rear_left,
            ActuatorSlot::RearRight => &mut self.rear_right,
            ActuatorSlot::Lift => &mut self.lift,
            ActuatorSlot::Clamp => &mut self.clamp,
            ActuatorSlot::TestMotor => &mut self.test_motor,
            ActuatorSlot::Gripper => &mut self.gripper,
        }
    }
}

/// Collects per-device factories and runs them once.
///
/// Construct with [`DeviceRegistry::new`], supply one factory per device,
/// then call [`DeviceRegistry::initialize_all`] to obtain the [`DeviceSet`].
#[derive(Default)]
pub struct DeviceRegistry {
    actuators: HashMap<ActuatorSlot, ActuatorFactory>,
    encoder: Option<EncoderFactory>,
}

impl DeviceRegistry {
    /// Create an empty registry with no factories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply the factory for `slot`.  A previously supplied factory for the
    /// same slot is replaced.
    pub fn with_actuator(
        mut self,
        slot: ActuatorSlot,
        factory: impl FnOnce() -> Result<Box<dyn PowerActuator>, BotError> + 'static,
    ) -> Self {
        self.actuators.insert(slot, Box::new(factory));
        self
    }

    /// Supply the factory for the position encoder.
    pub fn with_encoder(
        mut self,
        factory: impl FnOnce() -> Result<Box<dyn PositionEncoder>, BotError> + 'static,
    ) -> Self {
        self.encoder = Some(Box::new(factory));
        self
    }

    /// Run every factory once and collect the results.
    ///
    /// Each failure is logged with the device name and cause, and binds that
    /// slot to `None`.  Construction of one device never aborts another.
    pub fn initialize_all(mut self) -> DeviceSet {
        let mut devices = DeviceSet::default();

        for slot in SLOT_ORDER {
            let Some(factory) = self.actuators.remove(&slot) else {
                continue;
            };
            match factory() {
                Ok(handle) => {
                    info!(device = slot.name(), "actuator constructed");
                    *devices.slot_mut(slot) = Some(handle);
                }
                Err(e) => {
                    warn!(device = slot.name(), error = %e, "actuator construction failed; slot absent");
                }
            }
        }

        if let Some(factory) = self.encoder.take() {
            match factory() {
                Ok(handle) => {
                    info!(device = "encoder", "encoder constructed");
                    devices.encoder = Some(handle);
                }
                Err(e) => {
                    warn!(device = "encoder", error = %e, "encoder construction failed; slot absent");
                }
            }
        }

        devices
    }
}
