//! Shared data model and error taxonomy for the mecbot workspace.
//!
//! Everything here is a plain serialisable value type: controller snapshots,
//! sensor readings, drive commands, telemetry records, and [`BotError`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One immutable read of the operator gamepad, taken at the start of a control
/// tick and held stable for the whole tick.
///
/// Stick axes are in `[-1, 1]`, trigger axes in `[0, 1]`.  `a_pressed` and
/// `b_pressed` are edge-triggered (true only on the tick the button went
/// down); the remaining button fields are level-triggered (true while held).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GamepadSnapshot {
    pub left_x: f64,
    pub left_y: f64,
    pub right_x: f64,
    pub right_y: f64,
    pub left_trigger: f64,
    pub right_trigger: f64,
    /// Edge-triggered: gripper pulse, open direction.
    pub a_pressed: bool,
    /// Edge-triggered: gripper pulse, close direction.
    pub b_pressed: bool,
    /// Level-triggered: clamp close.
    pub x_held: bool,
    /// Level-triggered: clamp open.
    pub y_held: bool,
    /// Level-triggered: arms the lift position hold.
    pub right_bumper: bool,
}

/// One sample from a position encoder: raw quadrature count, scaled distance,
/// and the direction of the most recent movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncoderReading {
    pub raw: i64,
    pub distance: f64,
    pub forward: bool,
}

/// Holonomic drive command: three independent power components in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DriveVector {
    /// Sideways translation (positive = right).
    pub strafe: f64,
    /// Forward translation (positive = toward chassis front).
    pub forward: f64,
    /// Rotation about the chassis centre (positive = clockwise).
    pub rotate: f64,
}

/// Per-wheel power commands for a four-wheel mecanum chassis, each in
/// `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelPowers {
    pub front_left: f64,
    pub front_right: f64,
    pub rear_left: f64,
    pub rear_right: f64,
}

/// A value published to the telemetry sink.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TelemetryValue {
    Integer(i64),
    Float(f64),
    Flag(bool),
}

/// A timestamped key/value telemetry record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub timestamp: DateTime<Utc>,
    pub key: String,
    pub value: TelemetryValue,
}

impl TelemetrySample {
    /// Build a sample stamped with the current wall-clock time.
    pub fn now(key: impl Into<String>, value: TelemetryValue) -> Self {
        Self {
            timestamp: Utc::now(),
            key: key.into(),
            value,
        }
    }
}

/// Error type spanning device construction failures, runtime hardware faults,
/// and rejected configuration.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum BotError {
    #[error("Device init failed for {device}: {details}")]
    DeviceInitFailed { device: String, details: String },

    #[error("Hardware fault on {component}: {details}")]
    HardwareFault { component: String, details: String },

    #[error("Invalid configuration ({field}): {details}")]
    InvalidConfig { field: String, details: String },
}
