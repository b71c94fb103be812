//! [`ControlLoop`] – the per-tick teleop orchestrator.
//!
//! Each tick maps one immutable [`GamepadSnapshot`] to actuator commands in a
//! fixed stage order: test motor, lift manual, clamp, gripper pulse, encoder
//! telemetry, lift position hold, drive.  Stages are independent and
//! idempotent within a tick; a stage whose devices are absent is a silent
//! no-op, so one failed device degrades exactly one mechanism and never the
//! loop.  The sensor is latched once at the start of the tick, so all reads
//! happen before all writes.
//!
//! # Example
//!
//! ```rust
//! use mecbot_hal::sim::SimRig;
//! use mecbot_hal::telemetry::MemorySink;
//! use mecbot_runtime::control_loop::{ControlLoop, RobotConfig};
//! use mecbot_types::GamepadSnapshot;
//!
//! let mut bot = ControlLoop::new(SimRig::new().build(), RobotConfig::default()).unwrap();
//! let mut sink = MemorySink::new();
//! bot.tick(&GamepadSnapshot::default(), &mut sink);
//! ```

use mecbot_control::{
    PositionConfig, PositionController, PulseConfig, PulseController, PulseState, binary_choice,
    drive_vector, signed_square, wheel_powers,
};
use mecbot_hal::actuator::PowerActuator;
use mecbot_hal::registry::DeviceSet;
use mecbot_hal::telemetry::TelemetrySink;
use mecbot_types::{BotError, EncoderReading, GamepadSnapshot, TelemetryValue};
use serde::{Deserialize, Serialize};
use tracing::warn;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration bundle for [`ControlLoop`], validated once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotConfig {
    /// Fixed power magnitude for the clamp open/close buttons, in `(0, 1]`.
    pub clamp_power: f64,
    /// Gripper pulse configuration.
    pub pulse: PulseConfig,
    /// Lift position-hold configuration.
    pub lift: PositionConfig,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            clamp_power: 0.75,
            pulse: PulseConfig::default(),
            lift: PositionConfig::default(),
        }
    }
}

impl RobotConfig {
    /// Reject invalid configuration at load time.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), BotError> {
        if !(self.clamp_power > 0.0 && self.clamp_power <= 1.0) {
            return Err(BotError::InvalidConfig {
                field: "clamp_power".to_string(),
                details: format!("must be in (0, 1], got {}", self.clamp_power),
            });
        }
        self.pulse.validate()?;
        self.lift.validate()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ControlLoop
// ─────────────────────────────────────────────────────────────────────────────

/// Owns the [`DeviceSet`] and the only long-lived control state (the gripper
/// pulse machine) and advances everything by one tick per call.
pub struct ControlLoop {
    devices: DeviceSet,
    clamp_power: f64,
    lift_hold: PositionController,
    pulse: PulseController,
}

impl ControlLoop {
    /// Build the loop from an initialized [`DeviceSet`] and a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::InvalidConfig`] when any part of `config` is
    /// rejected; configuration problems never surface at tick time.
    pub fn new(devices: DeviceSet, config: RobotConfig) -> Result<Self, BotError> {
        config.validate()?;
        Ok(Self {
            devices,
            clamp_power: config.clamp_power,
            lift_hold: PositionController::new(config.lift)?,
            pulse: PulseController::new(config.pulse)?,
        })
    }

    /// The hardware view the loop runs against.
    pub fn devices(&self) -> &DeviceSet {
        &self.devices
    }

    /// Mutable access to the hardware view, for test wiring.
    pub fn devices_mut(&mut self) -> &mut DeviceSet {
        &mut self.devices
    }

    /// The gripper pulse machine's current state.
    pub fn pulse_state(&self) -> PulseState {
        self.pulse.state()
    }

    /// Run one control tick against `pad`, publishing encoder telemetry to
    /// `telemetry`.
    ///
    /// Never fails: device absence and runtime hardware faults degrade the
    /// affected mechanism and are reported only through the diagnostic log.
    pub fn tick(&mut self, pad: &GamepadSnapshot, telemetry: &mut dyn TelemetrySink) {
        // Latch the sensor once so every stage sees the same reading.
        let reading = self.devices.encoder.as_ref().map(|e| e.read());

        self.test_motor_stage(pad);
        self.lift_manual_stage(pad, reading);
        self.clamp_stage(pad);
        self.gripper_stage(pad);
        self.publish_telemetry(reading, telemetry);
        self.lift_hold_stage(pad, reading);
        self.drive_stage(pad);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Stages
    // ─────────────────────────────────────────────────────────────────────────

    fn test_motor_stage(&mut self, pad: &GamepadSnapshot) {
        if let Some(motor) = self.devices.test_motor.as_deref_mut() {
            apply(motor, signed_square(pad.right_x));
        }
    }

    fn lift_manual_stage(&mut self, pad: &GamepadSnapshot, reading: Option<EncoderReading>) {
        // The hold stage owns the lift whenever it can actually run; skipping
        // here keeps the lift at exactly one writer per tick.
        if pad.right_bumper && reading.is_some() {
            return;
        }
        if let Some(lift) = self.devices.lift.as_deref_mut() {
            apply(lift, signed_square(pad.right_trigger - pad.left_trigger));
        }
    }

    fn clamp_stage(&mut self, pad: &GamepadSnapshot) {
        if let Some(clamp) = self.devices.clamp.as_deref_mut() {
            apply(clamp, binary_choice(pad.y_held, pad.x_held, self.clamp_power));
        }
    }

    fn gripper_stage(&mut self, pad: &GamepadSnapshot) {
        // Without a gripper the pulse machine does not advance either; the
        // mechanism is simply gone for this process.
        let Some(gripper) = self.devices.gripper.as_deref_mut() else {
            return;
        };
        let power = self.pulse.tick(pad.a_pressed, pad.b_pressed);
        apply(gripper, power);
    }

    fn publish_telemetry(&self, reading: Option<EncoderReading>, telemetry: &mut dyn TelemetrySink) {
        let Some(r) = reading else { return };
        telemetry.publish("Raw", TelemetryValue::Integer(r.raw));
        telemetry.publish("Distance", TelemetryValue::Float(r.distance));
        telemetry.publish("Direction", TelemetryValue::Flag(r.forward));
    }

    fn lift_hold_stage(&mut self, pad: &GamepadSnapshot, reading: Option<EncoderReading>) {
        if !pad.right_bumper {
            return;
        }
        let Some(r) = reading else { return };
        let Some(lift) = self.devices.lift.as_deref_mut() else {
            return;
        };
        apply(lift, self.lift_hold.power_toward_target(r.distance));
    }

    fn drive_stage(&mut self, pad: &GamepadSnapshot) {
        if !self.devices.drive_ready() {
            return;
        }
        let wheels = wheel_powers(drive_vector(pad.left_x, pad.left_y, pad.right_x));
        if let Some(m) = self.devices.front_left.as_deref_mut() {
            apply(m, wheels.front_left);
        }
        if let Some(m) = self.devices.front_right.as_deref_mut() {
            apply(m, wheels.front_right);
        }
        if let Some(m) = self.devices.rear_left.as_deref_mut() {
            apply(m, wheels.rear_left);
        }
        if let Some(m) = self.devices.rear_right.as_deref_mut() {
            apply(m, wheels.rear_right);
        }
    }
}

/// Issue one power command; a runtime fault degrades the mechanism for this
/// tick and is only reported through the diagnostic log.
fn apply(actuator: &mut dyn PowerActuator, power: f64) {
    if let Err(e) = actuator.set_power(power) {
        warn!(actuator = actuator.id(), error = %e, "power command failed");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mecbot_hal::registry::ActuatorSlot;
    use mecbot_hal::sim::{SimEncoder, SimEncoderHandle, SimRig};
    use mecbot_hal::telemetry::MemorySink;

    fn full_bot() -> ControlLoop {
        ControlLoop::new(SimRig::new().build(), RobotConfig::default()).unwrap()
    }

    /// A bot whose encoder reading can be driven from the test.
    fn bot_with_encoder_handle() -> (ControlLoop, SimEncoderHandle) {
        let mut devices = SimRig::new().without_encoder().build();
        let (encoder, handle) = SimEncoder::shared("lift_encoder");
        devices.encoder = Some(encoder);
        (
            ControlLoop::new(devices, RobotConfig::default()).unwrap(),
            handle,
        )
    }

    fn power_of(bot: &ControlLoop, slot: ActuatorSlot) -> f64 {
        let handle = match slot {
            ActuatorSlot::FrontLeft => &bot.devices().front_left,
            ActuatorSlot::FrontRight => &bot.devices().front_right,
            ActuatorSlot::RearLeft => &bot.devices().rear_left,
            ActuatorSlot::RearRight => &bot.devices().rear_right,
            ActuatorSlot::Lift => &bot.devices().lift,
            ActuatorSlot::Clamp => &bot.devices().clamp,
            ActuatorSlot::TestMotor => &bot.devices().test_motor,
            ActuatorSlot::Gripper => &bot.devices().gripper,
        };
        handle.as_ref().expect("device present").power()
    }

    #[test]
    fn neutral_input_commands_zero_everywhere() {
        let mut bot = full_bot();
        bot.tick(&GamepadSnapshot::default(), &mut MemorySink::new());
        for slot in [
            ActuatorSlot::FrontLeft,
            ActuatorSlot::FrontRight,
            ActuatorSlot::RearLeft,
            ActuatorSlot::RearRight,
            ActuatorSlot::Lift,
            ActuatorSlot::Clamp,
            ActuatorSlot::TestMotor,
            ActuatorSlot::Gripper,
        ] {
            assert_eq!(power_of(&bot, slot), 0.0, "slot {:?}", slot);
        }
    }

    #[test]
    fn test_motor_follows_signed_square_of_right_stick() {
        let mut bot = full_bot();
        let pad = GamepadSnapshot {
            right_x: 0.5,
            ..Default::default()
        };
        bot.tick(&pad, &mut MemorySink::new());
        assert!((power_of(&bot, ActuatorSlot::TestMotor) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn manual_lift_uses_trigger_difference() {
        let mut bot = full_bot();
        let pad = GamepadSnapshot {
            right_trigger: 0.8,
            left_trigger: 0.3,
            ..Default::default()
        };
        bot.tick(&pad, &mut MemorySink::new());
        // signed_square(0.5) = 0.25
        assert!((power_of(&bot, ActuatorSlot::Lift) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn clamp_buttons_select_direction_and_cancel() {
        let mut bot = full_bot();
        let mut sink = MemorySink::new();

        bot.tick(
            &GamepadSnapshot {
                y_held: true,
                ..Default::default()
            },
            &mut sink,
        );
        assert!((power_of(&bot, ActuatorSlot::Clamp) - 0.75).abs() < f64::EPSILON);

        bot.tick(
            &GamepadSnapshot {
                x_held: true,
                ..Default::default()
            },
            &mut sink,
        );
        assert!((power_of(&bot, ActuatorSlot::Clamp) - (-0.75)).abs() < f64::EPSILON);

        bot.tick(
            &GamepadSnapshot {
                x_held: true,
                y_held: true,
                ..Default::default()
            },
            &mut sink,
        );
        assert_eq!(power_of(&bot, ActuatorSlot::Clamp), 0.0);
    }

    #[test]
    fn gripper_pulse_runs_for_full_duration_then_stops() {
        let mut bot = full_bot();
        let mut sink = MemorySink::new();

        bot.tick(
            &GamepadSnapshot {
                a_pressed: true,
                ..Default::default()
            },
            &mut sink,
        );
        assert_eq!(power_of(&bot, ActuatorSlot::Gripper), 0.50);

        // Ticks 1..=20 keep emitting, tick 21 stops.
        for _ in 0..20 {
            bot.tick(&GamepadSnapshot::default(), &mut sink);
            assert_eq!(power_of(&bot, ActuatorSlot::Gripper), 0.50);
        }
        bot.tick(&GamepadSnapshot::default(), &mut sink);
        assert_eq!(power_of(&bot, ActuatorSlot::Gripper), 0.0);
        assert_eq!(bot.pulse_state(), PulseState::Idle);
    }

    #[test]
    fn gripper_absent_does_not_advance_pulse_state() {
        let devices = SimRig::new().without_actuator(ActuatorSlot::Gripper).build();
        let mut bot = ControlLoop::new(devices, RobotConfig::default()).unwrap();
        bot.tick(
            &GamepadSnapshot {
                a_pressed: true,
                ..Default::default()
            },
            &mut MemorySink::new(),
        );
        assert_eq!(bot.pulse_state(), PulseState::Idle);
    }

    #[test]
    fn encoder_telemetry_is_published_once_per_tick() {
        let (mut bot, handle) = bot_with_encoder_handle();
        handle.set(mecbot_types::EncoderReading {
            raw: 4242,
            distance: 9_500.0,
            forward: true,
        });

        let mut sink = MemorySink::new();
        bot.tick(&GamepadSnapshot::default(), &mut sink);

        assert_eq!(sink.samples().len(), 3);
        assert_eq!(sink.last("Raw"), Some(TelemetryValue::Integer(4242)));
        assert_eq!(sink.last("Distance"), Some(TelemetryValue::Float(9_500.0)));
        assert_eq!(sink.last("Direction"), Some(TelemetryValue::Flag(true)));
    }

    #[test]
    fn no_encoder_means_no_telemetry() {
        let devices = SimRig::new().without_encoder().build();
        let mut bot = ControlLoop::new(devices, RobotConfig::default()).unwrap();
        let mut sink = MemorySink::new();
        bot.tick(&GamepadSnapshot::default(), &mut sink);
        assert!(sink.samples().is_empty());
    }

    #[test]
    fn position_hold_overrides_manual_lift_while_bumper_held() {
        let (mut bot, handle) = bot_with_encoder_handle();
        handle.set_distance(9_500.0);

        let pad = GamepadSnapshot {
            right_bumper: true,
            right_trigger: 1.0, // manual input must be ignored
            ..Default::default()
        };
        bot.tick(&pad, &mut MemorySink::new());

        // Ramp zone: 0.10 + 0.40 * (9950 - 9500) / 1000 = 0.28
        assert!((power_of(&bot, ActuatorSlot::Lift) - 0.28).abs() < 1e-12);
        // Exactly one write reached the lift this tick.
        let lift = bot.devices().lift.as_ref().unwrap();
        let sim = lift.power();
        assert!((sim - 0.28).abs() < 1e-12);
    }

    #[test]
    fn position_hold_at_target_commands_zero() {
        let (mut bot, handle) = bot_with_encoder_handle();
        handle.set_distance(10_000.0);
        let pad = GamepadSnapshot {
            right_bumper: true,
            ..Default::default()
        };
        bot.tick(&pad, &mut MemorySink::new());
        assert_eq!(power_of(&bot, ActuatorSlot::Lift), 0.0);
    }

    #[test]
    fn bumper_without_encoder_falls_back_to_manual_lift() {
        let devices = SimRig::new().without_encoder().build();
        let mut bot = ControlLoop::new(devices, RobotConfig::default()).unwrap();
        let pad = GamepadSnapshot {
            right_bumper: true,
            right_trigger: 1.0,
            ..Default::default()
        };
        bot.tick(&pad, &mut MemorySink::new());
        assert!((power_of(&bot, ActuatorSlot::Lift) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn absent_lift_degrades_only_the_lift() {
        let devices = SimRig::new().without_actuator(ActuatorSlot::Lift).build();
        let mut bot = ControlLoop::new(devices, RobotConfig::default()).unwrap();
        let pad = GamepadSnapshot {
            right_bumper: true,
            right_trigger: 1.0,
            right_x: 1.0,
            y_held: true,
            ..Default::default()
        };
        // Must not panic, and the other mechanisms still respond.
        bot.tick(&pad, &mut MemorySink::new());
        assert!((power_of(&bot, ActuatorSlot::TestMotor) - 1.0).abs() < f64::EPSILON);
        assert!((power_of(&bot, ActuatorSlot::Clamp) - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn full_forward_stick_drives_all_wheels_forward() {
        let mut bot = full_bot();
        let pad = GamepadSnapshot {
            left_y: -1.0,
            ..Default::default()
        };
        bot.tick(&pad, &mut MemorySink::new());
        for slot in [
            ActuatorSlot::FrontLeft,
            ActuatorSlot::FrontRight,
            ActuatorSlot::RearLeft,
            ActuatorSlot::RearRight,
        ] {
            assert!((power_of(&bot, slot) - 1.0).abs() < f64::EPSILON, "{:?}", slot);
        }
    }

    #[test]
    fn partial_drivetrain_is_never_driven() {
        let devices = SimRig::new()
            .without_actuator(ActuatorSlot::RearRight)
            .build();
        let mut bot = ControlLoop::new(devices, RobotConfig::default()).unwrap();
        let pad = GamepadSnapshot {
            left_y: -1.0,
            ..Default::default()
        };
        bot.tick(&pad, &mut MemorySink::new());
        // The remaining wheels received no command at all.
        assert_eq!(power_of(&bot, ActuatorSlot::FrontLeft), 0.0);
        assert_eq!(power_of(&bot, ActuatorSlot::RearLeft), 0.0);
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = RobotConfig {
            clamp_power: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            ControlLoop::new(SimRig::new().build(), config),
            Err(BotError::InvalidConfig { field, .. }) if field == "clamp_power"
        ));

        let config = RobotConfig {
            lift: PositionConfig {
                ramp_range: -5.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(ControlLoop::new(SimRig::new().build(), config).is_err());
    }

    #[test]
    fn robot_config_roundtrip() {
        let config = RobotConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: RobotConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
