//! Generic `PowerActuator` trait for single-axis output devices driven by a
//! normalized power command.
//!
//! Drivers implement this trait and are handed to the
//! [`DeviceRegistry`][crate::registry::DeviceRegistry] at startup.  The
//! control loop only ever talks to the trait, so motor-controller transports
//! can be swapped without touching the mapping logic.

use mecbot_types::BotError;

/// A single-axis output device (drive wheel, lift winch, clamp motor, …).
///
/// Every actuator has a stable string identifier used in diagnostics when a
/// command cannot be applied.
pub trait PowerActuator: Send {
    /// Stable identifier for this actuator, e.g. `"lift"` or `"front_left"`.
    fn id(&self) -> &str;

    /// Command the actuator with `power` in `[-1.0, 1.0]` (sign selects
    /// direction, magnitude selects duty).
    ///
    /// # Errors
    ///
    /// Returns [`BotError::HardwareFault`] if the command cannot be applied
    /// (e.g. the underlying controller is in a fault state).
    fn set_power(&mut self, power: f64) -> Result<(), BotError>;

    /// Return the most recently commanded power.
    fn power(&self) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockActuator {
        id: String,
        power: f64,
    }

    impl MockActuator {
        fn new(id: &str) -> Self {
            Self {
                id: id.to_string(),
                power: 0.0,
            }
        }
    }

    impl PowerActuator for MockActuator {
        fn id(&self) -> &str {
            &self.id
        }

        fn set_power(&mut self, power: f64) -> Result<(), BotError> {
            self.power = power;
            Ok(())
        }

        fn power(&self) -> f64 {
            self.power
        }
    }

    #[test]
    fn mock_actuator_set_and_get_power() {
        let mut act = MockActuator::new("test_motor");
        assert_eq!(act.id(), "test_motor");
        assert!((act.power() - 0.0).abs() < f64::EPSILON);

        act.set_power(-0.75).unwrap();
        assert!((act.power() - (-0.75)).abs() < f64::EPSILON);
    }
}
