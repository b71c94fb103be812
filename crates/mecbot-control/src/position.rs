//! Dead-band / ramp / saturation position controller for the lift.
//!
//! A deliberate alternative to PID: commanded power is a piecewise function
//! of the distance to the target.  Far from the target the output saturates
//! at `max_power`, through a ramp band it falls linearly to `min_power`, and
//! inside the dead-band it is forced to zero so the mechanism does not
//! oscillate at the setpoint.
//!
//! ```text
//!  power
//!   +max ────┐
//!            \
//!   +min      ──┐
//!      0        └──────┐
//!   -min               └──
//!                         \
//!   -max                   ────
//!        ── rMin ── dMin ─ target ─ dMax ── rMax ──►  position
//! ```
//!
//! # Example
//!
//! ```rust
//! use mecbot_control::position::{PositionConfig, PositionController};
//!
//! let lift = PositionController::new(PositionConfig::default()).unwrap();
//! let power = lift.power_toward_target(8000.0);
//! assert!((power - 0.50).abs() < f64::EPSILON); // far below → full up
//! ```

use mecbot_types::BotError;
use serde::{Deserialize, Serialize};

/// Configuration for the position profile.  Immutable after validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionConfig {
    /// Absolute target position, in encoder distance units.
    pub target: f64,
    /// Half-width of the zero-power zone around the target.
    pub deadband: f64,
    /// Width of the linear ramp band outside the dead-band.
    pub ramp_range: f64,
    /// Power commanded at the inner (dead-band) edge of the ramp.
    pub min_power: f64,
    /// Power commanded beyond the outer edge of the ramp.
    pub max_power: f64,
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            target: 10_000.0,
            deadband: 50.0,
            ramp_range: 1_000.0,
            min_power: 0.10,
            max_power: 0.50,
        }
    }
}

impl PositionConfig {
    /// Reject invalid configuration at load time.
    ///
    /// A non-positive ramp range or inconsistent power bounds is a
    /// programming error, not a runtime fault, so it is caught here and never
    /// tolerated per-tick.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), BotError> {
        if !(self.ramp_range > 0.0) {
            return Err(BotError::InvalidConfig {
                field: "ramp_range".to_string(),
                details: format!("must be positive, got {}", self.ramp_range),
            });
        }
        if !(self.deadband >= 0.0) {
            return Err(BotError::InvalidConfig {
                field: "deadband".to_string(),
                details: format!("must be non-negative, got {}", self.deadband),
            });
        }
        if !(0.0 <= self.min_power && self.min_power <= self.max_power && self.max_power <= 1.0) {
            return Err(BotError::InvalidConfig {
                field: "min_power/max_power".to_string(),
                details: format!(
                    "require 0 <= min <= max <= 1, got min {} max {}",
                    self.min_power, self.max_power
                ),
            });
        }
        Ok(())
    }
}

/// Closed-loop power command toward an absolute target.
///
/// Construction validates the configuration;
/// [`power_toward_target`][Self::power_toward_target] is then a pure function
/// of the measured position.
#[derive(Debug, Clone)]
pub struct PositionController {
    config: PositionConfig,
}

impl PositionController {
    /// Build a controller from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::InvalidConfig`] when [`PositionConfig::validate`]
    /// rejects the configuration.
    pub fn new(config: PositionConfig) -> Result<Self, BotError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration in use.
    pub fn config(&self) -> &PositionConfig {
        &self.config
    }

    /// Compute the power command for the measured `position`.
    ///
    /// Positive output drives the mechanism upward (toward larger positions).
    /// Each ramp meets `min_power` at the dead-band edge and `max_power` at
    /// its outer edge, so the profile is continuous with both saturation
    /// zones; `|output| <= max_power` for every input.
    pub fn power_toward_target(&self, position: f64) -> f64 {
        let c = &self.config;
        let error = position - c.target;
        let ramp_outer = c.deadband + c.ramp_range;

        if error < -ramp_outer {
            c.max_power
        } else if error <= -c.deadband {
            c.min_power + (c.max_power - c.min_power) * (-error - c.deadband) / c.ramp_range
        } else if error <= c.deadband {
            0.0
        } else if error <= ramp_outer {
            -(c.min_power + (c.max_power - c.min_power) * (error - c.deadband) / c.ramp_range)
        } else {
            -c.max_power
        }
    }
}
