//! [`PulseController`] – retriggerable fixed-duration actuation.
//!
//! Once triggered, the gripper runs at a fixed power for a fixed number of
//! ticks and then stops, regardless of how long the button stays down.  The
//! mechanism must be re-triggered to run again, so a stuck input can never
//! cause runaway actuation, and the only timer is the tick counter itself.
//!
//! # State machine
//!
//! ```text
//!            trigger (either direction, any time)
//!   Idle ───────────────────────────────► Active { elapsed: 0, ±power }
//!    ▲                                        │ elapsed <= duration: emit power
//!    │ elapsed > duration: emit 0             ▼
//!    └──────────────────────────────── Active { elapsed + 1, ±power }
//! ```
//!
//! # Example
//!
//! ```rust
//! use mecbot_control::pulse::{PulseConfig, PulseController};
//!
//! let mut gripper = PulseController::new(PulseConfig::default()).unwrap();
//! assert_eq!(gripper.tick(true, false), 0.50);  // trigger open
//! assert_eq!(gripper.tick(false, false), 0.50); // still running
//! ```

use mecbot_types::BotError;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Configuration for the pulse mechanism.  Immutable after validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PulseConfig {
    /// Power magnitude applied while a pulse is active, in `(0, 1]`.
    pub power: f64,
    /// Number of ticks a pulse keeps emitting after the trigger tick.
    pub duration_ticks: u32,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            power: 0.50,
            duration_ticks: 20,
        }
    }
}

impl PulseConfig {
    /// Reject invalid configuration at load time.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), BotError> {
        if !(self.power > 0.0 && self.power <= 1.0) {
            return Err(BotError::InvalidConfig {
                field: "power".to_string(),
                details: format!("must be in (0, 1], got {}", self.power),
            });
        }
        if self.duration_ticks == 0 {
            return Err(BotError::InvalidConfig {
                field: "duration_ticks".to_string(),
                details: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// The pulse machine's state, owned exclusively by the controller and
/// mutated once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PulseState {
    /// No pulse running; output is zero.
    Idle,
    /// A pulse is running with the given elapsed tick count and signed power.
    Active { elapsed: u32, power: f64 },
}

/// Drives an actuator at fixed magnitude for a fixed number of ticks, in
/// either direction, retriggerable while idle or active.
pub struct PulseController {
    config: PulseConfig,
    state: PulseState,
}

impl PulseController {
    /// Build a controller from a validated configuration, starting idle.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::InvalidConfig`] when [`PulseConfig::validate`]
    /// rejects the configuration.
    pub fn new(config: PulseConfig) -> Result<Self, BotError> {
        config.validate()?;
        Ok(Self {
            config,
            state: PulseState::Idle,
        })
    }

    /// The current machine state.
    pub fn state(&self) -> PulseState {
        self.state
    }

    /// Force the machine back to idle.
    pub fn reset(&mut self) {
        self.state = PulseState::Idle;
    }

    /// Advance the machine by one tick and return the power to emit.
    ///
    /// A trigger in either direction (re)starts the pulse with `elapsed = 0`;
    /// the open direction takes precedence when both fire in the same tick.
    /// Each trigger event is logged.
    pub fn tick(&mut self, trigger_open: bool, trigger_close: bool) -> f64 {
        if trigger_open {
            info!(direction = "open", "gripper pulse triggered");
        }
        if trigger_close {
            info!(direction = "close", "gripper pulse triggered");
        }

        let (next, output) = Self::step(self.state, trigger_open, trigger_close, &self.config);
        self.state = next;
        output
    }

    /// Pure transition function: (state, inputs) → (new state, output).
    fn step(
        state: PulseState,
        trigger_open: bool,
        trigger_close: bool,
        config: &PulseConfig,
    ) -> (PulseState, f64) {
        let state = if trigger_open || trigger_close {
            // Open wins when both directions fire in the same tick.
            let power = if trigger_open {
                config.power
            } else {
                -config.power
            };
            PulseState::Active { elapsed: 0, power }
        } else {
            state
        };

        match state {
            PulseState::Active { elapsed, power } if elapsed <= config.duration_ticks => (
                PulseState::Active {
                    elapsed: elapsed + 1,
                    power,
                },
                power,
            ),
            PulseState::Active { .. } => (PulseState::Idle, 0.0),
            PulseState::Idle => (PulseState::Idle, 0.0),
        }
    }
}
