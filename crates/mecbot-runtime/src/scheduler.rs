//! [`TickRunner`] – fixed-cadence driver for the control loop.
//!
//! Polls the gamepad, runs one [`ControlLoop::tick`], then sleeps out the
//! remainder of the period.  A tick that takes longer than the period is
//! logged as an overrun and the next tick starts immediately; the runner
//! never tries to "catch up" with extra ticks, so a slow tick stretches the
//! timeline instead of bursting commands.
//!
//! # Example
//!
//! ```rust,no_run
//! use mecbot_hal::sim::{SimGamepad, SimRig};
//! use mecbot_hal::telemetry::LogTelemetry;
//! use mecbot_runtime::control_loop::{ControlLoop, RobotConfig};
//! use mecbot_runtime::scheduler::TickRunner;
//!
//! let mut bot = ControlLoop::new(SimRig::new().build(), RobotConfig::default()).unwrap();
//! let mut pad = SimGamepad::new();
//! let mut sink = LogTelemetry;
//! TickRunner::default().run_for(50, &mut bot, &mut pad, &mut sink);
//! ```

use std::time::{Duration, Instant};

use mecbot_hal::gamepad::Gamepad;
use mecbot_hal::telemetry::TelemetrySink;
use tracing::warn;

use crate::control_loop::ControlLoop;

/// Teleop control period.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(20);

/// Runs a [`ControlLoop`] at a fixed period.
#[derive(Debug, Clone, Copy)]
pub struct TickRunner {
    period: Duration,
}

impl Default for TickRunner {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
        }
    }
}

impl TickRunner {
    /// Create a runner with a custom period.
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// The configured tick period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run `ticks` control ticks against `control_loop`, polling `gamepad`
    /// once per tick.
    pub fn run_for(
        &self,
        ticks: u64,
        control_loop: &mut ControlLoop,
        gamepad: &mut dyn Gamepad,
        telemetry: &mut dyn TelemetrySink,
    ) {
        for tick in 0..ticks {
            let started = Instant::now();

            let pad = gamepad.snapshot();
            control_loop.tick(&pad, telemetry);

            let elapsed = started.elapsed();
            match self.period.checked_sub(elapsed) {
                Some(remainder) => std::thread::sleep(remainder),
                None => {
                    warn!(tick, elapsed_ms = elapsed.as_millis() as u64, "tick overran its period");
                }
            }
        }
    }
}
