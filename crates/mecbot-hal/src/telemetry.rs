//! `TelemetrySink` trait and the two built-in sinks.
//!
//! The control loop publishes one key/value pair per encoder field per tick
//! ([`Raw`, `Distance`, `Direction`]).  [`LogTelemetry`] forwards samples to
//! the `tracing` subscriber; [`MemorySink`] records them for assertions in
//! headless tests.

use mecbot_types::{TelemetrySample, TelemetryValue};
use tracing::info;

/// A sink accepting key/value telemetry pairs, published once per tick.
pub trait TelemetrySink: Send {
    /// Publish `value` under `key`.
    fn publish(&mut self, key: &str, value: TelemetryValue);
}

/// Telemetry sink that forwards every sample to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTelemetry;

impl TelemetrySink for LogTelemetry {
    fn publish(&mut self, key: &str, value: TelemetryValue) {
        match value {
            TelemetryValue::Integer(v) => info!(target: "telemetry", key, value = v),
            TelemetryValue::Float(v) => info!(target: "telemetry", key, value = v),
            TelemetryValue::Flag(v) => info!(target: "telemetry", key, value = v),
        }
    }
}

/// Telemetry sink that records every sample in memory, for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    samples: Vec<TelemetrySample>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All samples published so far, in publication order.
    pub fn samples(&self) -> &[TelemetrySample] {
        &self.samples
    }

    /// The most recent value published under `key`, if any.
    pub fn last(&self, key: &str) -> Option<TelemetryValue> {
        self.samples
            .iter()
            .rev()
            .find(|s| s.key == key)
            .map(|s| s.value)
    }

    /// Discard all recorded samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl TelemetrySink for MemorySink {
    fn publish(&mut self, key: &str, value: TelemetryValue) {
        self.samples.push(TelemetrySample::now(key, value));
    }
}
