//! Generic `PositionEncoder` trait for absolute/incremental position sensors.

use mecbot_types::EncoderReading;

/// A position sensor sampled once per control tick.
///
/// Provides the raw quadrature count, a scaled distance, and the direction of
/// the most recent movement.  Reading the sensor must not block.
pub trait PositionEncoder: Send {
    /// Stable identifier for this encoder, e.g. `"lift_encoder"`.
    fn id(&self) -> &str;

    /// Return the current [`EncoderReading`].
    fn read(&self) -> EncoderReading;
}
