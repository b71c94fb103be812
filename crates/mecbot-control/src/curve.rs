//! Stateless power curves for single-axis and button-driven mechanisms.

/// The signed-square transform `a ↦ a · |a|`.
///
/// Preserves sign and the full `[-1, 1]` range while softening response near
/// zero, giving the operator finer control at low stick deflections.  Closed
/// on `[-1, 1]`, so no further clamping is needed.
pub fn signed_square(axis: f64) -> f64 {
    axis * axis.abs()
}

/// Map a pair of mutually opposed buttons to a fixed-magnitude power.
///
/// Exactly `open` held → `+magnitude`; exactly `close` held → `-magnitude`;
/// both or neither → `0.0`.  Both-held is defined as zero rather than left to
/// check order, so there is no precedence to get wrong.
pub fn binary_choice(open: bool, close: bool, magnitude: f64) -> f64 {
    match (open, close) {
        (true, false) => magnitude,
        (false, true) => -magnitude,
        _ => 0.0,
    }
}
