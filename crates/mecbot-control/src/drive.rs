//! Holonomic drive mapping for a four-wheel mecanum chassis.
//!
//! Two steps, both pure: [`drive_vector`] turns three raw controller axes
//! into the chassis-frame power components, and [`wheel_powers`] mixes those
//! components into per-corner wheel commands.

use mecbot_types::{DriveVector, WheelPowers};

use crate::curve::signed_square;

/// Map three raw controller axes to holonomic drive power components.
///
/// Each axis gets the signed-square treatment for fine low-speed control; the
/// forward axis is sign-inverted because stick-up reads negative on the
/// controller but means chassis-forward.  Exact zero input maps to exact zero
/// output on every component, so a centred stick produces no drift.
pub fn drive_vector(strafe_axis: f64, forward_axis: f64, rotate_axis: f64) -> DriveVector {
    DriveVector {
        strafe: signed_square(strafe_axis),
        forward: signed_square(-forward_axis),
        rotate: signed_square(rotate_axis),
    }
}

/// Mix a [`DriveVector`] into per-wheel mecanum powers.
///
/// Standard cartesian mix: each corner combines forward, strafe, and rotate
/// with the signs its roller orientation dictates.  When any corner exceeds
/// unit magnitude all four are rescaled proportionally, preserving the motion
/// direction while keeping every command in `[-1, 1]`.
pub fn wheel_powers(v: DriveVector) -> WheelPowers {
    let front_left = v.forward + v.strafe + v.rotate;
    let front_right = v.forward - v.strafe - v.rotate;
    let rear_left = v.forward - v.strafe + v.rotate;
    let rear_right = v.forward + v.strafe - v.rotate;

    let peak = front_left
        .abs()
        .max(front_right.abs())
        .max(rear_left.abs())
        .max(rear_right.abs());

    let scale = if peak > 1.0 { 1.0 / peak } else { 1.0 };
    WheelPowers {
        front_left: front_left * scale,
        front_right: front_right * scale,
        rear_left: rear_left * scale,
        rear_right: rear_right * scale,
    }
}
