//! Bone orientation from segment endpoints
//!
//! A bone's rotation maps local +Z onto the segment direction and local +Y
//! onto an "up" vector derived from a hint, so twist follows the hint.

use nalgebra::Rotation3;

use super::{Quat, Vec3};

/// Segments shorter than this have no usable direction
pub const MIN_BONE_LENGTH: f64 = 1e-3;

/// Cross products shorter than this mean the hint is parallel to the bone
const PARALLEL_EPSILON: f64 = 1e-6;

const SLERP_EPSILON: f64 = 1e-9;

/// Orientation of the segment `start -> end`
///
/// Coincident endpoints yield the identity. Without a hint, world +Z is
/// used; a hint parallel to the segment falls back to world +X, then +Y.
pub fn solve(start: &Vec3, end: &Vec3, up_hint: Option<&Vec3>) -> Quat {
    let offset = end - start;
    let length = offset.norm();
    // Negated so NaN offsets also take the identity path
    if !(length >= MIN_BONE_LENGTH) {
        return Quat::identity();
    }
    let direction = offset / length;

    let hint = up_hint.copied().unwrap_or_else(Vec3::z);
    let right = [hint, Vec3::x(), Vec3::y()]
        .iter()
        .find_map(|axis| direction.cross(axis).try_normalize(PARALLEL_EPSILON))
        // direction cannot be parallel to both X and Y
        .unwrap_or_else(Vec3::x);
    let up = right.cross(&direction).normalize();

    // right x up would point against the bone; complete the frame from up
    // and direction instead so the basis stays right-handed
    let side = up.cross(&direction);
    let basis = Rotation3::from_basis_unchecked(&[side, up, direction]);

    Quat::from_rotation_matrix(&basis)
}

/// Linear interpolation, exact at `t == 0` and `t == 1`
pub fn lerp(from: &Vec3, to: &Vec3, t: f64) -> Vec3 {
    from.lerp(to, t)
}

/// Spherical interpolation along the shorter arc
pub fn slerp(from: &Quat, to: &Quat, t: f64) -> Quat {
    from.try_slerp(to, t, SLERP_EPSILON).unwrap_or_else(|| {
        // Nearly identical rotations: normalized lerp on the same hemisphere
        let target = if from.coords.dot(&to.coords) < 0.0 {
            -*to.quaternion()
        } else {
            *to.quaternion()
        };
        Quat::new_normalize(from.quaternion().lerp(&target, t))
    })
}
