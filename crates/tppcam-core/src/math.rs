//! Small vector helpers used by the camera update

use glam::{Mat3, Quat, Vec3};

/// Squared length below which a direction is treated as zero
const DEGENERATE_EPSILON_SQ: f32 = 1e-12;

/// Move `current` toward `target` by at most `max_delta`.
///
/// Never overshoots: once the remaining distance is within `max_delta` the
/// target itself is returned. A negative `max_delta` moves away from the target.
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_delta || distance == 0.0 {
        return target;
    }
    current + delta / distance * max_delta
}

/// Rotation whose forward axis (-Z) points along `forward`, with its up axis as
/// close to `up` as possible.
///
/// Returns `None` for a zero-length `forward`. When `forward` is parallel to
/// `up` the shortest-arc rotation from -Z is used instead, so the result is
/// always finite.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    if forward.length_squared() <= DEGENERATE_EPSILON_SQ || !forward.is_finite() {
        return None;
    }
    let forward = forward.normalize();

    let right = forward.cross(up);
    if right.length_squared() <= DEGENERATE_EPSILON_SQ {
        return Some(Quat::from_rotation_arc(Vec3::NEG_Z, forward));
    }
    let right = right.normalize();
    let up = right.cross(forward);

    Some(Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize())
}
