//! Final pose composition
//!
//! The only stage that writes to the camera transform.

use glam::{Quat, Vec3};
use tppcam_core::{math::look_rotation, Transform};

/// Inputs to one composition step
#[derive(Debug, Clone, Copy)]
pub struct PoseInputs {
    pub anchor: Vec3,
    pub lerped_offset: Vec3,
    pub look_at_offset: Vec3,
    /// Up reference taken from the target
    pub target_up: Vec3,
    /// Position interpolation factor (`follow_speed * dt`)
    pub position_factor: f32,
    /// Rotation interpolation factor (`rotation_speed * dt`)
    pub rotation_factor: f32,
}

/// Rotation the camera is turning toward, seen from its current position.
///
/// Returns `None` when the look direction is degenerate.
pub fn desired_rotation(camera_position: Vec3, inputs: &PoseInputs) -> Option<Quat> {
    let look_point =
        inputs.anchor + inputs.look_at_offset + (camera_position - inputs.anchor);
    look_rotation(look_point - camera_position, inputs.target_up)
}

/// Move the camera toward `anchor + lerped_offset` and turn it toward the
/// look-at point.
///
/// The desired rotation is taken from the pose before the move. Factors are
/// applied as given, so values above 1 overshoot. With a degenerate look
/// direction the previous rotation is kept.
pub fn compose(camera: &mut Transform, inputs: &PoseInputs) {
    let end_rotation = desired_rotation(camera.position, inputs);

    let desired_position = inputs.anchor + inputs.lerped_offset;
    camera.position = camera.position.lerp(desired_position, inputs.position_factor);

    if let Some(end_rotation) = end_rotation {
        let rotation = camera.rotation.slerp(end_rotation, inputs.rotation_factor);
        if rotation.is_finite() {
            camera.rotation = rotation.normalize();
        }
    }
}
