//! Offset blending between the visible and occluded framing

use glam::{Vec2, Vec3};
use tppcam_core::math::move_towards;

use super::CameraConfig;

/// Output of one blending step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blend {
    /// Offset the applied offset is moving toward this tick
    pub selected_offset: Vec3,
    /// Applied camera offset after this tick's move
    pub lerped_offset: Vec3,
    /// Look-at offset for this tick
    pub look_at_offset: Vec3,
}

/// Pick the framing for the current visibility and move the applied offset
/// toward it.
///
/// `lead` is added to the selected offset (zero unless velocity lead is on).
/// The look-at height compensates for the camera height using the applied
/// offset as it was before this tick's move.
pub fn blend(
    config: &CameraConfig,
    visible: bool,
    lerped_offset: Vec3,
    lead: Vec3,
    dt: f32,
) -> Blend {
    let selected_offset = config.target_offset(visible) + lead;
    let look_at_offset = expand_look_at(config.look_at_offset(visible), lerped_offset);

    let lerped_offset = move_towards(lerped_offset, selected_offset, config.offset_lerp_speed * dt);

    Blend {
        selected_offset,
        lerped_offset,
        look_at_offset,
    }
}

/// Expand a planar look-at offset into 3D, pinning its height to the
/// negated camera height so the aim compensates for how high the camera sits.
pub fn expand_look_at(look_at: Vec2, lerped_offset: Vec3) -> Vec3 {
    Vec3::new(look_at.x, -lerped_offset.y, look_at.y)
}
