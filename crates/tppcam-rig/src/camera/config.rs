//! Camera configuration

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tppcam_core::LayerMask;

use crate::error::ConfigError;

/// Layer holding camera-blocking geometry unless configured otherwise
pub const DEFAULT_OCCLUSION_LAYER: u32 = 9;

/// How the anchor point follows the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FollowMode {
    /// Anchor snaps to the target every tick
    #[default]
    Instantaneous,
    /// Anchor holds still while the target stays inside the dead zone
    DeadZone,
}

/// Camera configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera offset from the target while it is visible
    pub target_offset_visible: Vec3,
    /// Camera offset from the target while it is occluded
    pub target_offset_occluded: Vec3,
    /// Planar look-at adjustment (x, z) while visible
    pub look_at_offset_visible: Vec2,
    /// Planar look-at adjustment (x, z) while occluded
    pub look_at_offset_occluded: Vec2,
    /// Position follow rate (per second)
    pub follow_speed: f32,
    /// Rotation follow rate (per second)
    pub rotation_speed: f32,
    /// Rate at which the applied offset moves toward the selected one (units per second)
    pub offset_lerp_speed: f32,
    /// Layers that block line of sight
    pub occlusion_mask: LayerMask,
    /// Anchor follow mode
    pub mode: FollowMode,
    /// Dead zone half-extents on x and z
    pub dead_zone: Vec2,
    /// Per-axis scale applied to target velocity and added to the selected offset
    pub velocity_lead: Vec3,
    /// Clamp position/rotation interpolation factors to [0, 1]
    pub clamp_interpolation: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            target_offset_visible: Vec3::new(0.0, 2.0, -5.0),
            target_offset_occluded: Vec3::new(0.0, 6.0, -2.0),
            look_at_offset_visible: Vec2::new(0.0, 5.0),
            look_at_offset_occluded: Vec2::new(0.0, 2.0),
            follow_speed: 5.0,
            rotation_speed: 5.0,
            offset_lerp_speed: 10.0,
            occlusion_mask: LayerMask(1 << DEFAULT_OCCLUSION_LAYER),
            mode: FollowMode::Instantaneous,
            dead_zone: Vec2::new(5.0, 5.0),
            velocity_lead: Vec3::ZERO,
            clamp_interpolation: false,
        }
    }
}

impl CameraConfig {
    /// Check the configuration for values the rig cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dz = self.dead_zone;
        if !dz.is_finite() || dz.x < 0.0 || dz.y < 0.0 {
            return Err(ConfigError::InvalidDeadZone { x: dz.x, z: dz.y });
        }

        for (name, value) in [
            ("follow_speed", self.follow_speed),
            ("rotation_speed", self.rotation_speed),
            ("offset_lerp_speed", self.offset_lerp_speed),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidSpeed { name, value });
            }
        }

        let offsets = [
            ("target_offset_visible", self.target_offset_visible.is_finite()),
            ("target_offset_occluded", self.target_offset_occluded.is_finite()),
            ("look_at_offset_visible", self.look_at_offset_visible.is_finite()),
            ("look_at_offset_occluded", self.look_at_offset_occluded.is_finite()),
            ("velocity_lead", self.velocity_lead.is_finite()),
        ];
        if let Some((name, _)) = offsets.into_iter().find(|(_, finite)| !finite) {
            return Err(ConfigError::NonFiniteOffset { name });
        }

        Ok(())
    }

    /// Interpolation factors that exceed 1 at the given tick duration.
    ///
    /// Such factors overshoot the desired pose each tick. Empty when
    /// `clamp_interpolation` is set.
    pub fn overshoot_factors(&self, dt: f32) -> Vec<(&'static str, f32)> {
        if self.clamp_interpolation {
            return Vec::new();
        }
        [
            ("follow_speed", self.follow_speed * dt),
            ("rotation_speed", self.rotation_speed * dt),
        ]
        .into_iter()
        .filter(|(_, factor)| *factor > 1.0)
        .collect()
    }

    /// Offset selected for the given visibility
    pub fn target_offset(&self, visible: bool) -> Vec3 {
        if visible {
            self.target_offset_visible
        } else {
            self.target_offset_occluded
        }
    }

    /// Planar look-at offset selected for the given visibility
    pub fn look_at_offset(&self, visible: bool) -> Vec2 {
        if visible {
            self.look_at_offset_visible
        } else {
            self.look_at_offset_occluded
        }
    }
}
