//! Core types shared between the camera rig and its host

use std::ops::BitOr;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Transform representing position and rotation of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Get the forward direction (negative Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Get the up direction (positive Y in local space)
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

/// Pose of the object a camera follows, sampled once per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetPose {
    /// World-space position
    pub position: Vec3,
    /// World-space up vector (tracks the target's tilt)
    pub up: Vec3,
}

impl TargetPose {
    /// Pose at a position with world up
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            up: Vec3::Y,
        }
    }

    /// Sample the pose of a transform
    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            position: transform.position,
            up: transform.up(),
        }
    }
}

/// Number of collision layers addressable by a [`LayerMask`]
pub const LAYER_COUNT: u32 = 32;

/// Errors produced when addressing collision layers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayerError {
    #[error("layer index {0} out of range, expected 0..32")]
    OutOfRange(u32),
}

/// Bit set over the collision layers. The default mask is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    /// Layer 0, where untagged geometry lives
    pub const DEFAULT_LAYER: LayerMask = LayerMask(1);

    /// Mask containing a single layer
    pub fn layer(index: u32) -> Result<Self, LayerError> {
        if index >= LAYER_COUNT {
            return Err(LayerError::OutOfRange(index));
        }
        Ok(LayerMask(1 << index))
    }

    /// Mask containing every listed layer
    pub fn from_layers(indices: &[u32]) -> Result<Self, LayerError> {
        indices
            .iter()
            .try_fold(LayerMask::NONE, |mask, &index| Ok(mask | LayerMask::layer(index)?))
    }

    /// Raw bits
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether the given layer is part of this mask
    pub fn contains_layer(self, index: u32) -> bool {
        index < LAYER_COUNT && self.0 & (1 << index) != 0
    }

    /// Whether this mask shares at least one layer with another
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        LayerMask(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_axes() {
        let transform = Transform::default();
        assert_eq!(transform.forward(), Vec3::NEG_Z);
        assert_eq!(transform.up(), Vec3::Y);
    }

    #[test]
    fn test_target_pose_from_transform() {
        let tilted = Transform::from_position_rotation(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
        );
        let pose = TargetPose::from_transform(&tilted);
        assert_eq!(pose.position, Vec3::new(1.0, 2.0, 3.0));
        assert!(pose.up.abs_diff_eq(Vec3::NEG_X, 1e-5));
    }

    #[test]
    fn test_layer_mask() {
        let mask = LayerMask::layer(9).unwrap();
        assert_eq!(mask.bits(), 1 << 9);
        assert!(mask.contains_layer(9));
        assert!(!mask.contains_layer(8));
        assert!(!mask.contains_layer(40));

        let combined = LayerMask::from_layers(&[0, 9]).unwrap();
        assert!(combined.intersects(LayerMask::DEFAULT_LAYER));
        assert!(combined.intersects(mask));
        assert!(!LayerMask::DEFAULT_LAYER.intersects(mask));
    }

    #[test]
    fn test_default_mask_is_empty() {
        assert!(LayerMask::default().is_empty());
        assert_ne!(LayerMask::default(), LayerMask::DEFAULT_LAYER);
        assert!(LayerMask::DEFAULT_LAYER.contains_layer(0));
    }

    #[test]
    fn test_layer_out_of_range() {
        assert_eq!(LayerMask::layer(32), Err(LayerError::OutOfRange(32)));
        assert!(LayerMask::from_layers(&[1, 33]).is_err());
    }
}
