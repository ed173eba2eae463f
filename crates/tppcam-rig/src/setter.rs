//! Runtime retuning of a camera rig
//!
//! A [`CameraSetter`] carries replacement values for the visible framing and a
//! set of flags choosing which of them to write. Level scripts keep setters
//! around and apply them to a rig when the player enters a new area.

use std::ops::{BitOr, BitOrAssign};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::camera::CameraRig;

/// Selection of rig properties an override writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyFlags(u8);

impl PropertyFlags {
    pub const NONE: PropertyFlags = PropertyFlags(0);
    /// Visible camera offset
    pub const CAMERA_OFFSET: PropertyFlags = PropertyFlags(0x01);
    /// Visible look-at offset
    pub const LOOK_AT_OFFSET: PropertyFlags = PropertyFlags(0x02);
    pub const ALL: PropertyFlags = PropertyFlags(0x03);

    /// Build from raw bits, dropping unknown ones
    pub const fn from_bits_truncate(bits: u8) -> Self {
        PropertyFlags(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: PropertyFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for PropertyFlags {
    type Output = PropertyFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        PropertyFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for PropertyFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Replacement values for the visible framing
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOverrides {
    /// New visible camera offset
    pub camera_offset: Vec3,
    /// New visible look-at offset
    pub look_at_offset: Vec2,
}

/// Stored override, applied to a rig on demand
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSetter {
    /// Which properties to write
    pub properties: PropertyFlags,
    /// Values to write
    pub overrides: CameraOverrides,
}

impl CameraSetter {
    pub fn new(properties: PropertyFlags, overrides: CameraOverrides) -> Self {
        Self {
            properties,
            overrides,
        }
    }

    /// Write the selected properties to the rig
    pub fn apply(&self, rig: &mut CameraRig) {
        rig.apply_overrides(self.properties, &self.overrides);
    }
}
