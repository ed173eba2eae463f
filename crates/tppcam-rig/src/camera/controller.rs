//! Third-person camera rig
//!
//! Each tick runs four stages in order: anchor tracking, the occlusion probe,
//! offset blending and pose composition.

use glam::Vec3;
use tppcam_core::{TargetPose, Transform};
use tracing::{debug, trace};

use super::blender::{blend, expand_look_at};
use super::composer::{compose, PoseInputs};
use super::occlusion::{target_visible, OcclusionQuery};
use super::tracker::track;
use super::{CameraConfig, FollowMode};
use crate::error::ConfigError;
use crate::setter::{CameraOverrides, PropertyFlags};

/// Runtime state, created when the rig first engages a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigState {
    /// Point the camera offset is measured from
    pub anchor_position: Vec3,
    /// Offset currently applied to the anchor
    pub lerped_offset: Vec3,
    /// Result of the latest occlusion probe
    pub target_visible: bool,
    /// Look-at offset built on the latest tick
    pub look_at_offset: Vec3,
    /// Target position seen on the previous tick
    pub last_target_position: Vec3,
}

impl RigState {
    fn engage(target: Vec3, config: &CameraConfig) -> Self {
        Self {
            anchor_position: target,
            lerped_offset: config.target_offset_visible,
            target_visible: true,
            look_at_offset: expand_look_at(
                config.look_at_offset_visible,
                config.target_offset_visible,
            ),
            last_target_position: target,
        }
    }
}

/// Third-person follow camera
#[derive(Debug, Clone)]
pub struct CameraRig {
    /// Configuration
    config: CameraConfig,
    /// Runtime state, `None` until a target has been seen
    state: Option<RigState>,
}

impl CameraRig {
    /// Create a rig with the default configuration
    pub fn new() -> Self {
        Self {
            config: CameraConfig::default(),
            state: None,
        }
    }

    /// Create a rig with a custom configuration
    pub fn with_config(config: CameraConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: None,
        })
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Replace the configuration. Runtime state is kept, so the camera
    /// blends into the new framing instead of jumping.
    pub fn set_config(&mut self, config: CameraConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Overwrite the visible framing fields selected by `flags`
    pub fn apply_overrides(&mut self, flags: PropertyFlags, overrides: &CameraOverrides) {
        if flags.contains(PropertyFlags::CAMERA_OFFSET) {
            debug!(offset = ?overrides.camera_offset, "overriding visible camera offset");
            self.config.target_offset_visible = overrides.camera_offset;
        }
        if flags.contains(PropertyFlags::LOOK_AT_OFFSET) {
            debug!(offset = ?overrides.look_at_offset, "overriding visible look-at offset");
            self.config.look_at_offset_visible = overrides.look_at_offset;
        }
    }

    /// Runtime state, if a target has been engaged
    pub fn state(&self) -> Option<&RigState> {
        self.state.as_ref()
    }

    pub fn anchor_position(&self) -> Option<Vec3> {
        self.state.map(|s| s.anchor_position)
    }

    pub fn lerped_offset(&self) -> Option<Vec3> {
        self.state.map(|s| s.lerped_offset)
    }

    pub fn look_at_offset(&self) -> Option<Vec3> {
        self.state.map(|s| s.look_at_offset)
    }

    /// Whether the target was visible on the latest tick (true before engagement)
    pub fn is_target_visible(&self) -> bool {
        self.state.map_or(true, |s| s.target_visible)
    }

    /// Forget the engaged target; the next tick re-initialises from scratch
    pub fn disengage(&mut self) {
        self.state = None;
    }

    /// Advance the rig by one fixed tick of length `dt` and write the new
    /// pose to `camera`.
    ///
    /// Does nothing when there is no target.
    pub fn tick<Q>(
        &mut self,
        camera: &mut Transform,
        target: Option<&TargetPose>,
        query: &Q,
        dt: f32,
    ) where
        Q: OcclusionQuery + ?Sized,
    {
        let Some(target) = target else {
            return;
        };
        let config = &self.config;

        let mut state = match self.state {
            Some(state) => state,
            None => {
                debug!(position = ?target.position, "engaging target");
                RigState::engage(target.position, config)
            }
        };

        let step = track(
            state.anchor_position,
            target.position,
            config.mode,
            config.dead_zone,
            config.follow_speed,
            dt,
        );
        state.anchor_position = step.anchor;

        let visible = target_visible(
            query,
            target.position,
            config.target_offset_visible,
            config.occlusion_mask,
        );
        if visible != state.target_visible {
            debug!(visible, "target visibility changed");
        }
        state.target_visible = visible;

        let lead = velocity_lead(
            config,
            target.position - state.last_target_position,
            step.following,
            dt,
        );
        let blended = blend(config, visible, state.lerped_offset, lead, dt);
        state.lerped_offset = blended.lerped_offset;
        state.look_at_offset = blended.look_at_offset;

        let (position_factor, rotation_factor) = interpolation_factors(config, dt);
        compose(
            camera,
            &PoseInputs {
                anchor: state.anchor_position,
                lerped_offset: state.lerped_offset,
                look_at_offset: state.look_at_offset,
                target_up: target.up,
                position_factor,
                rotation_factor,
            },
        );

        state.last_target_position = target.position;
        self.state = Some(state);

        trace!(position = ?camera.position, rotation = ?camera.rotation, visible, "camera tick");
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

/// Offset added to the selected framing to lead a moving target
fn velocity_lead(config: &CameraConfig, displacement: Vec3, following: bool, dt: f32) -> Vec3 {
    if config.velocity_lead == Vec3::ZERO || dt <= 0.0 {
        return Vec3::ZERO;
    }
    // A target held by the dead zone does not push the camera
    if config.mode == FollowMode::DeadZone && !following {
        return Vec3::ZERO;
    }
    displacement / dt * config.velocity_lead
}

fn interpolation_factors(config: &CameraConfig, dt: f32) -> (f32, f32) {
    let position = config.follow_speed * dt;
    let rotation = config.rotation_speed * dt;
    if config.clamp_interpolation {
        (position.clamp(0.0, 1.0), rotation.clamp(0.0, 1.0))
    } else {
        (position, rotation)
    }
}
