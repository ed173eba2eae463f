//! Camera rig module
//!
//! Third-person follow camera that keeps its target framed and switches to an
//! alternate framing while the line of sight is blocked.

pub mod blender;
pub mod composer;
mod config;
mod controller;
pub mod occlusion;
pub mod tracker;

pub use config::{CameraConfig, FollowMode, DEFAULT_OCCLUSION_LAYER};
pub use controller::{CameraRig, RigState};
pub use occlusion::{NoOcclusion, OcclusionQuery, OCCLUSION_RAY_EPSILON};
