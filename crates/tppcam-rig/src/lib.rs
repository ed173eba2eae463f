//! tppcam Rig - Third-person follow camera
//!
//! Provides the camera rig that tracks a target, probes line of sight and
//! blends between visible and occluded framing, plus the override interface
//! used to retune a rig at runtime.

pub mod camera;
pub mod error;
pub mod setter;

pub use camera::{CameraConfig, CameraRig, FollowMode, OcclusionQuery};
pub use error::ConfigError;
pub use setter::{CameraOverrides, CameraSetter, PropertyFlags};
