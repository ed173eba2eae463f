//! tppcam Core - Core types and utilities for the tppcam camera rig
//!
//! This crate provides the foundational types shared by the rig and its host:
//! - Mathematical primitives (re-exported from glam)
//! - Transform and target pose types
//! - Collision layer masks
//! - Fixed-step clock driving the per-tick camera update

pub mod math;
pub mod time;
pub mod types;

pub use glam::{Mat3, Quat, Vec2, Vec3};
pub use time::{FixedStepClock, TimeConfig};
pub use types::{LayerError, LayerMask, TargetPose, Transform};
