//! tppcam Physics - Collision world using rapier3d
//!
//! Hosts the colliders the camera rig probes for occlusion. Every collider is
//! tagged with the collision layers it belongs to; ray casts take a
//! [`LayerMask`] and only report colliders on one of the masked layers.

use glam::Vec3;
use nalgebra::Unit;
use rapier3d::prelude::*;
use tppcam_core::LayerMask;
use tracing::debug;

pub use rapier3d::prelude::{Collider, ColliderBuilder, ColliderHandle, RigidBodyHandle};

/// Physics world configuration
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.81 on Y axis)
    pub gravity: Vec3,
    /// Physics timestep (default: 1/50, matching the camera tick)
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            timestep: 1.0 / 50.0,
        }
    }
}

/// Interaction groups for a collider living on the given layers.
///
/// The collider accepts interactions from every layer, so visibility in a
/// query depends on its memberships alone.
pub fn collider_groups(layers: LayerMask) -> InteractionGroups {
    InteractionGroups::new(Group::from_bits_truncate(layers.bits()), Group::ALL)
}

/// Interaction groups for a query restricted to the given layers
pub fn query_groups(mask: LayerMask) -> InteractionGroups {
    InteractionGroups::new(Group::ALL, Group::from_bits_truncate(mask.bits()))
}

/// The collision world queried by the camera rig
pub struct PhysicsWorld {
    /// Configuration
    pub config: PhysicsConfig,

    /// Rigid body storage
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,
    /// Impulse joint storage
    impulse_joint_set: ImpulseJointSet,
    /// Multi-body joint storage
    multibody_joint_set: MultibodyJointSet,

    /// Integration parameters
    integration_parameters: IntegrationParameters,
    /// Physics pipeline
    physics_pipeline: PhysicsPipeline,
    /// Island manager
    island_manager: IslandManager,
    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,
    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,
    /// Continuous collision detection solver
    ccd_solver: CCDSolver,
    /// Query pipeline for raycasts
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.timestep;

        Self {
            config,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Step the simulation, moving kinematic bodies to their next positions
    pub fn step(&mut self) {
        let gravity = vector![self.config.gravity.x, self.config.gravity.y, self.config.gravity.z];

        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        self.update_queries();
    }

    /// Refresh the query pipeline after colliders were added or moved
    /// without a simulation step.
    pub fn update_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a static collider on the given layers
    pub fn add_static_collider(
        &mut self,
        mut collider: Collider,
        layers: LayerMask,
    ) -> ColliderHandle {
        collider.set_collision_groups(collider_groups(layers));
        self.collider_set.insert(collider)
    }

    /// Add a kinematic (script-driven) body with a collider on the given layers
    pub fn add_kinematic_body(
        &mut self,
        position: Vec3,
        mut collider: Collider,
        layers: LayerMask,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let rigid_body = RigidBodyBuilder::kinematic_position_based()
            .translation(vector![position.x, position.y, position.z])
            .build();
        collider.set_collision_groups(collider_groups(layers));

        let rb_handle = self.rigid_body_set.insert(rigid_body);
        let col_handle =
            self.collider_set
                .insert_with_parent(collider, rb_handle, &mut self.rigid_body_set);
        (rb_handle, col_handle)
    }

    /// Request a kinematic body's position for the next step
    pub fn move_kinematic_body(&mut self, handle: RigidBodyHandle, position: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_next_kinematic_translation(vector![position.x, position.y, position.z]);
        }
    }

    /// Current position of a rigid body
    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(handle).map(|body| {
            let t = body.translation();
            Vec3::new(t.x, t.y, t.z)
        })
    }

    /// Get a collider by handle
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Cast a ray against colliders on the masked layers and return the first hit
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<(ColliderHandle, f32)> {
        if mask.is_empty() {
            return None;
        }

        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );
        let filter = QueryFilter::default().groups(query_groups(mask));

        self.query_pipeline
            .cast_ray(&self.rigid_body_set, &self.collider_set, &ray, max_distance, true, filter)
    }

    /// Create a ground plane collider on the default layer
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        self.create_ground_on(y, LayerMask::DEFAULT_LAYER)
    }

    /// Create a ground plane collider on the given layers
    pub fn create_ground_on(&mut self, y: f32, layers: LayerMask) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .friction(0.7)
            .build();
        self.add_static_collider(ground, layers)
    }

    /// Create a static box collider on the given layers
    pub fn create_static_box(
        &mut self,
        half_extents: Vec3,
        position: Vec3,
        layers: LayerMask,
    ) -> ColliderHandle {
        debug!(?half_extents, ?position, layers = layers.bits(), "adding static box");
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .build();
        self.add_static_collider(collider, layers)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
