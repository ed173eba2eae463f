//! Line-of-sight probe between the camera's home position and the target

use glam::Vec3;
use tppcam_core::LayerMask;
use tppcam_physics::PhysicsWorld;

/// Amount the probe ray is shortened so it stops before the ground under the target
pub const OCCLUSION_RAY_EPSILON: f32 = 0.1;

/// Ray query used to decide whether the target is occluded
pub trait OcclusionQuery {
    /// Whether a ray from `origin` along the unit `direction` hits any collider
    /// on a layer in `mask` within `max_distance`.
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> bool;
}

impl OcclusionQuery for PhysicsWorld {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> bool {
        self.raycast(origin, direction, max_distance, mask).is_some()
    }
}

impl<F> OcclusionQuery for F
where
    F: Fn(Vec3, Vec3, f32, LayerMask) -> bool,
{
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> bool {
        self(origin, direction, max_distance, mask)
    }
}

/// Query for hosts without collision geometry: nothing ever blocks the view
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOcclusion;

impl OcclusionQuery for NoOcclusion {
    fn cast(&self, _: Vec3, _: Vec3, _: f32, _: LayerMask) -> bool {
        false
    }
}

/// Whether the target is visible from its nominal camera position.
///
/// The nominal position is `target + nominal_offset`, i.e. the configured
/// visible offset rather than the currently blended one. When the two points
/// are too close for a ray to be cast the target counts as visible.
pub fn target_visible<Q>(query: &Q, target: Vec3, nominal_offset: Vec3, mask: LayerMask) -> bool
where
    Q: OcclusionQuery + ?Sized,
{
    let origin = target + nominal_offset;
    let to_target = target - origin;

    let Some(direction) = to_target.try_normalize() else {
        return true;
    };
    let max_distance = to_target.length() - OCCLUSION_RAY_EPSILON;
    if max_distance <= 0.0 {
        return true;
    }

    !query.cast(origin, direction, max_distance, mask)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    const WALL_LAYER: u32 = 9;

    fn wall_world(layer: u32) -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        world.create_static_box(
            Vec3::new(2.0, 2.0, 0.2),
            Vec3::new(0.0, 1.0, -2.5),
            LayerMask::layer(layer).unwrap(),
        );
        world.update_queries();
        world
    }

    #[test]
    fn ray_runs_from_nominal_point_toward_target() {
        let calls = Cell::new(0);
        let query = |origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask| {
            calls.set(calls.get() + 1);
            assert!(origin.abs_diff_eq(Vec3::new(0.0, 3.0, 4.0), 1e-6));
            assert!(direction.abs_diff_eq(Vec3::new(0.0, -0.6, -0.8), 1e-6));
            assert!((max_distance - 4.9).abs() < 1e-5);
            assert_eq!(mask, LayerMask(1 << WALL_LAYER));
            false
        };

        let mask = LayerMask(1 << WALL_LAYER);
        assert!(target_visible(&query, Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0), mask));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn hit_means_occluded() {
        let blocked = |_: Vec3, _: Vec3, _: f32, _: LayerMask| true;
        assert!(!target_visible(&blocked, Vec3::ZERO, Vec3::new(0.0, 2.0, -5.0), LayerMask::ALL));
        assert!(target_visible(
            &NoOcclusion,
            Vec3::ZERO,
            Vec3::new(0.0, 2.0, -5.0),
            LayerMask::ALL
        ));
    }

    #[test]
    fn degenerate_offsets_count_as_visible() {
        let blocked = |_: Vec3, _: Vec3, _: f32, _: LayerMask| true;
        assert!(target_visible(&blocked, Vec3::ONE, Vec3::ZERO, LayerMask::ALL));
        assert!(target_visible(&blocked, Vec3::ONE, Vec3::new(0.05, 0.0, 0.0), LayerMask::ALL));
    }

    #[test]
    fn wall_on_masked_layer_blocks_view() {
        let world = wall_world(WALL_LAYER);
        let mask = LayerMask::layer(WALL_LAYER).unwrap();
        assert!(!target_visible(&world, Vec3::ZERO, Vec3::new(0.0, 2.0, -5.0), mask));
        // Viewed from the other side nothing is in the way
        assert!(target_visible(&world, Vec3::ZERO, Vec3::new(0.0, 2.0, 5.0), mask));
    }

    #[test]
    fn wall_on_other_layer_is_ignored() {
        let world = wall_world(4);
        let mask = LayerMask::layer(WALL_LAYER).unwrap();
        assert!(target_visible(&world, Vec3::ZERO, Vec3::new(0.0, 2.0, -5.0), mask));
    }

    #[test]
    fn ground_under_target_is_not_hit() {
        // Ground on the masked layer; the shortened ray stops before the target's feet
        let mask = LayerMask::layer(WALL_LAYER).unwrap();
        let mut world = PhysicsWorld::new();
        world.create_ground_on(0.0, mask);
        world.update_queries();
        assert!(target_visible(&world, Vec3::ZERO, Vec3::new(0.0, 2.0, -5.0), mask));
    }

    #[test]
    fn probe_is_deterministic() {
        let world = wall_world(WALL_LAYER);
        let mask = LayerMask::layer(WALL_LAYER).unwrap();
        let first = target_visible(&world, Vec3::ZERO, Vec3::new(0.0, 2.0, -5.0), mask);
        for _ in 0..16 {
            assert_eq!(
                target_visible(&world, Vec3::ZERO, Vec3::new(0.0, 2.0, -5.0), mask),
                first
            );
        }
    }
}
