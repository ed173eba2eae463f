//! Anchor tracking
//!
//! The anchor is the point the camera offset is measured from. It either
//! follows the target exactly or lags behind it, held by a dead zone.

use glam::{Vec2, Vec3};

use super::FollowMode;

/// Result of one tracking step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackStep {
    /// New anchor position
    pub anchor: Vec3,
    /// Whether the anchor moved horizontally toward the target this tick
    pub following: bool,
}

/// Compute the new anchor position from the live target position.
pub fn track(
    anchor: Vec3,
    target: Vec3,
    mode: FollowMode,
    dead_zone: Vec2,
    follow_speed: f32,
    dt: f32,
) -> TrackStep {
    match mode {
        FollowMode::Instantaneous => TrackStep {
            anchor: target,
            following: true,
        },
        FollowMode::DeadZone => {
            let following = outside_dead_zone(anchor, target, dead_zone);
            let mut next = anchor;
            if following {
                next += (target - anchor) * dt * follow_speed;
            }
            // Height is never held by the dead zone
            next.y = target.y;
            TrackStep {
                anchor: next,
                following,
            }
        }
    }
}

/// Whether the target has left the dead zone centred on the anchor
fn outside_dead_zone(anchor: Vec3, target: Vec3, dead_zone: Vec2) -> bool {
    (target.x - anchor.x).abs() > dead_zone.x || (target.z - anchor.z).abs() > dead_zone.y
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.02;

    #[test]
    fn instantaneous_snaps_to_target() {
        let targets = [
            Vec3::new(3.0, 1.0, -2.0),
            Vec3::new(-100.0, 50.0, 7.5),
            Vec3::ZERO,
        ];
        let mut anchor = Vec3::new(9.0, 9.0, 9.0);
        for target in targets {
            let step = track(anchor, target, FollowMode::Instantaneous, Vec2::ZERO, 5.0, DT);
            assert_eq!(step.anchor, target);
            anchor = step.anchor;
        }
    }

    #[test]
    fn dead_zone_holds_horizontal_position() {
        let anchor = Vec3::new(1.0, 0.0, 1.0);
        let dead_zone = Vec2::new(2.0, 3.0);
        let displacements = [
            Vec3::new(2.0, 4.0, 3.0),
            Vec3::new(-2.0, -1.0, -3.0),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
        ];
        for d in displacements {
            let target = anchor + d;
            let step = track(anchor, target, FollowMode::DeadZone, dead_zone, 5.0, DT);
            assert!(!step.following);
            assert_eq!(step.anchor.x, anchor.x);
            assert_eq!(step.anchor.z, anchor.z);
            assert_eq!(step.anchor.y, target.y);
        }
    }

    #[test]
    fn leaving_dead_zone_drags_anchor() {
        let anchor = Vec3::ZERO;
        let target = Vec3::new(10.0, 2.0, 0.0);
        let step = track(anchor, target, FollowMode::DeadZone, Vec2::new(5.0, 5.0), 5.0, DT);

        assert!(step.following);
        // 10% of the way on x, height snapped
        assert!(step.anchor.abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-5));
    }

    #[test]
    fn either_axis_triggers_follow() {
        let anchor = Vec3::ZERO;
        let dead_zone = Vec2::new(1.0, 1.0);
        let target = Vec3::new(0.5, 0.0, 1.5);
        let step = track(anchor, target, FollowMode::DeadZone, dead_zone, 5.0, DT);
        assert!(step.following);
        assert!(step.anchor.x > 0.0);
        assert!(step.anchor.z > 0.0);
    }

    #[test]
    fn zero_dead_zone_follows_any_motion() {
        let step = track(
            Vec3::ZERO,
            Vec3::new(0.01, 0.0, 0.0),
            FollowMode::DeadZone,
            Vec2::ZERO,
            5.0,
            DT,
        );
        assert!(step.following);
        assert!(step.anchor.x > 0.0 && step.anchor.x < 0.01);
    }
}
