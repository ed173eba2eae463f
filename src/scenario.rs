//! Scripted run of the camera rig against a small physics scene

use anyhow::Context;
use glam::Vec3;
use tppcam_core::{FixedStepClock, LayerMask, TargetPose, TimeConfig, Transform};
use tppcam_physics::{ColliderBuilder, PhysicsConfig, PhysicsWorld};
use tppcam_rig::{CameraConfig, CameraRig};
use tracing::{debug, info, warn};

use crate::settings::{DemoSettings, ScenarioSettings, ScheduledSetter};

/// Radius of the target's capsule
const TARGET_RADIUS: f32 = 0.4;
/// Half height of the capsule's cylinder
const TARGET_HALF_HEIGHT: f32 = 0.5;

/// What happened during a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub occluded_ticks: u64,
    pub visibility_changes: u32,
    pub setters_applied: usize,
    pub final_camera: Transform,
    pub final_target: Vec3,
}

/// Position of the walking target after `elapsed` seconds
fn target_position(scenario: &ScenarioSettings, elapsed: f32) -> Vec3 {
    let x = (-scenario.half_length + scenario.target_speed * elapsed).min(scenario.half_length);
    Vec3::new(x, 0.0, 0.0)
}

/// Build the collision scene: ground plus walls
fn build_world(scenario: &ScenarioSettings, dt: f32) -> anyhow::Result<PhysicsWorld> {
    let mut world = PhysicsWorld::with_config(PhysicsConfig {
        timestep: dt,
        ..Default::default()
    });
    world.create_ground(0.0);

    for wall in &scenario.walls {
        let layer = LayerMask::layer(wall.layer)
            .with_context(|| format!("wall at {:?} has an invalid layer", wall.position))?;
        world.create_static_box(wall.half_extents, wall.position, layer);
    }
    world.update_queries();
    Ok(world)
}

/// Run the scenario described by the settings and report what happened
pub fn run(settings: &DemoSettings) -> anyhow::Result<RunSummary> {
    let mut rig =
        CameraRig::with_config(settings.rig.clone()).context("invalid rig configuration")?;
    let scenario = &settings.scenario;
    let mut clock = FixedStepClock::new(settings.time.clone());
    let dt = clock.dt();
    anyhow::ensure!(dt > 0.0, "fixed timestep must be positive, got {}", dt);
    anyhow::ensure!(
        scenario.frame_deltas.iter().any(|&delta| delta > 0.0),
        "scenario needs at least one positive frame delta"
    );
    anyhow::ensure!(
        settings.time.time_scale > 0.0 && settings.time.max_delta_time > 0.0,
        "time scale and max frame delta must be positive, got {} and {}",
        settings.time.time_scale,
        settings.time.max_delta_time
    );
    anyhow::ensure!(scenario.duration.is_finite(), "scenario duration must be finite");

    report_overshoot(&settings.rig, &settings.time);

    let mut world = build_world(scenario, dt)?;
    let start = target_position(scenario, 0.0);
    let (target_body, _) = world.add_kinematic_body(
        start,
        ColliderBuilder::capsule_y(TARGET_HALF_HEIGHT, TARGET_RADIUS).build(),
        LayerMask::DEFAULT_LAYER,
    );

    let mut pending: Vec<&ScheduledSetter> = settings.setters.iter().collect();
    pending.sort_by(|a, b| a.at_seconds.total_cmp(&b.at_seconds));
    let mut pending = pending.into_iter().peekable();

    let mut camera = Transform::from_position(start + settings.rig.target_offset_visible);
    let mut summary = RunSummary {
        ticks: 0,
        occluded_ticks: 0,
        visibility_changes: 0,
        setters_applied: 0,
        final_camera: camera,
        final_target: start,
    };
    let mut was_visible = true;
    let mut next_report = 0.0_f64;

    let mut frames = scenario.frame_deltas.iter().cycle();
    while clock.elapsed() < f64::from(scenario.duration) {
        let Some(&frame_delta) = frames.next() else {
            break;
        };

        for _ in 0..clock.advance(frame_delta) {
            let elapsed = summary.ticks as f64 * f64::from(dt);

            while let Some(scheduled) = pending.next_if(|s| s.at_seconds <= elapsed) {
                info!(at = scheduled.at_seconds, "applying scheduled camera setter");
                scheduled.setter.apply(&mut rig);
                summary.setters_applied += 1;
            }

            world.move_kinematic_body(target_body, target_position(scenario, elapsed as f32 + dt));
            world.step();

            let target = world
                .body_position(target_body)
                .map(TargetPose::at)
                .context("target body missing from physics world")?;

            rig.tick(&mut camera, Some(&target), &world, dt);
            summary.ticks += 1;
            summary.final_target = target.position;

            let visible = rig.is_target_visible();
            if !visible {
                summary.occluded_ticks += 1;
            }
            if visible != was_visible {
                summary.visibility_changes += 1;
                info!(t = elapsed, visible, target = ?target.position, "line of sight changed");
                was_visible = visible;
            }

            if elapsed >= next_report {
                info!(
                    t = elapsed,
                    camera = ?camera.position,
                    forward = ?camera.forward(),
                    anchor = ?rig.anchor_position(),
                    "camera pose"
                );
                next_report += f64::from(scenario.report_interval.max(dt));
            }
        }
    }

    debug!(ticks = summary.ticks, "run finished");
    summary.final_camera = camera;
    Ok(summary)
}

fn report_overshoot(rig: &CameraConfig, time: &TimeConfig) {
    for (name, factor) in rig.overshoot_factors(time.fixed_timestep) {
        warn!(
            setting = name,
            factor,
            "interpolation factor above 1 overshoots every tick; set clamp_interpolation to cap it"
        );
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use tppcam_rig::{CameraOverrides, CameraSetter, FollowMode, PropertyFlags};

    use super::*;

    #[test]
    fn test_target_path_is_clamped() {
        let scenario = ScenarioSettings::default();
        assert_eq!(target_position(&scenario, 0.0), Vec3::new(-6.0, 0.0, 0.0));
        assert_eq!(target_position(&scenario, 100.0), Vec3::new(6.0, 0.0, 0.0));
    }

    #[test]
    fn test_default_run_passes_behind_wall() {
        let summary = run(&DemoSettings::default()).unwrap();

        assert!(summary.ticks >= 300);
        assert!(summary.occluded_ticks > 0);
        assert!(summary.occluded_ticks < summary.ticks);
        assert_eq!(summary.visibility_changes, 2);
        assert!(summary.final_camera.position.is_finite());
        assert!(summary.final_camera.rotation.is_finite());
    }

    #[test]
    fn test_run_without_walls_stays_visible() {
        let mut settings = DemoSettings::default();
        settings.scenario.walls.clear();
        settings.rig.mode = FollowMode::DeadZone;
        settings.rig.dead_zone = Vec2::new(1.0, 1.0);

        let summary = run(&settings).unwrap();
        assert_eq!(summary.occluded_ticks, 0);
        assert_eq!(summary.visibility_changes, 0);
    }

    #[test]
    fn test_scheduled_setters_fire_once() {
        let mut settings = DemoSettings::default();
        settings.setters = vec![
            ScheduledSetter {
                at_seconds: 4.0,
                setter: CameraSetter::new(
                    PropertyFlags::LOOK_AT_OFFSET,
                    CameraOverrides {
                        look_at_offset: Vec2::new(0.0, 3.0),
                        ..Default::default()
                    },
                ),
            },
            ScheduledSetter {
                at_seconds: 1.0,
                setter: CameraSetter::new(
                    PropertyFlags::CAMERA_OFFSET,
                    CameraOverrides {
                        camera_offset: Vec3::new(0.0, 3.0, -6.0),
                        ..Default::default()
                    },
                ),
            },
        ];

        let summary = run(&settings).unwrap();
        assert_eq!(summary.setters_applied, 2);
    }

    #[test]
    fn test_invalid_wall_layer_is_an_error() {
        let mut settings = DemoSettings::default();
        settings.scenario.walls[0].layer = 40;
        assert!(run(&settings).is_err());
    }

    #[test]
    fn test_stalled_clock_is_an_error() {
        let mut settings = DemoSettings::default();
        settings.scenario.frame_deltas = vec![0.0];
        assert!(run(&settings).is_err());

        let mut settings = DemoSettings::default();
        settings.time.time_scale = 0.0;
        assert!(run(&settings).is_err());

        let mut settings = DemoSettings::default();
        settings.time.max_delta_time = 0.0;
        assert!(run(&settings).is_err());
    }

    #[test]
    fn test_invalid_rig_config_is_an_error() {
        let mut settings = DemoSettings::default();
        settings.rig.follow_speed = -2.0;
        assert!(run(&settings).is_err());
    }
}
