//! Fixed-step clock
//!
//! The camera rig is stepped at a fixed rate regardless of the frame rate.
//! The clock turns raw frame deltas into a whole number of fixed ticks.

use serde::{Deserialize, Serialize};

/// Configuration for the fixed-step clock
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many simulated seconds pass per real second
    pub time_scale: f32,
    /// Duration of one fixed tick (in seconds)
    pub fixed_timestep: f32,
    /// Maximum frame delta accepted, to prevent a spiral of death
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: 0.02,
            max_delta_time: 0.25,
        }
    }
}

/// Accumulates frame time and hands out fixed ticks
#[derive(Debug, Clone, Default)]
pub struct FixedStepClock {
    /// Configuration
    pub config: TimeConfig,
    /// Simulated time elapsed through completed ticks
    elapsed: f64,
    /// Number of ticks handed out so far
    tick_count: u64,
    /// Whether the clock is paused
    paused: bool,
    /// Scaled time not yet consumed by a tick
    accumulator: f32,
}

impl FixedStepClock {
    /// Create a clock with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Duration of a single tick
    pub fn dt(&self) -> f32 {
        self.config.fixed_timestep
    }

    /// Feed the raw delta of the previous frame and return how many fixed
    /// ticks should run this frame.
    pub fn advance(&mut self, raw_delta: f32) -> u32 {
        if self.paused || self.config.fixed_timestep <= 0.0 {
            return 0;
        }

        let delta = raw_delta.clamp(0.0, self.config.max_delta_time) * self.config.time_scale;
        self.accumulator += delta;

        let mut steps = 0;
        while self.accumulator >= self.config.fixed_timestep {
            self.accumulator -= self.config.fixed_timestep;
            steps += 1;
        }

        self.tick_count += u64::from(steps);
        self.elapsed += f64::from(steps) * f64::from(self.config.fixed_timestep);
        steps
    }

    /// Fraction of a tick left in the accumulator (for render interpolation)
    pub fn interpolation(&self) -> f32 {
        if self.config.fixed_timestep <= 0.0 {
            return 0.0;
        }
        self.accumulator / self.config.fixed_timestep
    }

    /// Simulated seconds covered by completed ticks
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Set the time scale (0.0 = frozen, 1.0 = normal, 2.0 = double speed)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.config.time_scale = scale.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(fixed_timestep: f32) -> FixedStepClock {
        FixedStepClock::new(TimeConfig {
            fixed_timestep,
            ..Default::default()
        })
    }

    #[test]
    fn test_whole_ticks_only() {
        let mut clock = clock(0.25);
        assert_eq!(clock.advance(0.2), 0);
        assert_eq!(clock.advance(0.2), 1);
        assert!((clock.interpolation() - 0.6).abs() < 1e-5);
        assert_eq!(clock.tick_count(), 1);
        assert!((clock.elapsed() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_large_delta_is_clamped() {
        let mut clock = clock(0.125);
        // 10 seconds of hitch is cut down to max_delta_time (0.25s)
        assert_eq!(clock.advance(10.0), 2);
    }

    #[test]
    fn test_pause_and_time_scale() {
        let mut clock = clock(0.125);
        clock.pause();
        assert_eq!(clock.advance(0.25), 0);
        assert!(clock.is_paused());

        clock.resume();
        clock.set_time_scale(2.0);
        assert_eq!(clock.advance(0.125), 2);

        clock.set_time_scale(-1.0);
        assert_eq!(clock.config.time_scale, 0.0);
        assert_eq!(clock.advance(0.2), 0);
    }
}
