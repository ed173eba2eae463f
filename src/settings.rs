//! Demo settings with persistence
//!
//! Settings are read from `~/.config/tppcam/demo.toml` unless a path is given
//! on the command line.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tppcam_core::TimeConfig;
use tppcam_rig::camera::DEFAULT_OCCLUSION_LAYER;
use tppcam_rig::{CameraConfig, CameraSetter};
use tracing::{info, warn};

/// All demo settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    pub rig: CameraConfig,
    pub time: TimeConfig,
    pub scenario: ScenarioSettings,
    /// Overrides applied to the rig part-way through the run
    pub setters: Vec<ScheduledSetter>,
}

impl DemoSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tppcam"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("demo.toml"))
    }

    /// Load settings from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load settings from a file, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file at {:?}, using defaults", path);
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to the default location
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let Some(path) = Self::settings_path() else {
            anyhow::bail!("Could not determine config directory");
        };
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to a file, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Obstacle placed between the camera and the target's path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallSettings {
    pub position: Vec3,
    pub half_extents: Vec3,
    /// Collision layer of the wall
    pub layer: u32,
}

impl Default for WallSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, -2.5),
            half_extents: Vec3::new(1.0, 1.5, 0.2),
            layer: DEFAULT_OCCLUSION_LAYER,
        }
    }
}

/// Scripted target walk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSettings {
    /// Length of the run in simulated seconds
    pub duration: f32,
    /// Target walks along x from `-half_length` to `half_length`
    pub half_length: f32,
    /// Target walking speed (units per second)
    pub target_speed: f32,
    /// Obstacles on the walk
    pub walls: Vec<WallSettings>,
    /// Frame deltas fed to the fixed-step clock, cycled
    pub frame_deltas: Vec<f32>,
    /// Seconds between pose summaries in the log
    pub report_interval: f32,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            duration: 6.0,
            half_length: 6.0,
            target_speed: 2.0,
            walls: vec![WallSettings::default()],
            frame_deltas: vec![1.0 / 60.0, 1.0 / 30.0, 1.0 / 45.0],
            report_interval: 1.0,
        }
    }
}

/// Setter fired once the run reaches `at_seconds`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledSetter {
    pub at_seconds: f64,
    #[serde(flatten)]
    pub setter: CameraSetter,
}
