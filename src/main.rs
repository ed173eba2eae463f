//! tppcam - headless driver for the third-person camera rig
//!
//! Walks a target past a wall on the occlusion layer and logs how the camera
//! reframes. Pass a settings file path as the first argument, or
//! `--write-defaults` to store the default settings in the config directory.

mod scenario;
mod settings;

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use settings::DemoSettings;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting tppcam demo...");

    let settings = match std::env::args().nth(1) {
        Some(flag) if flag == "--write-defaults" => {
            let path = DemoSettings::default().save()?;
            info!("Wrote default settings to {:?}", path);
            return Ok(());
        }
        Some(path) => DemoSettings::load_from(&PathBuf::from(path)),
        None => DemoSettings::load(),
    };

    let summary = scenario::run(&settings)?;
    info!(
        ticks = summary.ticks,
        occluded_ticks = summary.occluded_ticks,
        visibility_changes = summary.visibility_changes,
        setters_applied = summary.setters_applied,
        camera = ?summary.final_camera.position,
        target = ?summary.final_target,
        "Run complete"
    );

    Ok(())
}
