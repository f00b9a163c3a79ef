//! # Stardrift
//!
//! Headless driver for the Stardrift landing page scene.
//!
//! This binary ties the crates together:
//! - Kernel: particle trails, bursts, pulses and the starfield
//! - Gameplay: interactive objects, camera, picking and tweens
//! - Engine: configuration, frame pacing and a scripted demo run
//!
//! Usage: `stardrift [config.toml]`. A named config file must exist and parse.
//! Without an argument the config is read from the platform config directory,
//! falling back to defaults.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod demo;
mod input;
mod stage;
mod timing;

use anyhow::Result;
use config::EngineConfig;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("stardrift=info".parse()?))
        .init();

    info!("Project Stardrift starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_required(path)?,
        None => EngineConfig::load(),
    };
    config.validate();

    app::run(&config)?;

    info!("Project Stardrift shutdown complete");
    Ok(())
}
