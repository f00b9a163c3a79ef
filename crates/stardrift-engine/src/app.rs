//! Application run loop.
//!
//! Builds the stage, feeds it the demo script for the configured number of
//! frames and reports what happened.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::demo::DemoScript;
use crate::stage::{Stage, StageSummary};
use crate::timing::FrameTiming;

/// Runs the headless demo to completion.
pub fn run(config: &EngineConfig) -> Result<()> {
    let seed = config.resolve_seed();
    info!("Seed: {seed}");

    let mut stage = Stage::new(config, seed);
    let mut script = DemoScript::new(u64::from(config.demo_frames) / 2);
    let mut timing = FrameTiming::new(config.target_fps).with_pacing(config.realtime);
    let report_every = u64::from(timing.target_fps()) * 5;

    info!(
        "Running {} frames at {} fps{}",
        config.demo_frames,
        timing.target_fps(),
        if timing.is_paced() { " (real time)" } else { "" }
    );

    for frame in 0..u64::from(config.demo_frames) {
        timing.begin_frame();
        for event in script.events(frame, &stage) {
            stage.handle(event);
        }
        stage.tick(timing.fixed_dt());
        timing.end_frame();

        if frame > 0 && frame % report_every == 0 {
            debug!(
                "Frame {frame}: {} trail particles (trails {}), {} effects, {} nodes attached, camera z {:.2}, cursor {:?}",
                stage.trail_particle_count(),
                if stage.trails_enabled() { "on" } else { "off" },
                stage.effects().active_count(),
                stage.scene().attached_count(),
                stage.camera().position().z,
                stage.interaction().cursor()
            );
        }
    }

    info!(
        "Frame time: {:.3} ms average, {:.3} ms peak over {} frames",
        timing.average_frame_time_ms(),
        timing.peak_frame_time_ms(),
        timing.frames()
    );

    let summary = stage.shutdown().context("Scene teardown failed")?;
    report(&summary);
    Ok(())
}

fn report(summary: &StageSummary) {
    let stats = summary.stats;
    info!(
        "{} clicks ({} missed), {} effects, {} section changes",
        stats.clicks, stats.missed_clicks, summary.effects_started, stats.section_changes
    );
    info!(
        "Peak particles: {} in trails, {} in effects",
        stats.peak_trail_particles, stats.peak_effect_particles
    );
    info!(
        "Scene: {} nodes created, {} shapes released of {}, {} materials released of {}",
        summary.scene.nodes_created,
        summary.scene.shape_releases,
        summary.scene.shapes_created,
        summary.scene.material_releases,
        summary.scene.materials_created
    );

    if !summary.is_clean() {
        warn!(
            "Teardown left {} nodes, {} shapes and {} materials behind",
            summary.leaked_nodes, summary.leaked_shapes, summary.leaked_materials
        );
    }
}
