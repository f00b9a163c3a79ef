//! Click bursts.
//!
//! A burst is a fixed-size cloud of particles spawned at one point. Every
//! particle gets its own size and velocity; drag slows them down while they
//! fade out, and the burst finishes once the last particle retires.
//!
//! Bursts take only value inputs (position, color), so they outlive whatever
//! object was clicked.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use stardrift_common::Color;
use tracing::debug;

use crate::effects::{Effect, EffectList, EffectStatus};
use crate::particle::{Lifecycle, ParticleRecord, ParticleSpawn};
use crate::scene::Scene;

/// Burst settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstConfig {
    /// Particles per burst
    pub count: usize,
    /// Smallest particle radius (inclusive)
    pub min_size: f32,
    /// Largest particle radius (exclusive)
    pub max_size: f32,
    /// Per-axis velocity half-width
    pub speed: f32,
    /// Per-tick velocity multiplier
    pub damping: f32,
    /// Ticks a particle lives
    pub lifespan_frames: u32,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            count: 20,
            min_size: 0.02,
            max_size: 0.07,
            speed: 0.05,
            damping: 0.95,
            lifespan_frames: 60,
        }
    }
}

impl BurstConfig {
    /// Clamps settings to usable ranges.
    pub fn validate(&mut self) {
        self.count = self.count.clamp(1, 1024);
        self.min_size = self.min_size.max(0.001);
        self.max_size = self.max_size.max(self.min_size);
        self.speed = self.speed.max(0.0);
        self.damping = self.damping.clamp(0.0, 1.0);
        self.lifespan_frames = self.lifespan_frames.max(1);
    }
}

/// A self-terminating particle explosion.
#[derive(Debug)]
pub struct BurstEmitter {
    particles: Vec<ParticleRecord>,
    damping: f32,
    ticks: u32,
}

impl BurstEmitter {
    /// Spawns and attaches every particle of the burst at once.
    pub fn spawn<S: Scene + ?Sized>(
        scene: &mut S,
        position: Vec3,
        color: Color,
        config: &BurstConfig,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let mut particles = Vec::with_capacity(config.count);
        for _ in 0..config.count {
            let velocity = Vec3::new(
                (rng.f32() * 2.0 - 1.0) * config.speed,
                (rng.f32() * 2.0 - 1.0) * config.speed,
                (rng.f32() * 2.0 - 1.0) * config.speed,
            );
            let radius = config.min_size + rng.f32() * (config.max_size - config.min_size);
            particles.push(ParticleRecord::spawn(
                scene,
                ParticleSpawn {
                    position,
                    radius,
                    color,
                    lifespan_frames: config.lifespan_frames,
                    velocity,
                },
            ));
        }

        debug!("Burst of {} at {position}", config.count);
        Self {
            particles,
            damping: config.damping,
            ticks: 0,
        }
    }

    /// Advances the burst by one tick.
    pub fn update<S: Scene + ?Sized>(&mut self, scene: &mut S) -> EffectStatus {
        self.ticks += 1;
        let damping = self.damping;
        let live = std::mem::take(&mut self.particles);
        self.particles.reserve(live.len());

        for mut particle in live {
            match particle.advance() {
                Lifecycle::Expired => particle.retire(scene),
                Lifecycle::Alive => {
                    particle.drift(scene, damping);
                    particle.fade(scene);
                    self.particles.push(particle);
                },
            }
        }

        self.status()
    }

    /// Running while any particle is live.
    #[must_use]
    pub fn status(&self) -> EffectStatus {
        if self.particles.is_empty() {
            EffectStatus::Finished
        } else {
            EffectStatus::Running
        }
    }

    /// Retires every live particle immediately.
    pub fn dispose<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        for particle in self.particles.drain(..) {
            particle.retire(scene);
        }
    }

    /// Live particles.
    pub fn particles(&self) -> impl Iterator<Item = &ParticleRecord> {
        self.particles.iter()
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether every particle has retired.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Ticks since the burst was triggered.
    #[must_use]
    pub const fn ticks(&self) -> u32 {
        self.ticks
    }
}

/// Fires a burst into `effects`. No handle is returned; the effect list owns
/// the burst until its last particle retires.
pub fn trigger_burst<S: Scene + ?Sized>(
    effects: &mut EffectList,
    scene: &mut S,
    position: Vec3,
    color: Color,
    config: &BurstConfig,
    rng: &mut fastrand::Rng,
) {
    let burst = BurstEmitter::spawn(scene, position, color, config, rng);
    effects.push(Effect::Burst(burst));
}
