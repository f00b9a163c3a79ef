//! Motion trails.
//!
//! A [`TrailEmitter`] follows one target node and drops small fading
//! particles behind it while it moves:
//! - Emission is throttled to one particle every `emission_rate` moving ticks
//! - Stationary ticks neither emit nor advance the throttle counter
//! - Live particles are capped; the oldest is evicted first
//! - Particles fade linearly and shrink geometrically until they retire
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use stardrift_common::Color;
//! use stardrift_kernel::scene::{MaterialDesc, MemoryScene, Scene, ShapeDesc};
//! use stardrift_kernel::trail::{TrailConfig, TrailEmitter};
//!
//! let mut scene = MemoryScene::new();
//! let shape = scene.create_shape(ShapeDesc::particle(0.3));
//! let material = scene.create_material(MaterialDesc::lambert(Color::WHITE));
//! let target = scene.create_node(shape, material, Vec3::ZERO);
//! scene.attach(target);
//!
//! let mut trail = TrailEmitter::new(
//!     target,
//!     Color::WHITE,
//!     &scene,
//!     TrailConfig::default(),
//!     fastrand::Rng::with_seed(7),
//! );
//!
//! for frame in 1..=4 {
//!     scene.set_position(target, Vec3::new(frame as f32 * 0.1, 0.0, 0.0));
//!     trail.update(&mut scene);
//! }
//! assert_eq!(trail.len(), 2);
//!
//! trail.dispose(&mut scene);
//! ```

use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use stardrift_common::{Color, NodeId};
use tracing::{debug, warn};

use crate::particle::{Lifecycle, ParticleRecord, ParticleSpawn};
use crate::scene::Scene;

/// Upper bound on the particle buffer reserved up front
const PREALLOCATED_PARTICLES: usize = 64;

/// Trail emitter settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Maximum live particles per emitter
    pub capacity: usize,
    /// Moving ticks per emitted particle
    pub emission_rate: u32,
    /// Rate used during an emphasis window
    pub emphasis_rate: u32,
    /// Length of an emphasis window in seconds
    pub emphasis_seconds: f32,
    /// Ticks a particle lives
    pub lifespan_frames: u32,
    /// Distance the target must move in one tick to count as moving
    pub movement_threshold: f32,
    /// Per-axis spawn jitter half-width
    pub jitter: f32,
    /// Particle radius
    pub particle_radius: f32,
    /// Per-tick scale multiplier
    pub shrink_factor: f32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            capacity: 50,
            emission_rate: 2,
            emphasis_rate: 1,
            emphasis_seconds: 1.0,
            lifespan_frames: 40,
            movement_threshold: 0.001,
            jitter: 0.025,
            particle_radius: 0.03,
            shrink_factor: 0.98,
        }
    }
}

impl TrailConfig {
    /// Clamps settings to usable ranges.
    pub fn validate(&mut self) {
        self.capacity = self.capacity.clamp(1, 4096);
        self.emission_rate = self.emission_rate.max(1);
        self.emphasis_rate = self.emphasis_rate.max(1);
        self.emphasis_seconds = self.emphasis_seconds.max(0.0);
        self.lifespan_frames = self.lifespan_frames.max(1);
        self.movement_threshold = self.movement_threshold.max(0.0);
        self.jitter = self.jitter.max(0.0);
        self.particle_radius = self.particle_radius.max(0.001);
        self.shrink_factor = self.shrink_factor.clamp(0.0, 1.0);
    }
}

/// Emits a fading particle trail behind one moving node.
#[derive(Debug)]
pub struct TrailEmitter {
    target: NodeId,
    color: Color,
    config: TrailConfig,
    particles: VecDeque<ParticleRecord>,
    last_known_position: Vec3,
    emission_rate: u32,
    frame_counter: u64,
    rng: fastrand::Rng,
}

impl TrailEmitter {
    /// Creates an emitter bound to `target`.
    ///
    /// The target's current position becomes the motion reference. A target
    /// the scene does not know yet starts from the origin.
    pub fn new<S: Scene + ?Sized>(
        target: NodeId,
        color: Color,
        scene: &S,
        config: TrailConfig,
        rng: fastrand::Rng,
    ) -> Self {
        Self {
            target,
            color,
            emission_rate: config.emission_rate.max(1),
            particles: VecDeque::with_capacity(config.capacity.min(PREALLOCATED_PARTICLES)),
            last_known_position: scene.position(target).unwrap_or(Vec3::ZERO),
            frame_counter: 0,
            config,
            rng,
        }
    }

    /// Per-frame update: throttled emission while moving, then aging.
    pub fn update<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        if let Some(current) = scene.position(self.target) {
            if current.distance(self.last_known_position) > self.config.movement_threshold {
                self.frame_counter += 1;
                if self.frame_counter % u64::from(self.emission_rate) == 0 {
                    self.spawn_at(scene, current);
                }
                self.last_known_position = current;
            }
        }
        self.decay(scene);
    }

    /// Ages every live particle by one tick without emitting.
    ///
    /// Expired particles are retired; the rest fade and shrink.
    pub fn decay<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        let shrink = self.config.shrink_factor;
        let live = std::mem::take(&mut self.particles);
        self.particles.reserve(live.len());

        for mut particle in live {
            match particle.advance() {
                Lifecycle::Expired => particle.retire(scene),
                Lifecycle::Alive => {
                    particle.fade(scene);
                    particle.shrink(scene, shrink);
                    self.particles.push_back(particle);
                },
            }
        }
    }

    /// Emits one particle at the target's current position.
    ///
    /// Returns `false` when the target is no longer in the scene.
    pub fn emit_particle<S: Scene + ?Sized>(&mut self, scene: &mut S) -> bool {
        match scene.position(self.target) {
            Some(origin) => {
                self.spawn_at(scene, origin);
                true
            },
            None => false,
        }
    }

    fn spawn_at<S: Scene + ?Sized>(&mut self, scene: &mut S, origin: Vec3) {
        let jitter = Vec3::new(self.jitter(), self.jitter(), self.jitter());
        let particle = ParticleRecord::spawn(
            scene,
            ParticleSpawn {
                position: origin + jitter,
                radius: self.config.particle_radius,
                color: self.color,
                lifespan_frames: self.config.lifespan_frames,
                velocity: Vec3::ZERO,
            },
        );
        self.particles.push_back(particle);

        while self.particles.len() > self.config.capacity {
            if let Some(oldest) = self.particles.pop_front() {
                debug!(
                    "Trail on {} at capacity {}, evicting {}",
                    self.target,
                    self.config.capacity,
                    oldest.visual()
                );
                oldest.retire(scene);
            }
        }
    }

    fn jitter(&mut self) -> f32 {
        (self.rng.f32() * 2.0 - 1.0) * self.config.jitter
    }

    /// Changes the tint of particles emitted from now on.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Overrides the emission rate. Zero is treated as one.
    pub fn set_emission_rate(&mut self, rate: u32) {
        self.emission_rate = rate.max(1);
    }

    /// Switches to the configured emphasis rate.
    pub fn emphasize(&mut self) {
        self.set_emission_rate(self.config.emphasis_rate);
    }

    /// Restores the configured emission rate.
    pub fn restore_default_rate(&mut self) {
        self.emission_rate = self.config.emission_rate.max(1);
    }

    /// Retires every live particle. Safe to call repeatedly.
    pub fn dispose<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        if !self.particles.is_empty() {
            debug!(
                "Disposing trail on {} with {} particles",
                self.target,
                self.particles.len()
            );
        }
        for particle in self.particles.drain(..) {
            particle.retire(scene);
        }
    }

    /// Node this trail follows.
    #[must_use]
    pub const fn target(&self) -> NodeId {
        self.target
    }

    /// Current emission tint.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Current emission rate.
    #[must_use]
    pub const fn emission_rate(&self) -> u32 {
        self.emission_rate
    }

    /// Moving ticks counted so far.
    #[must_use]
    pub const fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Settings this emitter was built with.
    #[must_use]
    pub const fn config(&self) -> &TrailConfig {
        &self.config
    }

    /// Live particles, oldest first.
    pub fn particles(&self) -> impl Iterator<Item = &ParticleRecord> {
        self.particles.iter()
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether no particles are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

impl Drop for TrailEmitter {
    fn drop(&mut self) {
        if !self.particles.is_empty() {
            warn!(
                "Trail on {} dropped with {} live particles; resources leaked",
                self.target,
                self.particles.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MaterialDesc, MemoryScene, ShapeDesc};
    use proptest::prelude::*;

    fn target(scene: &mut MemoryScene) -> NodeId {
        let shape = scene.create_shape(ShapeDesc::Box {
            width: 0.5,
            height: 0.5,
            depth: 0.5,
        });
        let material = scene.create_material(MaterialDesc::lambert(Color::WHITE));
        let node = scene.create_node(shape, material, Vec3::ZERO);
        scene.attach(node);
        node
    }

    fn emitter(scene: &mut MemoryScene, config: TrailConfig) -> (NodeId, TrailEmitter) {
        let node = target(scene);
        let trail = TrailEmitter::new(
            node,
            Color::from_hex(0x00ff88),
            scene,
            config,
            fastrand::Rng::with_seed(42),
        );
        (node, trail)
    }

    fn step(scene: &mut MemoryScene, node: NodeId, frame: u32) {
        scene.set_position(node, Vec3::new(frame as f32 * 0.1, 0.0, 0.0));
    }

    #[test]
    fn test_throttled_emission_every_rate_ticks() {
        let mut scene = MemoryScene::new();
        let config = TrailConfig {
            emission_rate: 3,
            lifespan_frames: 1000,
            ..Default::default()
        };
        let (node, mut trail) = emitter(&mut scene, config);

        let mut emitted_on = Vec::new();
        for frame in 1..=9 {
            let before = trail.len();
            step(&mut scene, node, frame);
            trail.update(&mut scene);
            if trail.len() > before {
                emitted_on.push(frame);
            }
        }

        assert_eq!(emitted_on, vec![3, 6, 9]);
        assert_eq!(trail.frame_counter(), 9);
        trail.dispose(&mut scene);
    }

    #[test]
    fn test_stationary_target_never_emits() {
        let mut scene = MemoryScene::new();
        let (_node, mut trail) = emitter(&mut scene, TrailConfig::default());

        for _ in 0..100 {
            trail.update(&mut scene);
        }

        assert!(trail.is_empty());
        assert_eq!(trail.frame_counter(), 0);
        assert_eq!(scene.stats().nodes_created, 1);
    }

    #[test]
    fn test_sub_threshold_jitter_is_stationary() {
        let mut scene = MemoryScene::new();
        let (node, mut trail) = emitter(&mut scene, TrailConfig::default());

        for frame in 1..=20 {
            let offset = if frame % 2 == 0 { 0.0009 } else { -0.0009 };
            scene.set_position(node, Vec3::new(offset, 0.0, 0.0));
            trail.update(&mut scene);
        }

        assert_eq!(trail.frame_counter(), 0);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_accumulated_drift_counts_as_motion() {
        let mut scene = MemoryScene::new();
        let (node, mut trail) = emitter(&mut scene, TrailConfig::default());

        scene.set_position(node, Vec3::new(0.0005, 0.0, 0.0));
        trail.update(&mut scene);
        assert_eq!(trail.frame_counter(), 0);

        // 0.0015 from the last snapshot at the origin
        scene.set_position(node, Vec3::new(0.0015, 0.0, 0.0));
        trail.update(&mut scene);
        assert_eq!(trail.frame_counter(), 1);
        trail.dispose(&mut scene);
    }

    #[test]
    fn test_unbounded_capacity_does_not_preallocate() {
        let mut scene = MemoryScene::new();
        let config = TrailConfig {
            capacity: usize::MAX,
            ..Default::default()
        };
        let (_node, mut trail) = emitter(&mut scene, config);

        for _ in 0..4 {
            assert!(trail.emit_particle(&mut scene));
        }
        assert_eq!(trail.len(), 4);
        trail.dispose(&mut scene);
        assert!(scene.violations().is_empty());
    }

    #[test]
    fn test_particles_age_and_retire() {
        let mut scene = MemoryScene::new();
        let config = TrailConfig {
            emission_rate: 1,
            lifespan_frames: 5,
            ..Default::default()
        };
        let (node, mut trail) = emitter(&mut scene, config);

        step(&mut scene, node, 1);
        trail.update(&mut scene);
        assert_eq!(trail.len(), 1);

        for k in 2..=4 {
            trail.update(&mut scene);
            let ages: Vec<u32> = trail.particles().map(ParticleRecord::age).collect();
            assert_eq!(ages, vec![k]);
        }

        trail.update(&mut scene);
        assert!(trail.is_empty());
        assert_eq!(scene.stats().shape_releases, 1);
        assert!(scene.violations().is_empty());
    }

    #[test]
    fn test_fade_and_shrink_law() {
        let mut scene = MemoryScene::new();
        let config = TrailConfig {
            emission_rate: 1,
            lifespan_frames: 40,
            ..Default::default()
        };
        let (node, mut trail) = emitter(&mut scene, config);

        step(&mut scene, node, 1);
        trail.update(&mut scene);
        for _ in 0..9 {
            trail.update(&mut scene);
        }

        let particle = trail.particles().next().expect("one particle");
        let age = particle.age();
        assert_eq!(age, 10);

        let material = scene.material(particle.appearance()).expect("material");
        assert!((material.opacity - (1.0 - 10.0 / 40.0)).abs() < 1e-5);
        assert!((particle.scale() - 0.98_f32.powi(10)).abs() < 1e-5);

        let node_state = scene.node(particle.visual()).expect("node");
        assert!((node_state.scale.x - particle.scale()).abs() < 1e-6);
        trail.dispose(&mut scene);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut scene = MemoryScene::new();
        let config = TrailConfig {
            capacity: 3,
            ..Default::default()
        };
        let (_node, mut trail) = emitter(&mut scene, config);

        let mut visuals = Vec::new();
        for _ in 0..5 {
            assert!(trail.emit_particle(&mut scene));
            visuals.push(trail.particles().last().expect("just emitted").visual());
        }

        let live: Vec<NodeId> = trail.particles().map(ParticleRecord::visual).collect();
        assert_eq!(live, visuals[2..].to_vec());
        assert_eq!(scene.position(visuals[0]), None);
        assert_eq!(scene.stats().material_releases, 2);
        trail.dispose(&mut scene);
        assert!(scene.violations().is_empty());
    }

    #[test]
    fn test_emission_tracks_target_with_jitter() {
        let mut scene = MemoryScene::new();
        let (node, mut trail) = emitter(&mut scene, TrailConfig::default());
        scene.set_position(node, Vec3::new(1.0, 2.0, 3.0));

        assert!(trail.emit_particle(&mut scene));
        let particle = trail.particles().next().expect("particle");
        let offset = particle.position() - Vec3::new(1.0, 2.0, 3.0);
        assert!(offset.abs().max_element() <= 0.025 + 1e-5);
        trail.dispose(&mut scene);
    }

    #[test]
    fn test_set_color_is_not_retroactive() {
        let mut scene = MemoryScene::new();
        let (_node, mut trail) = emitter(&mut scene, TrailConfig::default());

        trail.emit_particle(&mut scene);
        trail.set_color(Color::from_hex(0xff0000));
        trail.emit_particle(&mut scene);

        let colors: Vec<u32> = trail
            .particles()
            .map(|p| {
                scene
                    .material(p.appearance())
                    .expect("material")
                    .color
                    .to_hex()
            })
            .collect();
        assert_eq!(colors, vec![0x00ff88, 0xff0000]);
        trail.dispose(&mut scene);
    }

    #[test]
    fn test_rate_override_and_restore() {
        let mut scene = MemoryScene::new();
        let (_node, mut trail) = emitter(&mut scene, TrailConfig::default());

        trail.emphasize();
        assert_eq!(trail.emission_rate(), 1);
        trail.set_emission_rate(0);
        assert_eq!(trail.emission_rate(), 1);
        trail.restore_default_rate();
        assert_eq!(trail.emission_rate(), 2);
    }

    #[test]
    fn test_dispose_is_complete_and_idempotent() {
        let mut scene = MemoryScene::new();
        let (_node, mut trail) = emitter(&mut scene, TrailConfig::default());
        for _ in 0..7 {
            trail.emit_particle(&mut scene);
        }
        let before = scene.stats();

        trail.dispose(&mut scene);
        let after = scene.stats();
        assert_eq!(after.detach_calls - before.detach_calls, 7);
        assert_eq!(after.shape_releases - before.shape_releases, 7);
        assert_eq!(after.material_releases - before.material_releases, 7);
        assert!(trail.is_empty());

        trail.dispose(&mut scene);
        assert_eq!(scene.stats(), after);
        assert!(scene.violations().is_empty());
    }

    #[test]
    fn test_missing_target_emits_nothing() {
        let mut scene = MemoryScene::new();
        let (node, mut trail) = emitter(&mut scene, TrailConfig::default());
        scene.detach(node);

        assert!(!trail.emit_particle(&mut scene));
        trail.update(&mut scene);
        assert!(trail.is_empty());
        assert_eq!(trail.frame_counter(), 0);
    }

    #[test]
    fn test_decay_ages_without_emitting() {
        let mut scene = MemoryScene::new();
        let config = TrailConfig {
            lifespan_frames: 2,
            ..Default::default()
        };
        let (node, mut trail) = emitter(&mut scene, config);
        trail.emit_particle(&mut scene);

        step(&mut scene, node, 1);
        trail.decay(&mut scene);
        assert_eq!(trail.len(), 1);
        assert_eq!(trail.frame_counter(), 0);

        trail.decay(&mut scene);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_validate_clamps() {
        let mut config = TrailConfig {
            capacity: 0,
            emission_rate: 0,
            lifespan_frames: 0,
            shrink_factor: 1.5,
            ..Default::default()
        };
        config.validate();
        assert_eq!(config.capacity, 1);
        assert_eq!(config.emission_rate, 1);
        assert_eq!(config.lifespan_frames, 1);
        assert!((config.shrink_factor - 1.0).abs() < f32::EPSILON);
    }

    proptest! {
        #[test]
        fn prop_capacity_never_exceeded(
            capacity in 1usize..16,
            ops in proptest::collection::vec(0u8..3, 1..200),
        ) {
            let mut scene = MemoryScene::new();
            let config = TrailConfig { capacity, emission_rate: 1, ..Default::default() };
            let (node, mut trail) = emitter(&mut scene, config);

            for (frame, op) in ops.into_iter().enumerate() {
                match op {
                    0 => { trail.emit_particle(&mut scene); },
                    1 => {
                        step(&mut scene, node, frame as u32 + 1);
                        trail.update(&mut scene);
                    },
                    _ => trail.update(&mut scene),
                }
                prop_assert!(trail.len() <= capacity);
            }

            trail.dispose(&mut scene);
            prop_assert!(scene.violations().is_empty());
            prop_assert_eq!(scene.attached_count(), 1);
        }

        #[test]
        fn prop_fade_law_holds_for_every_age(age in 1u32..40) {
            let mut scene = MemoryScene::new();
            let config = TrailConfig { lifespan_frames: 40, ..Default::default() };
            let (_node, mut trail) = emitter(&mut scene, config);
            trail.emit_particle(&mut scene);
            for _ in 0..age {
                trail.decay(&mut scene);
            }

            let particle = trail.particles().next().expect("still alive");
            let material = scene.material(particle.appearance()).expect("material");
            prop_assert!((material.opacity - (1.0 - age as f32 / 40.0)).abs() < 1e-5);
            prop_assert!((particle.scale() - 0.98_f32.powi(age as i32)).abs() < 1e-5);
            trail.dispose(&mut scene);
        }
    }
}
