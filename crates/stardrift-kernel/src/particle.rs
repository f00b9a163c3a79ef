//! Particle records shared by trails, bursts and click pulses.
//!
//! A [`ParticleRecord`] exclusively owns one node plus the shape and material
//! that back it. The record is not `Clone`, and [`ParticleRecord::retire`]
//! consumes it, so every resource is detached and released exactly once.

use glam::Vec3;
use stardrift_common::{Color, MaterialId, NodeId, ShapeId};

use crate::scene::{MaterialDesc, Scene, ShapeDesc};

/// Outcome of advancing a particle by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Still within its lifespan.
    Alive,
    /// Reached its lifespan and must be retired.
    Expired,
}

/// Parameters for spawning a particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpawn {
    /// Initial world position
    pub position: Vec3,
    /// Sphere radius
    pub radius: f32,
    /// Tint
    pub color: Color,
    /// Frames until retirement
    pub lifespan_frames: u32,
    /// Per-frame velocity
    pub velocity: Vec3,
}

/// Linear fade-out: full opacity at age 0, zero at the end of the lifespan.
#[must_use]
pub fn fade_opacity(age: u32, lifespan_frames: u32) -> f32 {
    if lifespan_frames == 0 {
        return 0.0;
    }
    (1.0 - age as f32 / lifespan_frames as f32).max(0.0)
}

/// One spawned visual particle.
#[derive(Debug)]
pub struct ParticleRecord {
    visual: NodeId,
    shape: ShapeId,
    appearance: MaterialId,
    position: Vec3,
    velocity: Vec3,
    scale: f32,
    age: u32,
    lifespan_frames: u32,
}

impl ParticleRecord {
    /// Creates the particle's resources and attaches it to the scene.
    pub fn spawn<S: Scene + ?Sized>(scene: &mut S, spawn: ParticleSpawn) -> Self {
        let shape = scene.create_shape(ShapeDesc::particle(spawn.radius));
        let appearance = scene.create_material(MaterialDesc::particle(spawn.color));
        let visual = scene.create_node(shape, appearance, spawn.position);
        scene.attach(visual);

        Self {
            visual,
            shape,
            appearance,
            position: spawn.position,
            velocity: spawn.velocity,
            scale: 1.0,
            age: 0,
            lifespan_frames: spawn.lifespan_frames,
        }
    }

    /// Node rendering this particle.
    #[must_use]
    pub const fn visual(&self) -> NodeId {
        self.visual
    }

    /// Geometry owned by this particle.
    #[must_use]
    pub const fn shape(&self) -> ShapeId {
        self.shape
    }

    /// Material owned by this particle.
    #[must_use]
    pub const fn appearance(&self) -> MaterialId {
        self.appearance
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Current per-frame velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Accumulated uniform scale.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Ticks since spawn.
    #[must_use]
    pub const fn age(&self) -> u32 {
        self.age
    }

    /// Age at which the particle is retired.
    #[must_use]
    pub const fn lifespan_frames(&self) -> u32 {
        self.lifespan_frames
    }

    /// Opacity implied by the current age.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        fade_opacity(self.age, self.lifespan_frames)
    }

    /// Fraction of the lifespan used, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        1.0 - self.opacity()
    }

    /// Ages the particle by one tick.
    pub fn advance(&mut self) -> Lifecycle {
        self.age = self.age.saturating_add(1);
        if self.age >= self.lifespan_frames {
            Lifecycle::Expired
        } else {
            Lifecycle::Alive
        }
    }

    /// Writes the age-based opacity to the material.
    pub fn fade<S: Scene + ?Sized>(&self, scene: &mut S) {
        scene.set_opacity(self.appearance, self.opacity());
    }

    /// Multiplies the uniform scale by `factor`.
    pub fn shrink<S: Scene + ?Sized>(&mut self, scene: &mut S, factor: f32) {
        self.set_scale(scene, self.scale * factor);
    }

    /// Sets the uniform scale.
    pub fn set_scale<S: Scene + ?Sized>(&mut self, scene: &mut S, scale: f32) {
        self.scale = scale;
        scene.set_scale(self.visual, Vec3::splat(scale));
    }

    /// Euler step: moves by the velocity, then damps the velocity.
    pub fn drift<S: Scene + ?Sized>(&mut self, scene: &mut S, damping: f32) {
        self.position += self.velocity;
        self.velocity *= damping;
        scene.set_position(self.visual, self.position);
    }

    /// Detaches the node and releases the shape and material.
    pub fn retire<S: Scene + ?Sized>(self, scene: &mut S) {
        scene.detach(self.visual);
        scene.release_shape(self.shape);
        scene.release_material(self.appearance);
    }
}
