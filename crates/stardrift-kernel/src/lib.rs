//! # Stardrift Kernel
//!
//! Particle lifecycle management for the Stardrift scene.
//!
//! This crate owns every short-lived visual the scene produces:
//! - Trail emitters that follow moving objects
//! - Click bursts and click pulses
//! - The list of active one-shot effects polled by the frame driver
//! - The background starfield
//!
//! ## Resource Ownership
//!
//! Rendering is delegated to a [`scene::Scene`] backend. Each particle owns
//! exactly one node, one shape and one material, and gives them back through a
//! single retirement path. Retirement consumes the particle, so a record can
//! neither be released twice nor updated after it left the scene.
//!
//! ## Frame Model
//!
//! Everything here is single-threaded and advanced one tick per rendered
//! frame. Ages and counters are frame counts, not seconds.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod burst;
pub mod effects;
pub mod particle;
pub mod pulse;
pub mod scene;
pub mod starfield;
pub mod trail;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::burst::*;
    pub use crate::effects::*;
    pub use crate::particle::*;
    pub use crate::pulse::*;
    pub use crate::scene::*;
    pub use crate::starfield::*;
    pub use crate::trail::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use stardrift_common::Color;

    #[test]
    fn test_trail_and_burst_share_one_scene() {
        let mut scene = MemoryScene::new();
        let shape = scene.create_shape(ShapeDesc::particle(0.3));
        let material = scene.create_material(MaterialDesc::lambert(Color::WHITE));
        let target = scene.create_node(shape, material, Vec3::ZERO);
        scene.attach(target);

        let mut trail = TrailEmitter::new(
            target,
            Color::WHITE,
            &scene,
            TrailConfig::default(),
            fastrand::Rng::with_seed(11),
        );
        let mut effects = EffectList::new();
        let mut rng = fastrand::Rng::with_seed(12);

        for frame in 1..=120 {
            scene.set_position(target, Vec3::new(frame as f32 * 0.01, 0.0, 0.0));
            trail.update(&mut scene);
            if frame == 10 {
                trigger_burst(
                    &mut effects,
                    &mut scene,
                    Vec3::ZERO,
                    Color::WHITE,
                    &BurstConfig::default(),
                    &mut rng,
                );
            }
            effects.update(&mut scene);
        }

        assert!(effects.is_empty());
        assert_eq!(trail.len(), 20);

        trail.dispose(&mut scene);
        assert_eq!(scene.attached_count(), 1);
        assert!(scene.violations().is_empty());
    }
}
