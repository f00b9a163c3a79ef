//! Click pulse: a single white sphere that expands and fades out where the
//! pointer hit an object.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use stardrift_common::Color;

use crate::effects::EffectStatus;
use crate::particle::{Lifecycle, ParticleRecord, ParticleSpawn};
use crate::scene::Scene;

/// Click pulse settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    /// Starting sphere radius
    pub radius: f32,
    /// Scale reached at the end of the pulse
    pub max_scale: f32,
    /// Length of the pulse in ticks
    pub duration_frames: u32,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            radius: 0.1,
            max_scale: 3.0,
            duration_frames: 30,
        }
    }
}

impl PulseConfig {
    /// Clamps settings to usable ranges.
    pub fn validate(&mut self) {
        self.radius = self.radius.max(0.001);
        self.max_scale = self.max_scale.max(0.0);
        self.duration_frames = self.duration_frames.max(1);
    }
}

/// Expanding, fading sphere.
#[derive(Debug)]
pub struct ClickPulse {
    record: Option<ParticleRecord>,
    max_scale: f32,
}

impl ClickPulse {
    /// Spawns the pulse sphere at `position`.
    pub fn spawn<S: Scene + ?Sized>(scene: &mut S, position: Vec3, config: &PulseConfig) -> Self {
        let record = ParticleRecord::spawn(
            scene,
            ParticleSpawn {
                position,
                radius: config.radius,
                color: Color::WHITE,
                lifespan_frames: config.duration_frames,
                velocity: Vec3::ZERO,
            },
        );
        Self {
            record: Some(record),
            max_scale: config.max_scale,
        }
    }

    /// Advances the pulse by one tick.
    pub fn update<S: Scene + ?Sized>(&mut self, scene: &mut S) -> EffectStatus {
        let Some(mut record) = self.record.take() else {
            return EffectStatus::Finished;
        };

        match record.advance() {
            Lifecycle::Expired => {
                record.retire(scene);
                EffectStatus::Finished
            },
            Lifecycle::Alive => {
                let scale = 1.0 + (self.max_scale - 1.0) * record.progress();
                record.set_scale(scene, scale);
                record.fade(scene);
                self.record = Some(record);
                EffectStatus::Running
            },
        }
    }

    /// Retires the sphere if it is still live.
    pub fn dispose<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        if let Some(record) = self.record.take() {
            record.retire(scene);
        }
    }

    /// The live sphere, if any.
    #[must_use]
    pub fn record(&self) -> Option<&ParticleRecord> {
        self.record.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MemoryScene;

    #[test]
    fn test_pulse_expands_and_fades() {
        let mut scene = MemoryScene::new();
        let mut pulse = ClickPulse::spawn(&mut scene, Vec3::ZERO, &PulseConfig::default());

        for _ in 0..15 {
            assert_eq!(pulse.update(&mut scene), EffectStatus::Running);
        }
        let record = pulse.record().expect("pulse is live");
        assert!((record.scale() - 2.0).abs() < 1e-5);
        let material = scene.material(record.appearance()).expect("material");
        assert!((material.opacity - 0.5).abs() < 1e-5);

        for _ in 15..29 {
            assert_eq!(pulse.update(&mut scene), EffectStatus::Running);
        }
        assert_eq!(pulse.update(&mut scene), EffectStatus::Finished);
        assert!(pulse.record().is_none());
        assert_eq!(scene.attached_count(), 0);
        assert!(scene.violations().is_empty());
    }

    #[test]
    fn test_dispose_mid_pulse() {
        let mut scene = MemoryScene::new();
        let mut pulse = ClickPulse::spawn(&mut scene, Vec3::ZERO, &PulseConfig::default());
        pulse.update(&mut scene);
        pulse.dispose(&mut scene);
        pulse.dispose(&mut scene);

        assert_eq!(scene.stats().shape_releases, 1);
        assert_eq!(pulse.update(&mut scene), EffectStatus::Finished);
        assert!(scene.violations().is_empty());
    }
}
