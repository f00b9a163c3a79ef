//! Active ephemeral effects.
//!
//! The frame driver owns one [`EffectList`] and polls it once per tick.
//! Effects report [`EffectStatus::Finished`] after retiring their last
//! particle and are dropped from the list in the same tick.

use tracing::debug;

use crate::burst::BurstEmitter;
use crate::pulse::ClickPulse;
use crate::scene::Scene;

/// Whether an effect needs further ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectStatus {
    /// Still has live particles.
    Running,
    /// All particles retired.
    Finished,
}

/// A one-shot effect.
#[derive(Debug)]
pub enum Effect {
    /// Click burst.
    Burst(BurstEmitter),
    /// Click pulse.
    Pulse(ClickPulse),
}

impl Effect {
    /// Advances the effect by one tick.
    pub fn update<S: Scene + ?Sized>(&mut self, scene: &mut S) -> EffectStatus {
        match self {
            Self::Burst(burst) => burst.update(scene),
            Self::Pulse(pulse) => pulse.update(scene),
        }
    }

    /// Retires everything the effect still owns.
    pub fn dispose<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        match self {
            Self::Burst(burst) => burst.dispose(scene),
            Self::Pulse(pulse) => pulse.dispose(scene),
        }
    }

    /// Live particles owned by the effect.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        match self {
            Self::Burst(burst) => burst.len(),
            Self::Pulse(pulse) => usize::from(pulse.record().is_some()),
        }
    }
}

/// Ordered list of running effects.
#[derive(Debug, Default)]
pub struct EffectList {
    effects: Vec<Effect>,
    started: u64,
    completed: u64,
}

impl EffectList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking an effect.
    pub fn push(&mut self, effect: Effect) {
        self.started += 1;
        self.effects.push(effect);
    }

    /// Polls every effect once and drops the finished ones.
    pub fn update<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        let before = self.effects.len();
        self.effects
            .retain_mut(|effect| effect.update(scene) == EffectStatus::Running);
        let finished = before - self.effects.len();
        if finished > 0 {
            self.completed += finished as u64;
            debug!("{finished} effect(s) finished, {} active", self.effects.len());
        }
    }

    /// Retires every running effect.
    pub fn clear<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        for mut effect in self.effects.drain(..) {
            effect.dispose(scene);
        }
    }

    /// Number of running effects.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.effects.len()
    }

    /// Live particles across all running effects.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.effects.iter().map(Effect::particle_count).sum()
    }

    /// Effects started since creation.
    #[must_use]
    pub const fn started(&self) -> u64 {
        self.started
    }

    /// Effects that ran to completion.
    #[must_use]
    pub const fn completed(&self) -> u64 {
        self.completed
    }

    /// Whether nothing is running.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::burst::{trigger_burst, BurstConfig};
    use crate::pulse::PulseConfig;
    use crate::scene::MemoryScene;
    use glam::Vec3;
    use stardrift_common::Color;

    #[test]
    fn test_effects_removed_when_finished() {
        let mut scene = MemoryScene::new();
        let mut effects = EffectList::new();
        let mut rng = fastrand::Rng::with_seed(3);

        trigger_burst(
            &mut effects,
            &mut scene,
            Vec3::ZERO,
            Color::WHITE,
            &BurstConfig::default(),
            &mut rng,
        );
        effects.push(Effect::Pulse(ClickPulse::spawn(
            &mut scene,
            Vec3::ZERO,
            &PulseConfig::default(),
        )));
        assert_eq!(effects.active_count(), 2);
        assert_eq!(effects.particle_count(), 21);

        for _ in 0..30 {
            effects.update(&mut scene);
        }
        assert_eq!(effects.active_count(), 1);

        for _ in 30..60 {
            effects.update(&mut scene);
        }
        assert!(effects.is_empty());
        assert_eq!(effects.started(), 2);
        assert_eq!(effects.completed(), 2);
        assert_eq!(scene.attached_count(), 0);
        assert!(scene.violations().is_empty());
    }

    #[test]
    fn test_clear_retires_running_effects() {
        let mut scene = MemoryScene::new();
        let mut effects = EffectList::new();
        let mut rng = fastrand::Rng::with_seed(4);
        for _ in 0..3 {
            trigger_burst(
                &mut effects,
                &mut scene,
                Vec3::ONE,
                Color::WHITE,
                &BurstConfig::default(),
                &mut rng,
            );
        }
        effects.update(&mut scene);

        effects.clear(&mut scene);
        assert!(effects.is_empty());
        assert_eq!(scene.live_shapes(), 0);
        assert_eq!(scene.stats().shape_releases, 60);
        assert!(scene.violations().is_empty());
    }
}
