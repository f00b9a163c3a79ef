//! The stage: every live system of the landing page, advanced frame by frame.
//!
//! Per tick the stage spins the starfield, animates the objects, runs or
//! pauses their trails, polls the effect list and moves the camera. Input
//! events are applied between ticks.

use glam::{Vec2, Vec3};
use stardrift_common::{StardriftError, StardriftResult};
use stardrift_gameplay::{
    ndc_to_screen, screen_to_ndc, CameraRig, ClickOutcome, Ease, Interaction, InteractiveObject,
    ObjectKind, RelativeTween, ScrollTracker, SectionChange, SECTION_SECONDS,
};
use stardrift_kernel::{
    trigger_burst, BurstConfig, ClickPulse, Effect, EffectList, MemoryScene, PulseConfig,
    SceneStats, Starfield,
};
use tracing::{debug, info, trace};

use crate::config::{DisabledTrailPolicy, EngineConfig};
use crate::input::InputEvent;

/// Extra starfield rotation per section change.
const STARFIELD_SECTION_TURN: Vec3 = Vec3::new(0.2, 0.3, 0.0);

/// Counters gathered while the stage runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageStats {
    /// Ticks run
    pub frames: u64,
    /// Clicks that hit an object
    pub clicks: u64,
    /// Clicks that hit nothing
    pub missed_clicks: u64,
    /// Scroll section changes
    pub section_changes: u64,
    /// Most trail particles alive at once, over all objects
    pub peak_trail_particles: usize,
    /// Most effect particles alive at once
    pub peak_effect_particles: usize,
}

/// Result of a clean teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSummary {
    /// Run counters
    pub stats: StageStats,
    /// Effects started over the run
    pub effects_started: u64,
    /// Scene resource counters
    pub scene: SceneStats,
    /// Nodes still attached after teardown
    pub leaked_nodes: usize,
    /// Shapes not released after teardown
    pub leaked_shapes: usize,
    /// Materials not released after teardown
    pub leaked_materials: usize,
}

impl StageSummary {
    /// Whether teardown gave every resource back.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.leaked_nodes == 0 && self.leaked_shapes == 0 && self.leaked_materials == 0
    }
}

/// Owns the scene and every system drawn into it.
#[derive(Debug)]
pub struct Stage {
    scene: MemoryScene,
    starfield: Starfield,
    starfield_turns: Vec<RelativeTween>,
    objects: Vec<InteractiveObject>,
    effects: EffectList,
    camera: CameraRig,
    scroll: ScrollTracker,
    interaction: Interaction,
    viewport: Vec2,
    trails_enabled: bool,
    trail_policy: DisabledTrailPolicy,
    burst: BurstConfig,
    pulse: PulseConfig,
    rng: fastrand::Rng,
    clock: f32,
    stats: StageStats,
}

impl Stage {
    /// Builds the starfield and the objects into a fresh scene.
    pub fn new(config: &EngineConfig, seed: u64) -> Self {
        let mut scene = MemoryScene::new();
        let mut rng = fastrand::Rng::with_seed(seed);
        let viewport = Vec2::new(config.window_width as f32, config.window_height as f32);

        let starfield = Starfield::build(&mut scene, &config.starfield, &mut rng);
        let objects: Vec<InteractiveObject> = ObjectKind::ALL
            .iter()
            .enumerate()
            .map(|(index, kind)| {
                let trail_rng = fastrand::Rng::with_seed(rng.u64(..));
                InteractiveObject::spawn(&mut scene, *kind, index, config.trail, trail_rng)
            })
            .collect();

        info!(
            "Stage built: {} objects, {} stars, trails {}",
            objects.len(),
            starfield.star_count(),
            if config.trails_enabled { "on" } else { "off" }
        );

        Self {
            scene,
            starfield,
            starfield_turns: Vec::new(),
            objects,
            effects: EffectList::new(),
            camera: CameraRig::new(config.camera, viewport),
            scroll: ScrollTracker::new(),
            interaction: Interaction::new(),
            viewport,
            trails_enabled: config.trails_enabled,
            trail_policy: config.disabled_trail_policy,
            burst: config.burst,
            pulse: config.pulse,
            rng,
            clock: 0.0,
            stats: StageStats::default(),
        }
    }

    /// Applies one input event.
    pub fn handle(&mut self, event: InputEvent) {
        trace!("Input: {}", event.label());
        match event {
            InputEvent::PointerMove(pixel) => {
                let ndc = screen_to_ndc(pixel, self.viewport);
                self.camera.set_pointer(ndc);
                let ray = self.camera.ray_through(ndc);
                self.interaction
                    .pointer_moved(&mut self.scene, &mut self.objects, &ray);
            },
            InputEvent::Click(pixel) => {
                let ray = self.camera.ray_through(screen_to_ndc(pixel, self.viewport));
                match self.interaction.click(&mut self.objects, &ray) {
                    Some(outcome) => self.spawn_click_effects(outcome),
                    None => self.stats.missed_clicks += 1,
                }
            },
            InputEvent::Scroll(offset) => {
                if let Some(change) = self.scroll.scroll_to(offset, self.viewport.y) {
                    self.change_section(change);
                }
            },
            InputEvent::Resize { width, height } => {
                self.viewport = Vec2::new(width.max(1) as f32, height.max(1) as f32);
                self.camera.resize(self.viewport);
                debug!("Viewport resized to {width}x{height}");
            },
            InputEvent::SetTrails(enabled) => {
                if enabled != self.trails_enabled {
                    self.trails_enabled = enabled;
                    info!("Trails {}", if enabled { "enabled" } else { "disabled" });
                }
            },
        }
    }

    fn spawn_click_effects(&mut self, outcome: ClickOutcome) {
        self.stats.clicks += 1;
        let pulse = ClickPulse::spawn(&mut self.scene, outcome.point, &self.pulse);
        self.effects.push(Effect::Pulse(pulse));
        trigger_burst(
            &mut self.effects,
            &mut self.scene,
            outcome.point,
            outcome.color,
            &self.burst,
            &mut self.rng,
        );
    }

    fn change_section(&mut self, change: SectionChange) {
        self.stats.section_changes += 1;
        info!("Section {} -> {}", change.from, change.to);

        self.camera.dolly_to(change.camera_depth());
        self.starfield_turns.push(RelativeTween::new(
            STARFIELD_SECTION_TURN,
            SECTION_SECONDS,
            Ease::Power2InOut,
        ));
        for object in &mut self.objects {
            object.shift_depth(change.object_shift(), SECTION_SECONDS);
        }
    }

    /// Advances every system by one frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.clock += dt;
        self.stats.frames += 1;

        self.starfield.advance(&mut self.scene);
        if !self.starfield_turns.is_empty() {
            let mut offset = self.starfield.offset();
            for turn in &mut self.starfield_turns {
                offset += turn.step(dt);
            }
            self.starfield_turns.retain(|turn| !turn.is_finished());
            self.starfield.set_offset(&mut self.scene, offset);
        }

        for object in &mut self.objects {
            object.animate(&mut self.scene, dt, self.clock);
            if self.trails_enabled {
                object.update_trail(&mut self.scene);
            } else if self.trail_policy == DisabledTrailPolicy::Decay {
                object.decay_trail(&mut self.scene);
            }
        }

        self.effects.update(&mut self.scene);
        self.camera.animate(dt);

        let trail_particles = self.trail_particle_count();
        self.stats.peak_trail_particles = self.stats.peak_trail_particles.max(trail_particles);
        self.stats.peak_effect_particles = self
            .stats
            .peak_effect_particles
            .max(self.effects.particle_count());
    }

    /// Pixel position of an object's center, if it is in front of the camera.
    #[must_use]
    pub fn screen_position(&self, index: usize) -> Option<Vec2> {
        let object = self.objects.get(index)?;
        let ndc = self.camera.project(object.position())?;
        Some(ndc_to_screen(ndc, self.viewport))
    }

    /// Live trail particles over all objects.
    #[must_use]
    pub fn trail_particle_count(&self) -> usize {
        self.objects.iter().map(|object| object.trail().len()).sum()
    }

    /// Tears everything down and checks the scene for misuse.
    pub fn shutdown(self) -> StardriftResult<StageSummary> {
        let Self {
            mut scene,
            starfield,
            objects,
            mut effects,
            stats,
            ..
        } = self;

        let effects_started = effects.started();
        effects.clear(&mut scene);
        for object in objects {
            object.dispose(&mut scene);
        }
        starfield.dispose(&mut scene);

        let violations = scene.take_violations();
        if let Some(first) = violations.first() {
            return Err(StardriftError::SceneViolations {
                count: violations.len(),
                first: first.clone(),
            });
        }

        Ok(StageSummary {
            stats,
            effects_started,
            scene: scene.stats(),
            leaked_nodes: scene.attached_count(),
            leaked_shapes: scene.live_shapes(),
            leaked_materials: scene.live_materials(),
        })
    }

    /// The scene backend.
    #[must_use]
    pub const fn scene(&self) -> &MemoryScene {
        &self.scene
    }

    /// The interactive objects, in scene order.
    #[must_use]
    pub fn objects(&self) -> &[InteractiveObject] {
        &self.objects
    }

    /// Running effects.
    #[must_use]
    pub const fn effects(&self) -> &EffectList {
        &self.effects
    }

    /// The camera.
    #[must_use]
    pub const fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Hover state.
    #[must_use]
    pub const fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Current viewport size in pixels.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Whether trails are emitting.
    #[must_use]
    pub const fn trails_enabled(&self) -> bool {
        self.trails_enabled
    }

    /// Counters so far.
    #[must_use]
    pub const fn stats(&self) -> StageStats {
        self.stats
    }
}
