//! Interactive scene objects.
//!
//! Each [`InteractiveObject`] bundles its node, its resources, its trail and
//! its running animations. Color changes always go through
//! [`InteractiveObject::apply_color`], which keeps the trail tint in step with
//! the object.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use stardrift_common::{Color, MaterialId, NodeId, ShapeId};
use stardrift_kernel::{MaterialDesc, Scene, ShapeDesc, TrailConfig, TrailEmitter};
use tracing::debug;

use crate::tween::{Ease, RelativeTween, Tween};

/// Colors cycled through on successive clicks.
pub const CLICK_PALETTE: [u32; 6] = [0xff0000, 0x00ff00, 0x0000ff, 0xffff00, 0xff00ff, 0x00ffff];

/// Scale of a hovered object.
pub const HOVER_SCALE: f32 = 1.2;

/// Duration of the hover scale tween in seconds.
pub const HOVER_SECONDS: f32 = 0.3;

/// Duration of the click color tween in seconds.
pub const COLOR_SECONDS: f32 = 0.5;

/// Per-tick spin added to every object.
pub const IDLE_SPIN: Vec3 = Vec3::new(0.01, 0.005, 0.0);

/// Amplitude of the per-tick vertical float.
pub const FLOAT_AMPLITUDE: f32 = 0.001;

/// The five kinds of objects on the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Box
    Cube,
    /// Sphere
    Sphere,
    /// Torus
    Torus,
    /// Octahedron
    Octahedron,
    /// Cone
    Cone,
}

impl ObjectKind {
    /// Every kind, in scene order.
    pub const ALL: [Self; 5] = [
        Self::Cube,
        Self::Sphere,
        Self::Torus,
        Self::Octahedron,
        Self::Cone,
    ];

    /// Lowercase name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cube => "cube",
            Self::Sphere => "sphere",
            Self::Torus => "torus",
            Self::Octahedron => "octahedron",
            Self::Cone => "cone",
        }
    }

    /// Geometry of this kind.
    #[must_use]
    pub fn shape(self) -> ShapeDesc {
        match self {
            Self::Cube => ShapeDesc::Box {
                width: 0.5,
                height: 0.5,
                depth: 0.5,
            },
            Self::Sphere => ShapeDesc::Sphere {
                radius: 0.3,
                width_segments: 32,
                height_segments: 32,
            },
            Self::Torus => ShapeDesc::Torus {
                radius: 0.3,
                tube: 0.1,
                radial_segments: 16,
                tubular_segments: 100,
            },
            Self::Octahedron => ShapeDesc::Octahedron { radius: 0.4 },
            Self::Cone => ShapeDesc::Cone {
                radius: 0.3,
                height: 0.8,
                radial_segments: 8,
            },
        }
    }

    /// Starting color as a hex triple.
    #[must_use]
    pub const fn base_color_hex(self) -> u32 {
        match self {
            Self::Cube => 0x00ff88,
            Self::Sphere => 0xff6b6b,
            Self::Torus => 0x4ecdc4,
            Self::Octahedron => 0xffd93d,
            Self::Cone => 0xa8e6cf,
        }
    }

    /// Starting position.
    #[must_use]
    pub const fn home_position(self) -> Vec3 {
        match self {
            Self::Cube => Vec3::new(-2.0, 1.0, 2.0),
            Self::Sphere => Vec3::new(2.0, -1.0, 1.5),
            Self::Torus => Vec3::new(0.0, 2.0, 1.0),
            Self::Octahedron => Vec3::new(-1.5, -2.0, 2.5),
            Self::Cone => Vec3::new(1.5, 0.5, 3.0),
        }
    }

    /// Radius of a sphere enclosing the unscaled geometry.
    #[must_use]
    pub const fn bounding_radius(self) -> f32 {
        match self {
            // half the box diagonal
            Self::Cube => 0.433,
            Self::Sphere => 0.3,
            Self::Torus | Self::Octahedron => 0.4,
            // apex at +0.4, base rim at (0.3, -0.4)
            Self::Cone => 0.5,
        }
    }
}

/// Rotation, position or scale motion started by a click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickAnimation {
    /// Adds to the rotation.
    Spin(RelativeTween),
    /// Adds to the position.
    Hop(RelativeTween),
    /// Scales to the target and back.
    Throb(Tween<Vec3>),
}

impl ClickAnimation {
    /// Animation played when an object of `kind` is clicked at `scale`.
    #[must_use]
    pub fn for_kind(kind: ObjectKind, scale: Vec3) -> Self {
        match kind {
            ObjectKind::Cube => Self::Spin(RelativeTween::new(
                Vec3::new(PI, PI, 0.0),
                1.0,
                Ease::BounceOut,
            )),
            ObjectKind::Sphere => Self::Hop(RelativeTween::from_tween(
                Tween::new(Vec3::ZERO, Vec3::new(0.0, 0.5, 0.0), 0.5, Ease::Power2Out).yoyo(1),
            )),
            ObjectKind::Torus => Self::Spin(RelativeTween::new(
                Vec3::new(0.0, 0.0, TAU),
                1.0,
                Ease::Power2InOut,
            )),
            ObjectKind::Octahedron => {
                Self::Throb(Tween::new(scale, Vec3::splat(1.5), 0.3, Ease::ElasticOut).yoyo(1))
            },
            ObjectKind::Cone => Self::Spin(RelativeTween::new(
                Vec3::new(TAU, 0.0, 0.0),
                1.5,
                Ease::Power1InOut,
            )),
        }
    }
}

/// Running animations of one object.
#[derive(Debug, Default)]
struct Animations {
    spins: Vec<RelativeTween>,
    moves: Vec<RelativeTween>,
    scale: Option<Tween<Vec3>>,
    color: Option<Tween<Color>>,
}

impl Animations {
    fn is_idle(&self) -> bool {
        self.spins.is_empty() && self.moves.is_empty() && self.scale.is_none() && self.color.is_none()
    }
}

/// One clickable object with its trail.
#[derive(Debug)]
pub struct InteractiveObject {
    kind: ObjectKind,
    index: usize,
    node: NodeId,
    shape: ShapeId,
    material: MaterialId,
    base_color: Color,
    color: Color,
    base_scale: f32,
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
    click_count: u32,
    hovered: bool,
    emphasis_remaining: f32,
    trail: TrailEmitter,
    animations: Animations,
}

impl InteractiveObject {
    /// Builds an object of `kind`, attaches it and binds a trail to it.
    ///
    /// `index` is the object's slot in the scene, used to phase its float.
    pub fn spawn<S: Scene + ?Sized>(
        scene: &mut S,
        kind: ObjectKind,
        index: usize,
        trail_config: TrailConfig,
        rng: fastrand::Rng,
    ) -> Self {
        let color = Color::from_hex(kind.base_color_hex());
        let position = kind.home_position();
        let shape = scene.create_shape(kind.shape());
        let material = scene.create_material(MaterialDesc::lambert(color));
        let node = scene.create_node(shape, material, position);
        scene.attach(node);
        let trail = TrailEmitter::new(node, color, scene, trail_config, rng);

        debug!("Spawned {} as {}", kind.name(), node);

        Self {
            kind,
            index,
            node,
            shape,
            material,
            base_color: color,
            color,
            base_scale: 1.0,
            position,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            click_count: 0,
            hovered: false,
            emphasis_remaining: 0.0,
            trail,
            animations: Animations::default(),
        }
    }

    /// Sets the material color and retints the trail.
    pub fn apply_color<S: Scene + ?Sized>(&mut self, scene: &mut S, color: Color) {
        self.color = color;
        scene.set_color(self.material, color);
        self.trail.set_color(color);
    }

    /// Advances idle motion and running animations by `dt` seconds.
    ///
    /// `elapsed` is the scene clock in seconds and phases the float.
    pub fn animate<S: Scene + ?Sized>(&mut self, scene: &mut S, dt: f32, elapsed: f32) {
        self.rotation += IDLE_SPIN;
        self.position.y += (elapsed + self.index as f32).sin() * FLOAT_AMPLITUDE;

        let animations = &mut self.animations;
        for spin in &mut animations.spins {
            self.rotation += spin.step(dt);
        }
        animations.spins.retain(|spin| !spin.is_finished());
        for motion in &mut animations.moves {
            self.position += motion.step(dt);
        }
        animations.moves.retain(|motion| !motion.is_finished());

        if let Some(tween) = &mut animations.scale {
            self.scale = tween.advance(dt);
            if tween.is_finished() {
                animations.scale = None;
            }
        }

        if let Some(mut tween) = animations.color.take() {
            let color = tween.advance(dt);
            if !tween.is_finished() {
                self.animations.color = Some(tween);
            }
            self.apply_color(scene, color);
        }

        if self.emphasis_remaining > 0.0 {
            self.emphasis_remaining -= dt;
            if self.emphasis_remaining <= 0.0 {
                self.emphasis_remaining = 0.0;
                self.trail.restore_default_rate();
            }
        }

        scene.set_position(self.node, self.position);
        scene.set_rotation(self.node, self.rotation);
        scene.set_scale(self.node, self.scale);
    }

    /// Pointer entered the object: highlight and grow.
    pub fn hover_enter<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        self.hovered = true;
        self.apply_color(scene, Color::WHITE);
        self.animations.scale = Some(Tween::new(
            self.scale,
            Vec3::splat(self.base_scale * HOVER_SCALE),
            HOVER_SECONDS,
            Ease::default(),
        ));
    }

    /// Pointer left the object: restore color and size.
    pub fn hover_exit<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        self.hovered = false;
        self.apply_color(scene, self.base_color);
        self.animations.scale = Some(Tween::new(
            self.scale,
            Vec3::splat(self.base_scale),
            HOVER_SECONDS,
            Ease::default(),
        ));
    }

    /// Handles a click and returns the object's new color.
    ///
    /// Plays the kind's click animation, tweens toward the next palette color
    /// and speeds up the trail for the emphasis window.
    pub fn click(&mut self) -> Color {
        self.click_count += 1;

        match ClickAnimation::for_kind(self.kind, self.scale) {
            ClickAnimation::Spin(tween) => self.animations.spins.push(tween),
            ClickAnimation::Hop(tween) => self.animations.moves.push(tween),
            ClickAnimation::Throb(tween) => self.animations.scale = Some(tween),
        }

        let next = Color::from_hex(CLICK_PALETTE[self.click_count as usize % CLICK_PALETTE.len()]);
        self.animations.color = Some(Tween::new(self.color, next, COLOR_SECONDS, Ease::default()));
        self.base_color = next;

        self.trail.emphasize();
        self.emphasis_remaining = self.trail.config().emphasis_seconds;

        debug!(
            "Clicked {} ({} clicks), next color #{:06x}",
            self.kind.name(),
            self.click_count,
            next.to_hex()
        );
        next
    }

    /// Moves the object along Z by `delta` over `duration` seconds.
    pub fn shift_depth(&mut self, delta: f32, duration: f32) {
        self.animations.moves.push(RelativeTween::new(
            Vec3::new(0.0, 0.0, delta),
            duration,
            Ease::Power2InOut,
        ));
    }

    /// Runs the trail for this tick: emission and aging.
    pub fn update_trail<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        self.trail.update(scene);
    }

    /// Ages the trail without emitting.
    pub fn decay_trail<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        self.trail.decay(scene);
    }

    /// Picking sphere radius at the current scale.
    #[must_use]
    pub fn pick_radius(&self) -> f32 {
        self.kind.bounding_radius() * self.scale.max_element()
    }

    /// Retires the trail and releases the object's resources.
    pub fn dispose<S: Scene + ?Sized>(mut self, scene: &mut S) {
        self.trail.dispose(scene);
        scene.detach(self.node);
        scene.release_shape(self.shape);
        scene.release_material(self.material);
    }

    /// Kind of object.
    #[must_use]
    pub const fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Slot in the scene.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Scene node.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Material handle.
    #[must_use]
    pub const fn material(&self) -> MaterialId {
        self.material
    }

    /// Color restored when the pointer leaves.
    #[must_use]
    pub const fn base_color(&self) -> Color {
        self.base_color
    }

    /// Color currently on the material.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Current rotation.
    #[must_use]
    pub const fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Current scale.
    #[must_use]
    pub const fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Number of clicks received.
    #[must_use]
    pub const fn click_count(&self) -> u32 {
        self.click_count
    }

    /// Whether the pointer is over the object.
    #[must_use]
    pub const fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Whether the click emphasis window is open.
    #[must_use]
    pub fn is_emphasized(&self) -> bool {
        self.emphasis_remaining > 0.0
    }

    /// Whether no tween is running.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.animations.is_idle()
    }

    /// The object's trail.
    #[must_use]
    pub const fn trail(&self) -> &TrailEmitter {
        &self.trail
    }
}
