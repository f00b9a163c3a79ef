//! Camera rig and scroll sections.
//!
//! The camera eases toward a point offset by the pointer and dollies in one
//! step per scrolled section.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::picking::Ray;
use crate::tween::{Ease, Tween};

/// Camera distance at section zero.
pub const BASE_DEPTH: f32 = 5.0;

/// Depth change per section.
pub const SECTION_DEPTH_STEP: f32 = 0.5;

/// Duration of section transitions in seconds.
pub const SECTION_SECONDS: f32 = 1.5;

/// Camera settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
    /// How far the pointer pulls the camera, per NDC unit
    pub follow_reach: f32,
    /// Fraction of the remaining distance covered per tick
    pub follow_smoothing: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            follow_reach: 0.05,
            follow_smoothing: 0.1,
        }
    }
}

impl CameraConfig {
    /// Clamps settings to usable ranges.
    pub fn validate(&mut self) {
        self.fov_degrees = self.fov_degrees.clamp(10.0, 170.0);
        self.near = self.near.max(0.001);
        self.far = self.far.max(self.near + 1.0);
        self.follow_smoothing = self.follow_smoothing.clamp(0.0, 1.0);
    }
}

/// Perspective camera that follows the pointer.
#[derive(Debug, Clone)]
pub struct CameraRig {
    config: CameraConfig,
    position: Vec3,
    aspect: f32,
    pointer: Vec2,
    dolly: Option<Tween<f32>>,
}

impl CameraRig {
    /// Creates a camera at the base depth.
    #[must_use]
    pub fn new(config: CameraConfig, viewport: Vec2) -> Self {
        let mut rig = Self {
            config,
            position: Vec3::new(0.0, 0.0, BASE_DEPTH),
            aspect: 1.0,
            pointer: Vec2::ZERO,
            dolly: None,
        };
        rig.resize(viewport);
        rig
    }

    /// Updates the aspect ratio for a new viewport size.
    pub fn resize(&mut self, viewport: Vec2) {
        if viewport.x > 0.0 && viewport.y > 0.0 {
            self.aspect = viewport.x / viewport.y;
        }
    }

    /// Records the pointer position in NDC.
    pub fn set_pointer(&mut self, ndc: Vec2) {
        self.pointer = ndc;
    }

    /// Starts a dolly to depth `z`.
    pub fn dolly_to(&mut self, z: f32) {
        self.dolly = Some(Tween::new(
            self.position.z,
            z,
            SECTION_SECONDS,
            Ease::Power2InOut,
        ));
    }

    /// Advances pointer follow and any running dolly.
    pub fn animate(&mut self, dt: f32) {
        let goal = self.pointer * self.config.follow_reach;
        self.position.x += (goal.x - self.position.x) * self.config.follow_smoothing;
        self.position.y += (goal.y - self.position.y) * self.config.follow_smoothing;

        if let Some(dolly) = &mut self.dolly {
            self.position.z = dolly.advance(dt);
            if dolly.is_finished() {
                self.dolly = None;
            }
        }
    }

    /// World to view transform. The camera looks down -Z.
    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, Vec3::NEG_Z, Vec3::Y)
    }

    /// View to clip transform.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.config.fov_degrees.to_radians(),
            self.aspect,
            self.config.near,
            self.config.far,
        )
    }

    /// Combined world to clip transform.
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Ray from the camera through an NDC point.
    #[must_use]
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(ndc.extend(-1.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        Ray::new(near, far - near)
    }

    /// NDC position of a world point, if it is in front of the camera.
    #[must_use]
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        Some(Vec2::new(clip.x, clip.y) / clip.w)
    }

    /// Camera position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Viewport aspect ratio.
    #[must_use]
    pub const fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Whether a dolly is running.
    #[must_use]
    pub const fn is_dollying(&self) -> bool {
        self.dolly.is_some()
    }
}

/// A change of scroll section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionChange {
    /// Section before the scroll
    pub from: i32,
    /// Section after the scroll
    pub to: i32,
}

impl SectionChange {
    /// Camera depth for the new section.
    #[must_use]
    pub fn camera_depth(self) -> f32 {
        BASE_DEPTH - self.to as f32 * SECTION_DEPTH_STEP
    }

    /// Z shift applied to objects: toward the camera when scrolling down.
    #[must_use]
    pub fn object_shift(self) -> f32 {
        if self.to > self.from {
            -SECTION_DEPTH_STEP
        } else {
            SECTION_DEPTH_STEP
        }
    }
}

/// Tracks which viewport-sized section the page is scrolled to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollTracker {
    section: i32,
}

impl ScrollTracker {
    /// Creates a tracker at section zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { section: 0 }
    }

    /// Reports a scroll offset and returns the change, if any.
    pub fn scroll_to(&mut self, offset: f32, viewport_height: f32) -> Option<SectionChange> {
        if viewport_height <= 0.0 {
            return None;
        }
        let section = (offset / viewport_height).round() as i32;
        if section == self.section {
            return None;
        }
        let change = SectionChange {
            from: self.section,
            to: section,
        };
        self.section = section;
        Some(change)
    }

    /// Current section.
    #[must_use]
    pub const fn section(&self) -> i32 {
        self.section
    }
}
