//! Hover and click dispatch.

use glam::Vec3;
use stardrift_common::Color;
use stardrift_kernel::Scene;
use tracing::trace;

use crate::object::InteractiveObject;
use crate::picking::{pick, pick_all, PickTarget, Ray};

/// Cursor shape requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorIcon {
    /// Arrow
    #[default]
    Default,
    /// Hand over a clickable object
    Pointer,
}

/// What a click hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickOutcome {
    /// Index of the clicked object
    pub index: usize,
    /// World point under the pointer
    pub point: Vec3,
    /// Color the object is changing to
    pub color: Color,
}

/// Tracks the hovered object and routes pointer input to objects.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    hovered: Option<usize>,
    cursor: CursorIcon,
}

fn targets(objects: &[InteractiveObject]) -> impl Iterator<Item = PickTarget> + '_ {
    objects.iter().enumerate().map(|(index, object)| PickTarget {
        index,
        center: object.position(),
        radius: object.pick_radius(),
    })
}

impl Interaction {
    /// Creates a tracker with nothing hovered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates hover state for a pointer ray and returns the cursor to show.
    ///
    /// The hovered object keeps its highlight while the ray still crosses it;
    /// the nearest object under the ray takes over otherwise.
    pub fn pointer_moved<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        objects: &mut [InteractiveObject],
        ray: &Ray,
    ) -> CursorIcon {
        let hits = pick_all(ray, targets(objects));

        if let Some(hovered) = self.hovered {
            if !hits.iter().any(|hit| hit.index == hovered) {
                self.release(scene, objects, hovered);
            }
        }

        if let Some(nearest) = hits.first() {
            if self.hovered != Some(nearest.index) {
                if let Some(previous) = self.hovered {
                    self.release(scene, objects, previous);
                }
                if let Some(object) = objects.get_mut(nearest.index) {
                    object.hover_enter(scene);
                    trace!("Hovering {}", object.kind().name());
                }
                self.hovered = Some(nearest.index);
                self.cursor = CursorIcon::Pointer;
            }
        }

        self.cursor
    }

    fn release<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        objects: &mut [InteractiveObject],
        index: usize,
    ) {
        if let Some(object) = objects.get_mut(index) {
            object.hover_exit(scene);
        }
        self.hovered = None;
        self.cursor = CursorIcon::Default;
    }

    /// Dispatches a click along `ray` to the nearest object.
    pub fn click(&mut self, objects: &mut [InteractiveObject], ray: &Ray) -> Option<ClickOutcome> {
        let hit = pick(ray, targets(objects))?;
        let object = objects.get_mut(hit.index)?;
        let color = object.click();
        Some(ClickOutcome {
            index: hit.index,
            point: hit.point,
            color,
        })
    }

    /// Index of the hovered object.
    #[must_use]
    pub const fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Cursor to show.
    #[must_use]
    pub const fn cursor(&self) -> CursorIcon {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectKind;
    use stardrift_kernel::{MemoryScene, TrailConfig};

    fn scene_with_objects() -> (MemoryScene, Vec<InteractiveObject>) {
        let mut scene = MemoryScene::new();
        let objects = ObjectKind::ALL
            .iter()
            .enumerate()
            .map(|(index, kind)| {
                InteractiveObject::spawn(
                    &mut scene,
                    *kind,
                    index,
                    TrailConfig::default(),
                    fastrand::Rng::with_seed(index as u64),
                )
            })
            .collect();
        (scene, objects)
    }

    fn ray_at(target: Vec3) -> Ray {
        let origin = Vec3::new(0.0, 0.0, 5.0);
        Ray::new(origin, target - origin)
    }

    fn empty_ray() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, -1.0, 0.0))
    }

    #[test]
    fn test_hover_enter_and_leave() {
        let (mut scene, mut objects) = scene_with_objects();
        let mut interaction = Interaction::new();

        let cube = ray_at(ObjectKind::Cube.home_position());
        let cursor = interaction.pointer_moved(&mut scene, &mut objects, &cube);
        assert_eq!(cursor, CursorIcon::Pointer);
        assert_eq!(interaction.hovered(), Some(0));
        assert!(objects[0].is_hovered());
        assert_eq!(objects[0].color().to_hex(), 0xffffff);

        let cursor = interaction.pointer_moved(&mut scene, &mut objects, &empty_ray());
        assert_eq!(cursor, CursorIcon::Default);
        assert_eq!(interaction.hovered(), None);
        assert!(!objects[0].is_hovered());
        assert_eq!(objects[0].color().to_hex(), 0x00ff88);
    }

    #[test]
    fn test_hover_moves_between_objects() {
        let (mut scene, mut objects) = scene_with_objects();
        let mut interaction = Interaction::new();

        let cube = ray_at(ObjectKind::Cube.home_position());
        let cone = ray_at(ObjectKind::Cone.home_position());
        interaction.pointer_moved(&mut scene, &mut objects, &cube);
        interaction.pointer_moved(&mut scene, &mut objects, &cone);
        assert_eq!(interaction.hovered(), Some(4));
        assert!(!objects[0].is_hovered());
        assert!(objects[4].is_hovered());
        assert_eq!(interaction.cursor(), CursorIcon::Pointer);
    }

    #[test]
    fn test_click_reports_hit() {
        let (_scene, mut objects) = scene_with_objects();
        let mut interaction = Interaction::new();

        let outcome = interaction
            .click(&mut objects, &ray_at(ObjectKind::Torus.home_position()))
            .expect("torus is hit");
        assert_eq!(outcome.index, 2);
        assert_eq!(outcome.color.to_hex(), 0x00ff00);
        assert_eq!(objects[2].click_count(), 1);
        assert!(outcome.point.distance(ObjectKind::Torus.home_position()) <= 0.41);
    }

    #[test]
    fn test_click_on_nothing() {
        let (_scene, mut objects) = scene_with_objects();
        let mut interaction = Interaction::new();

        assert!(interaction.click(&mut objects, &empty_ray()).is_none());
        assert!(objects.iter().all(|object| object.click_count() == 0));
    }
}
