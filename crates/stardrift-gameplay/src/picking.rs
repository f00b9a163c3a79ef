//! Pointer picking.
//!
//! Objects are picked against bounding spheres. The nearest hit along the ray
//! wins.

use glam::{Vec2, Vec3};

/// A ray with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance to the first intersection with a sphere in front of the
    /// origin.
    #[must_use]
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let to_center = center - self.origin;
        let along = to_center.dot(self.direction);
        let closest_sq = to_center.length_squared() - along * along;
        let radius_sq = radius * radius;
        if closest_sq > radius_sq {
            return None;
        }

        let half_chord = (radius_sq - closest_sq).sqrt();
        let near = along - half_chord;
        let far = along + half_chord;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            // origin inside the sphere
            Some(far)
        } else {
            None
        }
    }
}

/// Something the pointer can hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickTarget {
    /// Caller's index for the target
    pub index: usize,
    /// Bounding sphere center
    pub center: Vec3,
    /// Bounding sphere radius
    pub radius: f32,
}

/// Result of a successful pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the hit target
    pub index: usize,
    /// Distance along the ray
    pub distance: f32,
    /// Hit point in world space
    pub point: Vec3,
}

fn hits<'a, I>(ray: &'a Ray, targets: I) -> impl Iterator<Item = Hit> + 'a
where
    I: IntoIterator<Item = PickTarget>,
    I::IntoIter: 'a,
{
    targets.into_iter().filter_map(move |target| {
        ray.intersect_sphere(target.center, target.radius)
            .map(|distance| Hit {
                index: target.index,
                distance,
                point: ray.at(distance),
            })
    })
}

/// Returns the nearest target hit by `ray`.
pub fn pick(ray: &Ray, targets: impl IntoIterator<Item = PickTarget>) -> Option<Hit> {
    hits(ray, targets).min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Returns every target hit by `ray`, nearest first.
pub fn pick_all(ray: &Ray, targets: impl IntoIterator<Item = PickTarget>) -> Vec<Hit> {
    let mut all: Vec<Hit> = hits(ray, targets).collect();
    all.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    all
}

/// Converts pixel coordinates (origin top-left) to normalized device
/// coordinates in `[-1, 1]`, Y up.
#[must_use]
pub fn screen_to_ndc(pixel: Vec2, viewport: Vec2) -> Vec2 {
    let viewport = viewport.max(Vec2::ONE);
    Vec2::new(
        pixel.x / viewport.x * 2.0 - 1.0,
        -(pixel.y / viewport.y) * 2.0 + 1.0,
    )
}

/// Inverse of [`screen_to_ndc`].
#[must_use]
pub fn ndc_to_screen(ndc: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.x,
        (1.0 - ndc.y) * 0.5 * viewport.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z)
    }

    #[test]
    fn test_sphere_hit_distance() {
        let distance = forward()
            .intersect_sphere(Vec3::ZERO, 1.0)
            .expect("ray hits sphere");
        assert!((distance - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        assert!(forward().intersect_sphere(Vec3::new(2.0, 0.0, 0.0), 1.0).is_none());
        // behind the origin
        assert!(forward().intersect_sphere(Vec3::new(0.0, 0.0, 8.0), 1.0).is_none());
    }

    #[test]
    fn test_origin_inside_sphere() {
        let distance = forward()
            .intersect_sphere(Vec3::new(0.0, 0.0, 5.0), 1.0)
            .expect("ray exits sphere");
        assert!((distance - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_pick_prefers_nearest() {
        let targets = [
            PickTarget {
                index: 0,
                center: Vec3::new(0.0, 0.0, -1.0),
                radius: 0.5,
            },
            PickTarget {
                index: 1,
                center: Vec3::new(0.0, 0.0, 2.0),
                radius: 0.5,
            },
            PickTarget {
                index: 2,
                center: Vec3::new(3.0, 0.0, 2.0),
                radius: 0.5,
            },
        ];
        let hit = pick(&forward(), targets).expect("something is hit");
        assert_eq!(hit.index, 1);
        assert!((hit.point.z - 2.5).abs() < 1e-5);

        let order: Vec<usize> = pick_all(&forward(), targets).iter().map(|hit| hit.index).collect();
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn test_pick_nothing() {
        assert!(pick(&forward(), Vec::<PickTarget>::new()).is_none());
    }

    #[test]
    fn test_pick_from_borrowed_iterator() {
        let centers = vec![Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, 2.0)];
        let ray = forward();
        let lazy = centers.iter().enumerate().map(|(index, &center)| PickTarget {
            index,
            center,
            radius: 0.5,
        });

        let hit = pick(&ray, lazy.clone()).expect("something is hit");
        assert_eq!(hit.index, 1);
        assert_eq!(pick_all(&ray, lazy).len(), 2);
    }

    #[test]
    fn test_screen_ndc_conversion() {
        let viewport = Vec2::new(800.0, 600.0);
        assert_eq!(screen_to_ndc(Vec2::new(400.0, 300.0), viewport), Vec2::ZERO);
        assert_eq!(screen_to_ndc(Vec2::ZERO, viewport), Vec2::new(-1.0, 1.0));

        let pixel = Vec2::new(123.0, 456.0);
        let back = ndc_to_screen(screen_to_ndc(pixel, viewport), viewport);
        assert!((back - pixel).length() < 1e-3);
    }
}
