//! Background starfield: one point cloud that slowly spins.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use stardrift_common::{Color, MaterialId, NodeId, ShapeId};
use tracing::info;

use crate::scene::{MaterialDesc, Scene, ShapeDesc};

/// Starfield settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Number of stars
    pub count: usize,
    /// Edge length of the cube the stars fill, centered on the origin
    pub extent: f32,
    /// Point size
    pub point_size: f32,
    /// Rotation added per tick around X and Y
    pub spin: Vec2,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            extent: 10.0,
            point_size: 0.05,
            spin: Vec2::new(0.0005, 0.0003),
        }
    }
}

impl StarfieldConfig {
    /// Clamps settings to usable ranges.
    pub fn validate(&mut self) {
        self.count = self.count.min(100_000);
        self.extent = self.extent.max(0.0);
        self.point_size = self.point_size.max(0.0);
    }
}

/// The spinning point cloud.
#[derive(Debug)]
pub struct Starfield {
    node: NodeId,
    shape: ShapeId,
    material: MaterialId,
    spin: Vec2,
    spin_rotation: Vec3,
    offset: Vec3,
    star_count: usize,
}

impl Starfield {
    /// Scatters the stars and attaches the cloud.
    pub fn build<S: Scene + ?Sized>(
        scene: &mut S,
        config: &StarfieldConfig,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let mut coord = || (rng.f32() - 0.5) * config.extent;
        let positions: Vec<Vec3> = (0..config.count)
            .map(|_| Vec3::new(coord(), coord(), coord()))
            .collect();
        let scales: Vec<f32> = (0..config.count).map(|_| rng.f32()).collect();

        let shape = scene.create_shape(ShapeDesc::PointCloud { positions, scales });
        let material = scene.create_material(MaterialDesc::points(config.point_size, Color::WHITE));
        let node = scene.create_node(shape, material, Vec3::ZERO);
        scene.attach(node);
        info!("Starfield built with {} stars", config.count);

        Self {
            node,
            shape,
            material,
            spin: config.spin,
            spin_rotation: Vec3::ZERO,
            offset: Vec3::ZERO,
            star_count: config.count,
        }
    }

    /// Applies one tick of spin.
    pub fn advance<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        self.spin_rotation += Vec3::new(self.spin.x, self.spin.y, 0.0);
        scene.set_rotation(self.node, self.rotation());
    }

    /// Sets the extra rotation layered on top of the spin.
    pub fn set_offset<S: Scene + ?Sized>(&mut self, scene: &mut S, offset: Vec3) {
        self.offset = offset;
        scene.set_rotation(self.node, self.rotation());
    }

    /// Extra rotation layered on top of the spin.
    #[must_use]
    pub const fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Total rotation.
    #[must_use]
    pub fn rotation(&self) -> Vec3 {
        self.spin_rotation + self.offset
    }

    /// Node of the cloud.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Number of stars.
    #[must_use]
    pub const fn star_count(&self) -> usize {
        self.star_count
    }

    /// Detaches the cloud and releases its resources.
    pub fn dispose<S: Scene + ?Sized>(self, scene: &mut S) {
        scene.detach(self.node);
        scene.release_shape(self.shape);
        scene.release_material(self.material);
    }
}
