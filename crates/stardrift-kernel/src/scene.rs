//! Scene collaborator interface.
//!
//! The particle core never renders anything itself. It creates, mutates and
//! releases resources through the [`Scene`] trait, which a rendering backend
//! implements. [`MemoryScene`] is the in-process backend used by the headless
//! driver and by tests; it tracks every resource and records misuse as
//! [`SceneViolation`]s.

use std::collections::{HashMap, HashSet};

use glam::Vec3;
use stardrift_common::{Color, MaterialId, NodeId, ResourceKind, SceneViolation, ShapeId};
use tracing::warn;

/// Segment count used for the small particle spheres.
pub const PARTICLE_SEGMENTS: u32 = 6;

/// Geometry description.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeDesc {
    /// UV sphere.
    Sphere {
        /// Radius
        radius: f32,
        /// Horizontal segments
        width_segments: u32,
        /// Vertical segments
        height_segments: u32,
    },
    /// Axis-aligned box.
    Box {
        /// Size along X
        width: f32,
        /// Size along Y
        height: f32,
        /// Size along Z
        depth: f32,
    },
    /// Torus around the Z axis.
    Torus {
        /// Ring radius
        radius: f32,
        /// Tube radius
        tube: f32,
        /// Segments around the tube
        radial_segments: u32,
        /// Segments around the ring
        tubular_segments: u32,
    },
    /// Regular octahedron.
    Octahedron {
        /// Circumradius
        radius: f32,
    },
    /// Cone with its apex on +Y.
    Cone {
        /// Base radius
        radius: f32,
        /// Height
        height: f32,
        /// Segments around the base
        radial_segments: u32,
    },
    /// Unconnected points with a per-point scale attribute.
    PointCloud {
        /// Point positions
        positions: Vec<Vec3>,
        /// Per-point scale
        scales: Vec<f32>,
    },
}

impl ShapeDesc {
    /// Small low-poly sphere used for trail and burst particles.
    #[must_use]
    pub const fn particle(radius: f32) -> Self {
        Self::Sphere {
            radius,
            width_segments: PARTICLE_SEGMENTS,
            height_segments: PARTICLE_SEGMENTS,
        }
    }
}

/// Shading model of a material.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MaterialKind {
    /// Unlit flat color.
    #[default]
    Basic,
    /// Diffuse lit surface.
    Lambert,
    /// Screen-space point sprites.
    Points {
        /// Point size in world units
        size: f32,
    },
}

/// Material description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialDesc {
    /// Shading model
    pub kind: MaterialKind,
    /// Tint
    pub color: Color,
    /// Initial opacity
    pub opacity: f32,
    /// Whether opacity is honored
    pub transparent: bool,
}

impl MaterialDesc {
    /// Tinted, transparent, fully opaque material used for particles.
    #[must_use]
    pub const fn particle(color: Color) -> Self {
        Self {
            kind: MaterialKind::Basic,
            color,
            opacity: 1.0,
            transparent: true,
        }
    }

    /// Opaque lit material.
    #[must_use]
    pub const fn lambert(color: Color) -> Self {
        Self {
            kind: MaterialKind::Lambert,
            color,
            opacity: 1.0,
            transparent: false,
        }
    }

    /// Point sprite material.
    #[must_use]
    pub const fn points(size: f32, color: Color) -> Self {
        Self {
            kind: MaterialKind::Points { size },
            color,
            opacity: 1.0,
            transparent: false,
        }
    }
}

/// Rendering backend consumed by the particle core.
///
/// Handles are weak: a backend reports a detached node as having no position
/// rather than failing.
pub trait Scene {
    /// Creates a geometry resource.
    fn create_shape(&mut self, desc: ShapeDesc) -> ShapeId;

    /// Creates a material resource.
    fn create_material(&mut self, desc: MaterialDesc) -> MaterialId;

    /// Creates a node using `shape` and `material`. The node is not attached.
    fn create_node(&mut self, shape: ShapeId, material: MaterialId, position: Vec3) -> NodeId;

    /// Adds a node to the rendered scene.
    fn attach(&mut self, node: NodeId);

    /// Removes a node from the rendered scene. Detaching twice is allowed.
    fn detach(&mut self, node: NodeId);

    /// Releases a geometry resource.
    fn release_shape(&mut self, shape: ShapeId);

    /// Releases a material resource.
    fn release_material(&mut self, material: MaterialId);

    /// World position of a live node.
    fn position(&self, node: NodeId) -> Option<Vec3>;

    /// Moves a node.
    fn set_position(&mut self, node: NodeId, position: Vec3);

    /// Sets a node's per-axis scale.
    fn set_scale(&mut self, node: NodeId, scale: Vec3);

    /// Sets a node's Euler rotation in radians (XYZ order).
    fn set_rotation(&mut self, node: NodeId, rotation: Vec3);

    /// Sets a material's opacity.
    fn set_opacity(&mut self, material: MaterialId, opacity: f32);

    /// Sets a material's tint.
    fn set_color(&mut self, material: MaterialId, color: Color);
}

/// State of a node held by [`MemoryScene`].
#[derive(Debug, Clone, PartialEq)]
pub struct NodeState {
    /// Geometry used by the node
    pub shape: ShapeId,
    /// Material used by the node
    pub material: MaterialId,
    /// World position
    pub position: Vec3,
    /// Euler rotation
    pub rotation: Vec3,
    /// Per-axis scale
    pub scale: Vec3,
    /// Whether the node is in the rendered scene
    pub attached: bool,
}

/// State of a material held by [`MemoryScene`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialState {
    /// Description the material was created with
    pub desc: MaterialDesc,
    /// Current tint
    pub color: Color,
    /// Current opacity
    pub opacity: f32,
}

/// Call counters kept by [`MemoryScene`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    /// Nodes created
    pub nodes_created: u64,
    /// `attach` calls
    pub attach_calls: u64,
    /// `detach` calls
    pub detach_calls: u64,
    /// Shapes created
    pub shapes_created: u64,
    /// `release_shape` calls
    pub shape_releases: u64,
    /// Materials created
    pub materials_created: u64,
    /// `release_material` calls
    pub material_releases: u64,
}

/// In-memory scene backend.
#[derive(Debug, Default)]
pub struct MemoryScene {
    next_id: u64,
    nodes: HashMap<NodeId, NodeState>,
    shapes: HashMap<ShapeId, ShapeDesc>,
    materials: HashMap<MaterialId, MaterialState>,
    released_shapes: HashSet<ShapeId>,
    released_materials: HashSet<MaterialId>,
    stats: SceneStats,
    violations: Vec<SceneViolation>,
}

impl MemoryScene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn was_issued(&self, raw: u64) -> bool {
        raw != 0 && raw <= self.next_id
    }

    fn record(&mut self, violation: SceneViolation) {
        warn!("Scene violation: {violation}");
        self.violations.push(violation);
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut NodeState> {
        if self.nodes.contains_key(&node) {
            return self.nodes.get_mut(&node);
        }
        let violation = if self.was_issued(node.raw()) {
            SceneViolation::StaleReference { node }
        } else {
            SceneViolation::UnknownHandle {
                kind: ResourceKind::Node,
                id: node.raw(),
            }
        };
        self.record(violation);
        None
    }

    fn material_mut(&mut self, material: MaterialId) -> Option<&mut MaterialState> {
        if self.materials.contains_key(&material) {
            return self.materials.get_mut(&material);
        }
        let violation = if self.released_materials.contains(&material) {
            SceneViolation::UseAfterRelease {
                kind: ResourceKind::Material,
                id: material.raw(),
            }
        } else {
            SceneViolation::UnknownHandle {
                kind: ResourceKind::Material,
                id: material.raw(),
            }
        };
        self.record(violation);
        None
    }

    fn attached_user(&self, matches: impl Fn(&NodeState) -> bool) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, state)| state.attached && matches(state))
            .map(|(id, _)| *id)
    }

    /// Returns a node's state if it is live.
    #[must_use]
    pub fn node(&self, node: NodeId) -> Option<&NodeState> {
        self.nodes.get(&node)
    }

    /// Returns a material's state if it has not been released.
    #[must_use]
    pub fn material(&self, material: MaterialId) -> Option<&MaterialState> {
        self.materials.get(&material)
    }

    /// Returns a shape's description if it has not been released.
    #[must_use]
    pub fn shape(&self, shape: ShapeId) -> Option<&ShapeDesc> {
        self.shapes.get(&shape)
    }

    /// Number of nodes currently attached.
    #[must_use]
    pub fn attached_count(&self) -> usize {
        self.nodes.values().filter(|n| n.attached).count()
    }

    /// Number of shapes not yet released.
    #[must_use]
    pub fn live_shapes(&self) -> usize {
        self.shapes.len()
    }

    /// Number of materials not yet released.
    #[must_use]
    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }

    /// Call counters.
    #[must_use]
    pub const fn stats(&self) -> SceneStats {
        self.stats
    }

    /// Violations recorded so far.
    #[must_use]
    pub fn violations(&self) -> &[SceneViolation] {
        &self.violations
    }

    /// Removes and returns the recorded violations.
    pub fn take_violations(&mut self) -> Vec<SceneViolation> {
        std::mem::take(&mut self.violations)
    }
}

impl Scene for MemoryScene {
    fn create_shape(&mut self, desc: ShapeDesc) -> ShapeId {
        let id = ShapeId::from_raw(self.issue());
        self.shapes.insert(id, desc);
        self.stats.shapes_created += 1;
        id
    }

    fn create_material(&mut self, desc: MaterialDesc) -> MaterialId {
        let id = MaterialId::from_raw(self.issue());
        self.materials.insert(
            id,
            MaterialState {
                desc,
                color: desc.color,
                opacity: desc.opacity,
            },
        );
        self.stats.materials_created += 1;
        id
    }

    fn create_node(&mut self, shape: ShapeId, material: MaterialId, position: Vec3) -> NodeId {
        if !self.shapes.contains_key(&shape) {
            self.record(SceneViolation::UnknownHandle {
                kind: ResourceKind::Shape,
                id: shape.raw(),
            });
        }
        if !self.materials.contains_key(&material) {
            self.record(SceneViolation::UnknownHandle {
                kind: ResourceKind::Material,
                id: material.raw(),
            });
        }
        let id = NodeId::from_raw(self.issue());
        self.nodes.insert(
            id,
            NodeState {
                shape,
                material,
                position,
                rotation: Vec3::ZERO,
                scale: Vec3::ONE,
                attached: false,
            },
        );
        self.stats.nodes_created += 1;
        id
    }

    fn attach(&mut self, node: NodeId) {
        self.stats.attach_calls += 1;
        if let Some(state) = self.node_mut(node) {
            state.attached = true;
        }
    }

    fn detach(&mut self, node: NodeId) {
        self.stats.detach_calls += 1;
        // Detached nodes leave the graph; a second detach is a no-op.
        self.nodes.remove(&node);
    }

    fn release_shape(&mut self, shape: ShapeId) {
        self.stats.shape_releases += 1;
        if let Some(node) = self.attached_user(|n| n.shape == shape) {
            self.record(SceneViolation::ReleasedWhileAttached {
                kind: ResourceKind::Shape,
                id: shape.raw(),
                node,
            });
        }
        if self.shapes.remove(&shape).is_some() {
            self.released_shapes.insert(shape);
        } else if self.released_shapes.contains(&shape) {
            self.record(SceneViolation::DoubleRelease {
                kind: ResourceKind::Shape,
                id: shape.raw(),
            });
        } else {
            self.record(SceneViolation::UnknownHandle {
                kind: ResourceKind::Shape,
                id: shape.raw(),
            });
        }
    }

    fn release_material(&mut self, material: MaterialId) {
        self.stats.material_releases += 1;
        if let Some(node) = self.attached_user(|n| n.material == material) {
            self.record(SceneViolation::ReleasedWhileAttached {
                kind: ResourceKind::Material,
                id: material.raw(),
                node,
            });
        }
        if self.materials.remove(&material).is_some() {
            self.released_materials.insert(material);
        } else if self.released_materials.contains(&material) {
            self.record(SceneViolation::DoubleRelease {
                kind: ResourceKind::Material,
                id: material.raw(),
            });
        } else {
            self.record(SceneViolation::UnknownHandle {
                kind: ResourceKind::Material,
                id: material.raw(),
            });
        }
    }

    fn position(&self, node: NodeId) -> Option<Vec3> {
        self.nodes.get(&node).map(|n| n.position)
    }

    fn set_position(&mut self, node: NodeId, position: Vec3) {
        if let Some(state) = self.node_mut(node) {
            state.position = position;
        }
    }

    fn set_scale(&mut self, node: NodeId, scale: Vec3) {
        if let Some(state) = self.node_mut(node) {
            state.scale = scale;
        }
    }

    fn set_rotation(&mut self, node: NodeId, rotation: Vec3) {
        if let Some(state) = self.node_mut(node) {
            state.rotation = rotation;
        }
    }

    fn set_opacity(&mut self, material: MaterialId, opacity: f32) {
        if let Some(state) = self.material_mut(material) {
            state.opacity = opacity;
        }
    }

    fn set_color(&mut self, material: MaterialId, color: Color) {
        if let Some(state) = self.material_mut(material) {
            state.color = color;
        }
    }
}
