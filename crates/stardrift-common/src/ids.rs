//! Handle types for scene resources.
//!
//! Handles are plain copyable identifiers issued by a scene backend. They do
//! not keep anything alive: holding a `NodeId` is a weak reference, and a
//! backend is free to report that the node no longer exists.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            /// Creates a handle from a raw value.
            #[must_use]
            pub const fn from_raw(value: u64) -> Self {
                Self(value)
            }

            /// Returns the raw handle value.
            #[must_use]
            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

handle!(
    /// A renderable node in the scene graph.
    NodeId,
    "node"
);

handle!(
    /// A geometry resource.
    ShapeId,
    "shape"
);

handle!(
    /// A material (appearance) resource.
    MaterialId,
    "material"
);

/// Kind of releasable resource, used when reporting violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Scene graph node
    Node,
    /// Geometry
    Shape,
    /// Material
    Material,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Shape => f.write_str("shape"),
            Self::Material => f.write_str("material"),
        }
    }
}
