//! Error types for Project Stardrift.

use thiserror::Error;

use crate::ids::{NodeId, ResourceKind};

/// Top-level error type for Stardrift operations.
#[derive(Debug, Error)]
pub enum StardriftError {
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Scene resource misuse detected at teardown
    #[error("{count} scene violation(s), first: {first}")]
    SceneViolations {
        /// Number of violations recorded
        count: usize,
        /// First violation recorded
        first: SceneViolation,
    },
}

/// Configuration loading and saving errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    /// File contents are not valid TOML for the config schema
    #[error("Failed to parse config file: {0}")]
    Parse(String),

    /// Config could not be serialized
    #[error("Failed to serialize config: {0}")]
    Serialize(String),
}

/// Misuse of scene resources.
///
/// Scene backends record these instead of panicking so a run can report every
/// leak or double release at once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneViolation {
    /// A resource was released a second time
    #[error("{kind} {id} released twice")]
    DoubleRelease {
        /// Resource kind
        kind: ResourceKind,
        /// Raw handle value
        id: u64,
    },

    /// A node was mutated after it was detached
    #[error("{node} used after detach")]
    StaleReference {
        /// Offending node
        node: NodeId,
    },

    /// A released shape or material was used again
    #[error("{kind} {id} used after release")]
    UseAfterRelease {
        /// Resource kind
        kind: ResourceKind,
        /// Raw handle value
        id: u64,
    },

    /// A shape or material was released while an attached node still used it
    #[error("{kind} {id} released while attached to {node}")]
    ReleasedWhileAttached {
        /// Resource kind
        kind: ResourceKind,
        /// Raw handle value
        id: u64,
        /// Node still holding the resource
        node: NodeId,
    },

    /// A handle was never issued by this scene
    #[error("unknown {kind} {id}")]
    UnknownHandle {
        /// Resource kind
        kind: ResourceKind,
        /// Raw handle value
        id: u64,
    },
}

/// Result type alias for Stardrift operations.
pub type StardriftResult<T> = Result<T, StardriftError>;
