//! # Stardrift Gameplay
//!
//! Interactive layer on top of the particle kernel:
//! - Time-based tweens with easing, yoyo and repeat
//! - The five clickable objects and their trails
//! - Camera rig, pointer follow and scroll sections
//! - Ray picking and hover/click dispatch
//!
//! Tweens run in seconds while particles age in frames. The frame driver
//! passes both the frame delta and the scene clock into [`object::InteractiveObject::animate`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod camera;
pub mod interaction;
pub mod object;
pub mod picking;
pub mod tween;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::camera::*;
    pub use crate::interaction::*;
    pub use crate::object::*;
    pub use crate::picking::*;
    pub use crate::tween::*;
}

pub use prelude::*;
