//! Input events fed to the stage.
//!
//! Hosts translate their window events into [`InputEvent`]s. Pointer and
//! scroll values are in pixels, origin top-left.

use glam::Vec2;

/// A host input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a pixel position
    PointerMove(Vec2),
    /// Primary button pressed at a pixel position
    Click(Vec2),
    /// Page scrolled to a vertical offset in pixels
    Scroll(f32),
    /// Viewport resized
    Resize {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },
    /// Trail emission switched on or off
    SetTrails(bool),
}

impl InputEvent {
    /// Short label for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PointerMove(_) => "pointer_move",
            Self::Click(_) => "click",
            Self::Scroll(_) => "scroll",
            Self::Resize { .. } => "resize",
            Self::SetTrails(_) => "set_trails",
        }
    }
}
