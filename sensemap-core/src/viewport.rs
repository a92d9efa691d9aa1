//! Collaborator traits for the renderer and picker.
//!
//! The core drives these but never implements them; rendering, camera
//! control and ray casting live outside the interaction core.

use std::path::Path;

use crate::{CoreResult, FaceColor, ScreenPoint, UiControl};

/// Resolves a viewport position to the face under it.
pub trait FacePicker {
    /// The face index under `point`, or `None` when nothing is hit.
    ///
    /// Implementations should tolerate near misses within a fixed
    /// world-space distance. Occlusion and out-of-bounds positions are not
    /// distinguished.
    fn pick(&self, point: ScreenPoint) -> Option<usize>;
}

/// The 3D view the session draws into.
pub trait Viewport {
    /// Current size in pixels as `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Enable or disable camera navigation.
    fn set_interaction_enabled(&mut self, enabled: bool);

    /// Replace the per-face colors shown on the mesh.
    fn set_face_colors(&mut self, colors: &[FaceColor]);

    /// Replace the overlay controls drawn on top of the view.
    fn set_overlay(&mut self, controls: &[UiControl]);

    /// Draw a frame.
    fn render(&mut self);

    /// Write the current frame to `path` as a PNG image.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be captured or written.
    fn screenshot(&mut self, path: &Path) -> CoreResult<()>;

    /// Close the view. No further frames are drawn.
    fn close(&mut self);
}
