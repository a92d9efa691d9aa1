//! Session configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::OverlayStyle;

/// Folder, relative to the working directory, that snapshots land in.
pub const DEFAULT_OUTPUT_FOLDER: &str = "Foot Maps";

/// World-space distance within which a near miss still picks a face.
pub const DEFAULT_PICK_TOLERANCE: f32 = 0.01;

/// Settings for an annotation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory snapshots are written to. Created on first save.
    pub output_dir: PathBuf,
    /// Overlay control placement.
    pub overlay: OverlayStyle,
    /// Picking tolerance in world units.
    pub pick_tolerance: f32,
    /// Initial viewport width in pixels.
    pub viewport_width: u32,
    /// Initial viewport height in pixels.
    pub viewport_height: u32,
}

impl SessionConfig {
    /// Default configuration rooted at the current working directory.
    ///
    /// Falls back to a relative path if the working directory cannot be
    /// determined.
    #[must_use]
    pub fn new() -> Self {
        let base = std::env::current_dir().unwrap_or_default();
        Self {
            output_dir: base.join(DEFAULT_OUTPUT_FOLDER),
            overlay: OverlayStyle::default(),
            pick_tolerance: DEFAULT_PICK_TOLERANCE,
            viewport_width: 1024,
            viewport_height: 768,
        }
    }

    /// Override the snapshot directory.
    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_dir() {
        let config = SessionConfig::default();
        assert!(config.output_dir.ends_with(DEFAULT_OUTPUT_FOLDER));
        assert_eq!(config.overlay, OverlayStyle::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"pick_tolerance": 0.5}"#).expect("parse");
        assert!((config.pick_tolerance - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.viewport_width, 1024);
    }
}
