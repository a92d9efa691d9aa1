//! Persisted annotation sessions.
//!
//! A session document pairs the mesh with its per-face color table so the
//! table export can run later, without an interactive viewport.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{AnnotationStore, CoreResult, FaceColor, Surface, SurfaceMesh};

/// Current document format version.
pub const DOCUMENT_VERSION: u32 = 1;

/// JSON representation of an annotated mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDocument {
    /// Format version.
    pub version: u32,
    /// The annotated surface.
    pub mesh: SurfaceMesh,
    /// One color per face, in face-index order.
    pub colors: Vec<FaceColor>,
}

impl SessionDocument {
    /// Snapshot a mesh and its annotations.
    #[must_use]
    pub fn capture(mesh: &SurfaceMesh, store: &AnnotationStore) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            mesh: mesh.clone(),
            colors: store.colors().to_vec(),
        }
    }

    /// Split into the mesh and an annotation store.
    ///
    /// # Errors
    ///
    /// Returns an error if the color table does not have exactly one entry
    /// per face.
    pub fn into_parts(self) -> CoreResult<(SurfaceMesh, AnnotationStore)> {
        let store = AnnotationStore::from_colors(self.colors, self.mesh.face_count())?;
        Ok((self.mesh, store))
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the mesh is invalid.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let doc: Self = serde_json::from_str(json)?;
        if doc.version != DOCUMENT_VERSION {
            tracing::warn!(
                "Session document version {} differs from supported version {DOCUMENT_VERSION}",
                doc.version
            );
        }
        Ok(doc)
    }

    /// Write the document to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!("Session saved to {}", path.display());
        Ok(())
    }

    /// Read a document from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}
