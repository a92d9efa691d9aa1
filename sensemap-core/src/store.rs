//! Per-face annotation state.
//!
//! The store holds exactly one [`FaceColor`] per face for the whole session.
//! It starts all-unpainted and only changes through [`AnnotationStore::paint`],
//! which runs the Color Blender.

use crate::{blend, CoreError, CoreResult, FaceColor, Sensation};

/// Dense face index to color table.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationStore {
    colors: Vec<FaceColor>,
}

impl AnnotationStore {
    /// Create a store for `face_count` faces, all unpainted.
    #[must_use]
    pub fn new(face_count: usize) -> Self {
        Self {
            colors: vec![FaceColor::UNPAINTED; face_count],
        }
    }

    /// Rebuild a store from a persisted color table.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SessionMismatch`] if the table length differs
    /// from `face_count`.
    pub fn from_colors(colors: Vec<FaceColor>, face_count: usize) -> CoreResult<Self> {
        if colors.len() != face_count {
            return Err(CoreError::SessionMismatch(format!(
                "{} stored colors for {face_count} faces",
                colors.len()
            )));
        }
        Ok(Self { colors })
    }

    /// Apply a sensation to a face and return the face's new color.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::FaceOutOfRange`] if `face` is not a valid index.
    pub fn paint(&mut self, face: usize, sensation: Sensation) -> CoreResult<FaceColor> {
        let face_count = self.colors.len();
        let slot = self
            .colors
            .get_mut(face)
            .ok_or(CoreError::FaceOutOfRange { face, face_count })?;
        *slot = blend(*slot, sensation.color());
        Ok(*slot)
    }

    /// Current color of a face.
    #[must_use]
    pub fn get(&self, face: usize) -> Option<FaceColor> {
        self.colors.get(face).copied()
    }

    /// The full color table in face-index order.
    #[must_use]
    pub fn colors(&self) -> &[FaceColor] {
        &self.colors
    }

    /// Number of faces tracked.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.colors.len()
    }

    /// Number of faces that differ from the unpainted sentinel.
    #[must_use]
    pub fn painted_count(&self) -> usize {
        self.colors.iter().filter(|c| !c.is_unpainted()).count()
    }

    /// Iterate `(face, color)` pairs in face-index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, FaceColor)> + '_ {
        self.colors.iter().copied().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_unpainted() {
        let store = AnnotationStore::new(5);
        assert_eq!(store.face_count(), 5);
        assert_eq!(store.painted_count(), 0);
        assert!(store.colors().iter().all(FaceColor::is_unpainted));
    }

    #[test]
    fn test_paint_touches_only_target_face() {
        let mut store = AnnotationStore::new(4);
        let color = store.paint(2, Sensation::Movement).expect("paint");
        assert_eq!(color, Sensation::Movement.color());
        assert_eq!(store.get(2), Some(color));
        for face in [0, 1, 3] {
            assert_eq!(store.get(face), Some(FaceColor::UNPAINTED));
        }
        assert_eq!(store.painted_count(), 1);
    }

    #[test]
    fn test_paint_blends_on_second_stroke() {
        let mut store = AnnotationStore::new(1);
        store.paint(0, Sensation::Paresthesia).expect("paint");
        let color = store.paint(0, Sensation::Movement).expect("paint");
        assert_eq!(color, FaceColor::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn test_paint_out_of_range() {
        let mut store = AnnotationStore::new(3);
        let err = store.paint(3, Sensation::Pressure).expect_err("out of range");
        assert!(matches!(err, CoreError::FaceOutOfRange { face: 3, face_count: 3 }));
        assert_eq!(store.painted_count(), 0);
    }

    #[test]
    fn test_from_colors_checks_length() {
        assert!(AnnotationStore::from_colors(vec![FaceColor::UNPAINTED; 2], 3).is_err());
        let store = AnnotationStore::from_colors(vec![FaceColor::new(1.0, 0.0, 0.0)], 1)
            .expect("matching length");
        assert_eq!(store.painted_count(), 1);
    }
}
