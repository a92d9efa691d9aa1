//! Export pipeline: frame snapshots and per-face tables.
//!
//! Both exports only read the annotation state. Snapshots are written by the
//! viewport under a timestamped name; tables are plain CSV with one row per
//! face, painted or not.

use std::fmt::Write as _;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::{AnnotationStore, CoreError, CoreResult, FaceColor, SessionConfig, Surface, Viewport};

/// CSV header row of the face table.
pub const TABLE_HEADER: &str = "Face_Index,Vertex_Coordinates,Red,Green,Blue";

/// Default file name of the face table.
pub const DEFAULT_TABLE_FILE: &str = "face_data_with_vertex_coords.csv";

/// Writes timestamped snapshots of the rendered frame.
#[derive(Debug, Clone)]
pub struct SnapshotExporter {
    output_dir: PathBuf,
}

impl SnapshotExporter {
    /// Create an exporter writing into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Create an exporter for a session's configured output directory.
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.output_dir.clone())
    }

    /// The directory snapshots are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File name for a snapshot taken at `timestamp`.
    #[must_use]
    pub fn file_name(timestamp: NaiveDateTime) -> String {
        timestamp.format("footMap_%Y%m%d-%H%M%S.png").to_string()
    }

    /// Capture the viewport's current frame, stamped with local time.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be created or the
    /// viewport fails to write the image.
    pub fn capture<V: Viewport + ?Sized>(&self, viewport: &mut V) -> CoreResult<PathBuf> {
        self.capture_at(viewport, chrono::Local::now().naive_local())
    }

    /// Capture the viewport's current frame under an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be created or the
    /// viewport fails to write the image.
    pub fn capture_at<V: Viewport + ?Sized>(
        &self,
        viewport: &mut V,
        timestamp: NaiveDateTime,
    ) -> CoreResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(Self::file_name(timestamp));
        viewport.screenshot(&path)?;
        tracing::info!("Image saved at: {}", path.display());
        Ok(path)
    }
}

/// Writes the per-face CSV table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableExporter;

impl TableExporter {
    /// Create a table exporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Write the header and one row per face to `out`, in face-index order.
    ///
    /// Returns the number of data rows written, which always equals the
    /// surface's face count.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SessionMismatch`] if the store does not cover
    /// exactly the surface's faces, or an I/O error from `out`.
    pub fn write<S, W>(&self, surface: &S, store: &AnnotationStore, out: W) -> CoreResult<usize>
    where
        S: Surface + ?Sized,
        W: Write,
    {
        let face_count = surface.face_count();
        if store.face_count() != face_count {
            return Err(CoreError::SessionMismatch(format!(
                "store tracks {} faces, surface has {face_count}",
                store.face_count()
            )));
        }

        let mut out = BufWriter::new(out);
        writeln!(out, "{TABLE_HEADER}")?;
        for (face, color) in store.iter() {
            let vertices = surface
                .face_vertices(face)
                .ok_or(CoreError::FaceOutOfRange { face, face_count })?;
            writeln!(out, "{}", render_row(face, &vertices, color))?;
        }
        out.flush()?;

        tracing::debug!("Wrote {face_count} face rows ({} painted)", store.painted_count());
        Ok(face_count)
    }

    /// Write the table to a file, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn export_to_path<S: Surface + ?Sized>(
        &self,
        surface: &S,
        store: &AnnotationStore,
        path: &Path,
    ) -> CoreResult<usize> {
        let file = std::fs::File::create(path)?;
        let rows = self.write(surface, store, file)?;
        tracing::info!(
            "Face data with vertex coordinates and colors has been saved to {}",
            path.display()
        );
        Ok(rows)
    }
}

/// Render a single CSV row.
fn render_row(face: usize, vertices: &[[f32; 3]], color: FaceColor) -> String {
    let mut coords = String::with_capacity(vertices.len() * 32);
    for (i, [x, y, z]) in vertices.iter().enumerate() {
        if i > 0 {
            coords.push_str("; ");
        }
        let _ = write!(coords, "({x:?}, {y:?}, {z:?})");
    }
    format!(
        "{face},{},{:?},{:?},{:?}",
        quote_field(&coords),
        color.r,
        color.g,
        color.b
    )
}

/// Quote a CSV field if it contains a delimiter, quote or line break.
fn quote_field(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Sensation, SurfaceMesh};

    fn two_triangles() -> SurfaceMesh {
        SurfaceMesh::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.5]],
            vec![vec![0, 1, 2], vec![0, 2, 3]],
        )
        .expect("valid mesh")
    }

    #[test]
    fn test_snapshot_file_name() {
        let ts = chrono::NaiveDate::from_ymd_opt(2024, 3, 7)
            .and_then(|d| d.and_hms_opt(9, 5, 42))
            .expect("valid timestamp");
        assert_eq!(SnapshotExporter::file_name(ts), "footMap_20240307-090542.png");
    }

    #[test]
    fn test_row_format() {
        let row = render_row(
            3,
            &[[0.0, 1.5, -2.0], [1.0, 0.0, 0.0]],
            FaceColor::new(1.0, 0.5, 0.0),
        );
        assert_eq!(row, "3,\"(0.0, 1.5, -2.0); (1.0, 0.0, 0.0)\",1.0,0.5,0.0");
    }

    #[test]
    fn test_unpainted_table() {
        let mesh = two_triangles();
        let store = AnnotationStore::new(2);
        let mut buf = Vec::new();
        let rows = TableExporter::new().write(&mesh, &store, &mut buf).expect("write");
        assert_eq!(rows, 2);

        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], TABLE_HEADER);
        assert!(lines[1].starts_with("0,\"(0.0, 0.0, 0.0); (1.0, 0.0, 0.0); (1.0, 1.0, 0.0)\""));
        assert!(lines[1].ends_with(",0.8,0.8,0.8"));
        assert!(lines[2].starts_with("1,"));
    }

    #[test]
    fn test_painted_face_in_table() {
        let mesh = two_triangles();
        let mut store = AnnotationStore::new(2);
        store.paint(1, Sensation::Vibration).expect("paint");
        let mut buf = Vec::new();
        TableExporter::new().write(&mesh, &store, &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        let last = text.lines().last().expect("row");
        assert!(last.ends_with(",0.0,1.0,0.0"), "{last}");
    }

    #[test]
    fn test_mismatched_store_is_rejected() {
        let mesh = two_triangles();
        let store = AnnotationStore::new(5);
        let result = TableExporter::new().write(&mesh, &store, Vec::new());
        assert!(matches!(result, Err(CoreError::SessionMismatch(_))));
    }

    #[test]
    fn test_quote_field() {
        assert_eq!(quote_field("plain"), "plain");
        assert_eq!(quote_field("a,b"), "\"a,b\"");
        assert_eq!(quote_field("say \"hi\", ok"), "\"say \"\"hi\"\", ok\"");
    }
}
