//! Surface geometry boundary.
//!
//! The core never modifies geometry. It needs a face count and, for the
//! table export, the vertex positions of each face.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Read-only view of a surface mesh's faces.
pub trait Surface {
    /// Number of faces. Face indices are dense in `0..face_count()`.
    fn face_count(&self) -> usize;

    /// Vertex positions of a face, in winding order.
    ///
    /// Returns `None` for an index outside `0..face_count()`.
    fn face_vertices(&self, face: usize) -> Option<Vec<[f32; 3]>>;
}

/// An in-memory polygonal surface mesh.
///
/// Every face has at least three vertices and every index is in range.
/// Deserialization goes through [`SurfaceMesh::new`], so the invariant
/// holds for meshes read from session documents too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MeshParts")]
pub struct SurfaceMesh {
    vertices: Vec<[f32; 3]>,
    faces: Vec<Vec<u32>>,
}

/// Unchecked wire form of [`SurfaceMesh`].
#[derive(Deserialize)]
struct MeshParts {
    vertices: Vec<[f32; 3]>,
    faces: Vec<Vec<u32>>,
}

impl TryFrom<MeshParts> for SurfaceMesh {
    type Error = CoreError;

    fn try_from(parts: MeshParts) -> CoreResult<Self> {
        Self::new(parts.vertices, parts.faces)
    }
}

impl SurfaceMesh {
    /// Build a mesh, checking that every face references at least three
    /// existing vertices.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidMesh`] for degenerate faces or dangling
    /// vertex indices.
    pub fn new(vertices: Vec<[f32; 3]>, faces: Vec<Vec<u32>>) -> CoreResult<Self> {
        let mesh = Self { vertices, faces };
        mesh.validate()?;
        Ok(mesh)
    }

    fn validate(&self) -> CoreResult<()> {
        for (face, indices) in self.faces.iter().enumerate() {
            if indices.len() < 3 {
                return Err(CoreError::InvalidMesh(format!(
                    "face {face} has {} vertices, need at least 3",
                    indices.len()
                )));
            }
            if let Some(bad) = indices
                .iter()
                .find(|&&i| i as usize >= self.vertices.len())
            {
                return Err(CoreError::InvalidMesh(format!(
                    "face {face} references vertex {bad}, mesh has {}",
                    self.vertices.len()
                )));
            }
        }
        Ok(())
    }

    /// Load a mesh from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the mesh is invalid.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse the geometry of a Wavefront OBJ file.
    ///
    /// Only `v` and `f` records are read. Face corners may carry texture and
    /// normal references (`i/t/n`), which are dropped. Negative indices are
    /// relative to the vertices read so far.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidMesh`] naming the first unreadable line,
    /// or if the resulting mesh is invalid.
    pub fn from_obj(text: &str) -> CoreResult<Self> {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            match fields.next() {
                Some("v") => {
                    let coords: Vec<f32> = fields
                        .take(3)
                        .map(str::parse::<f32>)
                        .collect::<Result<_, _>>()
                        .map_err(|e| obj_error(line_no, &format!("bad vertex: {e}")))?;
                    let [x, y, z] = coords[..] else {
                        return Err(obj_error(line_no, "vertex needs three coordinates"));
                    };
                    vertices.push([x, y, z]);
                }
                Some("f") => {
                    let face = fields
                        .map(|corner| obj_index(corner, vertices.len()))
                        .collect::<Option<Vec<u32>>>()
                        .ok_or_else(|| obj_error(line_no, "bad face index"))?;
                    faces.push(face);
                }
                _ => {}
            }
        }

        tracing::debug!("Parsed OBJ: {} vertices, {} faces", vertices.len(), faces.len());
        Self::new(vertices, faces)
    }

    /// Load a mesh from disk: `.obj` files as Wavefront OBJ, anything else as
    /// JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the mesh is
    /// invalid.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_obj = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));
        if is_obj {
            Self::from_obj(&text)
        } else {
            Self::from_json(&text)
        }
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for a mesh without
    /// vertices.
    #[must_use]
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(mut lo, mut hi), v| {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(v[axis]);
                hi[axis] = hi[axis].max(v[axis]);
            }
            (lo, hi)
        }))
    }
}

fn obj_error(line_no: usize, message: &str) -> CoreError {
    CoreError::InvalidMesh(format!("OBJ line {}: {message}", line_no + 1))
}

/// Resolve one face corner to a zero-based vertex index.
fn obj_index(corner: &str, vertex_count: usize) -> Option<u32> {
    let index: i64 = corner.split('/').next()?.parse().ok()?;
    let count = i64::try_from(vertex_count).ok()?;
    let resolved = match index {
        0 => return None,
        i if i > 0 => i - 1,
        i => count + i,
    };
    u32::try_from(resolved).ok()
}

impl Surface for SurfaceMesh {
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn face_vertices(&self, face: usize) -> Option<Vec<[f32; 3]>> {
        self.faces
            .get(face)?
            .iter()
            .map(|&i| self.vertices.get(i as usize).copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> SurfaceMesh {
        SurfaceMesh::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            vec![vec![0, 1, 2], vec![0, 2, 3]],
        )
        .expect("valid mesh")
    }

    #[test]
    fn test_face_vertices() {
        let mesh = unit_quad();
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(
            mesh.face_vertices(1),
            Some(vec![[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]])
        );
        assert_eq!(mesh.face_vertices(2), None);
    }

    #[test]
    fn test_rejects_dangling_index() {
        let result = SurfaceMesh::new(vec![[0.0; 3]; 3], vec![vec![0, 1, 3]]);
        assert!(matches!(result, Err(CoreError::InvalidMesh(_))));
    }

    #[test]
    fn test_rejects_degenerate_face() {
        let result = SurfaceMesh::new(vec![[0.0; 3]; 3], vec![vec![0, 1]]);
        assert!(matches!(result, Err(CoreError::InvalidMesh(_))));
    }

    #[test]
    fn test_from_json_validates() {
        let json = r#"{"vertices":[[0,0,0],[1,0,0]],"faces":[[0,1,2]]}"#;
        let err = SurfaceMesh::from_json(json).expect_err("dangling index");
        assert!(err.to_string().contains("references vertex 2"), "{err}");
    }

    #[test]
    fn test_nested_mesh_is_validated() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[allow(dead_code)]
            mesh: SurfaceMesh,
        }
        let json = r#"{"mesh":{"vertices":[[0,0,0]],"faces":[[0,1,2]]}}"#;
        assert!(serde_json::from_str::<Wrapper>(json).is_err());

        let json = r#"{"mesh":{"vertices":[[0,0,0],[1,0,0]],"faces":[[0,1]]}}"#;
        assert!(serde_json::from_str::<Wrapper>(json).is_err());
    }

    #[test]
    fn test_from_obj() {
        let obj = "\
# unit quad
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1
f -4 -2 -1
";
        let mesh = SurfaceMesh::from_obj(obj).expect("parse");
        assert_eq!(mesh, unit_quad());
    }

    #[test]
    fn test_from_obj_reports_line() {
        let err = SurfaceMesh::from_obj("v 0 0 0\nv 1 0\n").expect_err("short vertex");
        assert!(err.to_string().contains("line 2"), "{err}");

        let err = SurfaceMesh::from_obj("v 0 0 0\nf 0 1 1\n").expect_err("zero index");
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let obj = dir.path().join("mesh.OBJ");
        std::fs::write(&obj, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").expect("write");
        assert_eq!(SurfaceMesh::load(&obj).expect("load").face_count(), 1);

        let json = dir.path().join("mesh.json");
        std::fs::write(&json, r#"{"vertices":[[0,0,0],[1,0,0],[0,1,0]],"faces":[[0,1,2]]}"#)
            .expect("write");
        assert_eq!(SurfaceMesh::load(&json).expect("load").face_count(), 1);
    }

    #[test]
    fn test_bounds() {
        let (lo, hi) = unit_quad().bounds().expect("bounds");
        assert_eq!(lo, [0.0, 0.0, 0.0]);
        assert_eq!(hi, [1.0, 1.0, 0.0]);
    }
}
