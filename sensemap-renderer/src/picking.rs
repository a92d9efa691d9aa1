//! Ray picking against a surface mesh.
//!
//! Polygons are fan-triangulated from their first vertex. A ray picks a
//! triangle when it crosses the triangle's plane inside the triangle, or
//! within `tolerance` world units of its boundary. The nearest hit along
//! the ray wins.

use sensemap_core::{Surface, SurfaceMesh};

use crate::camera::{Ray, Vec3};

/// Rays nearly parallel to a triangle are treated as misses.
const PARALLEL_EPSILON: f32 = 1e-8;

#[derive(Debug, Clone)]
struct Triangle {
    face: usize,
    a: Vec3,
    b: Vec3,
    c: Vec3,
}

/// Nearest-face picker for a static mesh.
#[derive(Debug, Clone)]
pub struct RayPicker {
    triangles: Vec<Triangle>,
    tolerance: f32,
}

impl RayPicker {
    /// Build a picker for `mesh` accepting near misses up to `tolerance`.
    #[must_use]
    pub fn new(mesh: &SurfaceMesh, tolerance: f32) -> Self {
        let mut triangles = Vec::new();
        for face in 0..mesh.face_count() {
            let Some(vertices) = mesh.face_vertices(face) else {
                continue;
            };
            let Some((&first, rest)) = vertices.split_first() else {
                continue;
            };
            for pair in rest.windows(2) {
                triangles.push(Triangle {
                    face,
                    a: first.into(),
                    b: pair[0].into(),
                    c: pair[1].into(),
                });
            }
        }

        tracing::debug!(
            "Picker built: {} faces, {} triangles",
            mesh.face_count(),
            triangles.len()
        );
        Self {
            triangles,
            tolerance: tolerance.max(0.0),
        }
    }

    /// The face nearest along `ray`, if any.
    #[must_use]
    pub fn pick_ray(&self, ray: &Ray) -> Option<usize> {
        self.triangles
            .iter()
            .filter_map(|tri| self.intersect(ray, tri).map(|t| (t, tri.face)))
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, face)| face)
    }

    /// Möller–Trumbore, extended with a boundary tolerance.
    fn intersect(&self, ray: &Ray, tri: &Triangle) -> Option<f32> {
        let edge1 = tri.b.sub(&tri.a);
        let edge2 = tri.c.sub(&tri.a);
        let h = ray.direction.cross(&edge2);
        let det = edge1.dot(&h);
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }

        let inv = 1.0 / det;
        let s = ray.origin.sub(&tri.a);
        let u = inv * s.dot(&h);
        let q = s.cross(&edge1);
        let v = inv * ray.direction.dot(&q);
        let t = inv * edge2.dot(&q);
        if t < 0.0 {
            return None;
        }

        if u >= 0.0 && v >= 0.0 && u + v <= 1.0 {
            return Some(t);
        }

        let hit = ray.at(t);
        let distance = segment_distance(hit, tri.a, tri.b)
            .min(segment_distance(hit, tri.b, tri.c))
            .min(segment_distance(hit, tri.c, tri.a));
        (distance <= self.tolerance).then_some(t)
    }
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: Vec3, a: Vec3, b: Vec3) -> f32 {
    let ab = b.sub(&a);
    let len_sq = ab.dot(&ab);
    if len_sq <= f32::EPSILON {
        return p.sub(&a).length();
    }
    let t = (p.sub(&a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    p.sub(&a.add(&ab.scale(t))).length()
}
