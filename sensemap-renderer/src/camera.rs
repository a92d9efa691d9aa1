//! Orthographic orbit camera.
//!
//! The camera circles a target point. Screen coordinates use a top-left
//! origin with y growing downward, matching the overlay table.
//!
//! ```text
//!              up
//!               ▲     forward
//!               │    ╱
//!               │   ╱
//!               │  ╱
//!        eye ●──┼─╱────► right
//!               │╱
//!            target
//! ```

use serde::{Deserialize, Serialize};
use sensemap_core::ScreenPoint;

/// A 3D vector for positions and directions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vec3 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Unit vector pointing up (Y+).
    #[must_use]
    pub const fn up() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    /// Calculate the length (magnitude) of the vector.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Normalize the vector to unit length.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            self.scale(1.0 / len)
        } else {
            *self
        }
    }

    /// Cross product of two vectors.
    #[must_use]
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Dot product of two vectors.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Subtract two vectors.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Add two vectors.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Scale vector by a scalar.
    #[must_use]
    pub fn scale(&self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// A half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Point at parameter `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin.add(&self.direction.scale(t))
    }
}

/// Keeps the camera off the poles so `right` stays defined.
const MAX_ELEVATION: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Orthographic camera orbiting a target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitCamera {
    /// Point the camera looks at.
    pub target: Vec3,
    /// Rotation about the world Y axis, in radians.
    pub azimuth: f32,
    /// Angle above the XZ plane, in radians.
    pub elevation: f32,
    /// Distance from target to eye.
    pub distance: f32,
    /// Half the visible world height.
    pub half_height: f32,
}

impl OrbitCamera {
    /// Camera on the +Z axis looking at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: Vec3::zero(),
            azimuth: 0.0,
            elevation: 0.0,
            distance: 5.0,
            half_height: 1.0,
        }
    }

    /// Frame an axis-aligned box so all of it is visible.
    #[must_use]
    pub fn fit(min: [f32; 3], max: [f32; 3]) -> Self {
        let min = Vec3::from(min);
        let max = Vec3::from(max);
        let target = min.add(&max).scale(0.5);
        let radius = max.sub(&min).length() * 0.5;
        let radius = if radius > f32::EPSILON { radius } else { 1.0 };
        Self {
            target,
            distance: radius * 3.0,
            half_height: radius * 1.1,
            ..Self::new()
        }
    }

    /// Rotate around the target.
    pub fn orbit(&mut self, delta_azimuth: f32, delta_elevation: f32) {
        self.azimuth = (self.azimuth + delta_azimuth) % std::f32::consts::TAU;
        self.elevation = (self.elevation + delta_elevation).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Unit vector from eye to target.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        Vec3::new(-cos_el * sin_az, -sin_el, -cos_el * cos_az)
    }

    /// Eye position in world space.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        self.target.sub(&self.forward().scale(self.distance))
    }

    /// Orthonormal `(right, up, forward)` basis.
    #[must_use]
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = self.forward();
        let right = forward.cross(&Vec3::up()).normalize();
        let up = right.cross(&forward);
        (right, up, forward)
    }

    /// Ray through a screen position of a `width` x `height` viewport.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ray_through(&self, point: ScreenPoint, width: u32, height: u32) -> Ray {
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        let (right, up, forward) = self.basis();
        let ndc_x = point.x / w * 2.0 - 1.0;
        let ndc_y = 1.0 - point.y / h * 2.0;
        let half_width = self.half_height * w / h;

        let offset = right
            .scale(ndc_x * half_width)
            .add(&up.scale(ndc_y * self.half_height));
        Ray {
            origin: self.eye().add(&offset),
            direction: forward,
        }
    }

    /// Project a world point to `(x, y, depth)` in screen space.
    ///
    /// Depth is the distance in front of the eye plane.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn project(&self, point: Vec3, width: u32, height: u32) -> (f32, f32, f32) {
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        let (right, up, forward) = self.basis();
        let rel = point.sub(&self.eye());
        let half_width = self.half_height * w / h;

        let x = (rel.dot(&right) / half_width + 1.0) * 0.5 * w;
        let y = (1.0 - rel.dot(&up) / self.half_height) * 0.5 * h;
        (x, y, rel.dot(&forward))
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_vec3_cross() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        let z = x.cross(&y);
        assert!(approx_eq(z.z, 1.0));
    }

    #[test]
    fn test_vec3_normalize_zero() {
        assert_eq!(Vec3::zero().normalize(), Vec3::zero());
    }

    #[test]
    fn test_default_looks_down_negative_z() {
        let camera = OrbitCamera::new();
        let f = camera.forward();
        assert!(approx_eq(f.z, -1.0));
        assert!(approx_eq(camera.eye().z, 5.0));
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let mut camera = OrbitCamera::new();
        camera.orbit(0.7, 0.3);
        let (r, u, f) = camera.basis();
        assert!(approx_eq(r.length(), 1.0));
        assert!(approx_eq(u.length(), 1.0));
        assert!(approx_eq(r.dot(&u), 0.0));
        assert!(approx_eq(r.dot(&f), 0.0));
    }

    #[test]
    fn test_elevation_is_clamped() {
        let mut camera = OrbitCamera::new();
        camera.orbit(0.0, 10.0);
        assert!(camera.elevation < std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_center_projects_to_screen_center() {
        let camera = OrbitCamera::new();
        let (x, y, depth) = camera.project(Vec3::zero(), 200, 100);
        assert!(approx_eq(x, 100.0));
        assert!(approx_eq(y, 50.0));
        assert!(approx_eq(depth, 5.0));
    }

    #[test]
    fn test_screen_y_grows_downward() {
        let camera = OrbitCamera::new();
        let (_, y_high, _) = camera.project(Vec3::new(0.0, 0.5, 0.0), 100, 100);
        let (_, y_low, _) = camera.project(Vec3::new(0.0, -0.5, 0.0), 100, 100);
        assert!(y_high < y_low);
    }

    #[test]
    fn test_ray_through_inverts_project() {
        let mut camera = OrbitCamera::fit([-1.0, -2.0, 0.0], [3.0, 1.0, 2.0]);
        camera.orbit(0.4, -0.2);
        let world = Vec3::new(0.5, -0.5, 1.0);
        let (x, y, depth) = camera.project(world, 640, 480);
        let ray = camera.ray_through(ScreenPoint::new(x, y), 640, 480);
        let hit = ray.at(depth);
        assert!(hit.sub(&world).length() < 1e-3);
    }

    #[test]
    fn test_fit_centers_box() {
        let camera = OrbitCamera::fit([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
        assert!(approx_eq(camera.target.x, 1.0));
        assert!(camera.half_height > 1.7);
    }
}
