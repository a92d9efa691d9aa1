//! CPU viewport.
//!
//! Faces are flat shaded with their annotation color and depth tested per
//! pixel. Overlay controls are drawn last as filled panels; the highlighted
//! control gets a drop shadow. Label text is not rasterized.

use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};
use sensemap_core::{
    CoreResult, FaceColor, FacePicker, ScreenPoint, Surface, SurfaceMesh, UiControl, Viewport,
};

use crate::camera::{OrbitCamera, Vec3};
use crate::error::{RenderError, RenderResult};
use crate::picking::RayPicker;

/// Clear color of the frame.
pub const BACKGROUND: [u8; 4] = [255, 255, 255, 255];

const PANEL: [u8; 4] = [235, 235, 235, 255];
const SHADOW: [u8; 4] = [90, 90, 90, 255];
const SHADOW_OFFSET: i64 = 2;

/// Minimum light so faces seen edge-on stay visible.
const AMBIENT: f32 = 0.3;

/// Headless [`Viewport`] rendering a mesh into an RGBA buffer.
pub struct SoftwareViewport {
    mesh: SurfaceMesh,
    picker: RayPicker,
    camera: OrbitCamera,
    width: u32,
    height: u32,
    colors: Vec<FaceColor>,
    overlay: Vec<UiControl>,
    interaction_enabled: bool,
    frame: RgbaImage,
    depth: Vec<f32>,
    frames: u64,
    closed: bool,
}

impl SoftwareViewport {
    /// Create a viewport framing the whole mesh.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] if either dimension is zero.
    pub fn new(
        mesh: SurfaceMesh,
        width: u32,
        height: u32,
        pick_tolerance: f32,
    ) -> RenderResult<Self> {
        check_size(width, height)?;
        let camera = mesh
            .bounds()
            .map_or_else(OrbitCamera::new, |(min, max)| OrbitCamera::fit(min, max));
        let picker = RayPicker::new(&mesh, pick_tolerance);
        let colors = vec![FaceColor::UNPAINTED; mesh.face_count()];

        tracing::debug!("Software viewport {width}x{height} for {} faces", mesh.face_count());
        Ok(Self {
            mesh,
            picker,
            camera,
            width,
            height,
            colors,
            overlay: Vec::new(),
            interaction_enabled: true,
            frame: RgbaImage::from_pixel(width, height, Rgba(BACKGROUND)),
            depth: vec![f32::INFINITY; pixel_count(width, height)],
            frames: 0,
            closed: false,
        })
    }

    /// Change the surface size. The next frame is drawn at the new size.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] if either dimension is zero.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        check_size(width, height)?;
        self.width = width;
        self.height = height;
        self.frame = RgbaImage::from_pixel(width, height, Rgba(BACKGROUND));
        self.depth = vec![f32::INFINITY; pixel_count(width, height)];
        Ok(())
    }

    /// Rotate the camera. Returns `false` when navigation is disabled.
    pub fn orbit(&mut self, delta_azimuth: f32, delta_elevation: f32) -> bool {
        if !self.interaction_enabled {
            tracing::debug!("Orbit ignored: view is locked");
            return false;
        }
        self.camera.orbit(delta_azimuth, delta_elevation);
        true
    }

    /// The camera.
    #[must_use]
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Replace the camera.
    pub fn set_camera(&mut self, camera: OrbitCamera) {
        self.camera = camera;
    }

    /// The mesh being drawn.
    #[must_use]
    pub fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    /// The last drawn frame.
    #[must_use]
    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    /// Number of frames drawn so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Whether [`Viewport::close`] was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether camera navigation is enabled.
    #[must_use]
    pub fn interaction_enabled(&self) -> bool {
        self.interaction_enabled
    }

    /// Face colors as last pushed.
    #[must_use]
    pub fn face_colors(&self) -> &[FaceColor] {
        &self.colors
    }

    /// Overlay controls as last pushed.
    #[must_use]
    pub fn overlay(&self) -> &[UiControl] {
        &self.overlay
    }

    /// Encode the current frame as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encode`] if encoding fails.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let mut buf = std::io::Cursor::new(Vec::new());
        self.frame
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))?;
        Ok(buf.into_inner())
    }

    fn draw_mesh(&mut self) {
        let (width, height) = (self.width, self.height);
        let (_, _, forward) = self.camera.basis();

        for face in 0..self.mesh.face_count() {
            let Some(vertices) = self.mesh.face_vertices(face) else {
                continue;
            };
            let Some((&first, rest)) = vertices.split_first() else {
                continue;
            };
            let base = self.colors.get(face).copied().unwrap_or_default();

            for pair in rest.windows(2) {
                let world = [Vec3::from(first), Vec3::from(pair[0]), Vec3::from(pair[1])];
                let normal = world[1].sub(&world[0]).cross(&world[2].sub(&world[0])).normalize();
                let light = AMBIENT + (1.0 - AMBIENT) * normal.dot(&forward).abs();
                let shaded = FaceColor::new(base.r * light, base.g * light, base.b * light);
                let [r, g, b] = shaded.to_rgb8();

                let screen = world.map(|p| self.camera.project(p, width, height));
                self.fill_triangle(screen, [r, g, b, 255]);
            }
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn fill_triangle(&mut self, v: [(f32, f32, f32); 3], rgba: [u8; 4]) {
        let area = edge(v[0], v[1], (v[2].0, v[2].1));
        if area.abs() < f32::EPSILON {
            return;
        }

        let min_x = v.iter().map(|p| p.0).fold(f32::INFINITY, f32::min).floor().max(0.0);
        let max_x = v
            .iter()
            .map(|p| p.0)
            .fold(f32::NEG_INFINITY, f32::max)
            .ceil()
            .min(self.width as f32 - 1.0);
        let min_y = v.iter().map(|p| p.1).fold(f32::INFINITY, f32::min).floor().max(0.0);
        let max_y = v
            .iter()
            .map(|p| p.1)
            .fold(f32::NEG_INFINITY, f32::max)
            .ceil()
            .min(self.height as f32 - 1.0);
        if min_x > max_x || min_y > max_y {
            return;
        }

        for py in min_y as u32..=max_y as u32 {
            for px in min_x as u32..=max_x as u32 {
                let p = (px as f32 + 0.5, py as f32 + 0.5);
                let w0 = edge(v[1], v[2], p) / area;
                let w1 = edge(v[2], v[0], p) / area;
                let w2 = edge(v[0], v[1], p) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v[0].2 + w1 * v[1].2 + w2 * v[2].2;
                let idx = (py * self.width + px) as usize;
                if depth < self.depth[idx] {
                    self.depth[idx] = depth;
                    self.frame.put_pixel(px, py, Rgba(rgba));
                }
            }
        }
    }

    fn draw_overlay(&mut self) {
        let controls = std::mem::take(&mut self.overlay);
        for control in &controls {
            let rect = &control.rect;
            if control.highlighted {
                self.fill_rect(rect.x0, rect.y0, rect.x1, rect.y1, SHADOW_OFFSET, SHADOW);
            }
            self.fill_rect(rect.x0, rect.y0, rect.x1, rect.y1, 0, PANEL);

            // Color swatch in place of the label text.
            let [r, g, b] = control.color.to_rgb8();
            let inset = (rect.height() / 4.0).max(1.0);
            self.fill_rect(
                rect.x0 + inset,
                rect.y0 + inset,
                rect.x1 - inset,
                rect.y1 - inset,
                0,
                [r, g, b, 255],
            );
        }
        self.overlay = controls;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, offset: i64, rgba: [u8; 4]) {
        let clamp_x = |v: f32| (v.round() as i64 + offset).clamp(0, i64::from(self.width) - 1);
        let clamp_y = |v: f32| (v.round() as i64 + offset).clamp(0, i64::from(self.height) - 1);
        let (x0, x1) = (clamp_x(x0), clamp_x(x1));
        let (y0, y1) = (clamp_y(y0), clamp_y(y1));

        for y in y0..=y1 {
            for x in x0..=x1 {
                if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) {
                    self.frame.put_pixel(x, y, Rgba(rgba));
                }
            }
        }
    }
}

impl Viewport for SoftwareViewport {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_interaction_enabled(&mut self, enabled: bool) {
        self.interaction_enabled = enabled;
    }

    fn set_face_colors(&mut self, colors: &[FaceColor]) {
        if colors.len() != self.mesh.face_count() {
            tracing::warn!(
                "Ignoring {} face colors for a mesh with {} faces",
                colors.len(),
                self.mesh.face_count()
            );
            return;
        }
        self.colors.clear();
        self.colors.extend_from_slice(colors);
    }

    fn set_overlay(&mut self, controls: &[UiControl]) {
        self.overlay = controls.to_vec();
    }

    fn render(&mut self) {
        if self.closed {
            tracing::debug!("Render skipped: viewport closed");
            return;
        }

        for pixel in self.frame.pixels_mut() {
            *pixel = Rgba(BACKGROUND);
        }
        self.depth.fill(f32::INFINITY);

        self.draw_mesh();
        self.draw_overlay();
        self.frames += 1;
        tracing::trace!("Frame {} rendered", self.frames);
    }

    fn screenshot(&mut self, path: &Path) -> CoreResult<()> {
        let png = self.encode_png()?;
        std::fs::write(path, png)?;
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
        tracing::debug!("Viewport closed after {} frames", self.frames);
    }
}

impl FacePicker for SoftwareViewport {
    fn pick(&self, point: ScreenPoint) -> Option<usize> {
        let ray = self.camera.ray_through(point, self.width, self.height);
        self.picker.pick_ray(&ray)
    }
}

impl std::fmt::Debug for SoftwareViewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareViewport")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("faces", &self.mesh.face_count())
            .field("frames", &self.frames)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

fn check_size(width: u32, height: u32) -> RenderResult<()> {
    if width == 0 || height == 0 {
        return Err(RenderError::Surface(format!(
            "viewport must be non-empty, got {width}x{height}"
        )));
    }
    Ok(())
}

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// Signed area of the parallelogram spanned by `a->b` and `a->p`.
fn edge(a: (f32, f32, f32), b: (f32, f32, f32), p: (f32, f32)) -> f32 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}
