//! # Sensemap Renderer
//!
//! A CPU viewport for annotation sessions. No GPU or window is required, so
//! sessions can be replayed and snapshotted headless.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │             SoftwareViewport                │
//! │  impl Viewport + FacePicker                 │
//! ├──────────────┬──────────────┬───────────────┤
//! │ OrbitCamera  │ RayPicker    │ Rasterizer    │
//! │ orthographic │ ray/triangle │ depth-tested  │
//! │ fit + orbit  │ + tolerance  │ flat shading  │
//! └──────────────┴──────────────┴───────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod camera;
pub mod error;
pub mod picking;
pub mod raster;

pub use camera::{OrbitCamera, Ray, Vec3};
pub use error::{RenderError, RenderResult};
pub use picking::RayPicker;
pub use raster::{SoftwareViewport, BACKGROUND};
