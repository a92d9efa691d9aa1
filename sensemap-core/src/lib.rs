//! # Sensemap Core
//!
//! Interaction core for marking regions of a static surface mesh with
//! categorical sensations.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 sensemap-core               │
//! ├─────────────────────────────────────────────┤
//! │  Mode Controller                            │
//! │  - Idle / Painting / Locked                 │
//! │  - pointer press/move/release routing       │
//! ├──────────────────────┬──────────────────────┤
//! │  Overlay Hit-Tester  │  Annotation Store    │
//! │  - control table     │  - per-face colors   │
//! │  - highlight labels  │  - Color Blender     │
//! ├──────────────────────┴──────────────────────┤
//! │  Export Pipeline     │  Collaborator traits │
//! │  - snapshot paths    │  - Viewport          │
//! │  - per-face table    │  - FacePicker        │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod event;
pub mod export;
pub mod geometry;
pub mod overlay;
pub mod sensation;
pub mod store;
pub mod viewport;

pub use color::{blend, FaceColor};
pub use config::SessionConfig;
pub use controller::{InteractionMode, ModeController, PointerOutcome, SessionStatus};
pub use document::SessionDocument;
pub use error::{CoreError, CoreResult};
pub use event::{InputEvent, ScreenPoint};
pub use export::{SnapshotExporter, TableExporter};
pub use geometry::{Surface, SurfaceMesh};
pub use overlay::{OverlayLayout, OverlayStyle, Rect, UiCommand, UiControl};
pub use sensation::Sensation;
pub use store::AnnotationStore;
pub use viewport::{FacePicker, Viewport};

/// Sensemap core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
