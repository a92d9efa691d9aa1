//! # Sensemap CLI
//!
//! Batch host for annotation sessions. Sessions run headless on the
//! software viewport, so recorded input can be replayed and persisted
//! sessions exported without a display.
//!
//! ## Usage
//!
//! ```bash
//! sensemap replay --mesh human_foot.obj --events clicks.json --session-out foot.session.json
//! sensemap snapshot --session foot.session.json
//! sensemap export-table --session foot.session.json --output faces.csv
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `SessionConfig` - Built from the global flags
//! - `replay`, `snapshot`, `export_table` - One function per subcommand

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use sensemap_core::config::DEFAULT_PICK_TOLERANCE;
use sensemap_core::export::DEFAULT_TABLE_FILE;
use sensemap_core::{
    AnnotationStore, InputEvent, ModeController, SessionConfig, SessionDocument, SessionStatus,
    Surface, SurfaceMesh, TableExporter,
};
use sensemap_renderer::SoftwareViewport;

/// Command-line arguments for sensemap.
#[derive(Debug, Clone, Parser)]
#[command(name = "sensemap")]
#[command(about = "Map sensations onto 3D surface meshes")]
#[command(version)]
pub struct CliArgs {
    /// Directory snapshots are written to (default: ./Foot Maps)
    #[arg(long, env = "SENSEMAP_OUTPUT_DIR", global = true)]
    pub output_dir: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, default_value = "1024", global = true)]
    pub width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value = "768", global = true)]
    pub height: u32,

    /// World-space distance within which a near miss still picks a face
    #[arg(long, default_value_t = DEFAULT_PICK_TOLERANCE, global = true)]
    pub pick_tolerance: f32,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write the per-face table of a persisted session as CSV.
    ExportTable {
        /// Session document to read
        #[arg(long)]
        session: PathBuf,

        /// CSV file to write
        #[arg(long, default_value = DEFAULT_TABLE_FILE)]
        output: PathBuf,
    },

    /// Run recorded input events against a mesh.
    Replay {
        /// Mesh file (.obj or .json)
        #[arg(long)]
        mesh: PathBuf,

        /// JSON array of input events
        #[arg(long)]
        events: PathBuf,

        /// Where to persist the resulting session
        #[arg(long)]
        session_out: Option<PathBuf>,
    },

    /// Render a persisted session and save a timestamped snapshot.
    Snapshot {
        /// Session document to read
        #[arg(long)]
        session: PathBuf,
    },
}

impl From<&CliArgs> for SessionConfig {
    fn from(args: &CliArgs) -> Self {
        let base = SessionConfig::new();
        let output_dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| base.output_dir.clone());
        Self {
            output_dir,
            pick_tolerance: args.pick_tolerance,
            viewport_width: args.width,
            viewport_height: args.height,
            ..base
        }
    }
}

/// Result of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    /// Events in the input file.
    pub events: usize,
    /// Events dispatched before the session closed.
    pub dispatched: usize,
    /// Faces no longer at the unpainted color.
    pub painted_faces: usize,
    /// Frames the viewport drew.
    pub frames: u64,
    /// Session state after the last event.
    pub status: SessionStatus,
}

/// Run the parsed command.
///
/// # Errors
///
/// Returns an error if any input cannot be read or any output written.
pub fn run(args: &CliArgs) -> anyhow::Result<()> {
    let config = SessionConfig::from(args);
    tracing::debug!("Session config: {config:?}");

    match &args.command {
        Command::ExportTable { session, output } => {
            let rows = export_table(session, output)?;
            tracing::info!("Exported {rows} faces to {}", output.display());
        }
        Command::Replay {
            mesh,
            events,
            session_out,
        } => {
            let summary = replay(&config, mesh, events, session_out.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Snapshot { session } => {
            let path = snapshot(&config, session)?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

/// Export the face table of a persisted session.
///
/// # Errors
///
/// Returns an error if the session cannot be loaded or the table written.
pub fn export_table(session: &Path, output: &Path) -> anyhow::Result<usize> {
    let (mesh, store) = load_session(session)?;
    TableExporter::new()
        .export_to_path(&mesh, &store, output)
        .with_context(|| format!("Failed to write table {}", output.display()))
}

/// Replay recorded events against a mesh on a headless viewport.
///
/// Resize events also resize the viewport before they reach the session.
/// Events after a quit are counted but not dispatched.
///
/// # Errors
///
/// Returns an error if the mesh or events cannot be read, the session
/// cannot start, or the result cannot be persisted.
pub fn replay(
    config: &SessionConfig,
    mesh_path: &Path,
    events_path: &Path,
    session_out: Option<&Path>,
) -> anyhow::Result<ReplaySummary> {
    let mesh = SurfaceMesh::load(mesh_path)
        .with_context(|| format!("Failed to load mesh {}", mesh_path.display()))?;
    let events = load_events(events_path)?;
    tracing::info!(
        "Replaying {} events on {} faces",
        events.len(),
        mesh.face_count()
    );

    let viewport = SoftwareViewport::new(
        mesh.clone(),
        config.viewport_width,
        config.viewport_height,
        config.pick_tolerance,
    )?;
    let mut controller = ModeController::new(config, viewport, mesh.face_count())?;

    let mut dispatched = 0;
    for event in &events {
        if controller.is_closed() {
            tracing::debug!("Session closed; skipping remaining events");
            break;
        }
        if let InputEvent::Resize { width, height } = *event {
            controller.viewport_mut().resize(width, height)?;
        }
        controller.dispatch(event);
        dispatched += 1;
    }

    let status = controller.status();
    let (viewport, store) = controller.into_parts();
    if let Some(path) = session_out {
        SessionDocument::capture(&mesh, &store)
            .save(path)
            .with_context(|| format!("Failed to save session {}", path.display()))?;
    }

    Ok(ReplaySummary {
        events: events.len(),
        dispatched,
        painted_faces: store.painted_count(),
        frames: viewport.frame_count(),
        status,
    })
}

/// Render a persisted session and write a snapshot into the output
/// directory.
///
/// # Errors
///
/// Returns an error if the session cannot be loaded or the image written.
pub fn snapshot(config: &SessionConfig, session: &Path) -> anyhow::Result<PathBuf> {
    let (mesh, store) = load_session(session)?;
    let viewport = SoftwareViewport::new(
        mesh,
        config.viewport_width,
        config.viewport_height,
        config.pick_tolerance,
    )?;
    let mut controller = ModeController::resume(config, viewport, store)?;
    let path = controller
        .save()
        .with_context(|| format!("Failed to save snapshot under {}", config.output_dir.display()))?;
    Ok(path)
}

fn load_session(path: &Path) -> anyhow::Result<(SurfaceMesh, AnnotationStore)> {
    let parts = SessionDocument::load(path)
        .and_then(SessionDocument::into_parts)
        .with_context(|| format!("Failed to load session {}", path.display()))?;
    Ok(parts)
}

fn load_events(path: &Path) -> anyhow::Result<Vec<InputEvent>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read events {}", path.display()))?;
    let events = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse events {}", path.display()))?;
    Ok(events)
}
