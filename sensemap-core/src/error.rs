//! Error types for annotation sessions.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in the interaction core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A face index outside the surface's face set.
    #[error("Face {face} out of range (surface has {face_count} faces)")]
    FaceOutOfRange {
        /// The offending face index.
        face: usize,
        /// Number of faces on the surface.
        face_count: usize,
    },

    /// The surface mesh is malformed.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Two overlay controls would share screen area.
    #[error("Overlay controls overlap: {first} and {second}")]
    OverlappingControls {
        /// Name of the first control.
        first: String,
        /// Name of the second control.
        second: String,
    },

    /// The viewport could not capture a frame.
    #[error("Frame capture failed: {0}")]
    Capture(String),

    /// A persisted session does not fit its mesh.
    #[error("Session mismatch: {0}")]
    SessionMismatch(String),

    /// The session was closed by `quit`.
    #[error("Session is closed")]
    SessionClosed,

    /// A command name did not match any control.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
