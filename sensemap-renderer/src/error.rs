//! Renderer error types.

use sensemap_core::CoreError;
use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The viewport cannot be created with the given surface size.
    #[error("Surface error: {0}")]
    Surface(String),

    /// Frame encoding failed.
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RenderError> for CoreError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Io(e) => CoreError::Io(e),
            other => CoreError::Capture(other.to_string()),
        }
    }
}
