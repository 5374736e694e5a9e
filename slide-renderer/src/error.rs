//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A raster surface could not be allocated or drawn.
    #[error("Surface error: {0}")]
    Surface(String),

    /// Export encoding or rasterization failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// The renderer does not handle this element.
    #[error("Unsupported element: {0}")]
    Unsupported(String),
}
