//! Error types for slide operations.

use thiserror::Error;

/// Result type for slide operations.
pub type SlideResult<T> = Result<T, SlideError>;

/// Errors that can occur in slide operations.
#[derive(Debug, Error)]
pub enum SlideError {
    /// Element not found in the slide.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Element data could not be interpreted.
    #[error("Invalid element: {0}")]
    InvalidElement(String),

    /// No template with the requested identifier.
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// Slide serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
