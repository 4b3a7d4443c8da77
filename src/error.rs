//! Error types for editor operations.
//!
//! None of these are fatal: the editor turns each kind into a notice, a
//! silent no-op or a deferred export, and leaves prior state untouched.

use thiserror::Error;

use crate::model::AnnotationId;

/// Errors produced by the editor core.
#[derive(Error, Debug)]
pub enum EditorError {
    /// Operation would break a store invariant (e.g. removing the last annotation)
    #[error("{0}")]
    InvariantViolation(String),

    /// Referenced annotation no longer exists
    #[error("Annotation not found: {0}")]
    NotFound(AnnotationId),

    /// Background image has not finished loading
    #[error("Background image is not loaded yet")]
    AssetNotReady,

    /// Background image failed to load
    #[error("Background image '{path}' failed to load: {message}")]
    AssetFailed {
        /// Template path that failed
        path: String,
        /// Loader error text
        message: String,
    },

    /// Container has no measurable size yet
    #[error("Canvas container has not been measured")]
    LayoutUnavailable,

    /// Compositing or PNG encoding failed
    #[error("Rasterization failed: {0}")]
    Raster(#[from] memegen_raster::RasterError),

    /// Image decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EditorError {
    /// Create an invariant violation with a user-facing message.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;
