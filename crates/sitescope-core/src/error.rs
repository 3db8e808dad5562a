//! Error types for sitescope.

use thiserror::Error;

use crate::scene::NodeId;

/// The main error type for sitescope operations.
#[derive(Error, Debug)]
pub enum SitescopeError {
    /// The geometry payload could not be interpreted.
    #[error("invalid geometry payload: {0}")]
    InvalidPayload(String),

    /// A scene node with the given id was not found.
    #[error("scene node {0:?} not found")]
    NodeNotFound(NodeId),

    /// The scene bounds are empty or not finite.
    #[error("scene bounds are empty or degenerate")]
    DegenerateBounds,

    /// No geographic origin is available for the current scene.
    #[error("no geographic origin for the current scene")]
    MissingOrigin,

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Frame capture failed.
    #[error("capture error: {0}")]
    Capture(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for sitescope operations.
pub type Result<T> = std::result::Result<T, SitescopeError>;
