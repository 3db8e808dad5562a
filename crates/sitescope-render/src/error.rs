//! Capture error types.

use sitescope_core::SitescopeError;
use thiserror::Error;

/// Errors that can occur while capturing a frame.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The surface failed to render.
    #[error("surface failed to render: {0}")]
    Surface(String),

    /// Requested a zero-sized capture.
    #[error("capture size {width}x{height} is empty")]
    EmptySize { width: u32, height: u32 },

    /// Pixel buffer length does not match the frame size.
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Image encoding error.
    #[error("image encoding error: {0}")]
    ImageError(#[from] image::ImageError),
}

/// A specialized Result type for capture operations.
pub type CaptureResult<T> = std::result::Result<T, CaptureError>;

impl From<CaptureError> for SitescopeError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::SizeMismatch { expected, actual } => {
                SitescopeError::SizeMismatch { expected, actual }
            }
            other => SitescopeError::Capture(other.to_string()),
        }
    }
}
