//! Rendering support for sitescope.
//!
//! This crate provides the backend-independent parts of drawing a preview:
//! - Directional light placement and shadow frustum
//! - Sky background gradients
//! - Fixed-resolution frame capture and PNG encoding

// Pixel sizes are cast to buffer lengths
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod capture;
pub mod error;
pub mod light;
pub mod screenshot;
pub mod sky;

pub use capture::{capture_frame, CapturedFrame, RenderSurface};
pub use error::{CaptureError, CaptureResult};
pub use light::{sun_direction, DirectionalLight, LightUniforms, SHADOW_MAP_SIZE};
pub use screenshot::{encode_png, PixelFormat};
pub use sky::{SkyGradient, SkyPhase};
