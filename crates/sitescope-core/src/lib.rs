//! Core abstractions for sitescope.
//!
//! This crate provides the fundamental types used throughout sitescope:
//! - [`Scene`] registry of drawable nodes with resource accounting
//! - [`LayerSet`] visibility layers with surface subtype flags
//! - [`SceneBounds`] derived from model geometry
//! - [`EnvironmentalState`] and [`PreviewOptions`]
//! - [`Generation`] tags for discarding stale asynchronous results

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Options structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
// Color channels are masked to 8 bits before casting
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod bounds;
pub mod color;
pub mod error;
pub mod generation;
pub mod layer;
pub mod options;
pub mod scene;

pub use bounds::SceneBounds;
pub use error::{Result, SitescopeError};
pub use generation::{Generation, Tagged};
pub use layer::{Layer, LayerKind, LayerSet};
pub use options::{EnvironmentalState, GeoOrigin, PreviewOptions};
pub use scene::{
    NodeContent, NodeId, NodeRole, OverlayKind, ResourceCounts, Scene, SceneNode, TextureHandle,
};

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3};
