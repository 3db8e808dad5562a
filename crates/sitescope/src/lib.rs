//! sitescope: a 3D preview of urban-context geometry.
//!
//! sitescope turns the response of an urban geometry service into a layered
//! scene and decorates it with environmental overlays: sun-driven lighting,
//! a solar path with compass, a wind arrow field and a raster map underlay.
//! A rendering host mirrors the [`Scene`] into its backend; sitescope itself
//! does no drawing and no networking.
//!
//! # Quick Start
//!
//! ```no_run
//! use sitescope::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let json = std::fs::read_to_string("site.json")?;
//!     let payload = GeometryPayload::from_json_str(&json)?;
//!
//!     let mut preview = Preview::open(PreviewOptions::default());
//!     preview.load_geometry(&payload)?;
//!     preview.set_sun_study(true);
//!     preview.set_time_of_day(17.5);
//!     preview.prepare_frame();
//!
//!     for (id, node) in preview.scene().iter() {
//!         println!("{id:?} {} visible={}", node.name, node.visible);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Asynchronous results
//!
//! Climate data, map tiles and render calls are issued by the host. Each
//! request carries the [`Generation`] of the load it belongs to; results
//! that arrive after a newer load are discarded.

// Geometry code intentionally uses casts for coordinates and tile indices
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod capture;
pub mod map_underlay;
pub mod overlays;
pub mod preview;
pub mod solar;

// Re-export core types
pub use sitescope_core::{
    EnvironmentalState, GeoOrigin, Generation, LayerKind, LayerSet, NodeContent, NodeId, NodeRole,
    OverlayKind, PreviewOptions, ResourceCounts, Result, Scene, SceneBounds, SceneNode,
    SitescopeError, Tagged, TextureHandle, Vec3,
};

// Re-export render types
pub use sitescope_render::{
    CaptureError, CapturedFrame, DirectionalLight, LightUniforms, PixelFormat, RenderSurface,
    SkyGradient, SkyPhase,
};

// Re-export structures
pub use sitescope_structures::{
    classify, ClimateData, ClimateSample, Classification, GeometryPayload, IngestStats,
    InstanceCategory,
};

pub use capture::{
    ImageGenerator, RenderComparison, RenderOutcome, RenderPrompt, RenderReport, StylePreset,
};
pub use map_underlay::TileRequest;
pub use overlays::Lighting;
pub use preview::{ClimateStatus, FetchTicket, LoadStatus, Preview, SolarCrossings};
pub use solar::{sun_position, SolarPosition};

/// Initializes `env_logger` from `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    if env_logger::try_init().is_ok() {
        log::debug!("sitescope {} logging initialized", env!("CARGO_PKG_VERSION"));
    }
}
