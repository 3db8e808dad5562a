//! Geometry ingestion and instance synthesis for sitescope.
//!
//! This crate turns the geometry source's payload into scene primitives:
//! - Wire types for geometry and climate responses
//! - Mesh batches with normals, colors and building outlines
//! - Classification of free-form point-feature tags
//! - Instanced batches for trees, shrubs and street furniture

// Geometry code intentionally uses casts for indices and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod classify;
pub mod geometry_batch;
pub mod ingest;
pub mod instances;
pub mod palette;
pub mod payload;
pub mod shapes;

pub use classify::{classify, normalize_tag, Classification};
pub use geometry_batch::{BatchKind, GeometryBatch, ShadeStyle};
pub use ingest::{ingest, IngestStats, IngestedGeometry};
pub use instances::{
    synthesize, InstanceBatch, InstanceCategory, InstanceTransform, PointInstance,
};
pub use payload::{
    ClimateData, ClimateSample, GeometryElement, GeometryPayload, GeometryType, MeshData, NodeData,
};
pub use shapes::BaseShape;
