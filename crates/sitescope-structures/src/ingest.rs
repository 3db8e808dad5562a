//! Conversion of a geometry payload into typed scene primitives.

use glam::Vec3;
use sitescope_core::{GeoOrigin, Result, SitescopeError};

use crate::geometry_batch::{BatchKind, GeometryBatch, ShadeStyle};
use crate::instances::PointInstance;
use crate::payload::{GeometryPayload, GeometryType};

/// Running totals collected during ingestion, for display only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub batch_count: usize,
    pub vertex_count: usize,
    pub instance_count: usize,
}

/// Result of ingesting one payload.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedGeometry {
    pub origin: GeoOrigin,
    pub batches: Vec<GeometryBatch>,
    /// Point features in payload order; not yet synthesized.
    pub instances: Vec<PointInstance>,
    pub stats: IngestStats,
}

impl IngestedGeometry {
    /// Returns true if the payload held nothing drawable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty() && self.instances.is_empty()
    }
}

/// Ingests a payload.
///
/// Empty meshes are skipped. The only error is an origin that is not a
/// finite latitude/longitude pair.
pub fn ingest(payload: &GeometryPayload) -> Result<IngestedGeometry> {
    let [lat, lon] = payload.origin;
    let origin = GeoOrigin::new(lat, lon);
    if !origin.is_valid() {
        return Err(SitescopeError::InvalidPayload(format!(
            "origin [{lat}, {lon}] is not a valid coordinate"
        )));
    }

    let mut batches = Vec::new();
    let mut instances = Vec::new();
    let mut stats = IngestStats::default();

    for element in &payload.geometry {
        match element.geometry_type {
            GeometryType::Meshes => {
                let kind = BatchKind::from_type(&element.kind);
                for (i, mesh) in element.meshes.iter().flatten().enumerate() {
                    let raw = mesh.vertices.as_deref().unwrap_or_default();
                    let Some(batch) = GeometryBatch::from_raw(
                        kind,
                        raw,
                        mesh.descriptor.clone(),
                        ShadeStyle::Smooth,
                    ) else {
                        log::debug!("skipping empty {} mesh #{i}", element.kind);
                        continue;
                    };
                    stats.batch_count += 1;
                    stats.vertex_count += batch.num_vertices();
                    batches.push(batch);
                }
            }
            GeometryType::Nodes => {
                for node in element.nodes.iter().flatten() {
                    instances.push(PointInstance {
                        position: Vec3::new(node.x, node.y, node.z),
                        scale: node.scale,
                        tag: node.kind.clone(),
                    });
                }
            }
            GeometryType::Unknown => {
                log::debug!("skipping {} element of unknown geometry type", element.kind);
            }
        }
    }
    stats.instance_count = instances.len();

    log::debug!(
        "ingested {} batches ({} vertices) and {} point features",
        stats.batch_count,
        stats.vertex_count,
        stats.instance_count
    );

    Ok(IngestedGeometry {
        origin,
        batches,
        instances,
        stats,
    })
}
