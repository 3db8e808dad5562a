//! Wire types of the geometry and climate sources.
//!
//! These mirror the JSON shapes returned by the remote services; nothing
//! here is validated beyond what serde enforces; semantic checks live in
//! [`ingest`](crate::ingest).

use serde::{Deserialize, Serialize};
use sitescope_core::Result;

/// Response of the geometry source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryPayload {
    /// `[lat, lon]` of the scene-local origin.
    pub origin: [f64; 2],
    #[serde(default)]
    pub geometry: Vec<GeometryElement>,
}

impl GeometryPayload {
    /// Parses a payload from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Discriminates mesh groups from point features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryType {
    Meshes,
    Nodes,
    #[serde(other)]
    Unknown,
}

/// One feature group of the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryElement {
    /// Feature class such as `buildings` or `surface`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "geometryType")]
    pub geometry_type: GeometryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meshes: Option<Vec<MeshData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<NodeData>>,
}

/// A raw triangle soup, nine numbers per triangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    #[serde(default)]
    pub vertices: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<String>,
}

/// A point feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

/// Weather at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateSample {
    /// Air temperature in °C.
    pub temperature: f32,
    /// Wind speed in m/s.
    pub wind_speed: f32,
    /// Direction the wind blows from, degrees clockwise from north.
    pub wind_direction: f32,
}

/// Response of the climate source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateData {
    pub current: ClimateSample,
    /// Samples indexed by hour of day; may be shorter than 24.
    #[serde(default)]
    pub hourly: Vec<ClimateSample>,
}

impl ClimateData {
    /// Parses climate data from JSON; `null` yields `None`.
    pub fn from_json_str(json: &str) -> Result<Option<Self>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sample for a continuous time of day.
    ///
    /// Uses the hourly entry at `round(hours) mod 24`, falling back to the
    /// current conditions when that hour is missing.
    pub fn sample_at(&self, hours: f32) -> &ClimateSample {
        let hour = if hours.is_finite() {
            (hours.round() as i64).rem_euclid(24) as usize
        } else {
            0
        };
        self.hourly.get(hour).unwrap_or(&self.current)
    }
}
