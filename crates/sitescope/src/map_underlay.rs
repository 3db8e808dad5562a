//! Raster map tiles projected under the model.
//!
//! The scene's local metre frame is anchored at the payload origin. Tile
//! indices come from standard Web-Mercator pixel maths at a zoom chosen so
//! the model spans roughly `target_tiles_across` tiles; each tile becomes a
//! horizontal quad sized to the tile's extent in metres at the origin
//! latitude. Textures arrive asynchronously and are attached later.

use std::f64::consts::PI;

use glam::Vec3;
use sitescope_core::{
    GeoOrigin, NodeContent, NodeId, NodeRole, OverlayKind, PreviewOptions, Result, SceneBounds,
    SceneNode, SitescopeError,
};

/// Equatorial circumference of the earth in metres.
pub const EARTH_CIRCUMFERENCE: f64 = 40_075_016.686;
/// Edge length of a raster tile in pixels.
pub const TILE_SIZE: f64 = 256.0;
/// Latitude limit of the Web-Mercator projection.
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_78;
/// Lowering below the model's lowest point so tiles never cover the model.
const GROUND_DROP: f32 = 0.1;

/// Inputs the map underlay depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapUnderlayInput {
    pub enabled: bool,
    pub origin: Option<GeoOrigin>,
    pub bounds: Option<SceneBounds>,
}

/// A tile image the host should fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRequest {
    pub z: u8,
    pub x: i64,
    pub y: i64,
    pub url: String,
    /// Quad waiting for the texture.
    pub node: NodeId,
}

/// A tile placed in scene coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTile {
    pub z: u8,
    pub x: i64,
    pub y: i64,
    pub url: String,
    pub center: Vec3,
    /// Edge length in metres.
    pub size: f32,
}

impl PlannedTile {
    /// Untextured ground quad for this tile.
    pub fn scene_node(&self) -> SceneNode {
        let mut node = SceneNode::new(
            format!("tile {}/{}/{}", self.z, self.x, self.y),
            NodeRole::Overlay(OverlayKind::MapUnderlay),
            NodeContent::TexturedQuad {
                center: self.center,
                size: self.size,
                texture: None,
            },
        );
        node.receive_shadow = true;
        node
    }
}

/// The tiles scheduled for one recompute.
#[derive(Debug, Clone, PartialEq)]
pub struct TilePlan {
    pub zoom: u8,
    pub tiles: Vec<PlannedTile>,
    /// Tiles in the padded grid before the cap was applied.
    pub requested: usize,
}

fn mercator_lat(lat: f64) -> f64 {
    lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT)
}

/// Zoom at which `max_dimension` metres span about `target_tiles` tiles.
pub fn zoom_for(lat: f64, max_dimension: f64, options: &PreviewOptions) -> u8 {
    let raw = (options.target_tiles_across * TILE_SIZE * EARTH_CIRCUMFERENCE
        * mercator_lat(lat).to_radians().cos()
        / max_dimension)
        .log2()
        - 8.0;
    let lo = f64::from(options.min_zoom);
    let hi = f64::from(options.max_zoom.max(options.min_zoom));
    if raw.is_nan() {
        return options.min_zoom;
    }
    raw.floor().clamp(lo, hi) as u8
}

/// Web-Mercator pixel coordinates of a location at `zoom`.
///
/// Latitudes beyond the projection limit are clamped to it.
pub fn world_pixel(lat: f64, lon: f64, zoom: u8) -> (f64, f64) {
    let scale = TILE_SIZE * f64::from(1u32 << zoom.min(30));
    let x = (lon + 180.0) / 360.0 * scale;
    let phi = mercator_lat(lat).to_radians();
    let y = (1.0 - (phi.tan() + 1.0 / phi.cos()).ln() / PI) / 2.0 * scale;
    (x, y)
}

/// Ground resolution at a latitude and zoom.
pub fn meters_per_pixel(lat: f64, zoom: u8) -> f64 {
    EARTH_CIRCUMFERENCE * mercator_lat(lat).to_radians().cos() / (TILE_SIZE * f64::from(1u32 << zoom.min(30)))
}

/// Plans the padded tile grid under `bounds`.
///
/// At most `options.max_tiles` tiles are returned; a warning is logged when
/// the grid holds more.
pub fn plan(bounds: &SceneBounds, origin: GeoOrigin, options: &PreviewOptions) -> Result<TilePlan> {
    if !origin.is_valid() {
        return Err(SitescopeError::MissingOrigin);
    }
    let bounds = bounds.validated()?;
    let zoom = zoom_for(
        origin.lat,
        f64::from(bounds.max_dimension()),
        options,
    );
    let mpp = meters_per_pixel(origin.lat, zoom);
    if !mpp.is_finite() || mpp <= 0.0 {
        return Err(SitescopeError::DegenerateBounds);
    }
    let (ox, oy) = world_pixel(origin.lat, origin.lon, zoom);

    // Scene +X is east (+px), scene +Z is south (+py). Indices are
    // clamped to the tile grid before leaving floating point.
    let tiles_per_axis = 1i64 << zoom.min(30);
    let last = (tiles_per_axis - 1) as f64;
    let pad = options.tile_padding.max(0) as f64;
    let tile_range = |lo: f32, hi: f32, origin_px: f64| {
        let tile = |metres: f32| ((origin_px + f64::from(metres) / mpp) / TILE_SIZE).floor();
        (
            (tile(lo) - pad).clamp(0.0, last) as i64,
            (tile(hi) + pad).clamp(0.0, last) as i64,
        )
    };
    let (x0, x1) = tile_range(bounds.min.x, bounds.max.x, ox);
    let (y0, y1) = tile_range(bounds.min.z, bounds.max.z, oy);

    let span = |a: i64, b: i64| (b - a + 1).max(0) as usize;
    let requested = span(x0, x1).saturating_mul(span(y0, y1));
    if requested > options.max_tiles {
        log::warn!(
            "map underlay needs {requested} tiles at zoom {zoom}, capping at {}",
            options.max_tiles
        );
    }

    let size = (TILE_SIZE * mpp) as f32;
    let ground = bounds.min.y - GROUND_DROP;
    let tiles = (y0..=y1)
        .flat_map(|y| (x0..=x1).map(move |x| (x, y)))
        .take(options.max_tiles)
        .map(|(x, y)| {
            let cx = ((x as f64 + 0.5) * TILE_SIZE - ox) * mpp;
            let cz = ((y as f64 + 0.5) * TILE_SIZE - oy) * mpp;
            PlannedTile {
                z: zoom,
                x,
                y,
                url: options.tile_url(zoom, x, y),
                center: Vec3::new(cx as f32, ground, cz as f32),
                size,
            }
        })
        .collect();

    Ok(TilePlan {
        zoom,
        tiles,
        requested,
    })
}
