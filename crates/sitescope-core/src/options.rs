//! Configuration options and environmental state for a preview.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Geographic origin of the scene-local coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoOrigin {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl GeoOrigin {
    /// Creates an origin from latitude and longitude in degrees.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns true if both coordinates are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// User-controlled state read by the overlay renderers.
///
/// Reset to defaults whenever a new geometry payload is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalState {
    /// Local time of day in continuous hours.
    pub time_of_day: f32,
    /// Sun-position driven lighting and sky.
    pub sun_study: bool,
    /// Compass and sun-path arc.
    pub solar_path: bool,
    /// Wind-direction arrow field.
    pub wind_field: bool,
    /// Raster map tiles under the model.
    pub map_underlay: bool,
    /// Shadow casting while the sun study is off.
    pub default_shadows: bool,
    /// Geographic origin of the loaded payload.
    pub origin: Option<GeoOrigin>,
}

impl Default for EnvironmentalState {
    fn default() -> Self {
        Self {
            time_of_day: 12.0,
            sun_study: false,
            solar_path: false,
            wind_field: false,
            map_underlay: false,
            default_shadows: true,
            origin: None,
        }
    }
}

impl EnvironmentalState {
    /// Restores defaults, keeping only the given origin.
    pub fn reset(&mut self, origin: Option<GeoOrigin>) {
        *self = Self {
            origin,
            ..Self::default()
        };
    }

    /// Whether any shadow casting is active.
    pub fn shadows_enabled(&self) -> bool {
        self.sun_study || self.default_shadows
    }
}

/// Global configuration options for a preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewOptions {
    /// Output width of captured frames.
    pub capture_width: u32,
    /// Output height of captured frames.
    pub capture_height: u32,

    /// Raster tile URL with `{z}`, `{x}` and `{y}` placeholders.
    pub tile_url_template: String,
    /// Maximum tiles scheduled per underlay rebuild.
    pub max_tiles: usize,
    /// Extra tiles around the model on every side.
    pub tile_padding: i64,
    /// Lowest zoom level used for the underlay.
    pub min_zoom: u8,
    /// Highest zoom level used for the underlay.
    pub max_zoom: u8,
    /// Number of tiles the model should roughly span.
    pub target_tiles_across: f64,

    /// Arrows per side of the wind grid.
    pub wind_grid_size: usize,
    /// Height of the wind grid above the tallest model point.
    pub wind_height_offset: f32,
    /// Fraction of the horizontal bounds covered by the wind grid.
    pub wind_coverage: f32,

    /// Time-of-day slider range in hours.
    pub time_range: (f32, f32),
    /// First hour sampled for the sun path.
    pub solar_path_start: f32,
    /// Last hour sampled for the sun path.
    pub solar_path_end: f32,
    /// Sun path sampling step in minutes.
    pub solar_path_step_minutes: u32,
    /// Altitude (radians) below which the sun is treated as set.
    pub twilight_altitude: f64,

    /// Distance of the sun light from the scene center, in max dimensions.
    pub light_distance_factor: f32,
    /// Half-extent of the shadow frustum, in max dimensions.
    pub shadow_extent_factor: f32,
    /// Radius of the solar path overlay, in max horizontal dimensions.
    pub solar_path_scale_factor: f32,

    /// Calendar date of the study; `None` uses the current date.
    pub study_date: Option<NaiveDate>,
    /// Fixed offset of the study's local time from UTC in hours.
    ///
    /// `None` derives the offset from the origin longitude.
    pub utc_offset_hours: Option<f32>,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            capture_width: 1920,
            capture_height: 1080,
            tile_url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            max_tiles: 300,
            tile_padding: 3,
            min_zoom: 15,
            max_zoom: 19,
            target_tiles_across: 10.0,
            wind_grid_size: 6,
            wind_height_offset: 20.0,
            wind_coverage: 0.8,
            time_range: (6.0, 20.0),
            solar_path_start: 4.0,
            solar_path_end: 20.0,
            solar_path_step_minutes: 15,
            twilight_altitude: 0.1,
            light_distance_factor: 1.5,
            shadow_extent_factor: 0.8,
            solar_path_scale_factor: 1.2,
            study_date: None,
            utc_offset_hours: None,
        }
    }
}

impl PreviewOptions {
    /// Parses options from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Writes options to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Clamps a time of day into the configured slider range.
    pub fn clamp_time(&self, hours: f32) -> f32 {
        let (lo, hi) = self.time_range;
        if hours.is_nan() {
            return lo;
        }
        hours.clamp(lo, hi)
    }

    /// Formats a tile URL from the template.
    pub fn tile_url(&self, z: u8, x: i64, y: i64) -> String {
        self.tile_url_template
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}
