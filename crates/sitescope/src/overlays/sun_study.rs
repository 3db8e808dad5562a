//! Sun-position driven lighting and sky.

use chrono::NaiveDate;
use sitescope_core::{GeoOrigin, PreviewOptions, Result, SceneBounds};
use sitescope_render::{sun_direction, DirectionalLight, LightUniforms, SkyGradient, SkyPhase};

use crate::solar::{local_to_utc, sun_position, utc_offset_hours, SolarPosition};

/// Inputs the sun study depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunStudyInput {
    pub enabled: bool,
    pub default_shadows: bool,
    pub time_of_day: f32,
    pub date: NaiveDate,
    pub origin: Option<GeoOrigin>,
    pub bounds: Option<SceneBounds>,
}

/// Light and background for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    /// `None` while no model geometry is loaded.
    pub light: Option<DirectionalLight>,
    pub sky: SkyGradient,
    /// Solar position when the sun study drives the light.
    pub sun: Option<SolarPosition>,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            light: None,
            sky: SkyGradient::default_blue(),
            sun: None,
        }
    }
}

impl Lighting {
    /// Whether the light casts shadows.
    pub fn shadows(&self) -> bool {
        self.light.is_some_and(|l| l.cast_shadows)
    }

    /// Packed light block for the host's shadow pass.
    pub fn uniforms(&self) -> Option<LightUniforms> {
        self.light.map(|l| l.uniforms())
    }
}

/// Computes lighting for the given inputs.
///
/// Without bounds the lighting is the default; with the sun study off, or
/// on but without an origin, the light takes its fixed default direction.
pub fn compute(input: &SunStudyInput, options: &PreviewOptions) -> Result<Lighting> {
    let Some(bounds) = input.bounds else {
        return Ok(Lighting::default());
    };
    let bounds = bounds.validated()?;

    let origin = match input.origin {
        Some(origin) if input.enabled => origin,
        _ => {
            return Ok(Lighting {
                light: Some(DirectionalLight::default_for(
                    &bounds,
                    options.light_distance_factor,
                    options.shadow_extent_factor,
                    input.default_shadows,
                )),
                ..Lighting::default()
            })
        }
    };

    let offset = utc_offset_hours(options.utc_offset_hours, origin.lon);
    let time = local_to_utc(input.date, f64::from(input.time_of_day), offset);
    let sun = sun_position(time, origin.lat, origin.lon);

    let toward_sun = sun_direction(sun.altitude as f32, sun.azimuth as f32);
    let light = DirectionalLight::placed(
        &bounds,
        toward_sun,
        options.light_distance_factor,
        options.shadow_extent_factor,
        true,
    );
    let sky = SkyGradient::for_phase(SkyPhase::from_altitude(
        sun.altitude,
        options.twilight_altitude,
    ));

    Ok(Lighting {
        light: Some(light),
        sky,
        sun: Some(sun),
    })
}
