//! Compass rose and sun-path arc.

use std::f32::consts::TAU;

use chrono::NaiveDate;
use glam::Vec3;
use sitescope_core::color::hex;
use sitescope_core::{
    GeoOrigin, NodeContent, NodeRole, OverlayKind, PreviewOptions, Result, SceneBounds, SceneNode,
    SitescopeError,
};
use sitescope_render::sun_direction;
use sitescope_structures::BaseShape;

use crate::solar::{local_to_utc, sun_position, utc_offset_hours, SolarPosition};

const RING_COLOR: u32 = 0x8a8a8a;
const ARC_COLOR: u32 = 0xf5a623;
const MARKER_COLOR: u32 = 0xffcc33;
const RING_SEGMENTS: usize = 64;
/// Raise above the model's lowest point to avoid z-fighting with the ground.
const GROUND_LIFT: f32 = 0.05;

/// Inputs the solar path depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPathInput {
    pub enabled: bool,
    pub time_of_day: f32,
    pub date: NaiveDate,
    pub origin: Option<GeoOrigin>,
    pub bounds: Option<SceneBounds>,
}

/// One retained sample of the sun path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    /// Local time in hours.
    pub hours: f64,
    pub position: SolarPosition,
}

/// Nodes and sample data of a built solar path.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarPathGeometry {
    pub nodes: Vec<SceneNode>,
    pub samples: Vec<PathSample>,
    pub current: SolarPosition,
}

impl SolarPathGeometry {
    /// Local time of the first retained sample.
    pub fn first_visible(&self) -> Option<f64> {
        self.samples.first().map(|s| s.hours)
    }

    /// Local time of the last retained sample.
    pub fn last_visible(&self) -> Option<f64> {
        self.samples.last().map(|s| s.hours)
    }
}

/// Samples the sun path over the configured range, keeping samples at or
/// above the twilight cutoff.
pub fn sample_path(date: NaiveDate, origin: GeoOrigin, options: &PreviewOptions) -> Vec<PathSample> {
    let offset = utc_offset_hours(options.utc_offset_hours, origin.lon);
    let start = f64::from(options.solar_path_start);
    let end = f64::from(options.solar_path_end);
    let step = f64::from(options.solar_path_step_minutes.max(1)) / 60.0;
    let count = ((end - start) / step).floor().max(0.0) as usize;

    (0..=count)
        .map(|i| start + i as f64 * step)
        .map(|hours| PathSample {
            hours,
            position: sun_position(local_to_utc(date, hours, offset), origin.lat, origin.lon),
        })
        .filter(|s| s.position.altitude >= -options.twilight_altitude)
        .collect()
}

/// Builds the solar path.
///
/// Returns `None` when disabled or when no origin or bounds are available.
pub fn build(input: &SolarPathInput, options: &PreviewOptions) -> Result<Option<SolarPathGeometry>> {
    if !input.enabled {
        return Ok(None);
    }
    let (Some(origin), Some(bounds)) = (input.origin, input.bounds) else {
        return Ok(None);
    };

    let radius = bounds.max_horizontal_dimension() * options.solar_path_scale_factor;
    if !radius.is_finite() || radius <= 0.0 {
        return Err(SitescopeError::DegenerateBounds);
    }
    let center = bounds.center();
    let ground = Vec3::new(center.x, bounds.min.y + GROUND_LIFT, center.z);
    let on_sphere = |p: &SolarPosition| {
        ground + sun_direction(p.altitude as f32, p.azimuth as f32) * radius
    };

    let mut nodes = compass(ground, radius);

    let samples = sample_path(input.date, origin, options);
    if samples.len() >= 2 {
        nodes.push(helper(
            "sun path",
            NodeContent::Polyline {
                points: samples.iter().map(|s| on_sphere(&s.position)).collect(),
                color: hex(ARC_COLOR),
            },
        ));
    }

    let offset = utc_offset_hours(options.utc_offset_hours, origin.lon);
    let now = local_to_utc(input.date, f64::from(input.time_of_day), offset);
    let current = sun_position(now, origin.lat, origin.lon);
    let sun = on_sphere(&current);
    nodes.push(sun_marker(sun, radius * 0.04));
    nodes.push(helper(
        "sun ray",
        NodeContent::Lines {
            segments: vec![[sun, ground]],
            color: hex(MARKER_COLOR),
            dashed: true,
        },
    ));

    Ok(Some(SolarPathGeometry {
        nodes,
        samples,
        current,
    }))
}

fn helper(name: &str, content: NodeContent) -> SceneNode {
    SceneNode::new(name, NodeRole::Overlay(OverlayKind::SolarPath), content)
}

/// Ring bands, cardinal axes and N/E/S/W labels; north is −Z.
fn compass(ground: Vec3, radius: f32) -> Vec<SceneNode> {
    let mut nodes: Vec<SceneNode> = [1.0 / 3.0, 2.0 / 3.0, 1.0]
        .iter()
        .map(|f| {
            let r = radius * f;
            let points = (0..=RING_SEGMENTS)
                .map(|i| {
                    let a = TAU * i as f32 / RING_SEGMENTS as f32;
                    ground + Vec3::new(a.sin() * r, 0.0, -a.cos() * r)
                })
                .collect();
            helper(
                "compass ring",
                NodeContent::Polyline {
                    points,
                    color: hex(RING_COLOR),
                },
            )
        })
        .collect();

    nodes.push(helper(
        "compass axes",
        NodeContent::Lines {
            segments: vec![
                [ground + Vec3::NEG_Z * radius, ground + Vec3::Z * radius],
                [ground + Vec3::NEG_X * radius, ground + Vec3::X * radius],
            ],
            color: hex(RING_COLOR),
            dashed: false,
        },
    ));

    for (text, dir) in [
        ("N", Vec3::NEG_Z),
        ("E", Vec3::X),
        ("S", Vec3::Z),
        ("W", Vec3::NEG_X),
    ] {
        nodes.push(helper(
            "compass label",
            NodeContent::Label {
                text: text.to_string(),
                position: ground + dir * radius * 1.1,
                size: radius * 0.08,
                color: hex(RING_COLOR),
            },
        ));
    }
    nodes
}

fn sun_marker(center: Vec3, radius: f32) -> SceneNode {
    let shape = BaseShape::Icosphere {
        radius,
        subdivisions: 1,
    };
    let (positions, normals) = shape.flat_mesh();
    let lift = Vec3::new(0.0, shape.height() * 0.5, 0.0);
    helper(
        "sun marker",
        NodeContent::Mesh {
            positions: positions.into_iter().map(|p| p + center - lift).collect(),
            normals,
            color: hex(MARKER_COLOR),
            opacity: 1.0,
            flat_shading: true,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zurich() -> GeoOrigin {
        GeoOrigin::new(47.37, 8.54)
    }

    fn june() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 21).unwrap()
    }

    fn summer_options() -> PreviewOptions {
        PreviewOptions {
            utc_offset_hours: Some(2.0),
            ..PreviewOptions::default()
        }
    }

    fn input() -> SolarPathInput {
        SolarPathInput {
            enabled: true,
            time_of_day: 12.0,
            date: june(),
            origin: Some(zurich()),
            bounds: Some(SceneBounds::new(
                Vec3::new(-40.0, 0.0, -20.0),
                Vec3::new(40.0, 25.0, 20.0),
            )),
        }
    }

    #[test]
    fn test_samples_respect_cutoff() {
        let opts = summer_options();
        let samples = sample_path(june(), zurich(), &opts);
        assert!(!samples.is_empty());
        for s in &samples {
            assert!(s.position.altitude >= -0.1);
            assert!((4.0..=20.0).contains(&s.hours));
        }
        // Summer sunrise in Zurich is after 05:00 local time.
        assert!(samples[0].hours > 4.0);
    }

    #[test]
    fn test_first_sample_is_first_above_cutoff() {
        let opts = summer_options();
        let samples = sample_path(june(), zurich(), &opts);
        let first = samples[0].hours;
        let offset = utc_offset_hours(opts.utc_offset_hours, zurich().lon);
        let before = first - 0.25;
        let pos = sun_position(local_to_utc(june(), before, offset), 47.37, 8.54);
        assert!(pos.altitude < -0.1);
        // Minute grid.
        assert!(((first * 60.0).round() as i64) % 15 == 0);
    }

    #[test]
    fn test_build_nodes() {
        let geo = build(&input(), &PreviewOptions::default()).unwrap().unwrap();
        // 3 rings + axes + 4 labels + arc + marker + ray
        assert_eq!(geo.nodes.len(), 11);
        assert!(geo
            .nodes
            .iter()
            .all(|n| n.role == NodeRole::Overlay(OverlayKind::SolarPath)));
        assert!(geo.first_visible().unwrap() < geo.last_visible().unwrap());

        let north = geo
            .nodes
            .iter()
            .find_map(|n| match &n.content {
                NodeContent::Label { text, position, .. } if text == "N" => Some(*position),
                _ => None,
            })
            .unwrap();
        assert!(north.z < 0.0);
        assert!((north.z + 80.0 * 1.2 * 1.1).abs() < 1e-3);
    }

    #[test]
    fn test_absent_inputs_no_op() {
        let opts = PreviewOptions::default();
        let mut i = input();
        i.bounds = None;
        assert!(build(&i, &opts).unwrap().is_none());
        let mut i = input();
        i.origin = None;
        assert!(build(&i, &opts).unwrap().is_none());
        let mut i = input();
        i.enabled = false;
        assert!(build(&i, &opts).unwrap().is_none());
    }
}
