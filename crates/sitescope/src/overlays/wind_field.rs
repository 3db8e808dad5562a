//! Wind-direction arrow field.

use glam::{Quat, Vec3};
use sitescope_core::color::hex;
use sitescope_core::{
    NodeContent, NodeRole, OverlayKind, PreviewOptions, Result, SceneBounds, SceneNode,
    SitescopeError,
};
use sitescope_structures::ClimateSample;

const ARROW_COLOR: u32 = 0x2e86c1;
const ARROW_LENGTH: f32 = 0.6;
const HEAD_LENGTH: f32 = 0.3;
const HEAD_ANGLE: f32 = 0.45;

/// Inputs the wind field depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindFieldInput {
    pub enabled: bool,
    /// Climate sample for the current hour, if climate data is available.
    pub sample: Option<ClimateSample>,
    pub bounds: Option<SceneBounds>,
}

/// Horizontal unit vector the wind blows toward.
///
/// `from_degrees` is the meteorological direction the wind comes from,
/// clockwise from north (−Z).
pub fn downwind(from_degrees: f32) -> Vec3 {
    let theta = from_degrees.to_radians();
    Vec3::new(-theta.sin(), 0.0, theta.cos())
}

/// Arrow centers of an `n × n` grid over the central `coverage` fraction of
/// the horizontal bounds, `height` above the tallest point.
pub fn grid_points(bounds: &SceneBounds, n: usize, coverage: f32, height: f32) -> Vec<Vec3> {
    let size = bounds.size();
    let pad = (1.0 - coverage) * 0.5;
    let start = Vec3::new(
        bounds.min.x + size.x * pad,
        bounds.max.y + height,
        bounds.min.z + size.z * pad,
    );
    let step_x = size.x * coverage / n as f32;
    let step_z = size.z * coverage / n as f32;

    (0..n)
        .flat_map(|row| {
            (0..n).map(move |col| {
                start + Vec3::new((col as f32 + 0.5) * step_x, 0.0, (row as f32 + 0.5) * step_z)
            })
        })
        .collect()
}

/// Builds the arrow field.
///
/// Returns `None` when disabled or when bounds or a climate sample are
/// missing.
pub fn build(input: &WindFieldInput, options: &PreviewOptions) -> Result<Option<Vec<SceneNode>>> {
    if !input.enabled {
        return Ok(None);
    }
    let (Some(bounds), Some(sample)) = (input.bounds, input.sample) else {
        return Ok(None);
    };

    let n = options.wind_grid_size.max(1);
    let cell = bounds.max_horizontal_dimension() * options.wind_coverage / n as f32;
    if !cell.is_finite() || cell <= 0.0 {
        return Err(SitescopeError::DegenerateBounds);
    }

    let dir = downwind(sample.wind_direction);
    let len = cell * ARROW_LENGTH;
    let heads = [
        Quat::from_rotation_y(HEAD_ANGLE) * -dir,
        Quat::from_rotation_y(-HEAD_ANGLE) * -dir,
    ];

    let points = grid_points(
        &bounds,
        n,
        options.wind_coverage,
        options.wind_height_offset,
    );
    let mut segments = Vec::with_capacity(points.len() * 3);
    for p in &points {
        let tail = *p - dir * len * 0.5;
        let tip = *p + dir * len * 0.5;
        segments.push([tail, tip]);
        for h in heads {
            segments.push([tip, tip + h * len * HEAD_LENGTH]);
        }
    }

    let label_at = Vec3::new(
        bounds.center().x,
        bounds.max.y + options.wind_height_offset,
        bounds.max.z + cell,
    );

    Ok(Some(vec![
        SceneNode::new(
            "wind arrows",
            NodeRole::Overlay(OverlayKind::WindField),
            NodeContent::Lines {
                segments,
                color: hex(ARROW_COLOR),
                dashed: false,
            },
        ),
        SceneNode::new(
            "wind label",
            NodeRole::Overlay(OverlayKind::WindField),
            NodeContent::Label {
                text: format!(
                    "{:.1} m/s from {:.0}°",
                    sample.wind_speed, sample.wind_direction
                ),
                position: label_at,
                size: cell * 0.3,
                color: hex(ARROW_COLOR),
            },
        ),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> SceneBounds {
        SceneBounds::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(100.0, 30.0, 50.0))
    }

    fn sample(direction: f32) -> ClimateSample {
        ClimateSample {
            temperature: 18.0,
            wind_speed: 4.2,
            wind_direction: direction,
        }
    }

    #[test]
    fn test_downwind() {
        // A north wind blows south (+Z).
        assert!((downwind(0.0) - Vec3::Z).length() < 1e-6);
        // A west wind blows east (+X).
        assert!((downwind(270.0) - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_grid_covers_central_region() {
        let pts = grid_points(&bounds(), 6, 0.8, 20.0);
        assert_eq!(pts.len(), 36);
        for p in &pts {
            assert!((10.0..=90.0).contains(&p.x));
            assert!((5.0..=45.0).contains(&p.z));
            assert_eq!(p.y, 50.0);
        }
    }

    #[test]
    fn test_build_arrows() {
        let input = WindFieldInput {
            enabled: true,
            sample: Some(sample(90.0)),
            bounds: Some(bounds()),
        };
        let nodes = build(&input, &PreviewOptions::default()).unwrap().unwrap();
        assert_eq!(nodes.len(), 2);
        let NodeContent::Lines { segments, .. } = &nodes[0].content else {
            panic!("expected lines");
        };
        assert_eq!(segments.len(), 36 * 3);
        // East wind: shafts point west.
        let shaft = segments[0][1] - segments[0][0];
        assert!(shaft.x < 0.0 && shaft.z.abs() < 1e-4);
    }

    #[test]
    fn test_missing_inputs_no_op() {
        let opts = PreviewOptions::default();
        let input = WindFieldInput {
            enabled: true,
            sample: None,
            bounds: Some(bounds()),
        };
        assert!(build(&input, &opts).unwrap().is_none());
        let input = WindFieldInput {
            enabled: true,
            sample: Some(sample(0.0)),
            bounds: None,
        };
        assert!(build(&input, &opts).unwrap().is_none());
    }
}
