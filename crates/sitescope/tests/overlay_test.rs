//! Environmental overlays driven through `Preview::prepare_frame`.

mod common;

use common::*;
use sitescope::*;

fn enable_all(preview: &mut Preview) {
    preview.set_sun_study(true);
    preview.set_solar_path(true);
    preview.set_wind_field(true);
    preview.set_map_underlay(true);
}

fn with_climate(preview: &mut Preview) {
    let ticket = preview.begin_climate_fetch().unwrap();
    assert!(preview.complete_climate_fetch(ticket, Ok(Some(climate()))));
}

#[test]
fn test_empty_preview_overlays_are_no_ops() {
    let mut preview = Preview::open_seeded(options(), 1);
    enable_all(&mut preview);
    preview.prepare_frame();

    assert!(preview.scene().is_empty());
    assert!(preview.lighting().light.is_none());
    assert!(preview.solar_crossings().is_none());
    assert!(preview.take_tile_requests().is_empty());
}

#[test]
fn test_empty_geometry_overlays_are_no_ops() {
    let payload =
        GeometryPayload::from_json_str(r#"{"origin": [47.3769, 8.5417], "geometry": []}"#).unwrap();
    let mut preview = Preview::open_seeded(options(), 1);
    preview.load_geometry(&payload).unwrap();
    with_climate(&mut preview);
    enable_all(&mut preview);
    preview.prepare_frame();

    assert!(preview.scene().is_empty());
    assert!(preview.scene().bounds().is_none());
    assert!(preview.lighting().light.is_none());
    for kind in [OverlayKind::SolarPath, OverlayKind::WindField, OverlayKind::MapUnderlay] {
        assert!(preview.overlay_nodes(kind).is_empty());
    }
}

#[test]
fn test_default_lighting_without_sun_study() {
    let mut preview = loaded_preview();
    preview.prepare_frame();
    let lighting = preview.lighting();
    let light = lighting.light.as_ref().unwrap();
    assert!(light.cast_shadows);
    assert!(lighting.sun.is_none());
    assert_eq!(lighting.sky, SkyGradient::default_blue());

    preview.set_default_shadows(false);
    preview.prepare_frame();
    assert!(!preview.lighting().light.as_ref().unwrap().cast_shadows);
}

#[test]
fn test_sun_study_follows_time_of_day() {
    let mut preview = loaded_preview();
    preview.set_sun_study(true);

    preview.set_time_of_day(13.0);
    preview.prepare_frame();
    let noon = *preview.lighting();
    let sun = noon.sun.unwrap();
    assert!(sun.altitude > 1.0, "midsummer midday altitude {}", sun.altitude);
    assert!(noon.shadows());
    // Near solar noon the light comes from the south (+Z) and travels north.
    let travel = noon.light.unwrap().direction();
    assert!(travel.z < 0.0 && travel.y < 0.0);

    preview.set_time_of_day(8.0);
    preview.prepare_frame();
    let morning = preview.lighting().sun.unwrap();
    assert!(morning.altitude < sun.altitude);
    assert!(morning.azimuth < std::f64::consts::PI);

    preview.set_time_of_day(40.0);
    assert_eq!(preview.environment().time_of_day, 20.0);
}

#[test]
fn test_solar_path_cutoff() {
    let mut preview = loaded_preview();
    preview.set_solar_path(true);
    preview.prepare_frame();

    let crossings = preview.solar_crossings().unwrap();
    let opts = preview.options();
    assert!(crossings.first > f64::from(opts.solar_path_start));
    assert!(crossings.first < 7.0);
    assert!(crossings.last <= f64::from(opts.solar_path_end));
    assert!(crossings.first < crossings.last);

    let nodes = preview.overlay_nodes(OverlayKind::SolarPath);
    assert!(!nodes.is_empty());
    assert!(nodes.iter().all(|id| {
        preview.scene().get(*id).unwrap().role == NodeRole::Overlay(OverlayKind::SolarPath)
    }));

    preview.set_solar_path(false);
    preview.prepare_frame();
    assert!(preview.overlay_nodes(OverlayKind::SolarPath).is_empty());
    assert!(preview.solar_crossings().is_none());
    assert_eq!(
        preview.scene().overlay_nodes(OverlayKind::SolarPath).count(),
        0
    );
}

#[test]
fn test_wind_field_needs_climate() {
    let mut preview = loaded_preview();
    preview.set_wind_field(true);
    preview.prepare_frame();
    assert!(preview.overlay_nodes(OverlayKind::WindField).is_empty());

    with_climate(&mut preview);
    preview.prepare_frame();
    let nodes = preview.overlay_nodes(OverlayKind::WindField).to_vec();
    assert_eq!(nodes.len(), 2);

    let label = nodes
        .iter()
        .find_map(|id| match &preview.scene().get(*id).unwrap().content {
            NodeContent::Label { text, .. } => Some(text.clone()),
            _ => None,
        })
        .unwrap();
    // Hour 12 of the fixture blows from 180°.
    assert!(label.contains("180"), "label {label}");
}

#[test]
fn test_prepare_frame_skips_unchanged_overlays() {
    let mut preview = loaded_preview();
    with_climate(&mut preview);
    enable_all(&mut preview);

    assert_eq!(preview.prepare_frame(), 4);
    assert_eq!(preview.prepare_frame(), 0);

    // Time moves the sun and the wind sample, not the map.
    preview.set_time_of_day(15.0);
    assert_eq!(preview.prepare_frame(), 3);

    preview.set_layer_visibility(LayerKind::Vegetation, false);
    assert_eq!(preview.prepare_frame(), 0);
}

#[test]
fn test_repeated_recompute_does_not_leak() {
    let mut preview = loaded_preview();
    with_climate(&mut preview);
    preview.set_solar_path(true);
    preview.set_wind_field(true);
    preview.set_map_underlay(true);

    let hours: Vec<f32> = (0..=28).map(|i| 6.0 + i as f32 * 0.5).collect();
    let mut first_pass = Vec::new();
    for &h in &hours {
        preview.set_time_of_day(h);
        preview.prepare_frame();
        first_pass.push((preview.scene().len(), preview.resource_counts()));
    }
    for _ in 0..3 {
        for (i, &h) in hours.iter().enumerate() {
            preview.set_time_of_day(h);
            preview.prepare_frame();
            assert_eq!(
                (preview.scene().len(), preview.resource_counts()),
                first_pass[i],
                "at {h}h"
            );
        }
    }

    let model_nodes = preview.scene().model_nodes().count();
    preview.set_solar_path(false);
    preview.set_wind_field(false);
    preview.set_map_underlay(false);
    preview.prepare_frame();
    assert_eq!(preview.scene().len(), model_nodes);
}

#[test]
fn test_map_underlay_below_model() {
    let mut preview = loaded_preview();
    preview.set_map_underlay(true);
    preview.prepare_frame();

    let min_y = preview
        .scene()
        .model_nodes()
        .filter_map(|(_, n)| match &n.content {
            NodeContent::Mesh { positions, .. } => {
                positions.iter().map(|p| p.y).reduce(f32::min)
            }
            _ => None,
        })
        .reduce(f32::min)
        .unwrap();

    for id in preview.overlay_nodes(OverlayKind::MapUnderlay) {
        let node = preview.scene().get(*id).unwrap();
        assert!(node.receive_shadow);
        match &node.content {
            NodeContent::TexturedQuad { center, texture, .. } => {
                assert!(center.y < min_y);
                assert!(texture.is_none());
            }
            other => panic!("unexpected tile content {other:?}"),
        }
    }
}

#[test]
fn test_point_features_without_meshes_add_no_overlays() {
    let payload = GeometryPayload::from_json_str(
        r#"{"origin": [47.3769, 8.5417], "geometry": [
            {"type": "vegetation", "geometryType": "nodes", "nodes": [
                {"type": "tree", "x": 0, "y": 0, "z": 0},
                {"type": "tree", "x": 40, "y": 0, "z": 30, "scale": 1.5}]},
            {"type": "furniture", "geometryType": "nodes", "nodes": [
                {"type": "bench", "x": 10, "y": 0, "z": 5}]}
        ]}"#,
    )
    .unwrap();
    let mut preview = Preview::open_seeded(options(), 9);
    preview.load_geometry(&payload).unwrap();
    with_climate(&mut preview);
    enable_all(&mut preview);
    preview.prepare_frame();

    assert_eq!(preview.stats().batch_count, 0);
    assert!(preview.scene().bounds().is_none());
    assert!(preview.scene().iter().all(|(_, n)| n.is_model()));
    for kind in [OverlayKind::SolarPath, OverlayKind::WindField, OverlayKind::MapUnderlay] {
        assert!(preview.overlay_nodes(kind).is_empty());
    }
    assert!(preview.lighting().light.is_none());
    assert!(preview.solar_crossings().is_none());
    assert!(preview.take_tile_requests().is_empty());
}

fn cube_at(origin: [f64; 2], half: f32) -> GeometryPayload {
    let vertices: Vec<String> = unit_cube()
        .chunks_exact(3)
        .flat_map(|v| [(v[0] * 2.0 - 1.0) * half, v[1], (v[2] * 2.0 - 1.0) * half])
        .map(|c| c.to_string())
        .collect();
    let json = format!(
        r#"{{"origin": [{}, {}], "geometry": [
            {{"type": "buildings", "geometryType": "meshes", "meshes": [{{"vertices": [{}]}}]}}
        ]}}"#,
        origin[0],
        origin[1],
        vertices.join(",")
    );
    GeometryPayload::from_json_str(&json).unwrap()
}

#[test]
fn test_map_underlay_survives_pathological_inputs() {
    for (origin, half) in [([90.0, 0.0], 50.0), ([-90.0, 0.0], 50.0), ([47.0, 8.0], 1.0e20)] {
        let mut preview = Preview::open_seeded(options(), 2);
        preview.load_geometry(&cube_at(origin, half)).unwrap();
        preview.set_map_underlay(true);
        preview.prepare_frame();

        let max_tiles = preview.options().max_tiles;
        let requests = preview.take_tile_requests();
        assert!(!requests.is_empty(), "no tiles for {origin:?}");
        assert!(requests.len() <= max_tiles);
        assert_eq!(
            requests.len(),
            preview.overlay_nodes(OverlayKind::MapUnderlay).len()
        );
        let n = 1i64 << preview.tile_zoom().unwrap();
        assert!(requests
            .iter()
            .all(|r| (0..n).contains(&r.value.x) && (0..n).contains(&r.value.y)));
    }

    let mut preview = Preview::open_seeded(options(), 2);
    preview.load_geometry(&cube_at([47.0, 8.0], 1.0e20)).unwrap();
    preview.set_map_underlay(true);
    preview.prepare_frame();
    assert_eq!(preview.take_tile_requests().len(), 300);
}
