//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use sitescope::*;

/// Unit cube as 12 outward-facing triangles, flattened.
pub fn unit_cube() -> Vec<f32> {
    let quads: [[[f32; 3]; 4]; 6] = [
        [[0., 0., 0.], [0., 0., 1.], [0., 1., 1.], [0., 1., 0.]],
        [[1., 0., 0.], [1., 1., 0.], [1., 1., 1.], [1., 0., 1.]],
        [[0., 0., 0.], [1., 0., 0.], [1., 0., 1.], [0., 0., 1.]],
        [[0., 1., 0.], [0., 1., 1.], [1., 1., 1.], [1., 1., 0.]],
        [[0., 0., 0.], [0., 1., 0.], [1., 1., 0.], [1., 0., 0.]],
        [[0., 0., 1.], [1., 0., 1.], [1., 1., 1.], [0., 1., 1.]],
    ];
    quads
        .iter()
        .flat_map(|q| [0, 1, 2, 0, 2, 3].map(|i| q[i]))
        .flatten()
        .collect()
}

fn scaled_cube(scale: f32, offset: [f32; 3]) -> Vec<f32> {
    unit_cube()
        .chunks_exact(3)
        .flat_map(|v| {
            [
                v[0] * scale + offset[0],
                v[1] * scale + offset[1],
                v[2] * scale + offset[2],
            ]
        })
        .collect()
}

fn floats(v: &[f32]) -> String {
    v.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

/// One unit-cube building and one tree at scale 2.
pub fn cube_and_tree() -> GeometryPayload {
    let json = format!(
        r#"{{"origin": [47.3769, 8.5417], "geometry": [
            {{"type": "buildings", "geometryType": "meshes", "meshes": [{{"vertices": [{}]}}]}},
            {{"type": "vegetation", "geometryType": "nodes",
              "nodes": [{{"type": "tree", "x": 0, "y": 0, "z": 0, "scale": 2}}]}}
        ]}}"#,
        floats(&unit_cube())
    );
    GeometryPayload::from_json_str(&json).unwrap()
}

/// A small city block with every layer represented.
pub fn city_block() -> GeometryPayload {
    let ground = [
        -60.0, 0.0, -60.0, -60.0, 0.0, 60.0, 60.0, 0.0, 60.0, //
        -60.0, 0.0, -60.0, 60.0, 0.0, 60.0, 60.0, 0.0, -60.0,
    ];
    let path = [
        -5.0, 0.01, -50.0, -5.0, 0.01, 50.0, 5.0, 0.01, 50.0, //
    ];
    let json = format!(
        r#"{{"origin": [47.3769, 8.5417], "geometry": [
            {{"type": "buildings", "geometryType": "meshes", "meshes": [
                {{"vertices": [{}]}}, {{"vertices": [{}]}}, {{"vertices": []}}]}},
            {{"type": "surface", "geometryType": "meshes", "meshes": [
                {{"vertices": [{}], "descriptor": "footway"}},
                {{"vertices": [{}], "descriptor": "asphalt"}}]}},
            {{"type": "topography", "geometryType": "meshes", "meshes": [{{"vertices": [{}]}}]}},
            {{"type": "barriers", "geometryType": "meshes", "meshes": [{{"vertices": [{}]}}]}},
            {{"type": "vegetation", "geometryType": "nodes", "nodes": [
                {{"type": "tree", "x": 20, "y": 0, "z": 20, "scale": 1.5}},
                {{"type": " Shrubbery ", "x": -20, "y": 0, "z": 20}},
                {{"type": "Planter_01", "x": 0, "y": 0, "z": -30}}]}},
            {{"type": "furniture", "geometryType": "nodes", "nodes": [
                {{"type": "bench", "x": 10, "y": 0, "z": 0}},
                {{"type": "UtilityPole", "x": 30, "y": 0, "z": -10}},
                {{"type": "hydrant", "x": -10, "y": 0, "z": 0}}]}}
        ]}}"#,
        floats(&scaled_cube(20.0, [-40.0, 0.0, -40.0])),
        floats(&scaled_cube(30.0, [10.0, 0.0, 10.0])),
        floats(&path),
        floats(&ground),
        floats(&ground),
        floats(&scaled_cube(2.0, [50.0, 0.0, 50.0])),
    );
    GeometryPayload::from_json_str(&json).unwrap()
}

/// Climate data with a distinct wind direction per hour.
pub fn climate() -> ClimateData {
    let hourly: Vec<String> = (0..24)
        .map(|h| {
            format!(
                r#"{{"temperature": 20, "windSpeed": 3.5, "windDirection": {}}}"#,
                h * 15
            )
        })
        .collect();
    let json = format!(
        r#"{{"current": {{"temperature": 18, "windSpeed": 2, "windDirection": 45}},
            "hourly": [{}]}}"#,
        hourly.join(",")
    );
    ClimateData::from_json_str(&json).unwrap().unwrap()
}

/// Options pinned to a summer date and central European summer time.
pub fn options() -> PreviewOptions {
    PreviewOptions {
        study_date: chrono::NaiveDate::from_ymd_opt(2024, 6, 21),
        utc_offset_hours: Some(2.0),
        ..PreviewOptions::default()
    }
}

/// A loaded preview of [`city_block`].
pub fn loaded_preview() -> Preview {
    let mut preview = Preview::open_seeded(options(), 42);
    preview.load_geometry(&city_block()).unwrap();
    preview
}
