//! Loads a geometry payload and prints the resulting scene.
//!
//! Usage: `cargo run --example site_preview -- site.json [hour]`

use sitescope::*;

fn main() -> Result<()> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: site_preview <payload.json> [hour]");
        return Ok(());
    };
    let hour: f32 = args.next().and_then(|h| h.parse().ok()).unwrap_or(15.0);

    let payload = GeometryPayload::from_json_str(&std::fs::read_to_string(path)?)?;
    let mut preview = Preview::open(PreviewOptions::default());
    preview.load_geometry(&payload)?;

    preview.set_sun_study(true);
    preview.set_solar_path(true);
    preview.set_map_underlay(true);
    preview.set_time_of_day(hour);
    preview.prepare_frame();

    let stats = preview.stats();
    println!(
        "{} batches, {} vertices, {} point features",
        stats.batch_count, stats.vertex_count, stats.instance_count
    );
    if let Some(bounds) = preview.scene().bounds() {
        println!("bounds {:?} .. {:?}", bounds.min, bounds.max);
    }
    if let Some(sun) = preview.lighting().sun {
        println!(
            "sun at {:.1}° altitude, {:.1}° azimuth",
            sun.altitude.to_degrees(),
            sun.azimuth.to_degrees()
        );
    }
    if let Some(crossings) = preview.solar_crossings() {
        println!(
            "sun path visible {:.2}h to {:.2}h",
            crossings.first, crossings.last
        );
    }

    for (id, node) in preview.scene().iter() {
        println!("{:>5} {:<28} visible={}", id.raw(), node.name, node.visible);
    }

    let tiles = preview.take_tile_requests();
    println!(
        "{} map tiles requested at zoom {:?}",
        tiles.len(),
        preview.tile_zoom()
    );
    Ok(())
}
