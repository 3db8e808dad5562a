//! Fixed color tables for model geometry and point instances.

use glam::Vec3;
use sitescope_core::color::hex;

pub const BUILDING_COLOR: u32 = 0xffffff;
pub const BUILDING_EDGE_COLOR: u32 = 0x404040;
pub const BARRIER_COLOR: u32 = 0x8b7d6b;
pub const TOPOGRAPHY_COLOR: u32 = 0xd8cfc0;

pub const SURFACE_DEFAULT_COLOR: u32 = 0xcccccc;
const SURFACE_COLORS: &[(&str, u32)] = &[
    ("asphalt", 0x4a4a4a),
    ("road", 0x4a4a4a),
    ("footway", 0xd9d2c5),
    ("sidewalk", 0xd9d2c5),
    ("pedestrian", 0xe0d8c8),
    ("cycleway", 0xc9795b),
    ("parking", 0x9a9a9a),
    ("paving_stones", 0xbfb6a8),
    ("grass", 0x8fbc5a),
    ("park", 0x8fbc5a),
    ("water", 0x6fa8dc),
    ("sand", 0xe6d3a3),
];

pub const INFRASTRUCTURE_DEFAULT_COLOR: u32 = 0x999999;
const INFRASTRUCTURE_COLORS: &[(&str, u32)] = &[
    ("railway", 0x6b5b4b),
    ("tram", 0x7a6a5a),
    ("bridge", 0xa0a0a0),
    ("tunnel", 0x707070),
    ("platform", 0xb5b5b5),
];

pub const TREE_TRUNK_COLOR: u32 = 0x8b5a2b;
pub const TREE_FOLIAGE_COLOR: u32 = 0x4f7f3a;
pub const INSTANCE_DEFAULT_COLOR: u32 = 0x999999;
const INSTANCE_COLORS: &[(&str, u32)] = &[
    ("shrubbery", 0x6b8e23),
    ("utilitypole", 0x5a5a5a),
    ("bench", 0x8b6b4a),
    ("hydrant", 0xc0392b),
    ("rock", 0x7f7f7f),
    ("illustration", 0xd4a017),
    ("adcolumn", 0x2e86c1),
    ("ac_unit", 0xbdc3c7),
];

fn lookup(table: &[(&str, u32)], key: &str) -> Option<u32> {
    table.iter().find(|(k, _)| *k == key).map(|(_, c)| *c)
}

/// Color of a surface mesh by its subtype.
pub fn surface_color(subtype: Option<&str>) -> Vec3 {
    hex(subtype
        .and_then(|s| lookup(SURFACE_COLORS, s))
        .unwrap_or(SURFACE_DEFAULT_COLOR))
}

/// Color of an infrastructure mesh by its subtype.
pub fn infrastructure_color(subtype: Option<&str>) -> Vec3 {
    hex(subtype
        .and_then(|s| lookup(INFRASTRUCTURE_COLORS, s))
        .unwrap_or(INFRASTRUCTURE_DEFAULT_COLOR))
}

/// Color of a non-tree point instance by its normalized tag.
pub fn instance_color(tag: &str) -> Vec3 {
    hex(lookup(INSTANCE_COLORS, tag).unwrap_or(INSTANCE_DEFAULT_COLOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_fallback() {
        assert_eq!(surface_color(Some("footway")), hex(0xd9d2c5));
        assert_eq!(surface_color(Some("lava")), hex(SURFACE_DEFAULT_COLOR));
        assert_eq!(surface_color(None), hex(SURFACE_DEFAULT_COLOR));
    }

    #[test]
    fn test_instance_fallback() {
        assert_eq!(instance_color("hydrant"), hex(0xc0392b));
        assert_eq!(instance_color("mailbox"), hex(INSTANCE_DEFAULT_COLOR));
    }
}
