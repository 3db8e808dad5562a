//! Color helpers.

use glam::Vec3;

/// Converts a `0xRRGGBB` value to RGB components in `[0, 1]`.
pub fn hex(rgb: u32) -> Vec3 {
    let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
    let b = (rgb & 0xff) as f32 / 255.0;
    Vec3::new(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(hex(0xffffff), Vec3::ONE);
        assert_eq!(hex(0x000000), Vec3::ZERO);
        assert_eq!(hex(0xff8000), Vec3::new(1.0, 128.0 / 255.0, 0.0));
    }
}
