//! Directional light and shadow frustum placement.

use glam::{Mat4, Vec3};
use sitescope_core::SceneBounds;

/// Shadow map resolution.
pub const SHADOW_MAP_SIZE: u32 = 2048;

/// Direction from the scene center toward the default (non-solar) light.
pub const DEFAULT_LIGHT_DIRECTION: Vec3 = Vec3::new(0.5, 1.0, 0.3);

/// GPU representation of light uniforms.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Direction the light travels, `w` unused.
    pub light_dir: [f32; 4],
    /// `x` is 1.0 when shadows are cast, `y` is the shadow map texel size,
    /// `zw` unused.
    pub shadow_flags: [f32; 4],
}

impl Default for LightUniforms {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            light_dir: [-0.5, -1.0, -0.3, 0.0],
            shadow_flags: [1.0, 1.0 / SHADOW_MAP_SIZE as f32, 0.0, 0.0],
        }
    }
}

/// Unit vector from the observer toward the sun.
///
/// `azimuth` is measured clockwise from north. North is −Z and east is +X.
pub fn sun_direction(altitude: f32, azimuth: f32) -> Vec3 {
    let horizontal = altitude.cos();
    Vec3::new(
        azimuth.sin() * horizontal,
        altitude.sin(),
        -azimuth.cos() * horizontal,
    )
}

/// A directional light approximated by a distant positional light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub target: Vec3,
    pub cast_shadows: bool,
    /// Half the side length of the orthographic shadow frustum.
    pub shadow_half_extent: f32,
}

impl DirectionalLight {
    /// Places the light along `toward_light` from the center of `bounds`.
    ///
    /// The light sits `distance_factor × max dimension` away and the shadow
    /// frustum spans `extent_factor × max dimension` on each side.
    pub fn placed(
        bounds: &SceneBounds,
        toward_light: Vec3,
        distance_factor: f32,
        extent_factor: f32,
        cast_shadows: bool,
    ) -> Self {
        let dim = bounds.max_dimension();
        let center = bounds.center();
        let dir = toward_light.try_normalize().unwrap_or(Vec3::Y);
        Self {
            position: center + dir * dim * distance_factor,
            target: center,
            cast_shadows,
            shadow_half_extent: dim * extent_factor,
        }
    }

    /// The fixed light used when the sun study is off.
    pub fn default_for(
        bounds: &SceneBounds,
        distance_factor: f32,
        extent_factor: f32,
        cast_shadows: bool,
    ) -> Self {
        Self::placed(
            bounds,
            DEFAULT_LIGHT_DIRECTION,
            distance_factor,
            extent_factor,
            cast_shadows,
        )
    }

    /// Direction the light travels, from the light to its target.
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Distance from the light to its target.
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Computes the light view-projection matrix for shadow mapping.
    ///
    /// Creates an orthographic projection from the light's position that
    /// covers `shadow_half_extent` around the target.
    #[must_use]
    pub fn view_proj(&self) -> Mat4 {
        let dir = self.direction();

        // Find a stable up vector that's not parallel to light direction
        let up = if dir.y.abs() > 0.99 { Vec3::Z } else { Vec3::Y };

        let e = self.shadow_half_extent.max(f32::EPSILON);
        let view = Mat4::look_at_rh(self.position, self.target, up);
        let proj = Mat4::orthographic_rh(-e, e, -e, e, 0.1, self.distance() + e * 2.0);
        proj * view
    }

    /// Packs the light into its uniform block.
    pub fn uniforms(&self) -> LightUniforms {
        let d = self.direction();
        LightUniforms {
            view_proj: self.view_proj().to_cols_array_2d(),
            light_dir: [d.x, d.y, d.z, 0.0],
            shadow_flags: [
                f32::from(u8::from(self.cast_shadows)),
                1.0 / SHADOW_MAP_SIZE as f32,
                0.0,
                0.0,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn bounds() -> SceneBounds {
        SceneBounds::new(Vec3::new(-10.0, 0.0, -20.0), Vec3::new(10.0, 5.0, 20.0))
    }

    #[test]
    fn test_sun_direction_compass() {
        let north = sun_direction(0.0, 0.0);
        assert!((north - Vec3::NEG_Z).length() < 1e-6);
        let east = sun_direction(0.0, FRAC_PI_2);
        assert!((east - Vec3::X).length() < 1e-6);
        let south = sun_direction(0.0, PI);
        assert!((south - Vec3::Z).length() < 1e-6);
        let zenith = sun_direction(FRAC_PI_2, 1.0);
        assert!((zenith - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_light_placement() {
        let b = bounds();
        let light = DirectionalLight::placed(&b, Vec3::Y, 1.5, 0.8, true);
        assert!((light.distance() - 60.0).abs() < 1e-4);
        assert!((light.shadow_half_extent - 32.0).abs() < 1e-4);
        assert_eq!(light.target, b.center());
        assert!((light.direction() - Vec3::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn test_default_light_uses_extent_factor() {
        let light = DirectionalLight::default_for(&bounds(), 1.5, 0.8, true);
        assert!((light.distance() - 60.0).abs() < 1e-4);
        assert!((light.shadow_half_extent - 32.0).abs() < 1e-4);
    }

    #[test]
    fn test_target_projects_to_frustum_center() {
        let light = DirectionalLight::placed(&bounds(), Vec3::new(1.0, 1.0, 0.0), 1.5, 0.8, true);
        let clip = light.view_proj().project_point3(light.target);
        assert!(clip.x.abs() < 1e-4 && clip.y.abs() < 1e-4);
        assert!((0.0..=1.0).contains(&clip.z));
    }

    #[test]
    fn test_uniforms_pod() {
        let light = DirectionalLight::default_for(&bounds(), 1.5, 0.8, false);
        let u = light.uniforms();
        assert_eq!(u.shadow_flags[0], 0.0);
        assert_eq!(u.shadow_flags[1], 1.0 / 2048.0);
        assert_eq!(bytemuck::bytes_of(&u).len(), 96);
    }

    proptest! {
        #[test]
        fn prop_sun_direction_is_unit(alt in -FRAC_PI_2..FRAC_PI_2, az in 0.0f32..6.28) {
            let d = sun_direction(alt, az);
            prop_assert!((d.length() - 1.0).abs() < 1e-5);
            prop_assert_eq!(d.y > 0.0, alt > 0.0);
        }
    }
}
