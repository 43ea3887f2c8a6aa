//! Scene light, planar shadows and reflections

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

/// Ambient term applied to every surface regardless of lights
pub const GLOBAL_AMBIENT: Vec3 = Vec3::splat(0.2);

/// Positional light above the board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// Homogeneous position (w = 1 for a positional light)
    pub position: Vec4,
    pub ambient: Vec3,
    pub diffuse: Vec3,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec4::new(1.0, 18.0, 1.0, 1.0),
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.5),
        }
    }
}

impl PointLight {
    /// Convert to GPU data format
    pub fn to_gpu_data(&self) -> GpuLightData {
        GpuLightData {
            position: self.position,
            ambient: (self.ambient + GLOBAL_AMBIENT).extend(1.0),
            diffuse: self.diffuse.extend(1.0),
        }
    }
}

/// GPU-friendly light data structure
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuLightData {
    pub position: Vec4,
    /// Light ambient plus global ambient
    pub ambient: Vec4,
    pub diffuse: Vec4,
}

/// Projects geometry from the default light onto y = 0 (column-major).
///
/// Only valid for the light at (1, 18, 1).
#[rustfmt::skip]
pub const SHADOW_MATRIX: Mat4 = Mat4::from_cols_array(&[
    18.0, 0.0, 0.0, 0.0,
    -1.0, 18.0, -1.0, -1.0,
    0.0, 0.0, 18.0, 0.0,
    0.0, 0.0, 0.0, 18.0,
]);

/// Half-space kept by the reflection and shadow passes: y <= 0
pub const BOARD_CLIP_PLANE: Vec4 = Vec4::new(0.0, -1.0, 0.0, 0.0);

/// Alpha of reflections and shadows
pub const REFLECTION_ALPHA: f32 = 0.5;
pub const SHADOW_ALPHA: f32 = 0.5;

/// Flattened shadow of a piece placed at `transform`
pub fn shadow_transform(transform: &Mat4) -> Mat4 {
    Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0)) * SHADOW_MATRIX * *transform
}

/// Mirror image of a piece below the board surface
pub fn reflection_transform(transform: &Mat4) -> Mat4 {
    *transform * Mat4::from_rotation_z(180f32.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadow_lies_on_light_ray() {
        let light = PointLight::default().position.truncate();
        let point = Vec3::new(2.0, 3.0, 5.0);

        let shadow = shadow_transform(&Mat4::IDENTITY).project_point3(point);
        assert!(shadow.y.abs() < 1e-6);
        assert!(shadow.abs_diff_eq(Vec3::new(2.2, 0.0, 5.8), 1e-5));

        let towards_point = (point - light).normalize();
        let towards_shadow = (shadow - light).normalize();
        assert!(towards_point.abs_diff_eq(towards_shadow, 1e-5));
    }

    #[test]
    fn test_shadow_follows_piece_transform() {
        let placed = Mat4::from_translation(Vec3::new(3.5, 0.0, 0.5));
        let base = shadow_transform(&placed).project_point3(Vec3::ZERO);
        assert!(base.abs_diff_eq(Vec3::new(3.5, 0.0, 0.5), 1e-5));
    }

    #[test]
    fn test_reflection_is_below_board() {
        let placed = Mat4::from_translation(Vec3::new(1.5, 0.0, 1.5));
        let top = reflection_transform(&placed).transform_point3(Vec3::new(0.0, 1.0, 0.0));
        assert!(top.abs_diff_eq(Vec3::new(1.5, -1.0, 1.5), 1e-5));
        assert!(BOARD_CLIP_PLANE.dot(top.extend(1.0)) > 0.0);
    }

    #[test]
    fn test_gpu_light_folds_global_ambient() {
        let data = PointLight::default().to_gpu_data();
        assert!(data.ambient.truncate().abs_diff_eq(Vec3::splat(0.4), 1e-6));
        assert_eq!(data.position.w, 1.0);
    }
}
