//! Common types shared between the render contexts

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

/// Stencil behaviour for a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StencilMode {
    /// Stencil test disabled
    #[default]
    Disabled,
    /// Always pass, replace the stencil value with 1
    Write,
    /// Only draw where the stencil value equals 1
    TestEqual,
}

/// Fixed-function style feature flags for the draws that follow.
///
/// Every distinct value maps to one GPU pipeline in the wgpu backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PassState {
    pub depth_test: bool,
    pub blend: bool,
    pub stencil: StencilMode,
    pub clip_plane: bool,
}

impl PassState {
    /// Board squares: no depth, blended, writing the board stencil mask
    pub const BOARD: Self = Self {
        depth_test: false,
        blend: true,
        stencil: StencilMode::Write,
        clip_plane: false,
    };

    /// Mirrored pieces under the board surface
    pub const REFLECTION: Self = Self {
        depth_test: true,
        blend: true,
        stencil: StencilMode::TestEqual,
        clip_plane: true,
    };

    /// Flattened pieces on the board surface
    pub const SHADOW: Self = Self {
        depth_test: false,
        blend: true,
        stencil: StencilMode::TestEqual,
        clip_plane: true,
    };

    /// Opaque, depth sorted pieces
    pub const OPAQUE: Self = Self {
        depth_test: true,
        blend: false,
        stencil: StencilMode::Disabled,
        clip_plane: false,
    };
}

/// Specular material applied to subsequent draws
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub specular: Vec4,
    pub shininess: f32,
}

impl Material {
    /// No specular highlight (fixed-function default)
    pub const MATTE: Self = Self {
        specular: Vec4::new(0.0, 0.0, 0.0, 1.0),
        shininess: 0.0,
    };

    /// Highlighted playing pieces
    pub const GLOSSY: Self = Self {
        specular: Vec4::new(0.5, 0.5, 0.5, 1.0),
        shininess: 50.0,
    };
}

impl Default for Material {
    fn default() -> Self {
        Self::MATTE
    }
}

/// One corner of a polygon in model space
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PolygonVertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl PolygonVertex {
    pub const fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// Projection and view matrices produced by camera placement.
///
/// Both use OpenGL clip conventions (depth in [-1, 1]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrices {
    pub projection: Mat4,
    pub view: Mat4,
}

impl CameraMatrices {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Camera position in world space
    pub fn eye(&self) -> Vec3 {
        self.view.inverse().w_axis.truncate()
    }
}

/// Viewport rectangle in window pixels (origin bottom-left)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_states_are_distinct() {
        let states = [
            PassState::BOARD,
            PassState::REFLECTION,
            PassState::SHADOW,
            PassState::OPAQUE,
        ];
        for (i, a) in states.iter().enumerate() {
            for b in &states[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_viewport_never_zero_sized() {
        let vp = Viewport::new(0, 0);
        assert_eq!(vp.width, 1);
        assert_eq!(vp.height, 1);
        assert_eq!(Viewport::new(800, 600).aspect_ratio(), 800.0 / 600.0);
    }

    #[test]
    fn test_camera_eye_from_view() {
        let camera = CameraMatrices {
            projection: Mat4::IDENTITY,
            view: Mat4::from_translation(Vec3::new(0.0, 0.0, -12.0)),
        };
        assert!(camera.eye().abs_diff_eq(Vec3::new(0.0, 0.0, 12.0), 1e-5));
    }
}
