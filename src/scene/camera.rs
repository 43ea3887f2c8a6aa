//! Orbit camera around the board centre

use crate::backend::CameraMatrices;
use glam::{Mat4, Vec3};

/// Distance from the eye to the board centre
pub const CAMERA_DISTANCE: f32 = 12.0;

/// Elevation limits in degrees
pub const MIN_ELEVATION: f32 = 10.0;
pub const MAX_ELEVATION: f32 = 80.0;

/// Point the camera orbits, in world space
pub const BOARD_CENTER: Vec3 = Vec3::new(4.0, 0.0, 4.0);

/// Perspective projection for the given aspect ratio.
///
/// About 53° vertical field of view, near plane at 4.1 and the far plane at
/// infinity. OpenGL clip conventions.
#[rustfmt::skip]
pub fn projection(aspect: f32) -> Mat4 {
    Mat4::from_cols_array(&[
        2.0 / aspect, 0.0, 0.0, 0.0,
        0.0, 2.0, 0.0, 0.0,
        0.0, 0.0, -1.0, -1.0,
        0.0, 0.0, -8.2, 0.0,
    ])
}

/// Camera orbiting the board centre. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardCamera {
    pub rotation: f32,
    pub elevation: f32,
}

impl Default for BoardCamera {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            elevation: 30.0,
        }
    }
}

impl BoardCamera {
    pub fn new(rotation: f32, elevation: f32) -> Self {
        Self {
            rotation,
            elevation: elevation.clamp(MIN_ELEVATION, MAX_ELEVATION),
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -CAMERA_DISTANCE))
            * Mat4::from_rotation_x(self.elevation.to_radians())
            * Mat4::from_rotation_y(self.rotation.to_radians())
            * Mat4::from_translation(-BOARD_CENTER)
    }

    /// Projection and view for a viewport with the given aspect ratio
    pub fn place(&self, aspect: f32) -> CameraMatrices {
        CameraMatrices {
            projection: projection(aspect),
            view: self.view_matrix(),
        }
    }

    /// Orbit by the given angle deltas, keeping elevation within limits
    pub fn orbit(&mut self, d_rotation: f32, d_elevation: f32) {
        self.rotation += d_rotation;
        self.elevation = (self.elevation + d_elevation).clamp(MIN_ELEVATION, MAX_ELEVATION);
    }
}
