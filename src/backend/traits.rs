//! Core render abstraction traits
//!
//! The scene issues its draws through [`RenderContext`]. The same draw path
//! feeds the frame recorder (GPU rendering, tests) and the software selection
//! buffer (picking).

use crate::backend::types::*;
use glam::{Mat4, Vec4};
use thiserror::Error;

/// Backend error type
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to initialize backend: {0}")]
    InitializationFailed(String),
    #[error("Failed to create surface: {0}")]
    SurfaceCreationFailed(String),
    #[error("Failed to create device: {0}")]
    DeviceCreationFailed(String),
    #[error("Failed to acquire next image: {0}")]
    AcquireImageFailed(String),
    #[error("Surface lost")]
    SurfaceLost,
    #[error("Out of memory")]
    OutOfMemory,
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Immediate-mode drawing interface.
///
/// Pass state, material, color and the name stack are sticky, the way the
/// fixed-function pipeline treats them. Transforms are not: every polygon
/// carries the full model-to-world matrix it should be drawn with.
pub trait RenderContext {
    /// Switch depth/blend/stencil/clip state for the draws that follow
    fn set_pass_state(&mut self, state: PassState);

    /// Set the specular material for the draws that follow
    fn set_material(&mut self, material: Material);

    /// Set the RGBA color for the draws that follow
    fn set_color(&mut self, color: Vec4);

    /// Push a selection name
    fn push_name(&mut self, name: u32);

    /// Pop the most recent selection name
    fn pop_name(&mut self);

    /// Emit one filled polygon, corners in drawing order
    fn draw_polygon(&mut self, transform: &Mat4, vertices: &[PolygonVertex]);
}
