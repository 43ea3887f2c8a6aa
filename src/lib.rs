//! Checkmate Viewer - an interactive 3D chess board
//!
//! Renders a board with stencil-masked reflections and projected shadows,
//! orbits the camera with the keyboard and mouse, and picks pieces through a
//! software selection buffer.
//!
//! # Layout
//! - [`resources`]: `.mesh` parsing and the per-piece mesh library
//! - [`scene`]: board controller, camera, light and piece layout
//! - [`backend`]: the [`RenderContext`](backend::RenderContext) drawing
//!   interface, the frame recorder, the selection buffer and the wgpu renderer
//! - [`engine`] and [`window`]: winit event loop glue

pub mod backend;
pub mod engine;
pub mod resources;
pub mod scene;
pub mod window;

pub use engine::Engine;
pub use window::Window;

// Re-export wgpu backend for direct access
pub use backend::wgpu_backend::WgpuBackend;

use glam::Vec4;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for running the viewer
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error(transparent)]
    Backend(#[from] backend::BackendError),
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
}

/// Configuration for the viewer
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Window title
    pub title: String,
    /// Initial window width
    pub width: u32,
    /// Initial window height
    pub height: u32,
    /// Enable vsync
    pub vsync: bool,
    /// Directory holding the six piece meshes
    pub mesh_dir: PathBuf,
    /// Key that enables orbiting while held
    pub rotate_key: char,
    pub clear_color: Vec4,
    /// Side of the square pick region in pixels
    pub pick_size: u32,
    /// Selection buffer size in 32-bit words
    pub selection_capacity: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Chess Board".to_string(),
            width: 800,
            height: 600,
            vsync: true,
            mesh_dir: PathBuf::from("assets"),
            rotate_key: 'a',
            clear_color: Vec4::new(0.6, 0.6, 0.6, 0.0),
            pick_size: 3,
            selection_capacity: backend::DEFAULT_SELECTION_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_loop_error_message() {
        let err = ViewerError::from(winit::error::EventLoopError::ExitFailure(3));
        assert!(matches!(err, ViewerError::EventLoop(_)));
        assert!(err.to_string().starts_with("Event loop error"));
    }

    #[test]
    fn test_default_config() {
        let config = ViewerConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.rotate_key, 'a');
        assert_eq!(config.mesh_dir, PathBuf::from("assets"));
    }
}
