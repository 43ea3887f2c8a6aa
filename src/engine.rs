//! Engine: drives the board controller and presents its frames through wgpu

use crate::backend::wgpu_backend::WgpuBackend;
use crate::backend::{BackendError, BackendResult, DrawList};
use crate::scene::{ChessBoard, PointLight, BOARD_CLIP_PLANE};
use crate::ViewerConfig;
use glam::Vec4;
use std::sync::Arc;
use winit::window::Window as WinitWindow;

/// Main engine struct
pub struct Engine {
    backend: WgpuBackend,
    board: ChessBoard,
    frame: DrawList,
    light: PointLight,
    clear_color: Vec4,
}

impl Engine {
    /// Create a new engine rendering `board` into `window`
    pub fn new(window: Arc<WinitWindow>, board: ChessBoard, config: &ViewerConfig) -> BackendResult<Self> {
        let backend = WgpuBackend::new(Arc::clone(&window), config.vsync)?;
        let mut engine = Self {
            backend,
            board,
            frame: DrawList::new(),
            light: PointLight::default(),
            clear_color: config.clear_color,
        };

        // Picking uses the window size even when the surface is clamped
        let size = window.inner_size();
        engine.board.resize(size.width, size.height);
        Ok(engine)
    }

    pub fn board(&self) -> &ChessBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut ChessBoard {
        &mut self.board
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.backend.resize(width, height);
        self.board.resize(width, height);
    }

    /// Record the scene and present it.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render(&mut self) -> BackendResult<()> {
        self.frame.clear();
        self.board.draw_scene(&mut self.frame);
        let camera = self.board.place_camera();

        match self.backend.render(
            &self.frame,
            &camera,
            BOARD_CLIP_PLANE,
            &self.light,
            self.clear_color,
        ) {
            Err(BackendError::SurfaceLost) => {
                log::warn!("Surface lost, reconfiguring");
                self.backend.reconfigure();
                Ok(())
            }
            result => result,
        }
    }

    /// Get current surface dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        self.backend.surface_size()
    }
}
