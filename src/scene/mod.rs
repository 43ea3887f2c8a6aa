//! Scene management
//!
//! The board controller owns the piece layout, the orbit camera and input
//! state, and issues every draw through a [`RenderContext`](crate::backend::RenderContext).

mod board;
mod camera;
mod camera_controller;
mod light;
mod pieces;

pub use board::*;
pub use camera::*;
pub use camera_controller::*;
pub use light::*;
pub use pieces::*;
