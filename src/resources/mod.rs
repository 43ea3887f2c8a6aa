//! Resource management
//!
//! Handles loading of the piece meshes.

mod library;
mod mesh;

pub use library::*;
pub use mesh::*;
