//! Backend abstraction layer
//!
//! Provides the [`RenderContext`] drawing interface and the contexts that
//! implement it: the frame recorder, the software selection buffer and the
//! wgpu renderer that consumes recorded frames.

pub mod recorder;
pub mod selection;
pub mod traits;
pub mod types;
pub mod wgpu_backend;

pub use recorder::*;
pub use selection::*;
pub use traits::*;
pub use types::*;
