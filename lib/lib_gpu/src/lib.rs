//! GPU API used by the platform layer.
//!
//! Everything is re-exported from `wgpu` so the other crates name GPU types
//! through a single dependency.

pub use wgpu::*;
