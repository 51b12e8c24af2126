//! Immediate-mode batched quad renderer.

use lib_gpu::{Device, Queue, TextureFormat};

mod atlas;
mod backend;
mod batch;
mod config;
mod error;
mod flush;
mod font;
mod frame;
mod quad;
mod quad_buffer;
mod texture;
mod wgpu_backend;
pub use atlas::*;
pub use backend::*;
pub use batch::*;
pub use config::*;
pub use error::*;
pub use flush::*;
pub use font::*;
pub use frame::*;
pub use quad::*;
pub use quad_buffer::*;
pub use texture::*;
pub use wgpu_backend::*;

/// Quads a batch holds before its first doubling.
pub const DEFAULT_BATCH_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub device: &'a Device,
    pub queue: &'a Queue,
    pub surface_format: TextureFormat,
}
