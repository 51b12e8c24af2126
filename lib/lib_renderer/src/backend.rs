use lib_math::Color;

use crate::{Quad, Texture, TextureId};

/// GPU side of the renderer.
///
/// [`Renderer`](crate::Renderer) owns all batching decisions and only calls into the
/// backend to upload textures and to execute flushed batches in order.
pub trait RenderBackend {
    /// What a frame draws into.
    type Target;

    /// Uploads RGBA8 pixels for a freshly registered texture.
    fn create_texture(&mut self, texture: &Texture, rgba: &[u8]);

    fn begin_frame(&mut self, target: &Self::Target);

    fn clear(&mut self, target: &Self::Target, color: Color);

    /// Draws `quads` sampling `texture`. `capacity` is the batch's current logical capacity;
    /// GPU storage sized for a different capacity must be recreated before the upload.
    fn draw_batch(
        &mut self,
        target: &Self::Target,
        texture: TextureId,
        quads: &[Quad],
        capacity: usize,
    );
}
