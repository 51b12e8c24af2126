use std::{fs, path::Path};

use lib_math::{Color, Rect};

use crate::{
    Batcher, ChannelDepth, FlushSink, Font, FrameError, Quad, QuadBatch, RenderBackend,
    RendererConfig, RendererError, Texture, TextureId, TextureRegistry, WgpuBackend,
    prepare_pixels,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameState {
    /// Between frames. Textures can be registered, draws are dropped.
    Ready,
    InFrame,
    /// After [`Renderer::shutdown`]. Nothing is accepted anymore.
    Terminated,
}

/// Counters for one frame, returned by [`Renderer::end_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FrameStats {
    pub draw_calls: usize,
    pub quads_drawn: usize,
    /// Quads flushed while the frame had no target.
    pub quads_dropped: usize,
    pub clears: usize,
}

/// Immediate-mode quad renderer.
///
/// Draw calls queue quads tagged with the texture they sample. Queued quads are flushed to
/// the backend when the texture changes (or on every call with [`FlushPolicy::Always`]),
/// before a clear, and at [`end_frame`](Self::end_frame).
///
/// [`FlushPolicy::Always`]: crate::FlushPolicy::Always
pub struct Renderer<B: RenderBackend = WgpuBackend> {
    backend: B,
    textures: TextureRegistry,
    batcher: Batcher,
    white: Texture,
    state: FrameState,
    target: Option<B::Target>,
    stats: FrameStats,
}

impl<B: RenderBackend> Renderer<B> {
    pub fn with_backend(mut backend: B, config: &RendererConfig) -> Self {
        let mut textures = TextureRegistry::new();

        let white = textures.register(1, 1, ChannelDepth::Rgba);
        backend.create_texture(&white, &[255; 4]);

        Self {
            backend,
            textures,
            batcher: Batcher::new(config.batch_capacity, config.flush_policy, white.id()),
            white,
            state: FrameState::Ready,
            target: None,
            stats: FrameStats::default(),
        }
    }

    /// Uploads raw pixels. `depth` is the number of bytes per pixel in `pixels`.
    pub fn register_texture(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        depth: ChannelDepth,
    ) -> Result<Texture, RendererError> {
        if self.state == FrameState::Terminated {
            return Err(RendererError::Terminated);
        }

        let rgba = prepare_pixels(pixels, width, height, depth)?;
        let texture = self.textures.register(width, height, depth);
        self.backend.create_texture(&texture, &rgba);

        log::debug!(
            "registered texture {} ({width}x{height}, {depth:?})",
            texture.id().index()
        );

        Ok(texture)
    }

    /// Decodes an image file (any format `image` understands) into an RGBA texture.
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> Result<Texture, RendererError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| RendererError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.load_texture_bytes(&bytes)
    }

    pub fn load_texture_bytes(&mut self, bytes: &[u8]) -> Result<Texture, RendererError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();

        self.register_texture(image.as_raw(), image.width(), image.height(), ChannelDepth::Rgba)
    }

    /// Starts a frame. `None` means no surface could be acquired: the frame still runs but
    /// everything drawn in it is dropped.
    pub fn begin_frame(&mut self, target: Option<B::Target>) -> Result<(), FrameError> {
        match self.state {
            FrameState::Terminated => return Err(FrameError::Terminated),
            FrameState::InFrame => return Err(FrameError::AlreadyInFrame),
            FrameState::Ready => {}
        }

        match &target {
            Some(target) => self.backend.begin_frame(target),
            None => log::debug!("no surface this frame, draws will be dropped"),
        }

        self.target = target;
        self.stats = FrameStats::default();
        self.state = FrameState::InFrame;

        Ok(())
    }

    /// Flushes what is left and closes the frame.
    pub fn end_frame(&mut self) -> Result<FrameStats, FrameError> {
        match self.state {
            FrameState::Terminated => return Err(FrameError::Terminated),
            FrameState::Ready => return Err(FrameError::NotInFrame),
            FrameState::InFrame => {}
        }

        self.batcher.flush(&mut FrameSink {
            backend: &mut self.backend,
            target: self.target.as_ref(),
            stats: &mut self.stats,
        });

        self.target = None;
        self.state = FrameState::Ready;

        Ok(std::mem::take(&mut self.stats))
    }

    /// Drops queued quads and refuses all further work.
    pub fn shutdown(&mut self) {
        let dropped = self.batcher.discard();
        if dropped > 0 {
            log::debug!("dropped {dropped} queued quads on shutdown");
        }

        self.target = None;
        self.state = FrameState::Terminated;
    }

    /// Fills the whole target. Quads queued before the clear are drawn first.
    pub fn clear(&mut self, color: Color) {
        if !self.check_in_frame("clear") {
            return;
        }

        self.batcher.flush(&mut FrameSink {
            backend: &mut self.backend,
            target: self.target.as_ref(),
            stats: &mut self.stats,
        });

        if let Some(target) = &self.target {
            self.backend.clear(target, color);
            self.stats.clears += 1;
        }
    }

    pub fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.submit(self.white.id(), [Quad::solid(rect, color)]);
    }

    /// Draws an arbitrary quad against `texture`.
    pub fn draw_quad(&mut self, texture: &Texture, quad: Quad) {
        self.submit(texture.id(), [quad]);
    }

    /// Draws the `src` region of `texture`, given in texture pixels, into `dst`.
    pub fn draw_texture(&mut self, texture: &Texture, src: Rect, dst: Rect) {
        let src = src.normalized(texture.width() as f32, texture.height() as f32);
        self.submit(texture.id(), [Quad::textured(src, dst)]);
    }

    /// Draws `text` with its top-left corner at (`x`, `y`).
    pub fn draw_text(&mut self, font: &Font, text: &str, x: f32, y: f32) {
        self.draw_text_colored(font, text, x, y, Color::WHITE);
    }

    pub fn draw_text_colored(&mut self, font: &Font, text: &str, x: f32, y: f32, color: Color) {
        self.submit(
            font.texture().id(),
            font.layout(text, x, y)
                .map(|glyph| Quad::glyph(glyph.src, glyph.dst, color)),
        );
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Quads queued and not yet flushed.
    pub fn batch(&self) -> &QuadBatch {
        self.batcher.batch()
    }

    /// The 1x1 white texture solid fills are drawn with.
    pub fn white_texture(&self) -> Texture {
        self.white
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn submit(&mut self, texture: TextureId, quads: impl IntoIterator<Item = Quad>) {
        if !self.check_in_frame("draw") {
            return;
        }

        self.batcher.submit(
            texture,
            quads,
            &mut FrameSink {
                backend: &mut self.backend,
                target: self.target.as_ref(),
                stats: &mut self.stats,
            },
        );
    }

    fn check_in_frame(&self, what: &str) -> bool {
        match self.state {
            FrameState::InFrame => true,
            FrameState::Ready => {
                log::warn!("{what} outside of begin_frame/end_frame, ignored");
                false
            }
            FrameState::Terminated => {
                log::warn!("{what} after shutdown, ignored");
                false
            }
        }
    }
}

struct FrameSink<'a, B: RenderBackend> {
    backend: &'a mut B,
    target: Option<&'a B::Target>,
    stats: &'a mut FrameStats,
}

impl<B: RenderBackend> FlushSink for FrameSink<'_, B> {
    fn flush(&mut self, texture: TextureId, batch: &QuadBatch) {
        match self.target {
            Some(target) => {
                self.backend
                    .draw_batch(target, texture, batch.as_slice(), batch.capacity());
                self.stats.draw_calls += 1;
                self.stats.quads_drawn += batch.len();
            }
            None => self.stats.quads_dropped += batch.len(),
        }
    }
}
