use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("unsupported channel depth {0}, expected 1 or 4")]
    ChannelDepth(u32),

    #[error("texture data is {actual} bytes, expected {expected} for {width}x{height}x{depth}")]
    TextureSize {
        width: u32,
        height: u32,
        depth: u32,
        expected: usize,
        actual: usize,
    },

    #[error("texture has zero width or height")]
    EmptyTexture,

    #[error("failed to decode image")]
    Image(#[from] image::ImageError),

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Font(#[from] FontError),

    #[error("renderer has been shut down")]
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FontError {
    #[error("font data could not be parsed")]
    InvalidFont,

    #[error("glyph {ch:?} does not fit in the atlas")]
    AtlasFull { ch: char },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("begin_frame called while a frame is already open")]
    AlreadyInFrame,

    #[error("end_frame called without a matching begin_frame")]
    NotInFrame,

    #[error("renderer has been shut down")]
    Terminated,
}
