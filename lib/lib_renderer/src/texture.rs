use std::borrow::Cow;

use crate::RendererError;

/// Identity of a registered texture.
///
/// Assigned in registration order starting at 0 and never reused. Equality of ids is the
/// only thing batching looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u32);

impl TextureId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Bytes per pixel of uploaded texture data.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelDepth {
    /// Single-channel coverage, used by glyph atlases.
    Alpha = 1,
    Rgba = 4,
}

impl ChannelDepth {
    pub fn bytes_per_pixel(self) -> usize {
        self as usize
    }
}

impl TryFrom<u32> for ChannelDepth {
    type Error = RendererError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Alpha),
            4 => Ok(Self::Rgba),
            other => Err(RendererError::ChannelDepth(other)),
        }
    }
}

/// Handle to a texture owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Texture {
    id: TextureId,
    width: u32,
    height: u32,
    depth: ChannelDepth,
}

impl Texture {
    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn depth(&self) -> ChannelDepth {
        self.depth
    }
}

/// Hands out texture ids.
#[derive(Debug, Clone, Default)]
pub struct TextureRegistry {
    next: u32,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next id. Callers validate pixel data first so a rejected upload does
    /// not consume an id.
    pub fn register(&mut self, width: u32, height: u32, depth: ChannelDepth) -> Texture {
        let id = TextureId(self.next);
        self.next += 1;

        Texture {
            id,
            width,
            height,
            depth,
        }
    }

    /// Number of textures registered so far.
    pub fn len(&self) -> usize {
        self.next as usize
    }

    pub fn is_empty(&self) -> bool {
        self.next == 0
    }
}

/// Checks `pixels` against the declared size and returns them as RGBA8.
///
/// Single-channel data becomes white with the coverage value as alpha.
pub fn prepare_pixels(
    pixels: &[u8],
    width: u32,
    height: u32,
    depth: ChannelDepth,
) -> Result<Cow<'_, [u8]>, RendererError> {
    if width == 0 || height == 0 {
        return Err(RendererError::EmptyTexture);
    }

    let expected = width as usize * height as usize * depth.bytes_per_pixel();
    if pixels.len() != expected {
        return Err(RendererError::TextureSize {
            width,
            height,
            depth: depth as u32,
            expected,
            actual: pixels.len(),
        });
    }

    Ok(match depth {
        ChannelDepth::Rgba => Cow::Borrowed(pixels),
        ChannelDepth::Alpha => Cow::Owned(expand_alpha(pixels)),
    })
}

pub fn expand_alpha(coverage: &[u8]) -> Vec<u8> {
    coverage
        .iter()
        .flat_map(|&alpha| [255, 255, 255, alpha])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_count_up_from_zero() {
        let mut registry = TextureRegistry::new();

        let a = registry.register(1, 1, ChannelDepth::Rgba);
        let b = registry.register(4, 4, ChannelDepth::Alpha);
        let c = registry.register(2, 8, ChannelDepth::Rgba);

        assert_eq!([a.id().index(), b.id().index(), c.id().index()], [0, 1, 2]);
        assert!(a.id() < b.id() && b.id() < c.id());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn same_size_textures_are_still_distinct() {
        let mut registry = TextureRegistry::new();
        let a = registry.register(2, 2, ChannelDepth::Rgba);
        let b = registry.register(2, 2, ChannelDepth::Rgba);

        assert_ne!(a, b);
    }

    #[test]
    fn only_depth_1_and_4_are_accepted() {
        assert_eq!(ChannelDepth::try_from(1).ok(), Some(ChannelDepth::Alpha));
        assert_eq!(ChannelDepth::try_from(4).ok(), Some(ChannelDepth::Rgba));
        assert!(matches!(
            ChannelDepth::try_from(3),
            Err(RendererError::ChannelDepth(3))
        ));
    }

    #[test]
    fn alpha_pixels_expand_to_white() {
        let rgba = prepare_pixels(&[0, 128], 2, 1, ChannelDepth::Alpha).unwrap();
        assert_eq!(&*rgba, &[255, 255, 255, 0, 255, 255, 255, 128]);
    }

    #[test]
    fn rgba_pixels_are_borrowed() {
        let pixels = [1, 2, 3, 4];
        let rgba = prepare_pixels(&pixels, 1, 1, ChannelDepth::Rgba).unwrap();
        assert!(matches!(rgba, Cow::Borrowed(_)));
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(matches!(
            prepare_pixels(&[0; 3], 1, 1, ChannelDepth::Rgba),
            Err(RendererError::TextureSize {
                expected: 4,
                actual: 3,
                ..
            })
        ));
        assert!(matches!(
            prepare_pixels(&[], 0, 1, ChannelDepth::Rgba),
            Err(RendererError::EmptyTexture)
        ));
    }
}
