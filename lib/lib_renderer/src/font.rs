use std::{fs, path::Path};

use lib_math::{Rect, Vec2, vec2};

use crate::{
    ATLAS_HEIGHT, ATLAS_WIDTH, ChannelDepth, RenderBackend, Renderer, RendererError, Texture,
    pack_font,
};

/// First codepoint stored in a font atlas.
pub const FIRST_CHAR: u32 = 32;
/// One past the last codepoint stored in a font atlas.
pub const END_CHAR: u32 = 128;

pub const DEFAULT_FONT_SIZE: f32 = 24.0;

/// Placement of one rasterized glyph inside the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PackedGlyph {
    /// Bitmap box in atlas pixels.
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
    /// Offset from the pen position (on the baseline) to the bitmap's top-left corner.
    pub xoff: f32,
    pub yoff: f32,
    pub advance: f32,
}

impl PackedGlyph {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    /// Destination in surface pixels.
    pub dst: Rect,
    /// Source in normalized atlas coordinates.
    pub src: Rect,
}

/// A rasterized ASCII font: an atlas texture plus per-glyph placement.
#[derive(Debug, Clone)]
pub struct Font {
    texture: Texture,
    glyphs: Vec<PackedGlyph>,
    size: f32,
}

impl Font {
    /// `glyphs[i]` describes codepoint `FIRST_CHAR + i`.
    pub fn new(texture: Texture, glyphs: Vec<PackedGlyph>, size: f32) -> Self {
        Self {
            texture,
            glyphs,
            size,
        }
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Pixel size the atlas was rasterized at.
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn glyph(&self, ch: char) -> Option<&PackedGlyph> {
        let index = (ch as u32).checked_sub(FIRST_CHAR)?;
        if ch as u32 >= END_CHAR {
            return None;
        }

        self.glyphs.get(index as usize)
    }

    /// Quad for `ch` at the baseline position `pen`, which is advanced past the glyph.
    ///
    /// Characters outside the atlas yield `None` and leave the pen untouched.
    pub fn glyph_quad(&self, ch: char, pen: &mut Vec2) -> Option<GlyphQuad> {
        let glyph = self.glyph(ch)?;

        let x = (pen.x + glyph.xoff + 0.5).floor();
        let y = (pen.y + glyph.yoff + 0.5).floor();
        let w = glyph.width() as f32;
        let h = glyph.height() as f32;

        pen.x += glyph.advance;

        Some(GlyphQuad {
            dst: Rect::new(x, y, w, h),
            src: Rect::new(glyph.x0 as f32, glyph.y0 as f32, w, h)
                .normalized(self.texture.width() as f32, self.texture.height() as f32),
        })
    }

    /// Lays out a single line whose top edge is at `y`.
    pub fn layout<'a>(
        &'a self,
        text: &'a str,
        x: f32,
        y: f32,
    ) -> impl Iterator<Item = GlyphQuad> + 'a {
        let mut pen = vec2(x, y + self.size);

        text.chars().filter_map(move |ch| self.glyph_quad(ch, &mut pen))
    }

    /// Advance width and line height of `text`.
    pub fn measure(&self, text: &str) -> Vec2 {
        let width = text
            .chars()
            .filter_map(|ch| self.glyph(ch))
            .map(|glyph| glyph.advance)
            .sum();

        vec2(width, self.size)
    }
}

impl<B: RenderBackend> Renderer<B> {
    /// Rasterizes a TrueType/OpenType file into a new glyph atlas.
    pub fn load_font(&mut self, path: impl AsRef<Path>, size: f32) -> Result<Font, RendererError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| RendererError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.load_font_bytes(&bytes, size)
    }

    pub fn load_font_bytes(&mut self, bytes: &[u8], size: f32) -> Result<Font, RendererError> {
        let atlas = pack_font(bytes, size, ATLAS_WIDTH, ATLAS_HEIGHT)?;
        let texture =
            self.register_texture(&atlas.pixels, atlas.width, atlas.height, ChannelDepth::Alpha)?;

        Ok(Font::new(texture, atlas.glyphs, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextureRegistry;

    fn font() -> Font {
        let texture = TextureRegistry::new().register(64, 32, ChannelDepth::Alpha);

        let mut glyphs = vec![PackedGlyph::default(); (END_CHAR - FIRST_CHAR) as usize];
        glyphs[0].advance = 5.0;
        glyphs[('A' as u32 - FIRST_CHAR) as usize] = PackedGlyph {
            x0: 8,
            y0: 4,
            x1: 16,
            y1: 14,
            xoff: 0.6,
            yoff: -9.7,
            advance: 9.5,
        };

        Font::new(texture, glyphs, 12.0)
    }

    #[test]
    fn glyph_quad_rounds_and_advances() {
        let font = font();
        let mut pen = vec2(10.0, 20.0);

        let quad = font.glyph_quad('A', &mut pen).unwrap();

        assert_eq!(quad.dst, Rect::new(11.0, 10.0, 8.0, 10.0));
        assert_eq!(quad.src, Rect::new(0.125, 0.125, 0.125, 0.3125));
        assert_eq!(pen, vec2(19.5, 20.0));
    }

    #[test]
    fn characters_outside_the_atlas_are_skipped() {
        let font = font();
        let mut pen = Vec2::ZERO;

        assert_eq!(font.glyph_quad('\n', &mut pen), None);
        assert_eq!(font.glyph_quad('é', &mut pen), None);
        assert_eq!(font.glyph_quad('\u{7f}', &mut pen).map(|_| ()), Some(()));
        assert_eq!(pen, Vec2::ZERO);
    }

    #[test]
    fn layout_starts_one_size_below_the_top() {
        let font = font();
        let quads: Vec<_> = font.layout("A A", 0.0, 0.0).collect();

        assert_eq!(quads.len(), 3);
        assert_eq!(quads[0].dst.y, (12.0f32 - 9.7 + 0.5).floor());
        assert_eq!(quads[2].dst.x, (9.5f32 + 5.0 + 0.6 + 0.5).floor());
    }

    #[test]
    fn measure_sums_advances() {
        let font = font();
        assert_eq!(font.measure("A A\n"), vec2(24.0, 12.0));
    }
}
