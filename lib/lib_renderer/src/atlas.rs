//! Rasterizes the printable ASCII range of a font into a single-channel atlas.

use swash::{
    FontRef,
    scale::{Render, ScaleContext, Source},
    zeno::Format,
};

use crate::{END_CHAR, FIRST_CHAR, FontError, PackedGlyph};

pub const ATLAS_WIDTH: u32 = 512;
pub const ATLAS_HEIGHT: u32 = 512;

/// Empty pixels kept right of and below every glyph so sampling never bleeds into a
/// neighbour.
const GLYPH_PADDING: u32 = 1;

/// Coverage bitmap plus glyph placement, ready to upload as an alpha texture.
#[derive(Debug, Clone)]
pub struct AtlasBitmap {
    pub width: u32,
    pub height: u32,
    /// One byte of coverage per pixel, row-major.
    pub pixels: Vec<u8>,
    /// Indexed by `codepoint - FIRST_CHAR`.
    pub glyphs: Vec<PackedGlyph>,
}

pub fn pack_font(
    bytes: &[u8],
    size: f32,
    width: u32,
    height: u32,
) -> Result<AtlasBitmap, FontError> {
    let font = FontRef::from_index(bytes, 0).ok_or(FontError::InvalidFont)?;

    let mut context = ScaleContext::new();
    let mut scaler = context.builder(font).size(size).hint(true).build();

    let units_per_em = font.metrics(&[]).units_per_em as f32;
    let glyph_metrics = font.glyph_metrics(&[]);
    let charmap = font.charmap();

    let mut packer = RectPacker::new(width, height);
    let mut pixels = vec![0; width as usize * height as usize];
    let mut glyphs = Vec::with_capacity((END_CHAR - FIRST_CHAR) as usize);

    for code in FIRST_CHAR..END_CHAR {
        let Some(ch) = char::from_u32(code) else {
            glyphs.push(PackedGlyph::default());
            continue;
        };

        let glyph_id = charmap.map(ch);
        let advance = glyph_metrics.advance_width(glyph_id) * size / units_per_em;

        let image = Render::new(&[Source::Outline])
            .format(Format::Alpha)
            .render(&mut scaler, glyph_id);

        let Some(image) =
            image.filter(|image| image.placement.width > 0 && image.placement.height > 0)
        else {
            glyphs.push(PackedGlyph {
                advance,
                ..PackedGlyph::default()
            });
            continue;
        };

        let glyph_w = image.placement.width;
        let glyph_h = image.placement.height;

        let (x, y) = packer
            .pack(glyph_w + GLYPH_PADDING, glyph_h + GLYPH_PADDING)
            .ok_or(FontError::AtlasFull { ch })?;

        for row in 0..glyph_h as usize {
            let src = &image.data[row * glyph_w as usize..][..glyph_w as usize];
            let dst = (y as usize + row) * width as usize + x as usize;
            pixels[dst..dst + glyph_w as usize].copy_from_slice(src);
        }

        glyphs.push(PackedGlyph {
            x0: x,
            y0: y,
            x1: x + glyph_w,
            y1: y + glyph_h,
            xoff: image.placement.left as f32,
            yoff: -image.placement.top as f32,
            advance,
        });
    }

    log::debug!(
        "packed {} glyphs at {size}px into a {width}x{height} atlas",
        glyphs.len()
    );

    Ok(AtlasBitmap {
        width,
        height,
        pixels,
        glyphs,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FreeRect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

/// Guillotine packer with best-short-side-fit placement.
#[derive(Debug, Clone)]
pub(crate) struct RectPacker {
    free: Vec<FreeRect>,
}

impl RectPacker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            free: vec![FreeRect {
                x: 0,
                y: 0,
                w: width,
                h: height,
            }],
        }
    }

    /// Reserves a `w`x`h` area and returns its top-left corner.
    pub fn pack(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        let (index, _) = self
            .free
            .iter()
            .enumerate()
            .filter(|(_, rect)| rect.w >= w && rect.h >= h)
            .min_by_key(|(_, rect)| {
                let (left_w, left_h) = (rect.w - w, rect.h - h);
                (left_w.min(left_h), left_w.max(left_h))
            })?;

        let rect = self.free.swap_remove(index);
        let (left_w, left_h) = (rect.w - w, rect.h - h);

        // Split along the shorter leftover side.
        let (right, below) = if left_w < left_h {
            (
                FreeRect {
                    x: rect.x + w,
                    y: rect.y,
                    w: left_w,
                    h,
                },
                FreeRect {
                    x: rect.x,
                    y: rect.y + h,
                    w: rect.w,
                    h: left_h,
                },
            )
        } else {
            (
                FreeRect {
                    x: rect.x + w,
                    y: rect.y,
                    w: left_w,
                    h: rect.h,
                },
                FreeRect {
                    x: rect.x,
                    y: rect.y + h,
                    w,
                    h: left_h,
                },
            )
        };

        self.free
            .extend([right, below].into_iter().filter(|rect| rect.w > 0 && rect.h > 0));

        Some((rect.x, rect.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlaps(a: (u32, u32, u32, u32), b: (u32, u32, u32, u32)) -> bool {
        a.0 < b.0 + b.2 && b.0 < a.0 + a.2 && a.1 < b.1 + b.3 && b.1 < a.1 + a.3
    }

    #[test]
    fn first_rect_goes_top_left() {
        let mut packer = RectPacker::new(64, 64);
        assert_eq!(packer.pack(10, 10), Some((0, 0)));
    }

    #[test]
    fn packed_rects_never_overlap() {
        let mut packer = RectPacker::new(64, 64);
        let mut placed = Vec::new();

        for (w, h) in [(10, 12), (7, 30), (20, 5), (13, 13), (3, 40), (25, 9), (9, 9)] {
            let (x, y) = packer.pack(w, h).unwrap();
            assert!(x + w <= 64 && y + h <= 64);

            let rect = (x, y, w, h);
            assert!(placed.iter().all(|other| !overlaps(rect, *other)));
            placed.push(rect);
        }
    }

    #[test]
    fn full_packer_reports_none() {
        let mut packer = RectPacker::new(16, 16);
        assert_eq!(packer.pack(16, 16), Some((0, 0)));
        assert_eq!(packer.pack(1, 1), None);
        assert_eq!(RectPacker::new(8, 8).pack(9, 1), None);
    }

    #[test]
    fn garbage_is_not_a_font() {
        assert_eq!(
            pack_font(b"definitely not a font", 24.0, 64, 64).err(),
            Some(FontError::InvalidFont)
        );
    }
}
