use bytemuck::{Pod, Zeroable};
use lib_math::{Color, Rect, Vec4};

/// One draw record, laid out to match the `Quad` struct of the shader's storage buffer.
///
/// Per-corner arrays are ordered top-left, top-right, bottom-left, bottom-right.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Quad {
    /// Destination in surface pixels.
    pub dst_rect: Rect,
    /// Source region in normalized texture coordinates.
    pub src_rect: Rect,
    pub border_color: Color,
    pub corner_radii: Vec4,
    pub colors: [Color; 4],
    pub edge_softness: f32,
    pub border_thickness: f32,
    /// `0.0` fills with the corner colors, `1.0` also multiplies by the bound texture.
    pub use_texture: f32,
    pub _pad: f32,
}

impl Quad {
    /// A flat-colored rectangle that never samples its texture.
    pub fn solid(dst: Rect, color: Color) -> Self {
        Self {
            dst_rect: dst,
            src_rect: Rect::UNIT,
            border_color: color,
            corner_radii: Vec4::ZERO,
            colors: [color; 4],
            edge_softness: 0.0,
            border_thickness: 0.0,
            use_texture: 0.0,
            _pad: 0.0,
        }
    }

    /// Samples `src` (normalized) from the bound texture, untinted.
    pub fn textured(src: Rect, dst: Rect) -> Self {
        Self {
            src_rect: src,
            use_texture: 1.0,
            ..Self::solid(dst, Color::WHITE)
        }
    }

    pub fn glyph(src: Rect, dst: Rect, color: Color) -> Self {
        Self {
            src_rect: src,
            edge_softness: 1.0,
            border_thickness: 1.0,
            use_texture: 1.0,
            ..Self::solid(dst, color)
        }
    }

    pub fn with_corner_colors(mut self, colors: [Color; 4]) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_corner_radii(mut self, radii: Vec4) -> Self {
        self.corner_radii = radii;
        self
    }

    pub fn with_border(mut self, thickness: f32, color: Color) -> Self {
        self.border_thickness = thickness;
        self.border_color = color;
        self
    }

    pub fn with_edge_softness(mut self, softness: f32) -> Self {
        self.edge_softness = softness;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::mem::offset_of;

    use super::*;

    #[test]
    fn layout_matches_shader() {
        assert_eq!(size_of::<Quad>(), 144);
        assert_eq!(offset_of!(Quad, src_rect), 16);
        assert_eq!(offset_of!(Quad, border_color), 32);
        assert_eq!(offset_of!(Quad, corner_radii), 48);
        assert_eq!(offset_of!(Quad, colors), 64);
        assert_eq!(offset_of!(Quad, edge_softness), 128);
        assert_eq!(offset_of!(Quad, use_texture), 136);
    }

    #[test]
    fn solid_does_not_sample() {
        let quad = Quad::solid(Rect::new(1.0, 2.0, 3.0, 4.0), Color::RED);
        assert_eq!(quad.use_texture, 0.0);
        assert_eq!(quad.colors, [Color::RED; 4]);
        assert_eq!(quad.src_rect, Rect::UNIT);
    }

    #[test]
    fn builders_only_touch_their_fields() {
        let base = Quad::textured(Rect::UNIT, Rect::new(0.0, 0.0, 8.0, 8.0));
        let quad = base
            .with_corner_radii(Vec4::splat(2.0))
            .with_border(1.5, Color::BLACK);

        assert_eq!(quad.corner_radii, Vec4::splat(2.0));
        assert_eq!(quad.border_thickness, 1.5);
        assert_eq!(quad.border_color, Color::BLACK);
        assert_eq!(quad.colors, base.colors);
        assert_eq!(quad.use_texture, 1.0);
    }
}
