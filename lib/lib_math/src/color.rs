use bytemuck::{Pod, Zeroable};
use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Linear RGBA color with components in 0..1.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::rgba(r, g, b, a)
    }
}

impl From<Color> for [f32; 4] {
    fn from(value: Color) -> Self {
        value.to_array()
    }
}

impl From<Vec4> for Color {
    fn from(value: Vec4) -> Self {
        Self::rgba(value.x, value.y, value.z, value.w)
    }
}

impl From<Color> for Vec4 {
    fn from(value: Color) -> Self {
        Vec4::new(value.r, value.g, value.b, value.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba8_scales_to_unit_range() {
        let color = Color::from_rgba8(255, 0, 51, 255);

        assert_eq!(color, Color::rgba(1.0, 0.0, 0.2, 1.0));
    }

    #[test]
    fn layout_matches_four_floats() {
        assert_eq!(size_of::<Color>(), 16);
        assert_eq!(
            bytemuck::bytes_of(&Color::YELLOW),
            bytemuck::bytes_of(&[1.0f32, 1.0, 0.0, 1.0])
        );
    }

    #[test]
    fn with_alpha_keeps_rgb() {
        assert_eq!(Color::RED.with_alpha(0.5), Color::rgba(1.0, 0.0, 0.0, 0.5));
    }
}
