use bytemuck::{Pod, Zeroable};
use glam::{Vec2, vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle: top-left position plus size.
///
/// In output space the origin is the top-left corner of the surface and y grows
/// downwards. In texture space the same layout is used with either pixel or
/// normalized units.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Covers the whole of a normalized texture.
    pub const UNIT: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn pos(&self) -> Vec2 {
        vec2(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.w, self.h)
    }

    pub fn min(&self) -> Vec2 {
        self.pos()
    }

    pub fn max(&self) -> Vec2 {
        vec2(self.x + self.w, self.y + self.h)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.x && point.y >= self.y && point.x < max.x && point.y < max.y
    }

    /// Converts a pixel-space rect into the 0..1 space of a `width` x `height` image.
    pub fn normalized(&self, width: f32, height: f32) -> Self {
        Self::new(
            self.x / width,
            self.y / height,
            self.w / width,
            self.h / height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);

        assert!(rect.contains(vec2(10.0, 20.0)));
        assert!(rect.contains(vec2(39.9, 59.9)));
        assert!(!rect.contains(vec2(40.0, 30.0)));
        assert!(!rect.contains(vec2(15.0, 60.0)));
    }

    #[test]
    fn normalized_divides_every_component() {
        let rect = Rect::new(16.0, 8.0, 32.0, 16.0).normalized(64.0, 32.0);

        assert_eq!(rect, Rect::new(0.25, 0.25, 0.5, 0.5));
    }

    #[test]
    fn max_is_pos_plus_size() {
        let rect = Rect::from_pos_size(vec2(1.0, 2.0), vec2(3.0, 4.0));

        assert_eq!(rect.max(), vec2(4.0, 6.0));
        assert_eq!(rect.size(), vec2(3.0, 4.0));
    }
}
