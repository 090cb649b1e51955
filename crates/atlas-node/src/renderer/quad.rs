use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// One tile's geometry inside a texture atlas.
/// Wire format: 8 floats = 32 bytes stride.
///
/// Position and size are in node-local units; UVs are normalized to the
/// atlas texture (0.0..=1.0).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct AtlasQuad {
    /// Bottom-left X in node space.
    pub x: f32,
    /// Bottom-left Y in node space.
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Left texture coordinate.
    pub u0: f32,
    /// Top texture coordinate.
    pub v0: f32,
    /// Right texture coordinate.
    pub u1: f32,
    /// Bottom texture coordinate.
    pub v1: f32,
}

impl AtlasQuad {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    /// Quad at `pos` with the given size, sampling the UV rectangle `uv_min..uv_max`.
    pub fn new(pos: Vec2, size: Vec2, uv_min: Vec2, uv_max: Vec2) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            width: size.x,
            height: size.y,
            u0: uv_min.x,
            v0: uv_min.y,
            u1: uv_max.x,
            v1: uv_max.y,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}
