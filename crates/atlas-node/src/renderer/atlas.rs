//! Fixed-capacity quad storage bound to a single texture.
//!
//! Quads are stored in a capacity-sized array; `total_quads` tracks the
//! highest slot written so far. Drawing emits a contiguous slice of slots.

use crate::api::error::AtlasNodeError;
use crate::assets::texture_cache::TextureCache;
use crate::renderer::commands::DrawContext;
use crate::renderer::quad::AtlasQuad;
use crate::renderer::texture::TextureHandle;

#[derive(Debug, Clone)]
pub struct TextureAtlas {
    texture: TextureHandle,
    quads: Vec<AtlasQuad>,
    total_quads: usize,
}

impl TextureAtlas {
    /// Create an atlas for `texture` with room for `capacity` quads.
    pub fn new(texture: TextureHandle, capacity: usize) -> Self {
        Self {
            texture,
            quads: vec![AtlasQuad::default(); capacity],
            total_quads: 0,
        }
    }

    /// Load `path` through the texture cache and build an atlas around it.
    pub fn init_with_file(
        cache: &mut TextureCache,
        path: &str,
        capacity: usize,
    ) -> Result<Self, AtlasNodeError> {
        let texture = cache
            .load_image(path)
            .ok_or_else(|| AtlasNodeError::TextureNotFound {
                path: path.to_string(),
            })?;
        Ok(Self::new(texture, capacity))
    }

    pub fn texture(&self) -> &TextureHandle {
        &self.texture
    }

    pub fn set_texture(&mut self, texture: TextureHandle) {
        self.texture = texture;
    }

    /// Number of quad slots.
    pub fn capacity(&self) -> usize {
        self.quads.len()
    }

    /// Number of slots in use (one past the highest slot written).
    pub fn total_quads(&self) -> usize {
        self.total_quads
    }

    /// The slots in use.
    pub fn quads(&self) -> &[AtlasQuad] {
        &self.quads[..self.total_quads]
    }

    /// Write `quad` into slot `index`.
    pub fn update_quad(&mut self, quad: AtlasQuad, index: usize) -> Result<(), AtlasNodeError> {
        let capacity = self.capacity();
        let slot = self
            .quads
            .get_mut(index)
            .ok_or(AtlasNodeError::QuadIndexOutOfBounds { index, capacity })?;
        *slot = quad;
        self.total_quads = self.total_quads.max(index + 1);
        Ok(())
    }

    pub fn remove_all_quads(&mut self) {
        self.quads.fill(AtlasQuad::default());
        self.total_quads = 0;
    }

    /// Grow or shrink the slot array. Quads past the new capacity are dropped.
    pub fn resize_capacity(&mut self, capacity: usize) {
        self.quads.resize(capacity, AtlasQuad::default());
        self.total_quads = self.total_quads.min(capacity);
    }

    /// Draw `count` quads starting at slot `start`.
    pub fn draw_quads(
        &self,
        count: usize,
        start: usize,
        ctx: &mut dyn DrawContext,
    ) -> Result<(), AtlasNodeError> {
        if count == 0 {
            return Ok(());
        }
        let capacity = self.capacity();
        let end = start
            .checked_add(count)
            .filter(|&end| end <= capacity)
            .ok_or(AtlasNodeError::QuadRangeOutOfBounds {
                start,
                count,
                capacity,
            })?;
        ctx.draw_quads(&self.texture, &self.quads[start..end]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::commands::{CommandRecorder, DrawCommand};
    use crate::renderer::texture::Texture;
    use glam::Vec2;
    use std::rc::Rc;

    fn atlas(capacity: usize) -> TextureAtlas {
        TextureAtlas::new(Rc::new(Texture::new("tiles.png", 64, 64, true)), capacity)
    }

    fn quad(x: f32) -> AtlasQuad {
        AtlasQuad::new(Vec2::new(x, 0.0), Vec2::splat(16.0), Vec2::ZERO, Vec2::splat(0.25))
    }

    #[test]
    fn init_with_file_uses_cache() {
        let mut cache = TextureCache::new();
        cache.add_texture("tiles.png", Texture::new("tiles.png", 64, 64, false));

        let atlas = TextureAtlas::init_with_file(&mut cache, "tiles.png", 10).unwrap();
        assert_eq!(atlas.capacity(), 10);
        assert_eq!(atlas.total_quads(), 0);
        assert_eq!(atlas.texture().name(), "tiles.png");
    }

    #[test]
    fn init_with_missing_file_fails() {
        let mut cache = TextureCache::new();
        let err = TextureAtlas::init_with_file(&mut cache, "nope.png", 10).unwrap_err();
        assert_eq!(err, AtlasNodeError::TextureNotFound { path: "nope.png".into() });
    }

    #[test]
    fn update_quad_tracks_total() {
        let mut atlas = atlas(4);
        atlas.update_quad(quad(1.0), 2).unwrap();
        assert_eq!(atlas.total_quads(), 3);
        atlas.update_quad(quad(2.0), 0).unwrap();
        assert_eq!(atlas.total_quads(), 3);
        assert_eq!(atlas.quads()[2].x, 1.0);

        let err = atlas.update_quad(quad(3.0), 4).unwrap_err();
        assert_eq!(err, AtlasNodeError::QuadIndexOutOfBounds { index: 4, capacity: 4 });

        atlas.remove_all_quads();
        assert_eq!(atlas.total_quads(), 0);
    }

    #[test]
    fn resize_truncates_total() {
        let mut atlas = atlas(4);
        atlas.update_quad(quad(1.0), 3).unwrap();
        atlas.resize_capacity(2);
        assert_eq!(atlas.capacity(), 2);
        assert_eq!(atlas.total_quads(), 2);
        atlas.resize_capacity(8);
        assert_eq!(atlas.capacity(), 8);
    }

    #[test]
    fn draw_quads_emits_slice() {
        let mut atlas = atlas(4);
        atlas.update_quad(quad(5.0), 1).unwrap();
        let mut rec = CommandRecorder::new();

        atlas.draw_quads(3, 1, &mut rec).unwrap();
        assert_eq!(
            rec.commands(),
            &[DrawCommand::DrawQuads { texture: "tiles.png".into(), offset: 0, count: 3 }]
        );
        assert_eq!(rec.vertex_floats()[0], 5.0);
    }

    #[test]
    fn draw_zero_quads_is_noop() {
        let atlas = atlas(0);
        let mut rec = CommandRecorder::new();
        atlas.draw_quads(0, 0, &mut rec).unwrap();
        assert!(rec.commands().is_empty());
    }

    #[test]
    fn draw_past_capacity_fails() {
        let atlas = atlas(4);
        let mut rec = CommandRecorder::new();
        let err = atlas.draw_quads(3, 2, &mut rec).unwrap_err();
        assert_eq!(err, AtlasNodeError::QuadRangeOutOfBounds { start: 2, count: 3, capacity: 4 });
        assert!(rec.commands().is_empty());
    }

    #[test]
    fn draw_overflowing_span_fails() {
        let atlas = atlas(4);
        let mut rec = CommandRecorder::new();
        let err = atlas.draw_quads(2, usize::MAX, &mut rec).unwrap_err();
        assert!(err.to_string().contains("cannot draw 2 quads"));
        assert!(rec.commands().is_empty());
    }
}
