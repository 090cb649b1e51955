//! Scene node that renders a texture atlas: a grid of equally sized tiles
//! drawn as quads, sharing one color and opacity.
//!
//! The node keeps the logical ("unmodified") color the caller set next to
//! the color actually sent to the draw path. With opacity-modify-RGB on
//! (premultiplied-alpha textures), the drawn color is the logical color
//! scaled by `opacity / 255`; otherwise both are equal.

use glam::Vec2;

use crate::api::error::AtlasNodeError;
use crate::api::protocols::{ColorModulatable, Textured};
use crate::api::types::{BlendFactor, BlendFunc, Color3B, ColorUniform};
use crate::renderer::atlas::TextureAtlas;
use crate::renderer::backend::RenderBackend;
use crate::renderer::commands::DrawContext;
use crate::renderer::quad::AtlasQuad;
use crate::renderer::texture::TextureHandle;

pub struct AtlasNode {
    /// Width of one tile in pixels.
    item_width: u32,
    /// Height of one tile in pixels.
    item_height: u32,
    /// Tiles per row of the texture.
    items_per_row: u32,
    /// Tiles per column of the texture.
    items_per_column: u32,
    /// Quads drawn each frame, starting at slot 0.
    quads_to_draw: usize,
    /// Color sent to the draw path.
    color: Color3B,
    /// Color last set by the caller.
    color_unmodified: Color3B,
    opacity: u8,
    opacity_modify_rgb: bool,
    blend_func: BlendFunc,
    initialized: bool,
    backend: Box<dyn RenderBackend>,
}

impl AtlasNode {
    /// An uninitialized node drawing through `backend`.
    pub fn new(backend: Box<dyn RenderBackend>) -> Self {
        Self {
            item_width: 0,
            item_height: 0,
            items_per_row: 0,
            items_per_column: 0,
            quads_to_draw: 0,
            color: Color3B::WHITE,
            color_unmodified: Color3B::WHITE,
            opacity: 255,
            opacity_modify_rgb: false,
            blend_func: BlendFunc::default(),
            initialized: false,
            backend,
        }
    }

    /// Start from `blend_func` instead of the default `(One, OneMinusSrcAlpha)`.
    pub fn with_blend_func(mut self, blend_func: BlendFunc) -> Self {
        self.blend_func = blend_func;
        self
    }

    /// Build and initialize a node. Returns `None` if initialization fails.
    ///
    /// ```ignore
    /// let node = AtlasNode::create(backend, "tiles.png", 16, 16, 1);
    /// ```
    pub fn create(
        backend: Box<dyn RenderBackend>,
        tile: &str,
        tile_width: u32,
        tile_height: u32,
        items_to_render: usize,
    ) -> Option<Self> {
        Self::try_create(backend, tile, tile_width, tile_height, items_to_render).ok()
    }

    /// Like `create`, but reports why initialization failed.
    pub fn try_create(
        backend: Box<dyn RenderBackend>,
        tile: &str,
        tile_width: u32,
        tile_height: u32,
        items_to_render: usize,
    ) -> Result<Self, AtlasNodeError> {
        let mut node = Self::new(backend);
        node.initialize(tile, tile_width, tile_height, items_to_render)?;
        Ok(node)
    }

    /// Load the tile sheet at `tile` and prepare to draw `items_to_render`
    /// tiles of `tile_width` x `tile_height` pixels.
    ///
    /// # Panics
    ///
    /// If `tile` is empty or either tile dimension is zero.
    pub fn initialize(
        &mut self,
        tile: &str,
        tile_width: u32,
        tile_height: u32,
        items_to_render: usize,
    ) -> Result<(), AtlasNodeError> {
        assert!(!tile.is_empty(), "AtlasNode: tile path should not be empty");
        assert!(
            tile_width > 0 && tile_height > 0,
            "AtlasNode: tile size must be non-zero"
        );
        if self.initialized {
            return Err(AtlasNodeError::AlreadyInitialized);
        }

        // Both fallible steps run before any node state changes.
        if let Err(err) = self.backend.bind_shader() {
            log::warn!("Could not initialize AtlasNode {}: {}", tile, err);
            return Err(err);
        }
        if let Err(err) = self.backend.load_tiles(tile, items_to_render) {
            log::warn!("Could not initialize AtlasNode. Invalid texture {}: {}", tile, err);
            return Err(err);
        }

        self.item_width = tile_width;
        self.item_height = tile_height;
        self.opacity_modify_rgb = true;
        self.push_color_uniform();

        self.update_blend_func();
        self.update_opacity_modify_rgb();
        self.calculate_max_items();
        self.quads_to_draw = items_to_render;

        self.initialized = true;
        log::debug!(
            "AtlasNode: {} as {}x{} grid of {}x{} tiles, {} quads",
            tile,
            self.items_per_row,
            self.items_per_column,
            tile_width,
            tile_height,
            items_to_render
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Issue this node's draw calls. The raster backend draws nothing here.
    pub fn draw(&self, ctx: &mut dyn DrawContext) -> Result<(), AtlasNodeError> {
        self.backend.draw(ctx, self.blend_func, self.quads_to_draw)
    }

    pub fn set_blend_factors(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.blend_func = BlendFunc::new(src, dst);
    }

    /// The color actually sent to the draw path (scaled by opacity when
    /// opacity-modify-RGB is on).
    pub fn displayed_color(&self) -> Color3B {
        self.color
    }

    pub fn texture_atlas(&self) -> Option<&TextureAtlas> {
        self.backend.texture_atlas()
    }

    pub fn texture_atlas_mut(&mut self) -> Option<&mut TextureAtlas> {
        self.backend.texture_atlas_mut()
    }

    pub fn set_texture_atlas(&mut self, atlas: Option<TextureAtlas>) {
        self.backend.set_texture_atlas(atlas);
    }

    pub fn quads_to_draw(&self) -> usize {
        self.quads_to_draw
    }

    /// Not clamped against the atlas capacity; an out-of-range count makes
    /// `draw` fail.
    pub fn set_quads_to_draw(&mut self, quads_to_draw: usize) {
        self.quads_to_draw = quads_to_draw;
    }

    pub fn item_width(&self) -> u32 {
        self.item_width
    }

    pub fn item_height(&self) -> u32 {
        self.item_height
    }

    pub fn items_per_row(&self) -> u32 {
        self.items_per_row
    }

    pub fn items_per_column(&self) -> u32 {
        self.items_per_column
    }

    pub fn backend(&self) -> &dyn RenderBackend {
        self.backend.as_ref()
    }

    /// Write a quad at `quad_index` showing grid item `item_index`
    /// (row-major, `items_per_row` items per row) with its bottom-left
    /// corner at `position`.
    pub fn set_tile_quad(
        &mut self,
        quad_index: usize,
        item_index: usize,
        position: Vec2,
    ) -> Result<(), AtlasNodeError> {
        let row_len = self.items_per_row as usize;
        let items = row_len * self.items_per_column as usize;
        let item = Vec2::new(self.item_width as f32, self.item_height as f32);

        let atlas = self
            .backend
            .texture_atlas_mut()
            .ok_or(AtlasNodeError::NoTextureAtlas)?;
        if item_index >= items {
            return Err(AtlasNodeError::ItemOutOfRange {
                index: item_index,
                items,
            });
        }

        let texture_size = atlas.texture().content_size().as_vec2();
        let cell = Vec2::new((item_index % row_len) as f32, (item_index / row_len) as f32);
        let uv_min = cell * item / texture_size;
        let uv_max = uv_min + item / texture_size;
        atlas.update_quad(AtlasQuad::new(position, item, uv_min, uv_max), quad_index)
    }

    /// Store `color` as both the logical and drawn color, re-tint on the
    /// raster backend, apply opacity scaling and refresh the color uniform.
    fn update_color(&mut self, color: Color3B) {
        self.color = color;
        self.color_unmodified = color;

        if let Some(tinted) = self.backend.tint(color) {
            self.set_texture(tinted);
        }

        if self.opacity_modify_rgb {
            self.color = color.scaled_by(self.opacity);
        }

        self.push_color_uniform();
    }

    fn push_color_uniform(&mut self) {
        self.backend
            .upload_color(ColorUniform::new(self.color, self.opacity));
    }

    fn calculate_max_items(&mut self) {
        if self.item_width == 0 || self.item_height == 0 {
            return;
        }
        if let Some(texture) = self.backend.texture() {
            self.items_per_column = texture.height() / self.item_height;
            self.items_per_row = texture.width() / self.item_width;
        }
    }

    fn update_blend_func(&mut self) {
        if !self.backend.derives_alpha_format() {
            return;
        }
        if let Some(texture) = self.backend.texture() {
            if !texture.has_premultiplied_alpha() {
                self.blend_func = BlendFunc::ALPHA_NON_PREMULTIPLIED;
            }
        }
    }

    fn update_opacity_modify_rgb(&mut self) {
        if !self.backend.derives_alpha_format() {
            return;
        }
        if let Some(texture) = self.backend.texture() {
            self.opacity_modify_rgb = texture.has_premultiplied_alpha();
        }
    }
}

impl ColorModulatable for AtlasNode {
    fn color(&self) -> Color3B {
        if self.opacity_modify_rgb {
            self.color_unmodified
        } else {
            self.color
        }
    }

    fn set_color(&mut self, color: Color3B) {
        if color == ColorModulatable::color(self) {
            return;
        }
        self.update_color(color);
    }

    fn opacity(&self) -> u8 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: u8) {
        self.opacity = opacity;
        // premultiplied textures carry opacity in RGB
        if self.opacity_modify_rgb {
            self.update_color(self.color_unmodified);
        } else {
            self.push_color_uniform();
        }
    }

    fn is_opacity_modify_rgb(&self) -> bool {
        self.opacity_modify_rgb
    }

    fn set_opacity_modify_rgb(&mut self, value: bool) {
        // Snapshot the logical color before the flag changes what color() reports.
        let old_color = self.color();
        self.opacity_modify_rgb = value;
        self.update_color(old_color);
    }
}

impl Textured for AtlasNode {
    fn texture(&self) -> Option<TextureHandle> {
        self.backend.texture()
    }

    fn set_texture(&mut self, texture: TextureHandle) {
        self.backend.set_texture(texture);
        self.update_blend_func();
        self.update_opacity_modify_rgb();
        self.calculate_max_items();
    }

    fn blend_func(&self) -> BlendFunc {
        self.blend_func
    }

    fn set_blend_func(&mut self, blend_func: BlendFunc) {
        self.blend_func = blend_func;
    }
}
