//! Render backends for atlas nodes.
//!
//! The GPU backend keeps a `TextureAtlas`, a bound shader program and a color
//! uniform, and issues draw calls. The raster backend has no atlas: it keeps
//! the decoded tile sheet plus a tinted copy of it, and presenting that copy
//! is left to ordinary node drawing.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::api::error::AtlasNodeError;
use crate::api::types::{BlendFunc, Color3B, ColorUniform};
use crate::assets::texture_cache::TextureCache;
use crate::renderer::atlas::TextureAtlas;
use crate::renderer::commands::DrawContext;
use crate::renderer::shader::{
    ShaderCache, ShaderProgram, UniformLocation, SHADER_POSITION_TEXTURE_UCOLOR, UNIFORM_COLOR,
};
use crate::renderer::texture::{TextureHandle, TextureRect};

/// Which backend a node renders through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Hardware path: texture atlas + shader uniform color.
    #[default]
    Gpu,
    /// Software path (Canvas 2D / CPU rasterization): pre-tinted bitmap.
    Raster,
}

/// Texture and draw operations an `AtlasNode` delegates to its backend.
pub trait RenderBackend {
    fn kind(&self) -> BackendKind;

    /// Load the tile sheet at `path`, sized for `capacity` quads.
    fn load_tiles(&mut self, path: &str, capacity: usize) -> Result<(), AtlasNodeError>;

    /// Resolve the program the node draws with.
    fn bind_shader(&mut self) -> Result<(), AtlasNodeError>;

    /// The texture currently drawn.
    fn texture(&self) -> Option<TextureHandle>;
    fn set_texture(&mut self, texture: TextureHandle);

    fn texture_atlas(&self) -> Option<&TextureAtlas>;
    fn texture_atlas_mut(&mut self) -> Option<&mut TextureAtlas>;
    fn set_texture_atlas(&mut self, atlas: Option<TextureAtlas>);

    /// Whether the node's blend function and opacity-modify-RGB flag follow
    /// the bound texture's alpha format.
    fn derives_alpha_format(&self) -> bool;

    /// Produce a copy of the tile sheet tinted by `color`, if this backend
    /// tints on the CPU and has a texture bound.
    fn tint(&mut self, color: Color3B) -> Option<TextureHandle>;

    fn upload_color(&mut self, color: ColorUniform);
    /// The color uniform last uploaded, if this backend uses one.
    fn color_uniform(&self) -> Option<ColorUniform>;

    /// Issue the node's draw calls: program setup, blend state, color
    /// uniform, then `quads` quads from slot 0.
    fn draw(
        &self,
        ctx: &mut dyn DrawContext,
        blend_func: BlendFunc,
        quads: usize,
    ) -> Result<(), AtlasNodeError>;
}

/// Build the backend selected by `kind`.
pub fn backend_for(
    kind: BackendKind,
    textures: Rc<RefCell<TextureCache>>,
    shaders: Rc<ShaderCache>,
) -> Box<dyn RenderBackend> {
    match kind {
        BackendKind::Gpu => Box::new(GpuBackend::new(textures, shaders)),
        BackendKind::Raster => Box::new(RasterBackend::new(textures)),
    }
}

/// Hardware backend.
pub struct GpuBackend {
    textures: Rc<RefCell<TextureCache>>,
    shaders: Rc<ShaderCache>,
    atlas: Option<TextureAtlas>,
    program: Option<Rc<ShaderProgram>>,
    uniform_color: Option<UniformLocation>,
    color: ColorUniform,
}

impl GpuBackend {
    pub fn new(textures: Rc<RefCell<TextureCache>>, shaders: Rc<ShaderCache>) -> Self {
        Self {
            textures,
            shaders,
            atlas: None,
            program: None,
            uniform_color: None,
            color: ColorUniform::new(Color3B::WHITE, 255),
        }
    }

    /// The bound program, once `bind_shader` succeeded.
    pub fn program(&self) -> Option<&Rc<ShaderProgram>> {
        self.program.as_ref()
    }

    /// Cached location of `u_color` in the bound program.
    pub fn uniform_color_location(&self) -> Option<UniformLocation> {
        self.uniform_color
    }
}

impl RenderBackend for GpuBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Gpu
    }

    fn load_tiles(&mut self, path: &str, capacity: usize) -> Result<(), AtlasNodeError> {
        let atlas = TextureAtlas::init_with_file(&mut self.textures.borrow_mut(), path, capacity)?;
        self.atlas = Some(atlas);
        Ok(())
    }

    fn bind_shader(&mut self) -> Result<(), AtlasNodeError> {
        let program = self
            .shaders
            .program(SHADER_POSITION_TEXTURE_UCOLOR)
            .ok_or_else(|| AtlasNodeError::ShaderNotFound {
                name: SHADER_POSITION_TEXTURE_UCOLOR.to_string(),
            })?;
        let location =
            program
                .uniform_location(UNIFORM_COLOR)
                .ok_or_else(|| AtlasNodeError::UniformNotFound {
                    program: program.name().to_string(),
                    uniform: UNIFORM_COLOR.to_string(),
                })?;
        self.program = Some(program);
        self.uniform_color = Some(location);
        Ok(())
    }

    fn texture(&self) -> Option<TextureHandle> {
        self.atlas.as_ref().map(|atlas| Rc::clone(atlas.texture()))
    }

    fn set_texture(&mut self, texture: TextureHandle) {
        match self.atlas.as_mut() {
            Some(atlas) => atlas.set_texture(texture),
            None => log::warn!("gpu backend: no texture atlas to bind {} to", texture.name()),
        }
    }

    fn texture_atlas(&self) -> Option<&TextureAtlas> {
        self.atlas.as_ref()
    }

    fn texture_atlas_mut(&mut self) -> Option<&mut TextureAtlas> {
        self.atlas.as_mut()
    }

    fn set_texture_atlas(&mut self, atlas: Option<TextureAtlas>) {
        self.atlas = atlas;
    }

    fn derives_alpha_format(&self) -> bool {
        true
    }

    fn tint(&mut self, _color: Color3B) -> Option<TextureHandle> {
        None
    }

    fn upload_color(&mut self, color: ColorUniform) {
        self.color = color;
    }

    fn color_uniform(&self) -> Option<ColorUniform> {
        Some(self.color)
    }

    fn draw(
        &self,
        ctx: &mut dyn DrawContext,
        blend_func: BlendFunc,
        quads: usize,
    ) -> Result<(), AtlasNodeError> {
        let atlas = self.atlas.as_ref().ok_or(AtlasNodeError::NoTextureAtlas)?;
        let (Some(program), Some(location)) = (self.program.as_ref(), self.uniform_color) else {
            return Err(AtlasNodeError::ShaderNotFound {
                name: SHADER_POSITION_TEXTURE_UCOLOR.to_string(),
            });
        };

        ctx.node_draw_setup(program);
        ctx.set_blend_func(blend_func);
        ctx.set_uniform_4f(location, self.color);
        atlas.draw_quads(quads, 0, ctx)
    }
}

/// Software backend.
pub struct RasterBackend {
    textures: Rc<RefCell<TextureCache>>,
    original_texture: Option<TextureHandle>,
    canvas_texture: Option<TextureHandle>,
}

impl RasterBackend {
    pub fn new(textures: Rc<RefCell<TextureCache>>) -> Self {
        Self {
            textures,
            original_texture: None,
            canvas_texture: None,
        }
    }

    /// The untinted tile sheet every tint starts from.
    pub fn original_texture(&self) -> Option<&TextureHandle> {
        self.original_texture.as_ref()
    }
}

impl RenderBackend for RasterBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Raster
    }

    fn load_tiles(&mut self, path: &str, _capacity: usize) -> Result<(), AtlasNodeError> {
        let texture = self
            .textures
            .borrow_mut()
            .load_image(path)
            .ok_or_else(|| AtlasNodeError::TextureNotFound {
                path: path.to_string(),
            })?;
        self.canvas_texture = Some(Rc::clone(&texture));
        self.original_texture = Some(texture);
        Ok(())
    }

    fn bind_shader(&mut self) -> Result<(), AtlasNodeError> {
        Ok(())
    }

    fn texture(&self) -> Option<TextureHandle> {
        self.canvas_texture.clone()
    }

    fn set_texture(&mut self, texture: TextureHandle) {
        self.canvas_texture = Some(texture);
    }

    fn texture_atlas(&self) -> Option<&TextureAtlas> {
        None
    }

    fn texture_atlas_mut(&mut self) -> Option<&mut TextureAtlas> {
        None
    }

    fn set_texture_atlas(&mut self, atlas: Option<TextureAtlas>) {
        if atlas.is_some() {
            log::warn!("raster backend: texture atlases are not used, ignoring");
        }
    }

    fn derives_alpha_format(&self) -> bool {
        false
    }

    fn tint(&mut self, color: Color3B) -> Option<TextureHandle> {
        self.canvas_texture.as_ref()?;
        let original = self.original_texture.as_ref()?;
        let mut cache = self.textures.borrow_mut();
        let table = cache.color_table(original)?;
        match cache.tint(original, &table, color, TextureRect::of(original)) {
            Ok(tinted) => {
                log::debug!("raster backend: re-tinted {} to {:?}", original.name(), color);
                Some(tinted)
            }
            Err(err) => {
                log::warn!("raster backend: tint of {} failed: {}", original.name(), err);
                None
            }
        }
    }

    fn upload_color(&mut self, _color: ColorUniform) {}

    fn color_uniform(&self) -> Option<ColorUniform> {
        None
    }

    fn draw(
        &self,
        _ctx: &mut dyn DrawContext,
        _blend_func: BlendFunc,
        _quads: usize,
    ) -> Result<(), AtlasNodeError> {
        Ok(())
    }
}
