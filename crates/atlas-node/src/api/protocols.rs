//! Narrow capability traits implemented by drawable nodes.

use crate::api::types::{BlendFunc, Color3B};
use crate::renderer::texture::TextureHandle;

/// Nodes whose RGB color and opacity can be modulated.
pub trait ColorModulatable {
    /// The logical color last set by the caller.
    fn color(&self) -> Color3B;
    fn set_color(&mut self, color: Color3B);
    fn opacity(&self) -> u8;
    fn set_opacity(&mut self, opacity: u8);
    /// Whether opacity is multiplied into the RGB channels.
    fn is_opacity_modify_rgb(&self) -> bool;
    fn set_opacity_modify_rgb(&mut self, value: bool);
}

/// Nodes that draw a texture with a blend function.
pub trait Textured {
    fn texture(&self) -> Option<TextureHandle>;
    fn set_texture(&mut self, texture: TextureHandle);
    fn blend_func(&self) -> BlendFunc;
    fn set_blend_func(&mut self, blend_func: BlendFunc);
}
