use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Unique identifier for a node in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// 8-bit RGB color. Opacity is carried separately by the nodes that use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color3B {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color3B {
    pub const WHITE: Color3B = Color3B::new(255, 255, 255);
    pub const BLACK: Color3B = Color3B::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel by `opacity / 255`, truncating.
    pub fn scaled_by(self, opacity: u8) -> Self {
        let scale = |c: u8| (c as u32 * opacity as u32 / 255) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

impl From<[u8; 3]> for Color3B {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Color3B> for [u8; 3] {
    fn from(c: Color3B) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Blend factor, one per GL blend enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    DstColor,
    OneMinusDstColor,
}

impl BlendFactor {
    /// The GL enum value for this factor.
    pub fn gl_enum(self) -> u32 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::SrcColor => 0x0300,
            Self::OneMinusSrcColor => 0x0301,
            Self::SrcAlpha => 0x0302,
            Self::OneMinusSrcAlpha => 0x0303,
            Self::DstAlpha => 0x0304,
            Self::OneMinusDstAlpha => 0x0305,
            Self::DstColor => 0x0306,
            Self::OneMinusDstColor => 0x0307,
        }
    }
}

/// Source/destination blend factor pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlendFunc {
    pub src: BlendFactor,
    pub dst: BlendFactor,
}

impl BlendFunc {
    /// Blending for textures whose RGB is already multiplied by alpha.
    pub const ALPHA_PREMULTIPLIED: BlendFunc =
        BlendFunc::new(BlendFactor::One, BlendFactor::OneMinusSrcAlpha);
    /// Blending for straight-alpha textures.
    pub const ALPHA_NON_PREMULTIPLIED: BlendFunc =
        BlendFunc::new(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);

    pub const fn new(src: BlendFactor, dst: BlendFactor) -> Self {
        Self { src, dst }
    }
}

impl Default for BlendFunc {
    fn default() -> Self {
        Self::ALPHA_PREMULTIPLIED
    }
}

/// Color uniform uploaded to the `u_color` slot of the atlas shader.
/// Wire format: 4 floats `[r, g, b, a]`, each in 0.0..=1.0.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct ColorUniform(pub [f32; 4]);

impl ColorUniform {
    pub const FLOATS: usize = 4;

    pub fn new(color: Color3B, opacity: u8) -> Self {
        Self([
            color.r as f32 / 255.0,
            color.g as f32 / 255.0,
            color.b as f32 / 255.0,
            opacity as f32 / 255.0,
        ])
    }
}
