use std::rc::Rc;

use glam::UVec2;

use crate::api::error::AtlasNodeError;

/// Shared handle to a texture. Caches, atlases and nodes all hold clones;
/// the pixels are freed when the last holder lets go.
pub type TextureHandle = Rc<Texture>;

/// A 2D texture: its size, alpha format and (optionally) RGBA8 pixels.
///
/// GPU-resident textures carry no pixels. Raster textures keep their pixels
/// so they can be re-tinted on the CPU.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    name: String,
    size: UVec2,
    premultiplied_alpha: bool,
    pixels: Vec<u8>,
}

impl Texture {
    /// Create a texture without pixel data.
    pub fn new(name: impl Into<String>, width: u32, height: u32, premultiplied_alpha: bool) -> Self {
        Self {
            name: name.into(),
            size: UVec2::new(width, height),
            premultiplied_alpha,
            pixels: Vec::new(),
        }
    }

    /// Create a texture from tightly packed RGBA8 pixels (row-major).
    pub fn from_rgba(
        name: impl Into<String>,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        premultiplied_alpha: bool,
    ) -> Result<Self, AtlasNodeError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(AtlasNodeError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            size: UVec2::new(width, height),
            premultiplied_alpha,
            pixels,
        })
    }

    /// Key the texture was loaded under (usually its file path).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.size.x
    }

    pub fn height(&self) -> u32 {
        self.size.y
    }

    /// Size in pixels.
    pub fn content_size(&self) -> UVec2 {
        self.size
    }

    pub fn has_premultiplied_alpha(&self) -> bool {
        self.premultiplied_alpha
    }

    /// RGBA8 pixels, empty for GPU-only textures.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn has_pixels(&self) -> bool {
        !self.pixels.is_empty()
    }
}

/// Pixel rectangle within a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRect {
    pub origin: UVec2,
    pub size: UVec2,
}

impl TextureRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            origin: UVec2::new(x, y),
            size: UVec2::new(width, height),
        }
    }

    /// The rectangle covering the whole texture.
    pub fn of(texture: &Texture) -> Self {
        Self {
            origin: UVec2::ZERO,
            size: texture.content_size(),
        }
    }
}
