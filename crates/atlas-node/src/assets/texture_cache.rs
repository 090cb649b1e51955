//! Path-keyed texture cache.
//!
//! Images are decoded once through an `ImageSource` and shared as
//! `TextureHandle`s. The raster backend also asks the cache for per-texture
//! color tables (the texture split into R/G/B/A planes) so it can re-tint a
//! tile sheet without decoding it again.

use std::collections::HashMap;
use std::rc::Rc;

use crate::api::error::AtlasNodeError;
use crate::api::types::Color3B;
use crate::renderer::texture::{Texture, TextureHandle, TextureRect};

/// Decodes an image path into a texture.
pub trait ImageSource {
    /// Returns `None` if the path does not name a decodable image.
    fn decode(&self, path: &str) -> Option<Texture>;
}

impl<F> ImageSource for F
where
    F: Fn(&str) -> Option<Texture>,
{
    fn decode(&self, path: &str) -> Option<Texture> {
        self(path)
    }
}

/// Decodes image files from disk into straight-alpha RGBA8 textures.
#[cfg(feature = "decode")]
#[derive(Debug, Clone, Default)]
pub struct FileImageSource {
    root: std::path::PathBuf,
}

#[cfg(feature = "decode")]
impl FileImageSource {
    /// Resolve paths relative to `root`.
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[cfg(feature = "decode")]
impl ImageSource for FileImageSource {
    fn decode(&self, path: &str) -> Option<Texture> {
        let full = self.root.join(path);
        let image = match image::open(&full) {
            Ok(image) => image.into_rgba8(),
            Err(err) => {
                log::warn!("failed to decode {}: {}", full.display(), err);
                return None;
            }
        };
        let (width, height) = image.dimensions();
        Texture::from_rgba(path, width, height, image.into_raw(), false).ok()
    }
}

/// A texture split into separate R, G, B and A planes, one byte per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTable {
    width: u32,
    height: u32,
    planes: [Vec<u8>; 4],
}

impl ColorTable {
    /// Split `texture`'s pixels into planes. `None` if it has no pixels.
    pub fn from_texture(texture: &Texture) -> Option<Self> {
        if !texture.has_pixels() {
            return None;
        }
        let count = (texture.width() * texture.height()) as usize;
        let mut planes: [Vec<u8>; 4] = std::array::from_fn(|_| Vec::with_capacity(count));
        for px in texture.pixels().chunks_exact(4) {
            for (plane, &value) in planes.iter_mut().zip(px) {
                plane.push(value);
            }
        }
        Some(Self {
            width: texture.width(),
            height: texture.height(),
            planes,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA at pixel (x, y).
    pub fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y * self.width + x) as usize;
        [self.planes[0][i], self.planes[1][i], self.planes[2][i], self.planes[3][i]]
    }
}

/// Cache of decoded textures and their color tables.
pub struct TextureCache {
    textures: HashMap<String, TextureHandle>,
    color_tables: HashMap<String, Rc<ColorTable>>,
    source: Option<Box<dyn ImageSource>>,
}

impl TextureCache {
    /// A cache that only serves textures added with `add_texture`.
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            color_tables: HashMap::new(),
            source: None,
        }
    }

    /// A cache that decodes misses through `source`.
    pub fn with_source(source: Box<dyn ImageSource>) -> Self {
        Self {
            source: Some(source),
            ..Self::new()
        }
    }

    /// Register a texture under `path`, replacing any previous entry.
    pub fn add_texture(&mut self, path: impl Into<String>, texture: Texture) -> TextureHandle {
        let path = path.into();
        let handle = Rc::new(texture);
        self.color_tables.remove(handle.name());
        self.textures.insert(path, Rc::clone(&handle));
        handle
    }

    pub fn texture_for_key(&self, path: &str) -> Option<TextureHandle> {
        self.textures.get(path).cloned()
    }

    /// Return the cached texture for `path`, decoding and caching it on a miss.
    pub fn load_image(&mut self, path: &str) -> Option<TextureHandle> {
        if path.is_empty() {
            return None;
        }
        if let Some(texture) = self.textures.get(path) {
            return Some(Rc::clone(texture));
        }
        let texture = self.source.as_ref()?.decode(path)?;
        log::debug!("texture cache: loaded {} ({}x{})", path, texture.width(), texture.height());
        Some(self.add_texture(path, texture))
    }

    /// Drop the cache's reference. Holders of the handle keep the texture alive.
    pub fn remove_texture(&mut self, path: &str) -> Option<TextureHandle> {
        let removed = self.textures.remove(path)?;
        self.color_tables.remove(removed.name());
        Some(removed)
    }

    pub fn remove_all(&mut self) {
        self.textures.clear();
        self.color_tables.clear();
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Precomputed color table for `texture`, built on first request.
    pub fn color_table(&mut self, texture: &Texture) -> Option<Rc<ColorTable>> {
        if let Some(table) = self.color_tables.get(texture.name()) {
            return Some(Rc::clone(table));
        }
        let table = Rc::new(ColorTable::from_texture(texture)?);
        self.color_tables
            .insert(texture.name().to_string(), Rc::clone(&table));
        Some(table)
    }

    /// Build a tinted copy of `rect` within `texture`.
    ///
    /// Each RGB channel is multiplied by `color / 255`; alpha is kept.
    /// The result is not added to the cache.
    pub fn tint(
        &self,
        texture: &Texture,
        table: &ColorTable,
        color: Color3B,
        rect: TextureRect,
    ) -> Result<TextureHandle, AtlasNodeError> {
        let width = rect.size.x.min(table.width().saturating_sub(rect.origin.x));
        let height = rect.size.y.min(table.height().saturating_sub(rect.origin.y));
        let tint = [color.r as u32, color.g as u32, color.b as u32];

        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in rect.origin.y..rect.origin.y + height {
            for x in rect.origin.x..rect.origin.x + width {
                let [r, g, b, a] = table.rgba(x, y);
                for (channel, t) in [r, g, b].into_iter().zip(tint) {
                    pixels.push((channel as u32 * t / 255) as u8);
                }
                pixels.push(a);
            }
        }

        let name = format!(
            "{}#tint{:02x}{:02x}{:02x}",
            texture.name(),
            color.r,
            color.g,
            color.b
        );
        let tinted = Texture::from_rgba(name, width, height, pixels, texture.has_premultiplied_alpha())?;
        Ok(Rc::new(tinted))
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}
