pub mod api;
pub mod core;
pub mod components;
pub mod renderer;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::config::RenderConfig;
pub use api::error::AtlasNodeError;
pub use api::protocols::{ColorModulatable, Textured};
pub use api::types::{BlendFactor, BlendFunc, Color3B, ColorUniform, NodeId};
pub use components::atlas_node::AtlasNode;
pub use crate::core::scene::{Scene, SceneNode};
pub use renderer::atlas::TextureAtlas;
pub use renderer::backend::{backend_for, BackendKind, GpuBackend, RasterBackend, RenderBackend};
pub use renderer::commands::{CommandRecorder, DrawCommand, DrawContext};
pub use renderer::quad::AtlasQuad;
pub use renderer::shader::{
    ShaderCache, ShaderProgram, UniformLocation,
    SHADER_POSITION_TEXTURE_COLOR, SHADER_POSITION_TEXTURE_UCOLOR,
};
pub use renderer::texture::{Texture, TextureHandle, TextureRect};
pub use assets::manifest::{AtlasManifest, AtlasNodeDescriptor};
pub use assets::texture_cache::{ColorTable, ImageSource, TextureCache};
#[cfg(feature = "decode")]
pub use assets::texture_cache::FileImageSource;
