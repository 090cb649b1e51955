pub mod atlas;
pub mod backend;
pub mod commands;
pub mod quad;
pub mod shader;
pub mod texture;

// Re-export key types for convenient access
pub use atlas::TextureAtlas;
pub use backend::{backend_for, BackendKind, GpuBackend, RasterBackend, RenderBackend};
pub use commands::{CommandRecorder, DrawCommand, DrawContext};
pub use quad::AtlasQuad;
pub use shader::{ShaderCache, ShaderProgram, UniformLocation};
pub use texture::{Texture, TextureHandle, TextureRect};
