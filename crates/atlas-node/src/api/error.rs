use thiserror::Error;

/// Errors raised while building or drawing atlas nodes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtlasNodeError {
    #[error("texture `{path}` could not be loaded")]
    TextureNotFound { path: String },
    #[error("shader program `{name}` is not in the shader cache")]
    ShaderNotFound { name: String },
    #[error("shader program `{program}` has no uniform `{uniform}`")]
    UniformNotFound { program: String, uniform: String },
    #[error("atlas node is already initialized")]
    AlreadyInitialized,
    #[error("this backend has no texture atlas")]
    NoTextureAtlas,
    #[error("cannot draw {count} quads from slot {start} of an atlas of capacity {capacity}")]
    QuadRangeOutOfBounds {
        start: usize,
        count: usize,
        capacity: usize,
    },
    #[error("quad index {index} is outside the atlas capacity {capacity}")]
    QuadIndexOutOfBounds { index: usize, capacity: usize },
    #[error("tile item {index} is outside the {items}-item grid")]
    ItemOutOfRange { index: usize, items: usize },
    #[error("atlas node `{tag}` is invalid: {reason}")]
    InvalidDescriptor { tag: String, reason: &'static str },
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    InvalidPixelData { expected: usize, actual: usize },
}
