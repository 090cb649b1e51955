pub mod manifest;
pub mod texture_cache;
