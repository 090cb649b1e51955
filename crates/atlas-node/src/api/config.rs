use serde::{Deserialize, Serialize};

use crate::api::types::BlendFunc;
use crate::renderer::backend::BackendKind;

/// Render configuration shared by every node a scene creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Which backend new nodes draw through (default: GPU).
    pub backend: BackendKind,
    /// Blend function a node starts with before its texture's alpha format
    /// is taken into account. Default: `(One, OneMinusSrcAlpha)`.
    pub default_blend_func: BlendFunc,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Gpu,
            default_blend_func: BlendFunc::default(),
        }
    }
}
