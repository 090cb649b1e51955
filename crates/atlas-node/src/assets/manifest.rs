use serde::{Deserialize, Serialize};

use crate::api::config::RenderConfig;
use crate::api::error::AtlasNodeError;
use crate::api::types::Color3B;

/// Describes the render configuration and the atlas nodes of a scene.
/// Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtlasManifest {
    /// Backend selection and default blend function.
    #[serde(default)]
    pub render: RenderConfig,
    /// Atlas nodes, spawned in order.
    #[serde(default)]
    pub nodes: Vec<AtlasNodeDescriptor>,
}

/// Describes a single atlas node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasNodeDescriptor {
    /// Tag for finding the node by name.
    #[serde(default)]
    pub tag: String,
    /// Path of the tile sheet (e.g., "fonts/digits.png").
    pub path: String,
    /// Tile width in pixels.
    pub item_width: u32,
    /// Tile height in pixels.
    pub item_height: u32,
    /// Number of quads the atlas holds.
    pub capacity: usize,
    /// Initial color (default: white).
    #[serde(default)]
    pub color: Option<Color3B>,
    /// Initial opacity (default: 255).
    #[serde(default)]
    pub opacity: Option<u8>,
    /// Quads drawn per frame (default: capacity).
    #[serde(default)]
    pub quads_to_draw: Option<usize>,
}

impl AtlasManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl AtlasNodeDescriptor {
    /// Reject descriptors `AtlasNode::initialize` would refuse.
    pub fn validate(&self) -> Result<(), AtlasNodeError> {
        let reason = if self.path.is_empty() {
            "empty tile path"
        } else if self.item_width == 0 || self.item_height == 0 {
            "zero tile size"
        } else {
            return Ok(());
        };
        Err(AtlasNodeError::InvalidDescriptor {
            tag: self.tag.clone(),
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::backend::BackendKind;

    #[test]
    fn parse_minimal_manifest() {
        let json = r#"{
            "nodes": [
                { "path": "digits.png", "item_width": 16, "item_height": 24, "capacity": 10 }
            ]
        }"#;
        let manifest = AtlasManifest::from_json(json).unwrap();
        assert_eq!(manifest.render, RenderConfig::default());
        assert_eq!(manifest.nodes.len(), 1);

        let node = &manifest.nodes[0];
        assert_eq!(node.tag, "");
        assert_eq!(node.item_height, 24);
        assert_eq!(node.color, None);
        assert_eq!(node.quads_to_draw, None);
    }

    #[test]
    fn parse_manifest_with_overrides() {
        let json = r#"{
            "render": { "backend": "raster" },
            "nodes": [
                {
                    "tag": "score",
                    "path": "digits.png",
                    "item_width": 16,
                    "item_height": 24,
                    "capacity": 10,
                    "color": [255, 128, 0],
                    "opacity": 200,
                    "quads_to_draw": 3
                }
            ]
        }"#;
        let manifest = AtlasManifest::from_json(json).unwrap();
        assert_eq!(manifest.render.backend, BackendKind::Raster);

        let node = &manifest.nodes[0];
        assert_eq!(node.tag, "score");
        assert_eq!(node.color, Some(Color3B::new(255, 128, 0)));
        assert_eq!(node.opacity, Some(200));
        assert_eq!(node.quads_to_draw, Some(3));
    }

    #[test]
    fn validate_rejects_degenerate_tiles() {
        let json = r#"{ "nodes": [
            { "tag": "ok", "path": "a.png", "item_width": 8, "item_height": 8, "capacity": 1 },
            { "tag": "flat", "path": "a.png", "item_width": 8, "item_height": 0, "capacity": 1 },
            { "tag": "nameless", "path": "", "item_width": 8, "item_height": 8, "capacity": 1 }
        ] }"#;
        let manifest = AtlasManifest::from_json(json).unwrap();
        assert!(manifest.nodes[0].validate().is_ok());
        assert_eq!(
            manifest.nodes[1].validate().unwrap_err(),
            AtlasNodeError::InvalidDescriptor { tag: "flat".into(), reason: "zero tile size" }
        );
        assert_eq!(
            manifest.nodes[2].validate().unwrap_err(),
            AtlasNodeError::InvalidDescriptor { tag: "nameless".into(), reason: "empty tile path" }
        );
    }

    #[test]
    fn missing_path_is_an_error() {
        let json = r#"{ "nodes": [ { "item_width": 16, "item_height": 16, "capacity": 1 } ] }"#;
        assert!(AtlasManifest::from_json(json).is_err());
    }
}
