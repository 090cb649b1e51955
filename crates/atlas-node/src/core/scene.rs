use std::cell::RefCell;
use std::rc::Rc;

use crate::api::config::RenderConfig;
use crate::api::error::AtlasNodeError;
use crate::api::protocols::ColorModulatable;
use crate::api::types::NodeId;
use crate::assets::manifest::{AtlasManifest, AtlasNodeDescriptor};
use crate::assets::texture_cache::TextureCache;
use crate::components::atlas_node::AtlasNode;
use crate::renderer::backend::backend_for;
use crate::renderer::commands::DrawContext;
use crate::renderer::shader::ShaderCache;

/// An atlas node owned by the scene.
pub struct SceneNode {
    pub id: NodeId,
    /// String tag for finding nodes by name.
    pub tag: String,
    /// Whether this node is drawn (inactive nodes are skipped).
    pub active: bool,
    pub node: AtlasNode,
}

/// Flat node storage plus the caches and config nodes are built from.
/// Designed for small-to-medium node counts.
pub struct Scene {
    config: RenderConfig,
    textures: Rc<RefCell<TextureCache>>,
    shaders: Rc<ShaderCache>,
    nodes: Vec<SceneNode>,
    next_id: u32,
}

impl Scene {
    pub fn new(
        config: RenderConfig,
        textures: Rc<RefCell<TextureCache>>,
        shaders: Rc<ShaderCache>,
    ) -> Self {
        Self {
            config,
            textures,
            shaders,
            nodes: Vec::with_capacity(64),
            next_id: 1,
        }
    }

    /// Build a scene from a manifest's render config and spawn its nodes.
    pub fn from_manifest(
        manifest: &AtlasManifest,
        textures: Rc<RefCell<TextureCache>>,
        shaders: Rc<ShaderCache>,
    ) -> Self {
        let mut scene = Self::new(manifest.render.clone(), textures, shaders);
        scene.spawn_from_manifest(manifest);
        scene
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn textures(&self) -> &Rc<RefCell<TextureCache>> {
        &self.textures
    }

    /// Build an atlas node with the configured backend and blend function,
    /// initialize it and add it to the scene.
    pub fn create_atlas_node(
        &mut self,
        tag: impl Into<String>,
        tile: &str,
        tile_width: u32,
        tile_height: u32,
        items_to_render: usize,
    ) -> Result<NodeId, AtlasNodeError> {
        let backend = backend_for(
            self.config.backend,
            Rc::clone(&self.textures),
            Rc::clone(&self.shaders),
        );
        let mut node = AtlasNode::new(backend).with_blend_func(self.config.default_blend_func);
        node.initialize(tile, tile_width, tile_height, items_to_render)?;
        Ok(self.spawn(tag, node))
    }

    /// Add an already-built node. Returns its ID.
    pub fn spawn(&mut self, tag: impl Into<String>, node: AtlasNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(SceneNode {
            id,
            tag: tag.into(),
            active: true,
            node,
        });
        id
    }

    /// Spawn every node the manifest describes. Nodes that fail to
    /// initialize are logged and skipped.
    pub fn spawn_from_manifest(&mut self, manifest: &AtlasManifest) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(manifest.nodes.len());
        for desc in &manifest.nodes {
            match self.spawn_descriptor(desc) {
                Ok(id) => ids.push(id),
                Err(err) => log::warn!("skipping atlas node `{}` ({}): {}", desc.tag, desc.path, err),
            }
        }
        log::info!("scene: spawned {}/{} manifest nodes", ids.len(), manifest.nodes.len());
        ids
    }

    fn spawn_descriptor(&mut self, desc: &AtlasNodeDescriptor) -> Result<NodeId, AtlasNodeError> {
        desc.validate()?;
        let id = self.create_atlas_node(
            desc.tag.clone(),
            &desc.path,
            desc.item_width,
            desc.item_height,
            desc.capacity,
        )?;
        if let Some(entry) = self.get_mut(id) {
            let node = &mut entry.node;
            if let Some(opacity) = desc.opacity {
                node.set_opacity(opacity);
            }
            if let Some(color) = desc.color {
                node.set_color(color);
            }
            if let Some(quads) = desc.quads_to_draw {
                node.set_quads_to_draw(quads);
            }
        }
        Ok(id)
    }

    /// Remove a node by ID. Its texture and atlas references are released
    /// when the returned value is dropped.
    pub fn despawn(&mut self, id: NodeId) -> Option<SceneNode> {
        let idx = self.nodes.iter().position(|n| n.id == id)?;
        Some(self.nodes.remove(idx))
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Find the first node with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.tag == tag)
    }

    pub fn find_by_tag_mut(&mut self, tag: &str) -> Option<&mut SceneNode> {
        self.nodes.iter_mut().find(|n| n.tag == tag)
    }

    /// Iterate over nodes in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Draw every active node in spawn order. Returns how many were drawn;
    /// the first draw error stops the traversal.
    pub fn visit(&self, ctx: &mut dyn DrawContext) -> Result<usize, AtlasNodeError> {
        let mut drawn = 0;
        for entry in self.nodes.iter().filter(|n| n.active) {
            entry.node.draw(ctx)?;
            drawn += 1;
        }
        Ok(drawn)
    }
}
