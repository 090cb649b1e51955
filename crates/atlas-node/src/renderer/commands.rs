//! Draw-call sink used by nodes during scene traversal.
//!
//! A real backend translates these calls into GL/WebGPU state changes.
//! `CommandRecorder` keeps them in order instead, which is what the scene
//! visitor and the tests use.

use crate::api::types::{BlendFunc, ColorUniform};
use crate::renderer::quad::AtlasQuad;
use crate::renderer::shader::{ShaderProgram, UniformLocation};
use crate::renderer::texture::Texture;

/// Render-state operations a node issues while drawing.
pub trait DrawContext {
    /// Bind the node's program and apply the scene-graph transform.
    fn node_draw_setup(&mut self, program: &ShaderProgram);
    fn set_blend_func(&mut self, blend_func: BlendFunc);
    fn set_uniform_4f(&mut self, location: UniformLocation, value: ColorUniform);
    /// Draw `quads` sampling `texture`, in one call.
    fn draw_quads(&mut self, texture: &Texture, quads: &[AtlasQuad]);
}

/// A recorded draw-context call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    NodeSetup { program: String },
    BlendFunc(BlendFunc),
    Uniform4f {
        location: UniformLocation,
        value: ColorUniform,
    },
    DrawQuads {
        texture: String,
        /// Offset of the first quad in the recorder's vertex buffer, in floats.
        offset: usize,
        count: usize,
    },
}

/// Records draw calls and packs quad data into a flat float buffer.
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
    vertices: Vec<f32>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(64),
            vertices: Vec::with_capacity(64 * AtlasQuad::FLOATS),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Packed quad data, `AtlasQuad::FLOATS` floats per quad.
    pub fn vertex_floats(&self) -> &[f32] {
        &self.vertices
    }

    /// Number of `DrawQuads` commands recorded.
    pub fn draw_call_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::DrawQuads { .. }))
            .count()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.vertices.clear();
    }
}

impl Default for CommandRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawContext for CommandRecorder {
    fn node_draw_setup(&mut self, program: &ShaderProgram) {
        self.commands.push(DrawCommand::NodeSetup {
            program: program.name().to_string(),
        });
    }

    fn set_blend_func(&mut self, blend_func: BlendFunc) {
        self.commands.push(DrawCommand::BlendFunc(blend_func));
    }

    fn set_uniform_4f(&mut self, location: UniformLocation, value: ColorUniform) {
        self.commands.push(DrawCommand::Uniform4f { location, value });
    }

    fn draw_quads(&mut self, texture: &Texture, quads: &[AtlasQuad]) {
        let offset = self.vertices.len();
        self.vertices.extend_from_slice(bytemuck::cast_slice(quads));
        self.commands.push(DrawCommand::DrawQuads {
            texture: texture.name().to_string(),
            offset,
            count: quads.len(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn records_in_order() {
        let mut rec = CommandRecorder::new();
        let program = ShaderProgram::new("p", &["u_color"]);
        rec.node_draw_setup(&program);
        rec.set_blend_func(BlendFunc::default());
        rec.set_uniform_4f(UniformLocation(0), ColorUniform([1.0; 4]));

        assert_eq!(rec.commands().len(), 3);
        assert_eq!(rec.commands()[0], DrawCommand::NodeSetup { program: "p".into() });
        assert_eq!(rec.commands()[1], DrawCommand::BlendFunc(BlendFunc::default()));
        assert_eq!(rec.draw_call_count(), 0);
    }

    #[test]
    fn draw_quads_packs_vertices() {
        let mut rec = CommandRecorder::new();
        let texture = Texture::new("tiles.png", 64, 64, true);
        let quad = AtlasQuad::new(Vec2::ZERO, Vec2::splat(16.0), Vec2::ZERO, Vec2::splat(0.25));
        rec.draw_quads(&texture, &[quad, quad]);
        rec.draw_quads(&texture, &[quad]);

        assert_eq!(rec.draw_call_count(), 2);
        assert_eq!(rec.vertex_floats().len(), 3 * AtlasQuad::FLOATS);
        assert_eq!(
            rec.commands()[1],
            DrawCommand::DrawQuads {
                texture: "tiles.png".into(),
                offset: 2 * AtlasQuad::FLOATS,
                count: 1,
            }
        );
        assert_eq!(rec.vertex_floats()[2], 16.0);

        rec.clear();
        assert!(rec.commands().is_empty());
        assert!(rec.vertex_floats().is_empty());
    }
}
