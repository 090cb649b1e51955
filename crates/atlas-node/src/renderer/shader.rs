use std::collections::HashMap;
use std::rc::Rc;

/// Textured quads tinted by a single `u_color` uniform.
pub const SHADER_POSITION_TEXTURE_UCOLOR: &str = "ShaderPositionTextureUColor";
/// Textured quads with per-vertex color.
pub const SHADER_POSITION_TEXTURE_COLOR: &str = "ShaderPositionTextureColor";

pub const UNIFORM_COLOR: &str = "u_color";
pub const UNIFORM_MVP_MATRIX: &str = "u_mvp_matrix";

/// Opaque handle to a uniform slot within a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// A linked shader program, reduced to what nodes need: its name and the
/// locations of its uniforms.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderProgram {
    name: String,
    uniforms: HashMap<String, UniformLocation>,
}

impl ShaderProgram {
    /// Uniform locations are assigned in declaration order.
    pub fn new(name: impl Into<String>, uniforms: &[&str]) -> Self {
        let uniforms = uniforms
            .iter()
            .enumerate()
            .map(|(i, u)| (u.to_string(), UniformLocation(i as u32)))
            .collect();
        Self {
            name: name.into(),
            uniforms,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uniform_location(&self, uniform: &str) -> Option<UniformLocation> {
        self.uniforms.get(uniform).copied()
    }
}

/// Named shader programs, resolved by key.
pub struct ShaderCache {
    programs: HashMap<String, Rc<ShaderProgram>>,
}

impl ShaderCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self {
            programs: HashMap::new(),
        }
    }

    /// A cache preloaded with the built-in programs.
    pub fn with_defaults() -> Self {
        let mut cache = Self::new();
        cache.reload_defaults();
        cache
    }

    /// (Re)register the built-in programs, replacing any with the same key.
    pub fn reload_defaults(&mut self) {
        self.add_program(ShaderProgram::new(
            SHADER_POSITION_TEXTURE_UCOLOR,
            &[UNIFORM_MVP_MATRIX, UNIFORM_COLOR],
        ));
        self.add_program(ShaderProgram::new(
            SHADER_POSITION_TEXTURE_COLOR,
            &[UNIFORM_MVP_MATRIX],
        ));
    }

    pub fn add_program(&mut self, program: ShaderProgram) -> Rc<ShaderProgram> {
        let program = Rc::new(program);
        self.programs.insert(program.name().to_string(), Rc::clone(&program));
        program
    }

    pub fn program(&self, name: &str) -> Option<Rc<ShaderProgram>> {
        self.programs.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

impl Default for ShaderCache {
    fn default() -> Self {
        Self::with_defaults()
    }
}
