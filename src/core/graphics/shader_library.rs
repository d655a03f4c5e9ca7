//=========================================================================
// Shader Library
//=========================================================================
//
// In-memory `ShaderCache`. Keeps shader sources and the last value of
// every matrix uniform so sprite renderers can upload them when they
// build their pipelines.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use glam::Mat4;
use log::debug;

//=== Internal Dependencies ===============================================

use super::{Shader, ShaderCache, ShaderError};

//=== ShaderProgram =======================================================

#[derive(Debug, Clone, Default)]
pub struct ShaderProgram {
    name: String,
    vertex_source: String,
    fragment_source: String,
    uniforms: HashMap<String, Mat4>,
    in_use: bool,
}

impl ShaderProgram {
    pub fn new(name: impl Into<String>, vertex_source: String, fragment_source: String) -> Self {
        Self {
            name: name.into(),
            vertex_source,
            fragment_source,
            uniforms: HashMap::new(),
            in_use: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_source(&self) -> &str {
        &self.vertex_source
    }

    pub fn fragment_source(&self) -> &str {
        &self.fragment_source
    }

    pub fn uniform(&self, name: &str) -> Option<&Mat4> {
        self.uniforms.get(name)
    }

    /// Whether the program was made current by the last uniform write.
    pub fn in_use(&self) -> bool {
        self.in_use
    }
}

impl Shader for ShaderProgram {
    fn set_matrix4(&mut self, uniform: &str, matrix: &Mat4, use_program: bool) {
        if use_program {
            self.in_use = true;
        }
        self.uniforms.insert(uniform.to_owned(), *matrix);
    }

    fn matrix4(&self, uniform: &str) -> Option<Mat4> {
        self.uniforms.get(uniform).copied()
    }
}

//=== ShaderLibrary =======================================================

#[derive(Debug, Default)]
pub struct ShaderLibrary {
    programs: HashMap<String, ShaderProgram>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a program built from in-memory sources, replacing any
    /// program of the same name.
    pub fn insert(&mut self, program: ShaderProgram) {
        self.programs.insert(program.name.clone(), program);
    }

    pub fn get(&self, name: &str) -> Option<&ShaderProgram> {
        self.programs.get(name)
    }
}

impl ShaderCache for ShaderLibrary {
    fn load_shader(&mut self, vertex: &Path, fragment: &Path, name: &str) -> Result<(), ShaderError> {
        let read = |path: &Path| {
            fs::read_to_string(path).map_err(|source| ShaderError::Source {
                path: path.to_path_buf(),
                source,
            })
        };

        let program = ShaderProgram::new(name, read(vertex)?, read(fragment)?);
        debug!(target: "graphics", "Loaded shader {:?} ({} + {})", name, vertex.display(), fragment.display());
        self.insert(program);
        Ok(())
    }

    fn shader_mut(&mut self, name: &str) -> Option<&mut dyn Shader> {
        self.programs
            .get_mut(name)
            .map(|program| program as &mut dyn Shader)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn set_matrix4_records_uniform_and_use() {
        let mut program = ShaderProgram::new("Sprite", String::new(), String::new());
        let view = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 0.0));

        program.set_matrix4("view", &view, false);
        assert!(!program.in_use());
        assert_eq!(program.uniform("view"), Some(&view));

        program.set_matrix4("projection", &Mat4::IDENTITY, true);
        assert!(program.in_use());
        assert_eq!(program.matrix4("projection"), Some(Mat4::IDENTITY));
        assert_eq!(program.matrix4("model"), None);
    }

    #[test]
    fn load_shader_reads_both_sources() {
        let mut vert = tempfile::NamedTempFile::new().unwrap();
        let mut frag = tempfile::NamedTempFile::new().unwrap();
        write!(vert, "void main() {{}} // vert").unwrap();
        write!(frag, "void main() {{}} // frag").unwrap();

        let mut library = ShaderLibrary::new();
        library.load_shader(vert.path(), frag.path(), "Sprite").unwrap();

        let program = library.get("Sprite").unwrap();
        assert!(program.vertex_source().ends_with("// vert"));
        assert!(program.fragment_source().ends_with("// frag"));
        assert!(library.shader_mut("Sprite").is_some());
    }

    #[test]
    fn missing_source_is_an_error_and_registers_nothing() {
        let mut library = ShaderLibrary::new();
        let result = library.load_shader(
            Path::new("/nonexistent/sprite.vert"),
            Path::new("/nonexistent/sprite.frag"),
            "Sprite",
        );

        assert!(matches!(result, Err(ShaderError::Source { .. })));
        assert!(library.shader_mut("Sprite").is_none());
    }
}
