// shaders.rs - GL shader program built from a vertex/fragment pair

use gl::types::*;
use log::{debug, error, trace};
use std::ffi::{CString, NulError};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::driver::{GlDriver, ShaderDriver};
pub use super::driver::INFO_LOG_CAPACITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    pub fn gl_enum(self) -> GLenum {
        match self {
            Stage::Vertex => gl::VERTEX_SHADER,
            Stage::Fragment => gl::FRAGMENT_SHADER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Vertex => "VERTEX",
            Stage::Fragment => "FRAGMENT",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{stage} shader compilation failed: {log}")]
    Compilation { stage: Stage, log: String },
    #[error("Program linking failed: {log}")]
    Linking { log: String },
    #[error("Failed to read shader source {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Null byte error: {0}")]
    Nul(#[from] NulError),
}

/// A linked vertex + fragment program. The program object is deleted on drop.
pub struct ShaderProgram<D: ShaderDriver = GlDriver> {
    id: GLuint,
    driver: D,
}

/// Built-in sources for the colored triangle
pub mod triangle_shaders {
    /// Passes the per-vertex color through to the fragment stage
    pub const VERTEX_SRC: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;
layout (location = 1) in vec3 aColor;

out vec3 ourColor;

void main() {
    gl_Position = vec4(aPos, 1.0);
    ourColor = aColor;
}
"#;

    pub const FRAGMENT_SRC: &str = r#"#version 330 core
out vec4 FragColor;

in vec3 ourColor;

void main() {
    FragColor = vec4(ourColor, 1.0);
}
"#;
}

impl ShaderProgram {
    pub fn from_sources(vertex_source: &str, fragment_source: &str) -> Result<Self, ShaderError> {
        Self::build(GlDriver, vertex_source, fragment_source)
    }

    /// Reads both files completely and builds the program from their contents.
    pub fn from_files(
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        Self::build_from_files(GlDriver, vertex_path, fragment_path)
    }
}

impl<D: ShaderDriver> ShaderProgram<D> {
    /// Compiles both stages and links them.
    ///
    /// Both stages are always compiled so every diagnostic reaches the log,
    /// but linking is skipped when either one failed. The intermediate stage
    /// objects never outlive this call.
    pub fn build(driver: D, vertex_source: &str, fragment_source: &str) -> Result<Self, ShaderError> {
        let vertex = Self::compile_stage(&driver, vertex_source, Stage::Vertex);
        let fragment = Self::compile_stage(&driver, fragment_source, Stage::Fragment);

        let (vertex_shader, fragment_shader) = match (vertex, fragment) {
            (Ok(vertex_shader), Ok(fragment_shader)) => (vertex_shader, fragment_shader),
            (Err(err), fragment) => {
                if let Ok(fragment_shader) = fragment {
                    driver.delete_shader(fragment_shader);
                }
                return Err(err);
            }
            (Ok(vertex_shader), Err(err)) => {
                driver.delete_shader(vertex_shader);
                return Err(err);
            }
        };

        let program = driver.link_program(vertex_shader, fragment_shader);
        driver.delete_shader(vertex_shader);
        driver.delete_shader(fragment_shader);

        if !driver.link_status(program) {
            let log = driver.program_info_log(program);
            error!("Shader program linking failed:\n{}", log);
            driver.delete_program(program);
            return Err(ShaderError::Linking { log });
        }

        debug!("Linked shader program {}", program);
        Ok(ShaderProgram { id: program, driver })
    }

    pub fn build_from_files(
        driver: D,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let vertex_source = load_source(vertex_path.as_ref())?;
        let fragment_source = load_source(fragment_path.as_ref())?;
        Self::build(driver, &vertex_source, &fragment_source)
    }

    fn compile_stage(driver: &D, source: &str, stage: Stage) -> Result<GLuint, ShaderError> {
        let c_str = CString::new(source.as_bytes())?;
        let shader = driver.compile_shader(stage, &c_str);

        if !driver.compile_status(shader) {
            let log = driver.shader_info_log(shader);
            error!("{} shader compilation failed:\n{}", stage, log);
            driver.delete_shader(shader);
            return Err(ShaderError::Compilation { stage, log });
        }

        debug!("Compiled {} shader {}", stage, shader);
        Ok(shader)
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    /// Makes this the active program for subsequent draw calls.
    pub fn set_used(&self) {
        self.driver.use_program(self.id);
    }

    /// Queries the driver every time. `None` for names that are not an
    /// active uniform of this program, including names with a NUL byte.
    pub fn uniform_location(&self, name: &str) -> Option<GLint> {
        let Ok(cname) = CString::new(name) else {
            trace!("Uniform name {:?} contains a NUL byte", name);
            return None;
        };

        let location = self.driver.uniform_location(self.id, &cname);
        if location == -1 {
            trace!("Uniform '{}' not active in program {}", name, self.id);
            return None;
        }
        Some(location)
    }

    // Uniform setters. The program is only bound once the uniform is known
    // to exist, so a missing name leaves GL state untouched.
    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_int(name, value as i32);
    }

    pub fn set_int(&self, name: &str, value: i32) {
        if let Some(location) = self.uniform_location(name) {
            self.set_used();
            self.driver.uniform_1i(location, value);
        }
    }

    pub fn set_float(&self, name: &str, value: f32) {
        if let Some(location) = self.uniform_location(name) {
            self.set_used();
            self.driver.uniform_1f(location, value);
        }
    }

    pub fn set_vec4(&self, name: &str, value: [f32; 4]) {
        if let Some(location) = self.uniform_location(name) {
            self.set_used();
            self.driver.uniform_4f(location, value);
        }
    }
}

impl<D: ShaderDriver> fmt::Debug for ShaderProgram<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<D: ShaderDriver> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        self.driver.delete_program(self.id);
    }
}

/// Reads a whole shader file as text. Failures are logged and returned,
/// the caller decides whether to fall back.
pub fn load_source(path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| {
        error!("Failed to load shader source {}: {}", path.display(), source);
        ShaderError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}
