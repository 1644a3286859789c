use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: [f32; 4],
    /// Optional on-disk shader pair. Both must be set to replace the built-in sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertex_shader: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment_shader: Option<PathBuf>,
    /// Drain `glGetError` after every frame instead of only after setup.
    pub debug_gl_errors: bool,
}

impl RenderConfig {
    pub fn shader_paths(&self) -> Option<(&PathBuf, &PathBuf)> {
        match (&self.vertex_shader, &self.fragment_shader) {
            (Some(vertex), Some(fragment)) => Some((vertex, fragment)),
            _ => None,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.2, 0.3, 0.3, 1.0],
            vertex_shader: None,
            fragment_shader: None,
            debug_gl_errors: false,
        }
    }
}
