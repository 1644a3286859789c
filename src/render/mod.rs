pub mod driver;
pub mod frame;
pub mod mesh;
pub mod shaders;

#[cfg(test)]
pub(crate) mod recording_driver;

pub use driver::{GlDriver, ShaderDriver};
pub use frame::Viewport;
pub use mesh::{TriangleMesh, Vertex, TRIANGLE_VERTICES};
pub use shaders::{ShaderError, ShaderProgram, Stage};
