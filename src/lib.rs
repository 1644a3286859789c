pub mod app;
pub mod config;
pub mod render;

// Re-export commonly used types
pub use app::{App, AppState, LoopState};
pub use config::{AppConfig, RenderConfig, WindowConfig};
pub use render::frame::Viewport;
pub use render::mesh::{barycentric_color, TriangleMesh, Vertex, TRIANGLE_VERTICES};
pub use render::driver::{GlDriver, ShaderDriver};
pub use render::shaders::{ShaderError, ShaderProgram, Stage};
