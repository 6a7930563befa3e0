pub mod canvas_renderer;
pub mod scene;

pub use canvas_renderer::CanvasRenderer;
pub use scene::*;
