mod canvas;
pub mod font;
mod renderer;

pub use canvas::{Canvas, Rect, Rgba};
pub use renderer::Renderer;
