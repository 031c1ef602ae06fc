mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod tools;

pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{font, Canvas, Rect, Renderer, Rgba};
pub use scene::{InputSnapshot, Scene, SceneCommand, Vec2};
