pub mod app;

pub use app::{
    font, run_app, AppError, Canvas, InputAction, InputSnapshot, LoopConfig, LoopMetricsSnapshot,
    Rect, Renderer, Rgba, Scene, SceneCommand, Vec2,
};
