pub mod bootstrap;
pub mod button;
pub mod config;
pub mod loop_runner;
pub mod render;
pub mod scene;
