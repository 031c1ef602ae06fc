use engine::{LoopConfig, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::core::Session;

use super::config::{load_config, ConfigError, ConfigInputs, GameConfig};
use super::scene::GameScene;

pub struct AppWiring {
    pub config: LoopConfig,
    pub scene: Box<dyn Scene>,
}

pub fn build_app() -> Result<AppWiring, ConfigError> {
    info!("=== 2048 Startup ===");

    let inputs = ConfigInputs::from_process()?;
    let loaded = load_config(&inputs)?;
    let config = loaded.config;
    info!(
        source = %loaded.source.describe(),
        move_velocity = config.move_velocity,
        target_tps = config.target_tps,
        seeded = config.seed.is_some(),
        "config_loaded"
    );

    let session = Session::new_game(config.layout(), rng_for(&config));
    Ok(AppWiring {
        config: loop_config_for(&config),
        scene: Box::new(GameScene::new(session)),
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn rng_for(config: &GameConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn loop_config_for(config: &GameConfig) -> LoopConfig {
    let (canvas_width, canvas_height) = config.layout().canvas_size();
    LoopConfig {
        window_title: config.window_title.clone(),
        window_width: config.window_width,
        window_height: config.window_height,
        canvas_width,
        canvas_height,
        target_tps: config.target_tps,
        max_render_fps: config.max_render_fps,
        show_overlay: config.show_overlay,
        ..LoopConfig::default()
    }
}
