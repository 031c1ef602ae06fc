use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::core::BoardLayout;

pub const CONFIG_ENV_VAR: &str = "GAME2048_CONFIG";
pub const SEED_ENV_VAR: &str = "GAME2048_SEED";
pub const DEFAULT_CONFIG_FILE: &str = "game2048.json";

const MAX_TARGET_TPS: u32 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve working directory: {0}")]
    WorkingDir(#[source] io::Error),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path} at {field}: {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
    #[error("{var} must be an unsigned 64-bit integer, got {value:?}")]
    InvalidSeed { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_render_fps: Option<u32>,
    pub move_velocity: i32,
    pub seed: Option<u64>,
    pub show_overlay: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        let (canvas_width, canvas_height) = BoardLayout::default().canvas_size();
        Self {
            window_title: "2048".to_string(),
            window_width: canvas_width,
            window_height: canvas_height,
            target_tps: 60,
            max_render_fps: None,
            move_velocity: BoardLayout::default().move_velocity,
            seed: None,
            show_overlay: false,
        }
    }
}

impl GameConfig {
    pub fn layout(&self) -> BoardLayout {
        BoardLayout::default().with_move_velocity(self.move_velocity)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::Invalid {
                field: "window_width/window_height",
                message: format!(
                    "window must be non-empty, got {}x{}",
                    self.window_width, self.window_height
                ),
            });
        }
        if self.target_tps == 0 || self.target_tps > MAX_TARGET_TPS {
            return Err(ConfigError::Invalid {
                field: "target_tps",
                message: format!("expected 1..={MAX_TARGET_TPS}, got {}", self.target_tps),
            });
        }
        if !self.layout().velocity_divides_cells() {
            let layout = BoardLayout::default();
            return Err(ConfigError::Invalid {
                field: "move_velocity",
                message: format!(
                    "expected a positive divisor of {}x{}, got {}",
                    layout.cell_width, layout.cell_height, self.move_velocity
                ),
            });
        }
        Ok(())
    }
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    EnvPath(PathBuf),
    WorkingDir(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn describe(&self) -> String {
        match self {
            ConfigSource::EnvPath(path) => format!("env:{}", path.display()),
            ConfigSource::WorkingDir(path) => format!("file:{}", path.display()),
            ConfigSource::Defaults => "defaults".to_string(),
        }
    }
}

/// Process inputs that influence configuration, captured up front so loading
/// stays testable without touching the real environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigInputs {
    pub config_path: Option<PathBuf>,
    pub seed: Option<String>,
    pub working_dir: PathBuf,
}

impl ConfigInputs {
    pub fn from_process() -> Result<Self, ConfigError> {
        Ok(Self {
            config_path: read_env_var(CONFIG_ENV_VAR)?.map(PathBuf::from),
            seed: read_env_var(SEED_ENV_VAR)?,
            working_dir: env::current_dir().map_err(ConfigError::WorkingDir)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: GameConfig,
    pub source: ConfigSource,
}

pub fn load_config(inputs: &ConfigInputs) -> Result<LoadedConfig, ConfigError> {
    let (mut config, source) = match &inputs.config_path {
        Some(path) => (read_config_file(path)?, ConfigSource::EnvPath(path.clone())),
        None => {
            let candidate = inputs.working_dir.join(DEFAULT_CONFIG_FILE);
            if candidate.is_file() {
                (
                    read_config_file(&candidate)?,
                    ConfigSource::WorkingDir(candidate),
                )
            } else {
                (GameConfig::default(), ConfigSource::Defaults)
            }
        }
    };

    if let Some(raw) = inputs.seed.as_deref() {
        config.seed = Some(parse_seed(raw)?);
    }
    config.validate()?;
    Ok(LoadedConfig { config, source })
}

pub fn read_config_file(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&raw, path)
}

pub fn parse_config(raw: &str, path: &Path) -> Result<GameConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, GameConfig>(&mut deserializer).map_err(|error| {
        let field = match error.path().to_string() {
            field if field.is_empty() || field == "." => "<root>".to_string(),
            field => field,
        };
        ConfigError::Parse {
            path: path.to_path_buf(),
            field,
            source: error.into_inner(),
        }
    })
}

fn parse_seed(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidSeed {
            var: SEED_ENV_VAR,
            value: raw.to_string(),
        })
}

fn read_env_var(var: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(var) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(source) => Err(ConfigError::EnvVar { var, source }),
    }
}
