//! Engine configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via SANCTUM_CONFIG or --config)
//! 3. Environment variables

use sanctum_zlmp::{AllocStrategy, Decoder, Encoder, DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wire codec configuration.
    pub codec: CodecConfig,
    /// Cast loop configuration.
    pub cast: CastConfig,
}

impl Config {
    /// Loads configuration from file, then applies environment variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var("SANCTUM_CONFIG") {
            Ok(path) => Self::load_from(Some(path)),
            Err(_) => Self::load_from(None::<PathBuf>),
        }
    }

    /// Loads from an explicit file (if any), then applies environment overrides.
    pub fn load_from(path: Option<impl AsRef<Path>>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        self.codec.apply_env_overrides();
        self.cast.apply_env_overrides();
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.codec.validate()?;
        self.cast.validate()
    }
}

/// Buffer allocation strategy name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Pre-compute the exact size, allocate once.
    #[default]
    Exact,
    /// Start small and double.
    Growable,
}

/// Wire codec configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Allocation strategy for encoding.
    pub strategy: StrategyKind,
    /// Initial buffer capacity for the growable strategy.
    pub initial_capacity: usize,
    /// Maximum map nesting depth.
    pub max_depth: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Exact,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CodecConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(strategy) = std::env::var("SANCTUM_STRATEGY") {
            match strategy.to_lowercase().as_str() {
                "exact" => self.strategy = StrategyKind::Exact,
                "growable" => self.strategy = StrategyKind::Growable,
                _ => {}
            }
        }

        if let Ok(capacity) = std::env::var("SANCTUM_INITIAL_CAPACITY") {
            if let Ok(n) = capacity.parse() {
                self.initial_capacity = n;
            }
        }

        if let Ok(depth) = std::env::var("SANCTUM_MAX_DEPTH") {
            if let Ok(n) = depth.parse() {
                self.max_depth = n;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ValidationError(
                "codec.max_depth must be at least 1".to_string(),
            ));
        }
        if self.strategy == StrategyKind::Growable && self.initial_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "growable strategy needs a non-zero initial_capacity".to_string(),
            ));
        }
        Ok(())
    }

    pub fn alloc_strategy(&self) -> AllocStrategy {
        match self.strategy {
            StrategyKind::Exact => AllocStrategy::Exact,
            StrategyKind::Growable => AllocStrategy::Growable {
                initial_capacity: self.initial_capacity,
            },
        }
    }

    pub fn encoder(&self) -> Encoder {
        Encoder::new()
            .with_strategy(self.alloc_strategy())
            .with_max_depth(self.max_depth)
    }

    pub fn decoder(&self) -> Decoder {
        Decoder::new().with_max_depth(self.max_depth)
    }
}

/// Cast loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CastConfig {
    /// Maximum number of spell invocations per cast.
    pub max_steps: u64,
}

impl Default for CastConfig {
    fn default() -> Self {
        Self { max_steps: 1 }
    }
}

impl CastConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(steps) = std::env::var("SANCTUM_MAX_STEPS") {
            if let Ok(n) = steps.parse() {
                self.max_steps = n;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_steps == 0 {
            return Err(ConfigError::ValidationError(
                "cast.max_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug)]
pub enum ConfigError {
    IoError(PathBuf, std::io::Error),
    ParseError(PathBuf, String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, e) => {
                write!(f, "failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::ValidationError(msg) => {
                write!(f, "configuration validation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
