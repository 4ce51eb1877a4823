use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use super::tool_config::ToolConfig;

/// Deepest `max_depth` the tool accepts
pub const MAX_DEPTH_LIMIT: usize = 16;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Resolver separator cannot be empty")]
    EmptySeparator,

    #[error("Invalid max_depth: {0}. Must be at most {MAX_DEPTH_LIMIT}")]
    InvalidMaxDepth(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid file log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidFileLogLevel(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. envtree.yaml in the working directory (optional)
    /// 3. Environment variables (`ENVTREE_*` prefix, `__` between sections)
    pub fn load() -> Result<ToolConfig> {
        let config: ToolConfig = Figment::new()
            .merge(Serialized::defaults(ToolConfig::default()))
            .merge(Yaml::file("envtree.yaml"))
            .merge(Env::prefixed("ENVTREE_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<ToolConfig> {
        let config: ToolConfig = Figment::new()
            .merge(Serialized::defaults(ToolConfig::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &ToolConfig) -> Result<(), ConfigError> {
        if config.resolver.separator.is_empty() {
            return Err(ConfigError::EmptySeparator);
        }

        if config.resolver.max_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::InvalidMaxDepth(config.resolver.max_depth));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        if !valid_log_levels.contains(&config.logging.file_level.as_str()) {
            return Err(ConfigError::InvalidFileLogLevel(
                config.logging.file_level.clone(),
            ));
        }

        Ok(())
    }
}
