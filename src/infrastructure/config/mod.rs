//! Configuration management infrastructure
//!
//! Hierarchical configuration of the tool itself using figment:
//! - YAML file loading
//! - Environment variable overrides (`ENVTREE_*`)
//! - Configuration validation

pub mod loader;
pub mod tool_config;

pub use loader::{ConfigError, ConfigLoader};
pub use tool_config::{ResolverSettings, ToolConfig};
