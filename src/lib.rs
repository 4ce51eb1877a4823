//! envtree - nested service configuration from environment variables
//!
//! envtree resolves typed, possibly nested configuration objects from
//! prefixed environment variables. A schema declares the fields; a nested
//! field is addressed by doubling the separator (`DB_POOL__MAX_SIZE` is
//! `pool.max_size` under prefix `DB_`). Unknown variables under the prefix
//! are kept in an extension map, and sensitive values are masked whenever a
//! config is rendered for display.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): schemas, resolved values and errors
//! - **Service Layer** (`services`): coercion, recursive resolution, extras capture, masking
//! - **Application Layer** (`application`): the lazily cached settings registry
//! - **Infrastructure Layer** (`infrastructure`): environment snapshots, tool config, logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use envtree::{resolve, ConfigSchema, FieldType, ResolveOptions};
//!
//! # fn main() -> Result<(), envtree::ResolveError> {
//! let schema = ConfigSchema::builder()
//!     .with_default("host", FieldType::String, "localhost")
//!     .with_default("port", FieldType::Int, 6379)
//!     .with_default("password", FieldType::String, "")
//!     .build()?;
//!
//! let config = resolve(&schema, &ResolveOptions::new().with_prefix("REDIS_"))?;
//! println!("{}:{}", config.get_str("host").unwrap_or_default(), config.get_int("port").unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::{SettingsError, SettingsRegistry};
pub use domain::errors::ResolveError;
pub use domain::models::{
    ConfigSchema, ConfigType, DatabaseConfig, FieldDescriptor, FieldType, PoolConfig, RedisConfig,
    ResolvedConfig, SchemaBuilder, SchemaDocument, Value,
};
pub use infrastructure::config::{ConfigError, ConfigLoader, ToolConfig};
pub use infrastructure::env::EnvSnapshot;
pub use services::{
    construct, resolve, resolve_with, to_printable, to_printable_flat, ResolveOptions,
};
