//! Built-in service configurations.
//!
//! Each type declares its fields once, as a schema, and reads them back from
//! the resolved config. Nothing here duplicates fields into an application
//! level settings object.

use std::sync::OnceLock;

use serde::Serialize;

use super::resolved::ResolvedConfig;
use super::schema::{cached_schema, ConfigSchema, ConfigType, FieldType};
use crate::domain::errors::ResolveError;

/// Redis connection settings (`REDIS_*`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: String,
    pub db: i64,
}

impl ConfigType for RedisConfig {
    const PREFIX: &'static str = "REDIS_";

    fn schema() -> Result<&'static ConfigSchema, ResolveError> {
        static SCHEMA: OnceLock<Result<ConfigSchema, ResolveError>> = OnceLock::new();
        cached_schema(&SCHEMA, || {
            ConfigSchema::builder()
                .with_default("host", FieldType::String, "localhost")
                .with_default("port", FieldType::Int, 6379)
                .with_default("password", FieldType::String, "")
                .with_default("db", FieldType::Int, 0)
                .build()
        })
    }

    fn from_resolved(config: &ResolvedConfig) -> Result<Self, ResolveError> {
        Ok(Self {
            host: config.require_str("host")?,
            port: port(config, "port")?,
            password: config.require_str("password")?,
            db: config.require_int("db")?,
        })
    }
}

impl RedisConfig {
    /// Connection URL, without the password.
    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}

/// Connection pool settings nested under a database config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolConfig {
    pub max_size: u32,
    pub min_size: u32,
    /// Acquire timeout in seconds.
    pub timeout: f64,
    pub pre_ping: bool,
}

impl ConfigType for PoolConfig {
    const PREFIX: &'static str = "POOL_";

    fn schema() -> Result<&'static ConfigSchema, ResolveError> {
        static SCHEMA: OnceLock<Result<ConfigSchema, ResolveError>> = OnceLock::new();
        cached_schema(&SCHEMA, || {
            ConfigSchema::builder()
                .with_default("max_size", FieldType::Int, 10)
                .with_default("min_size", FieldType::Int, 1)
                .with_default("timeout", FieldType::Float, 30.0)
                .with_default("pre_ping", FieldType::Bool, true)
                .build()
        })
    }

    fn from_resolved(config: &ResolvedConfig) -> Result<Self, ResolveError> {
        Ok(Self {
            max_size: unsigned(config, "max_size")?,
            min_size: unsigned(config, "min_size")?,
            timeout: config.require_float("timeout")?,
            pre_ping: config.require_bool("pre_ping")?,
        })
    }
}

/// Database settings (`DB_*`), with the pool nested under `DB_POOL__*`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub replicas: Vec<String>,
    pub pool: PoolConfig,
}

impl ConfigType for DatabaseConfig {
    const PREFIX: &'static str = "DB_";

    fn schema() -> Result<&'static ConfigSchema, ResolveError> {
        static SCHEMA: OnceLock<Result<ConfigSchema, ResolveError>> = OnceLock::new();
        cached_schema(&SCHEMA, || {
            ConfigSchema::builder()
                .required("host", FieldType::String)
                .with_default("port", FieldType::Int, 5432)
                .with_default("name", FieldType::String, "app")
                .with_default("user", FieldType::String, "postgres")
                .with_default("password", FieldType::String, "")
                .with_default("replicas", FieldType::StringList, Vec::<String>::new())
                .nested("pool", PoolConfig::schema()?.clone())
                .build()
        })
    }

    fn from_resolved(config: &ResolvedConfig) -> Result<Self, ResolveError> {
        Ok(Self {
            host: config.require_str("host")?,
            port: port(config, "port")?,
            name: config.require_str("name")?,
            user: config.require_str("user")?,
            password: config.require_str("password")?,
            replicas: config.require_list("replicas")?,
            pool: PoolConfig::from_resolved(config.require_nested("pool")?)
                .map_err(|e| prefix_path("pool", e))?,
        })
    }
}

fn port(config: &ResolvedConfig, path: &str) -> Result<u16, ResolveError> {
    let raw = config.require_int(path)?;
    u16::try_from(raw).map_err(|_| ResolveError::coercion(path, raw.to_string(), "port (0-65535)"))
}

fn unsigned(config: &ResolvedConfig, path: &str) -> Result<u32, ResolveError> {
    let raw = config.require_int(path)?;
    u32::try_from(raw).map_err(|_| ResolveError::coercion(path, raw.to_string(), "unsigned int"))
}

fn prefix_path(parent: &str, err: ResolveError) -> ResolveError {
    match err {
        ResolveError::Schema { path, reason } => ResolveError::Schema {
            path: format!("{parent}.{path}"),
            reason,
        },
        ResolveError::MissingField { path } => ResolveError::MissingField {
            path: format!("{parent}.{path}"),
        },
        ResolveError::Coercion {
            path,
            raw,
            expected,
        } => ResolveError::Coercion {
            path: format!("{parent}.{path}"),
            raw,
            expected,
        },
        ResolveError::DepthExceeded { path, max_depth } => ResolveError::DepthExceeded {
            path: format!("{parent}.{path}"),
            max_depth,
        },
    }
}
