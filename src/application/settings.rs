//! Application settings registry.
//!
//! Holds named configs, each a schema plus the prefix it resolves under.
//! Entries resolve on first access and are cached for the registry's
//! lifetime. All entries read the same snapshot, captured when the registry
//! is built.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use thiserror::Error;
use tracing::debug;

use crate::domain::errors::ResolveError;
use crate::domain::models::{ConfigSchema, ConfigType, DatabaseConfig, RedisConfig, ResolvedConfig};
use crate::infrastructure::env::EnvSnapshot;
use crate::services::resolver::{resolve_with, ResolveOptions, DEFAULT_MAX_DEPTH, DEFAULT_SEPARATOR};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Unknown config `{0}`")]
    UnknownConfig(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

#[derive(Debug)]
struct Entry {
    schema: Arc<ConfigSchema>,
    prefix: String,
    resolved: OnceLock<ResolvedConfig>,
}

/// Lazily resolved, cached named configs.
#[derive(Debug)]
pub struct SettingsRegistry {
    snapshot: EnvSnapshot,
    separator: String,
    max_depth: usize,
    entries: BTreeMap<String, Entry>,
}

impl SettingsRegistry {
    pub fn new(snapshot: EnvSnapshot) -> Self {
        Self {
            snapshot,
            separator: DEFAULT_SEPARATOR.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            entries: BTreeMap::new(),
        }
    }

    /// Registry over a snapshot of the current process environment.
    pub fn from_env() -> Self {
        Self::new(EnvSnapshot::capture())
    }

    #[must_use]
    pub fn with_resolver(mut self, separator: impl Into<String>, max_depth: usize) -> Self {
        self.separator = separator.into();
        self.max_depth = max_depth;
        self
    }

    /// Register the built-in `redis` and `database` configs.
    pub fn with_builtin_services(mut self) -> Result<Self, ResolveError> {
        self.register_type::<RedisConfig>("redis")?;
        self.register_type::<DatabaseConfig>("database")?;
        Ok(self)
    }

    /// Register a schema under `name`. Re-registering a name replaces the
    /// entry and drops its cached value.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        schema: impl Into<Arc<ConfigSchema>>,
        prefix: impl Into<String>,
    ) {
        self.entries.insert(
            name.into(),
            Entry {
                schema: schema.into(),
                prefix: prefix.into(),
                resolved: OnceLock::new(),
            },
        );
    }

    /// Register a [`ConfigType`] under its own prefix.
    pub fn register_type<T: ConfigType>(&mut self, name: impl Into<String>) -> Result<(), ResolveError> {
        let schema = T::schema()?.clone();
        self.register(name, schema, T::PREFIX);
        Ok(())
    }

    /// The snapshot every entry resolves against.
    pub const fn snapshot(&self) -> &EnvSnapshot {
        &self.snapshot
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn schema(&self, name: &str) -> Option<&ConfigSchema> {
        self.entries.get(name).map(|e| e.schema.as_ref())
    }

    pub fn prefix(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|e| e.prefix.as_str())
    }

    /// Options an entry resolves with.
    pub fn options_for(&self, name: &str) -> Result<ResolveOptions, SettingsError> {
        let entry = self.entry(name)?;
        Ok(self.options(entry))
    }

    /// The resolved config for `name`, resolving it on first access.
    pub fn get(&self, name: &str) -> Result<&ResolvedConfig, SettingsError> {
        let entry = self.entry(name)?;
        if let Some(resolved) = entry.resolved.get() {
            return Ok(resolved);
        }

        debug!(config = name, prefix = %entry.prefix, "resolving config on first access");
        let resolved = resolve_with(&entry.schema, &self.snapshot, &self.options(entry))?;
        Ok(entry.resolved.get_or_init(|| resolved))
    }

    /// Read a registered config back as its typed struct.
    pub fn typed<T: ConfigType>(&self, name: &str) -> Result<T, SettingsError> {
        Ok(T::from_resolved(self.get(name)?)?)
    }

    pub fn redis(&self) -> Result<RedisConfig, SettingsError> {
        self.typed("redis")
    }

    pub fn database(&self) -> Result<DatabaseConfig, SettingsError> {
        self.typed("database")
    }

    fn entry(&self, name: &str) -> Result<&Entry, SettingsError> {
        self.entries
            .get(name)
            .ok_or_else(|| SettingsError::UnknownConfig(name.to_string()))
    }

    fn options(&self, entry: &Entry) -> ResolveOptions {
        ResolveOptions::new()
            .with_prefix(entry.prefix.clone())
            .with_separator(self.separator.clone())
            .with_max_depth(self.max_depth)
    }
}
