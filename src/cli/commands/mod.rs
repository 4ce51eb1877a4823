//! CLI command implementations.

pub mod extras;
pub mod show;
pub mod vars;

use std::fs;

use anyhow::{Context, Result};

use crate::application::{SettingsError, SettingsRegistry};
use crate::cli::types::{Commands, ResolveArgs};
use crate::domain::models::SchemaDocument;
use crate::infrastructure::config::ResolverSettings;
use crate::infrastructure::env::EnvSnapshot;

/// Run one command against a snapshot of the current environment.
pub fn execute(
    command: Commands,
    args: &ResolveArgs,
    settings: &ResolverSettings,
    json_mode: bool,
) -> Result<()> {
    let snapshot = EnvSnapshot::capture();
    match command {
        Commands::Show { name } => {
            let registry = build_registry(snapshot, args, settings, &name)?;
            show::execute(&registry, &name, json_mode)
        }
        Commands::Vars { name } => {
            let registry = build_registry(snapshot, args, settings, &name)?;
            vars::execute(&registry, &name, json_mode)
        }
        Commands::Extras { name } => {
            let registry = build_registry(snapshot, args, settings, &name)?;
            extras::execute(&registry, &name, json_mode)
        }
    }
}

/// Registry with the built-in services plus whatever the flags add.
///
/// `--schema` registers the document under `name`; its prefix comes from
/// `--prefix`, then the document, then empty. Without `--schema`, `--prefix`
/// re-registers the named config under the new prefix.
pub fn build_registry(
    snapshot: EnvSnapshot,
    args: &ResolveArgs,
    settings: &ResolverSettings,
    name: &str,
) -> Result<SettingsRegistry> {
    let separator = args
        .separator
        .clone()
        .unwrap_or_else(|| settings.separator.clone());
    let max_depth = args.max_depth.unwrap_or(settings.max_depth);

    let mut registry = SettingsRegistry::new(snapshot)
        .with_resolver(separator, max_depth)
        .with_builtin_services()
        .context("Failed to build built-in service schemas")?;

    if let Some(path) = &args.schema {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file {}", path.display()))?;
        let document = SchemaDocument::from_yaml_str(&source)
            .with_context(|| format!("Failed to parse schema file {}", path.display()))?;
        let schema = document.to_schema()?;
        let prefix = args
            .prefix
            .clone()
            .or_else(|| document.prefix.clone())
            .unwrap_or_default();
        registry.register(name, schema, prefix);
    } else if let Some(prefix) = &args.prefix {
        let schema = registry
            .schema(name)
            .cloned()
            .ok_or_else(|| SettingsError::UnknownConfig(name.to_string()))?;
        registry.register(name, schema, prefix.clone());
    }

    Ok(registry)
}
