//! envtree CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;

use envtree::cli::{handle_error, Cli};
use envtree::infrastructure::config::{ConfigLoader, ToolConfig};
use envtree::infrastructure::env::EnvSnapshot;
use envtree::infrastructure::logging::{load_levels, LoggerImpl};

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    if let Err(err) = run(cli) {
        handle_error(&err, json_mode);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    let levels = if config.logging.levels.is_empty() {
        load_levels(&EnvSnapshot::capture()).unwrap_or_default()
    } else {
        config.logging.levels.clone()
    };
    let _logger = LoggerImpl::init(&config.logging, &levels).context("Failed to initialize logging")?;

    envtree::cli::commands::execute(cli.command, &cli.resolve, &config.resolver, cli.json)
}

fn load_config(cli: &Cli) -> Result<ToolConfig> {
    match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}
