//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "envtree")]
#[command(about = "envtree - nested service configuration from environment variables", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Tool configuration file (defaults to ./envtree.yaml plus ENVTREE_* variables)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub resolve: ResolveArgs,
}

/// Flags shared by every command that resolves a config.
#[derive(Args, Debug, Clone, Default)]
pub struct ResolveArgs {
    /// Environment prefix, overriding the config's own
    #[arg(short, long, global = true)]
    pub prefix: Option<String>,

    /// Separator between prefix, scopes and field names
    #[arg(short, long, global = true)]
    pub separator: Option<String>,

    /// Deepest nesting level read from the environment
    #[arg(short = 'd', long, global = true)]
    pub max_depth: Option<usize>,

    /// YAML or JSON schema document registered under the given name
    #[arg(long, global = true)]
    pub schema: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a config and print it with sensitive values masked
    Show {
        /// Config name (redis, database, or any name with --schema)
        name: String,
    },

    /// List the environment variables a config reads
    Vars {
        /// Config name
        name: String,
    },

    /// Print the unrecognised variables captured under a config's prefix
    Extras {
        /// Config name
        name: String,
    },
}
