use serde::{Deserialize, Serialize};

use crate::infrastructure::logging::LogConfig;
use crate::services::resolver::{DEFAULT_MAX_DEPTH, DEFAULT_SEPARATOR};

/// Configuration of the `envtree` tool itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ToolConfig {
    /// Defaults for config resolution, overridable per command
    #[serde(default)]
    pub resolver: ResolverSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Joins prefix, scopes and field names; doubled between nesting levels
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Deepest nesting level that is still read from the environment
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            max_depth: default_max_depth(),
        }
    }
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}
