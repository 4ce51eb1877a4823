use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as Json;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::levels::levels_from_value;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Console log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console output format (json, pretty, plain)
    #[serde(default = "default_format")]
    pub format: LogFormat,

    /// Directory for JSON log files (optional, if None logs only to the console)
    pub log_dir: Option<PathBuf>,

    /// Log level for the file output
    #[serde(default = "default_file_level")]
    pub file_level: String,

    /// Enable console logging on stderr; stdout carries command output
    #[serde(default = "default_true")]
    pub enable_console: bool,

    /// Log rotation policy
    #[serde(default)]
    pub rotation: RotationPolicy,

    /// Per-target levels keyed by dotted target name, e.g. `hyper.proto: warn`.
    /// Nested mappings flatten the same way `LOGGING_LEVELS` does. When
    /// empty, `LOGGING_LEVELS_FILE` / `LOGGING_LEVELS` are consulted.
    #[serde(default, deserialize_with = "deserialize_levels")]
    pub levels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    /// Single-line text, coloured only when stderr is a terminal
    Plain,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            log_dir: None,
            file_level: default_file_level(),
            enable_console: true,
            rotation: RotationPolicy::default(),
            levels: BTreeMap::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_format() -> LogFormat {
    LogFormat::Plain
}

fn default_file_level() -> String {
    "warn".to_string()
}

const fn default_true() -> bool {
    true
}

fn deserialize_levels<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Json::deserialize(deserializer)? {
        Json::Null => Ok(BTreeMap::new()),
        value @ Json::Object(_) => Ok(levels_from_value(&value, "logging.levels").unwrap_or_default()),
        other => Err(D::Error::custom(format!(
            "logging.levels must map target names to levels, found {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_levels_flatten_to_dotted_targets() {
        let yaml = "levels:\n  envtree:\n    services: TRACE\n  hyper.proto: warning\n";
        let config: LogConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.levels,
            BTreeMap::from([
                ("envtree.services".to_string(), "trace".to_string()),
                ("hyper.proto".to_string(), "warn".to_string()),
            ])
        );
    }

    #[test]
    fn test_levels_must_be_a_mapping() {
        assert!(serde_yaml::from_str::<LogConfig>("levels: debug\n").is_err());
        let config: LogConfig = serde_yaml::from_str("levels:\n").unwrap();
        assert!(config.levels.is_empty());
    }
}
