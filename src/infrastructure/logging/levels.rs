//! Per-target log levels from the environment.
//!
//! `LOGGING_LEVELS_FILE` names a `.json`, `.yaml` or `.yml` file and takes
//! priority; `LOGGING_LEVELS` holds the same mapping inline, as JSON or YAML.
//! Nested mappings flatten to dotted names:
//!
//! ```yaml
//! hyper:
//!   proto: WARN      # -> hyper.proto = warn
//! envtree: DEBUG
//! ```
//!
//! Problems are reported on stderr and never stop startup, since this runs
//! before any subscriber exists.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value as Json;

use crate::infrastructure::env::EnvSnapshot;

pub const LEVELS_ENV: &str = "LOGGING_LEVELS";
pub const LEVELS_FILE_ENV: &str = "LOGGING_LEVELS_FILE";

/// Levels from `LOGGING_LEVELS_FILE`, falling back to `LOGGING_LEVELS`.
pub fn load_levels(snapshot: &EnvSnapshot) -> Option<BTreeMap<String, String>> {
    if let Some(path) = snapshot.get(LEVELS_FILE_ENV).filter(|p| !p.is_empty()) {
        if let Some(levels) = load_levels_file(Path::new(path)) {
            return Some(levels);
        }
    }

    let inline = snapshot.get(LEVELS_ENV).filter(|v| !v.is_empty())?;
    parse_inline(inline)
}

/// Read a levels file; the format follows the extension.
pub fn load_levels_file(path: &Path) -> Option<BTreeMap<String, String>> {
    let path: PathBuf = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };

    if !path.exists() {
        eprintln!("Warning: Logger levels file not found: {}", path.display());
        return None;
    }

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Warning: Failed to read logger levels file {}: {e}", path.display());
            return None;
        }
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let parsed: Result<Json, String> = match extension.as_str() {
        "json" => serde_json::from_str(&content).map_err(|e| e.to_string()),
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
        other => {
            eprintln!("Warning: Unsupported file extension: .{other} (use .json, .yaml, or .yml)");
            return None;
        }
    };

    match parsed {
        Ok(value) => levels_from_value(&value, &path.display().to_string()),
        Err(e) => {
            eprintln!("Warning: Failed to parse logger levels file {}: {e}", path.display());
            None
        }
    }
}

/// Parse an inline mapping, trying JSON first and YAML second.
pub fn parse_inline(value: &str) -> Option<BTreeMap<String, String>> {
    let parsed = serde_json::from_str::<Json>(value)
        .or_else(|_| serde_yaml::from_str::<Json>(value));

    match parsed {
        Ok(value) => levels_from_value(&value, LEVELS_ENV),
        Err(e) => {
            eprintln!("Warning: Failed to parse {LEVELS_ENV} as JSON or YAML: {e}");
            None
        }
    }
}

/// Map a level name onto a `tracing` level. `WARNING` and `CRITICAL` are
/// accepted for compatibility with other logging stacks.
pub fn normalize_level(level: &str) -> Option<&'static str> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" | "critical" | "fatal" => Some("error"),
        "off" => Some("off"),
        _ => None,
    }
}

/// `EnvFilter` directives for dotted target names.
pub fn to_directives(levels: &BTreeMap<String, String>) -> Vec<String> {
    levels
        .iter()
        .filter_map(|(target, level)| {
            let Some(level) = normalize_level(level) else {
                eprintln!("Warning: Invalid log level {level:?} for {target}");
                return None;
            };
            Some(format!("{}={level}", target.replace('.', "::")))
        })
        .collect()
}

/// Flatten a mapping of target names to levels, nested mappings joined with
/// dots, keeping only valid levels.
pub fn levels_from_value(value: &Json, source: &str) -> Option<BTreeMap<String, String>> {
    let Json::Object(map) = value else {
        eprintln!("Warning: {source} must contain a mapping of logger names to levels");
        return None;
    };

    let mut flattened = BTreeMap::new();
    flatten_levels(map, "", &mut flattened);

    Some(
        flattened
            .into_iter()
            .filter_map(|(name, level)| match normalize_level(&level) {
                Some(normalized) => Some((name, normalized.to_string())),
                None => {
                    eprintln!("Warning: Invalid log level {level:?} for {name}");
                    None
                }
            })
            .collect(),
    )
}

fn flatten_levels(
    map: &serde_json::Map<String, Json>,
    parent: &str,
    out: &mut BTreeMap<String, String>,
) {
    for (key, value) in map {
        let name = if parent.is_empty() {
            key.clone()
        } else {
            format!("{parent}.{key}")
        };
        match value {
            Json::Object(inner) => flatten_levels(inner, &name, out),
            Json::String(level) => {
                out.insert(name, level.clone());
            }
            other => eprintln!("Warning: Invalid logger level type for {name}: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn levels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_inline_json() {
        let parsed = parse_inline(r#"{"hyper.proto": "INFO", "reqwest": "WARN"}"#).unwrap();
        assert_eq!(parsed, levels(&[("hyper.proto", "info"), ("reqwest", "warn")]));
    }

    #[test]
    fn test_inline_yaml_nested() {
        let parsed = parse_inline("hyper:\n  proto: WARNING\nenvtree: DEBUG").unwrap();
        assert_eq!(parsed, levels(&[("envtree", "debug"), ("hyper.proto", "warn")]));
    }

    #[test]
    fn test_inline_rejects_non_mapping() {
        assert!(parse_inline("INFO").is_none());
        assert!(parse_inline("[1, 2]").is_none());
    }

    #[test]
    fn test_invalid_levels_and_leaves_are_skipped() {
        let parsed = parse_inline(r#"{"a": "LOUD", "b": 3, "c": "critical"}"#).unwrap();
        assert_eq!(parsed, levels(&[("c", "error")]));
    }

    #[test]
    fn test_directives_use_rust_targets() {
        let directives = to_directives(&levels(&[("envtree.services", "debug"), ("h2", "WARN")]));
        assert_eq!(directives, vec!["envtree::services=debug", "h2=warn"]);
    }

    #[test]
    fn test_levels_file_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "envtree:\n  services: trace").unwrap();
        file.flush().unwrap();

        let parsed = load_levels_file(file.path()).unwrap();
        assert_eq!(parsed, levels(&[("envtree.services", "trace")]));
    }

    #[test]
    fn test_levels_file_unsupported_extension() {
        let file = NamedTempFile::with_suffix(".toml").unwrap();
        assert!(load_levels_file(file.path()).is_none());
    }

    #[test]
    fn test_file_takes_priority_over_inline() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(file, r#"{{"from_file": "info"}}"#).unwrap();
        file.flush().unwrap();
        let path = file.path().display().to_string();

        let snapshot = EnvSnapshot::from_pairs([
            (LEVELS_FILE_ENV, path.as_str()),
            (LEVELS_ENV, r#"{"inline": "debug"}"#),
        ]);
        assert_eq!(load_levels(&snapshot), Some(levels(&[("from_file", "info")])));
    }

    #[test]
    fn test_missing_file_falls_back_to_inline() {
        let snapshot = EnvSnapshot::from_pairs([
            (LEVELS_FILE_ENV, "/nonexistent/levels.yaml"),
            (LEVELS_ENV, r#"{"inline": "debug"}"#),
        ]);
        assert_eq!(load_levels(&snapshot), Some(levels(&[("inline", "debug")])));
    }

    #[test]
    fn test_nothing_configured() {
        assert_eq!(load_levels(&EnvSnapshot::default()), None);
    }
}
