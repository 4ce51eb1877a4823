//! Display-time masking of sensitive values.
//!
//! Nothing here mutates a [`ResolvedConfig`]; every projection is built
//! fresh from the stored values.

use std::collections::BTreeMap;

use serde_json::{Map, Value as Json};

use crate::domain::models::{ResolvedConfig, Value};

/// Replacement for short sensitive values.
pub const MASK: &str = "******";

const SENSITIVE_SUFFIXES: [&str; 5] = ["password", "pw", "key", "secret", "credentials"];

/// Whether the terminal segment of a dotted path names a sensitive field.
pub fn is_sensitive(path: &str) -> bool {
    let terminal = path.rsplit('.').next().unwrap_or(path).to_lowercase();
    SENSITIVE_SUFFIXES
        .iter()
        .any(|suffix| terminal.ends_with(suffix))
}

/// Mask a rendered value: four characters or fewer become [`MASK`], longer
/// values keep only their first two and last two characters.
pub fn mask(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= 4 {
        return MASK.to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}...{tail}")
}

/// Masked projection keeping the nesting of the config. Extension entries
/// follow the declared fields and are masked by the same rule.
pub fn to_printable(config: &ResolvedConfig) -> Map<String, Json> {
    let mut printable = Map::new();
    for (name, value) in config.fields() {
        let shown = match value {
            Value::Nested(nested) => Json::Object(to_printable(nested)),
            leaf if is_sensitive(name) => Json::String(mask(&leaf.render())),
            leaf => leaf.to_json(),
        };
        printable.insert(name.to_string(), shown);
    }
    for (key, raw) in config.extra_fields() {
        let shown = if is_sensitive(key) {
            mask(raw)
        } else {
            raw.clone()
        };
        printable
            .entry(key.clone())
            .or_insert(Json::String(shown));
    }
    printable
}

/// Masked projection keyed by dot-joined field paths.
pub fn to_printable_flat(config: &ResolvedConfig) -> BTreeMap<String, Json> {
    let mut flat = BTreeMap::new();
    flatten_into(&to_printable(config), "", &mut flat);
    flat
}

fn flatten_into(map: &Map<String, Json>, parent: &str, out: &mut BTreeMap<String, Json>) {
    for (key, value) in map {
        let path = if parent.is_empty() {
            key.clone()
        } else {
            format!("{parent}.{key}")
        };
        match value {
            Json::Object(inner) => flatten_into(inner, &path, out),
            other => {
                out.insert(path, other.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ConfigSchema, FieldType};
    use crate::infrastructure::env::EnvSnapshot;
    use crate::services::resolver::{resolve_with, ResolveOptions};
    use serde_json::json;

    #[test]
    fn test_sensitive_suffixes() {
        for path in [
            "password",
            "db_password",
            "DB_PASSWORD",
            "smtp.pw",
            "api_key",
            "client_secret",
            "aws.credentials",
        ] {
            assert!(is_sensitive(path), "{path}");
        }
        for path in ["host", "port", "password.length", "keys", "secret_name"] {
            assert!(!is_sensitive(path), "{path}");
        }
    }

    #[test]
    fn test_mask_rules() {
        assert_eq!(mask("secret123"), "se...23");
        assert_eq!(mask("abcde"), "ab...de");
        assert_eq!(mask("abcd"), MASK);
        assert_eq!(mask(""), MASK);
        assert_eq!(mask("pässwört"), "pä...rt");
    }

    #[test]
    fn test_printable_masks_without_touching_config() {
        let schema = ConfigSchema::builder()
            .with_default("host", FieldType::String, "localhost")
            .with_default("port", FieldType::Int, 6379)
            .with_default("password", FieldType::String, "")
            .build()
            .unwrap();
        let snapshot = EnvSnapshot::from_pairs([
            ("REDIS_PASSWORD", "secret123"),
            ("REDIS_API_KEY", "k-123456"),
        ]);
        let config =
            resolve_with(&schema, &snapshot, &ResolveOptions::new().with_prefix("REDIS_")).unwrap();

        let printable = to_printable(&config);
        assert_eq!(printable["host"], json!("localhost"));
        assert_eq!(printable["port"], json!(6379));
        assert_eq!(printable["password"], json!("se...23"));
        assert_eq!(printable["api_key"], json!("k-...56"));

        assert_eq!(config.get_str("password"), Some("secret123"));
        assert_eq!(config.extra("api_key"), Some("k-123456"));
    }

    #[test]
    fn test_flat_projection_uses_dotted_paths() {
        let pool = ConfigSchema::builder()
            .with_default("max_size", FieldType::Int, 10)
            .with_default("admin_pw", FieldType::String, "hunter22")
            .build()
            .unwrap();
        let schema = ConfigSchema::builder().nested("pool", pool).build().unwrap();
        let config =
            resolve_with(&schema, &EnvSnapshot::default(), &ResolveOptions::new()).unwrap();

        let flat = to_printable_flat(&config);
        assert_eq!(flat["pool.max_size"], json!(10));
        assert_eq!(flat["pool.admin_pw"], json!("hu...22"));
    }
}
