//! Schema-driven resolution of a configuration from an environment snapshot.
//!
//! Each leaf field takes its value from, in order: the snapshot at the
//! field's key, the call-site defaults, the field's declared default. Nested
//! fields recurse with a child scope until `max_depth` is reached; past that
//! point a nested field falls back to its declared default or fails with
//! [`ResolveError::DepthExceeded`], and every key under its child scope
//! counts as consumed. Keys under the prefix that no field visited end up in
//! the extension map.

use std::collections::BTreeMap;

use serde_json::{Map, Value as Json};
use tracing::{debug, info, instrument};

use super::coercion::{coerce, coerce_json};
use super::extras::{collect_extras, ConsumedKeys};
use crate::domain::errors::ResolveError;
use crate::domain::models::{ConfigSchema, FieldType, ResolvedConfig, Value};
use crate::infrastructure::env::{EnvSnapshot, KeyResolver};

/// Default nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Default separator between prefix, nested scopes and field names.
pub const DEFAULT_SEPARATOR: &str = "_";

/// Arguments of a resolution call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveOptions {
    pub prefix: String,
    pub separator: String,
    pub max_depth: usize,
    /// Call-site defaults, as nested objects or dotted paths.
    pub defaults: Map<String, Json>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            separator: DEFAULT_SEPARATOR.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            defaults: Map::new(),
        }
    }
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: Map<String, Json>) -> Self {
        self.defaults = defaults;
        self
    }

    /// Add one call-site default; `path` may be dotted.
    #[must_use]
    pub fn with_default(mut self, path: impl Into<String>, value: impl Into<Json>) -> Self {
        self.defaults.insert(path.into(), value.into());
        self
    }
}

/// Resolve `schema` against a fresh snapshot of the process environment.
pub fn resolve(schema: &ConfigSchema, options: &ResolveOptions) -> Result<ResolvedConfig, ResolveError> {
    let snapshot = EnvSnapshot::capture();
    resolve_with(schema, &snapshot, options)
}

/// Resolve `schema` against an explicit snapshot.
#[instrument(skip_all, fields(prefix = %options.prefix, max_depth = options.max_depth))]
pub fn resolve_with(
    schema: &ConfigSchema,
    snapshot: &EnvSnapshot,
    options: &ResolveOptions,
) -> Result<ResolvedConfig, ResolveError> {
    if options.separator.is_empty() {
        return Err(ResolveError::schema("<options>", "separator cannot be empty"));
    }

    let keys = KeyResolver::new(&options.prefix, &options.separator);
    keys.check_names(schema)?;
    let defaults = expand_dotted(&options.defaults)?;
    let mut engine = Engine {
        snapshot,
        keys: &keys,
        max_depth: options.max_depth,
        consumed: ConsumedKeys::new(),
    };

    let fields = engine.resolve_fields(schema, keys.prefix(), "", Some(&defaults), 0)?;
    let extras = collect_extras(snapshot, &keys, &engine.consumed);

    info!(
        prefix = %keys.prefix(),
        fields = fields.len(),
        extras = extras.len(),
        "configuration resolved"
    );

    Ok(ResolvedConfig::new(fields, extras))
}

struct Engine<'a> {
    snapshot: &'a EnvSnapshot,
    keys: &'a KeyResolver,
    max_depth: usize,
    consumed: ConsumedKeys,
}

impl Engine<'_> {
    fn resolve_fields(
        &mut self,
        schema: &ConfigSchema,
        scope: &str,
        parent: &str,
        defaults: Option<&Map<String, Json>>,
        depth: usize,
    ) -> Result<Vec<(String, Value)>, ResolveError> {
        let mut resolved = Vec::with_capacity(schema.len());

        for field in schema.fields() {
            let name = field.name();
            let path = join_path(parent, name);
            let key = self.keys.field_key(scope, name);
            self.consumed.insert_key(key.clone());

            let call_site = defaults.and_then(|d| find_default(d, name));

            let value = match field.field_type() {
                FieldType::Nested(child) => {
                    if depth >= self.max_depth {
                        debug!(field = %path, depth, "nesting limit reached, using declared default");
                        self.consumed.insert_scope(self.keys.child_scope(scope, name));
                        field.default().cloned().ok_or_else(|| ResolveError::DepthExceeded {
                            path: path.clone(),
                            max_depth: self.max_depth,
                        })?
                    } else {
                        let child_defaults = match call_site {
                            None | Some(Json::Null) => None,
                            Some(Json::Object(map)) => Some(map),
                            Some(other) => {
                                return Err(ResolveError::coercion(&path, other.to_string(), "nested"))
                            }
                        };
                        let child_scope = self.keys.child_scope(scope, name);
                        let fields =
                            self.resolve_fields(child, &child_scope, &path, child_defaults, depth + 1)?;
                        Value::Nested(ResolvedConfig::new(fields, BTreeMap::new()))
                    }
                }
                field_type => {
                    if let Some(raw) = self.keys.lookup(self.snapshot, &key) {
                        debug!(field = %path, key = %key, source = "env", "field resolved");
                        coerce(raw, field_type, &path)?
                    } else if let Some(value) = call_site
                        .map(|v| coerce_json(v, field_type, &path))
                        .transpose()?
                        .flatten()
                    {
                        debug!(field = %path, source = "defaults", "field resolved");
                        value
                    } else if let Some(value) = field.default() {
                        debug!(field = %path, source = "declared", "field resolved");
                        value.clone()
                    } else {
                        return Err(ResolveError::MissingField { path });
                    }
                }
            };

            resolved.push((name.to_string(), value));
        }

        Ok(resolved)
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn find_default<'m>(defaults: &'m Map<String, Json>, name: &str) -> Option<&'m Json> {
    defaults.get(name).or_else(|| {
        defaults
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

/// Turn dotted keys (`pool.max_size`) into nested objects, merging with
/// objects given directly.
pub(crate) fn expand_dotted(defaults: &Map<String, Json>) -> Result<Map<String, Json>, ResolveError> {
    let mut expanded = Map::new();
    for (key, value) in defaults {
        let segments: Vec<&str> = key.split('.').collect();
        insert_at(&mut expanded, &segments, value.clone(), key)?;
    }
    Ok(expanded)
}

fn insert_at(
    map: &mut Map<String, Json>,
    segments: &[&str],
    value: Json,
    full_key: &str,
) -> Result<(), ResolveError> {
    let conflict = || ResolveError::schema(full_key, "call-site default conflicts with another entry");

    match segments {
        [] => Ok(()),
        [last] => {
            if let Some(existing) = map.get_mut(*last) {
                return match (existing, value) {
                    (Json::Object(existing), Json::Object(incoming)) => {
                        for (k, v) in incoming {
                            insert_at(existing, &[k.as_str()], v, full_key)?;
                        }
                        Ok(())
                    }
                    _ => Err(conflict()),
                };
            }
            map.insert((*last).to_string(), value);
            Ok(())
        }
        [head, rest @ ..] => {
            let entry = map
                .entry((*head).to_string())
                .or_insert_with(|| Json::Object(Map::new()));
            match entry {
                Json::Object(inner) => insert_at(inner, rest, value, full_key),
                _ => Err(conflict()),
            }
        }
    }
}
