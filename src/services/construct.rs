//! Direct construction from explicit values, e.g. a request payload.
//!
//! Scalars in the payload are flattened into the same key space the
//! environment uses and resolved by the same engine, so a constructed config
//! obeys the same invariants as a resolved one: every declared field present,
//! unknown keys in the extension map, identical masking. Arrays given for
//! declared fields skip the literal rules and are applied as typed values, so
//! list elements keep their commas and surrounding spaces.

use serde_json::{Map, Value as Json};

use super::resolver::{expand_dotted, resolve_with, ResolveOptions};
use crate::domain::errors::ResolveError;
use crate::domain::models::{ConfigSchema, FieldType, ResolvedConfig};
use crate::infrastructure::env::EnvSnapshot;

/// Build a config from explicit field values plus arbitrary extra values.
///
/// Nested fields are given as objects; anything else for a nested field is a
/// [`ResolveError::Coercion`]. The prefix in `options` is ignored; separator,
/// depth limit and call-site defaults apply as usual, with payload values
/// taking precedence over call-site defaults.
pub fn construct(
    schema: &ConfigSchema,
    payload: &Map<String, Json>,
    options: &ResolveOptions,
) -> Result<ResolvedConfig, ResolveError> {
    let mut flattener = Flattener {
        separator: &options.separator,
        pairs: Vec::new(),
        typed: Vec::new(),
    };
    flattener.walk(payload, Some(schema), "", &[])?;

    let mut defaults = expand_dotted(&options.defaults)?;
    for (segments, value) in flattener.typed {
        override_at(&mut defaults, &segments, value);
    }

    let snapshot = EnvSnapshot::from_pairs(flattener.pairs);
    let options = ResolveOptions {
        prefix: String::new(),
        defaults,
        ..options.clone()
    };
    resolve_with(schema, &snapshot, &options)
}

struct Flattener<'a> {
    separator: &'a str,
    /// Snapshot entries for scalars and for keys the schema does not declare.
    pairs: Vec<(String, String)>,
    /// Values applied as call-site overrides, by field path.
    typed: Vec<(Vec<String>, Json)>,
}

impl Flattener<'_> {
    fn walk(
        &mut self,
        payload: &Map<String, Json>,
        schema: Option<&ConfigSchema>,
        scope: &str,
        parent: &[String],
    ) -> Result<(), ResolveError> {
        for (name, value) in payload {
            let key = format!("{scope}{name}");
            let field = schema.and_then(|s| s.field(name));

            match (field.map(|f| (f.name(), f.field_type())), value) {
                (_, Json::Null) => {}
                (Some((field_name, FieldType::Nested(child))), Json::Object(inner)) => {
                    let child_scope = format!("{key}{sep}{sep}", sep = self.separator);
                    let path = extend(parent, field_name);
                    self.walk(inner, Some(child.as_ref()), &child_scope, &path)?;
                }
                (Some((field_name, FieldType::Nested(_))), other) => {
                    return Err(ResolveError::coercion(
                        extend(parent, field_name).join("."),
                        other.to_string(),
                        "nested",
                    ));
                }
                (Some((field_name, _)), Json::Array(_)) => {
                    self.typed.push((extend(parent, field_name), value.clone()));
                }
                (None, Json::Object(inner)) => {
                    let child_scope = format!("{key}{sep}{sep}", sep = self.separator);
                    self.walk(inner, None, &child_scope, parent)?;
                }
                (_, Json::String(s)) => self.pairs.push((key, s.clone())),
                (_, Json::Array(items)) => {
                    let joined = items
                        .iter()
                        .map(|item| match item {
                            Json::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect::<Vec<_>>()
                        .join(",");
                    self.pairs.push((key, joined));
                }
                (_, other) => self.pairs.push((key, other.to_string())),
            }
        }
        Ok(())
    }
}

fn extend(parent: &[String], name: &str) -> Vec<String> {
    let mut path = parent.to_vec();
    path.push(name.to_string());
    path
}

/// Set `value` at `segments`, replacing whatever default sat there. Existing
/// keys are matched ignoring case, as field lookup does.
fn override_at(map: &mut Map<String, Json>, segments: &[String], value: Json) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    let key = if map.contains_key(head) {
        head.clone()
    } else {
        map.keys()
            .find(|k| k.eq_ignore_ascii_case(head))
            .cloned()
            .unwrap_or_else(|| head.clone())
    };

    if rest.is_empty() {
        map.insert(key, value);
        return;
    }
    let entry = map.entry(key).or_insert_with(|| Json::Object(Map::new()));
    if !entry.is_object() {
        *entry = Json::Object(Map::new());
    }
    if let Json::Object(inner) = entry {
        override_at(inner, rest, value);
    }
}
