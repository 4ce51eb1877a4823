//! Environment key construction and lookup.

use serde::Serialize;

use super::snapshot::{canonical_key, EnvSnapshot};
use crate::domain::errors::ResolveError;
use crate::domain::models::{ConfigSchema, FieldType};

/// Builds candidate environment keys for a schema under a prefix.
///
/// A field key is `scope + name`. Entering a nested field extends the scope
/// with `name + separator + separator`; the doubled separator tells
/// `DB_POOL__SIZE` (field `size` inside `pool`) apart from `DB_POOL_SIZE`
/// (flat field `pool_size`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyResolver {
    prefix: String,
    separator: String,
}

/// One candidate environment variable of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvVarName {
    pub key: String,
    pub path: String,
    pub type_name: &'static str,
    pub required: bool,
}

impl KeyResolver {
    pub fn new(prefix: &str, separator: &str) -> Self {
        Self {
            prefix: canonical_key(prefix),
            separator: canonical_key(separator),
        }
    }

    /// Top-level scope, in canonical case.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Key of a field within `scope`.
    pub fn field_key(&self, scope: &str, name: &str) -> String {
        canonical_key(&format!("{scope}{name}"))
    }

    /// Scope of a nested field's children.
    pub fn child_scope(&self, scope: &str, name: &str) -> String {
        canonical_key(&format!("{scope}{name}{sep}{sep}", sep = self.separator))
    }

    /// Case-insensitive lookup; absence is not an error.
    pub fn lookup<'a>(&self, snapshot: &'a EnvSnapshot, key: &str) -> Option<&'a str> {
        snapshot.get(key)
    }

    /// Strip the top-level prefix from a canonical key.
    pub fn relative<'k>(&self, key: &'k str) -> Option<&'k str> {
        key.strip_prefix(self.prefix.as_str())
    }

    /// Reject field names that would read another field's key: a name may
    /// not contain the doubled separator, nor start or end with the
    /// separator.
    pub fn check_names(&self, schema: &ConfigSchema) -> Result<(), ResolveError> {
        self.check_names_under(schema, "")
    }

    fn check_names_under(&self, schema: &ConfigSchema, parent: &str) -> Result<(), ResolveError> {
        let sep = self.separator.as_str();
        let doubled = sep.repeat(2);
        for field in schema.fields() {
            let path = join_path(parent, field.name());
            let name = canonical_key(field.name());
            if name.contains(&doubled) || name.starts_with(sep) || name.ends_with(sep) {
                return Err(ResolveError::schema(
                    path,
                    format!("field name cannot contain `{doubled}` or start or end with `{sep}`"),
                ));
            }
            if let FieldType::Nested(child) = field.field_type() {
                self.check_names_under(child, &path)?;
            }
        }
        Ok(())
    }

    /// Every key the schema reads, descending nested fields while the depth
    /// stays below `max_depth`.
    pub fn env_var_names(&self, schema: &ConfigSchema, max_depth: usize) -> Vec<EnvVarName> {
        let mut names = Vec::new();
        self.collect_names(schema, &self.prefix, "", 0, max_depth, &mut names);
        names
    }

    fn collect_names(
        &self,
        schema: &ConfigSchema,
        scope: &str,
        parent: &str,
        depth: usize,
        max_depth: usize,
        out: &mut Vec<EnvVarName>,
    ) {
        for field in schema.fields() {
            let path = join_path(parent, field.name());
            match field.field_type() {
                FieldType::Nested(child) if depth < max_depth => {
                    let child_scope = self.child_scope(scope, field.name());
                    self.collect_names(child, &child_scope, &path, depth + 1, max_depth, out);
                }
                FieldType::Nested(_) => {}
                other => out.push(EnvVarName {
                    key: self.field_key(scope, field.name()),
                    path,
                    type_name: other.type_name(),
                    required: field.is_required(),
                }),
            }
        }
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}
