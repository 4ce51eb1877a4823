//! The immutable result of resolving a schema.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::value::Value;
use crate::domain::errors::ResolveError;

/// A resolved configuration instance.
///
/// Holds one entry per declared field, in schema order, plus the extension
/// map of keys no declared field consumed. Instances are never mutated after
/// construction; display projections work on copies.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedConfig {
    fields: Vec<(String, Value)>,
    extras: BTreeMap<String, String>,
}

impl ResolvedConfig {
    pub(crate) const fn new(fields: Vec<(String, Value)>, extras: BTreeMap<String, String>) -> Self {
        Self { fields, extras }
    }

    /// Value of a declared field at this level.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Value at a dotted path such as `pool.max_size`.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;
        for segment in segments {
            current = current.as_nested()?.get(segment)?;
        }
        Some(current)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(Value::as_list)
    }

    pub fn get_nested(&self, name: &str) -> Option<&Self> {
        self.get(name).and_then(Value::as_nested)
    }

    /// Declared fields in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The extension map: unrecognized keys, prefix-stripped and lower-cased.
    pub const fn extra_fields(&self) -> &BTreeMap<String, String> {
        &self.extras
    }

    /// Look up an extension entry, ignoring case.
    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Unmasked JSON projection: declared fields followed by extension entries.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (name, value) in &self.fields {
            map.insert(name.clone(), value.to_json());
        }
        for (key, value) in &self.extras {
            map.entry(key.clone())
                .or_insert_with(|| serde_json::Value::String(value.clone()));
        }
        serde_json::Value::Object(map)
    }

    pub fn require_bool(&self, path: &str) -> Result<bool, ResolveError> {
        self.require(path, "bool", Value::as_bool)
    }

    pub fn require_int(&self, path: &str) -> Result<i64, ResolveError> {
        self.require(path, "int", Value::as_int)
    }

    pub fn require_float(&self, path: &str) -> Result<f64, ResolveError> {
        self.require(path, "float", Value::as_float)
    }

    pub fn require_str(&self, path: &str) -> Result<String, ResolveError> {
        self.require(path, "string", |v| v.as_str().map(String::from))
    }

    pub fn require_list(&self, path: &str) -> Result<Vec<String>, ResolveError> {
        self.require(path, "list-of-string", |v| v.as_list().map(<[String]>::to_vec))
    }

    pub fn require_nested(&self, path: &str) -> Result<&Self, ResolveError> {
        self.require(path, "nested", Value::as_nested)
    }

    /// Typed read used by `ConfigType::from_resolved`; a miss means the typed
    /// struct and its schema disagree.
    fn require<'a, T>(
        &'a self,
        path: &str,
        expected: &str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<T, ResolveError> {
        let value = self
            .get_path(path)
            .ok_or_else(|| ResolveError::schema(path, "field is not declared in the schema"))?;
        let found = value.type_name();
        extract(value).ok_or_else(|| {
            ResolveError::schema(path, format!("declared as {found}, read as {expected}"))
        })
    }
}

impl Serialize for ResolvedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + self.extras.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        for (key, value) in &self.extras {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
