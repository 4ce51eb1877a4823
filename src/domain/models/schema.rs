//! Statically declared configuration schemas.
//!
//! A schema is the ordered list of field descriptors for one config type.
//! Schemas are declared once, either with [`ConfigSchema::builder`] or from a
//! [`SchemaDocument`](super::schema_document::SchemaDocument), and are
//! read-only afterwards. Nested fields hold their child schema behind an
//! `Arc` so cached schemas can be shared between parents.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, OnceLock};

use super::resolved::ResolvedConfig;
use super::value::Value;
use crate::domain::errors::ResolveError;

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    String,
    StringList,
    Nested(Arc<ConfigSchema>),
}

impl FieldType {
    /// Short type tag used in error messages and listings.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::StringList => "list-of-string",
            Self::Nested(_) => "nested",
        }
    }

    pub const fn is_nested(&self) -> bool {
        matches!(self, Self::Nested(_))
    }

    /// Child schema of a nested field.
    pub fn child(&self) -> Option<&ConfigSchema> {
        match self {
            Self::Nested(schema) => Some(schema),
            _ => None,
        }
    }

    /// Fit a declared default to this type. Integral defaults widen to float.
    fn fit_default(&self, value: Value) -> Option<Value> {
        match (self, value) {
            (Self::Bool, v @ Value::Bool(_))
            | (Self::Int, v @ Value::Int(_))
            | (Self::Float, v @ Value::Float(_))
            | (Self::String, v @ Value::Str(_))
            | (Self::StringList, v @ Value::List(_)) => Some(v),
            #[allow(clippy::cast_precision_loss)]
            (Self::Float, Value::Int(n)) => Some(Value::Float(n as f64)),
            _ => None,
        }
    }
}

/// One declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    field_type: FieldType,
    default: Option<Value>,
}

impl FieldDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Declared default. For a nested field this is the child schema's
    /// all-default value, present only when every child has a default.
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub const fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Ordered field descriptors for one config type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigSchema {
    fields: Vec<FieldDescriptor>,
}

impl ConfigSchema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether every field, recursively, has a default.
    pub fn is_fully_defaulted(&self) -> bool {
        self.fields.iter().all(|f| f.default.is_some())
    }

    /// The config made of declared defaults only, if every field has one.
    pub fn default_config(&self) -> Option<ResolvedConfig> {
        let fields = self
            .fields
            .iter()
            .map(|f| f.default.clone().map(|v| (f.name.clone(), v)))
            .collect::<Option<Vec<_>>>()?;
        Some(ResolvedConfig::new(fields, BTreeMap::new()))
    }
}

/// Builder for [`ConfigSchema`]. Declaration errors are reported by
/// [`SchemaBuilder::build`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<(String, FieldType, Option<Value>)>,
}

impl SchemaBuilder {
    /// Declare a field with no default.
    #[must_use]
    pub fn required(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push((name.into(), field_type, None));
        self
    }

    /// Declare a field with a default value.
    #[must_use]
    pub fn with_default(
        mut self,
        name: impl Into<String>,
        field_type: FieldType,
        default: impl Into<Value>,
    ) -> Self {
        self.fields
            .push((name.into(), field_type, Some(default.into())));
        self
    }

    /// Declare a nested field backed by a child schema.
    #[must_use]
    pub fn nested(mut self, name: impl Into<String>, child: impl Into<Arc<ConfigSchema>>) -> Self {
        self.fields
            .push((name.into(), FieldType::Nested(child.into()), None));
        self
    }

    pub fn build(self) -> Result<ConfigSchema, ResolveError> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(self.fields.len());

        for (name, field_type, default) in self.fields {
            if name.trim().is_empty() {
                return Err(ResolveError::schema("<unnamed>", "field name cannot be empty"));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(ResolveError::schema(&name, "field declared twice"));
            }

            let default = match &field_type {
                FieldType::Nested(child) => {
                    if child.is_empty() {
                        return Err(ResolveError::schema(&name, "nested schema has no fields"));
                    }
                    if default.is_some() {
                        return Err(ResolveError::schema(
                            &name,
                            "nested fields take their defaults from the child schema",
                        ));
                    }
                    child.default_config().map(Value::Nested)
                }
                _ => match default {
                    Some(value) => {
                        let found = value.type_name();
                        Some(field_type.fit_default(value).ok_or_else(|| {
                            ResolveError::schema(
                                &name,
                                format!(
                                    "default of type {found} does not match declared type {}",
                                    field_type.type_name()
                                ),
                            )
                        })?)
                    }
                    None => None,
                },
            };

            fields.push(FieldDescriptor {
                name,
                field_type,
                default,
            });
        }

        Ok(ConfigSchema { fields })
    }
}

/// A Rust type whose fields are declared once as a schema and read back
/// from a resolved config.
pub trait ConfigType: Sized {
    /// Environment prefix the type resolves under by default.
    const PREFIX: &'static str;

    fn schema() -> Result<&'static ConfigSchema, ResolveError>;

    fn from_resolved(config: &ResolvedConfig) -> Result<Self, ResolveError>;
}

/// Build a schema once per type and hand out the cached result.
pub fn cached_schema(
    cell: &'static OnceLock<Result<ConfigSchema, ResolveError>>,
    build: impl FnOnce() -> Result<ConfigSchema, ResolveError>,
) -> Result<&'static ConfigSchema, ResolveError> {
    cell.get_or_init(build).as_ref().map_err(Clone::clone)
}
