//! Schema descriptions loaded from YAML or JSON documents.
//!
//! ```yaml
//! prefix: DB_
//! fields:
//!   - name: host
//!     type: string
//!   - name: pool
//!     type: nested
//!     fields:
//!       - name: max_size
//!         type: int
//!         default: 10
//! ```

use serde::Deserialize;

use super::schema::{ConfigSchema, FieldType};
use super::value::Value;
use crate::domain::errors::ResolveError;

/// A whole schema document.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaDocument {
    /// Environment prefix the schema is normally resolved under.
    #[serde(default)]
    pub prefix: Option<String>,
    pub fields: Vec<FieldDocument>,
}

/// One field entry of a [`SchemaDocument`].
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub default: Option<serde_yaml::Value>,
    /// Children of a nested field.
    #[serde(default)]
    pub fields: Vec<FieldDocument>,
}

/// Primitive type tag named in a document.
enum TypeTag {
    Primitive(FieldType),
    Nested,
}

fn parse_type_name(name: &str) -> Option<TypeTag> {
    let tag = match name.trim().to_lowercase().as_str() {
        "bool" | "boolean" => TypeTag::Primitive(FieldType::Bool),
        "int" | "integer" => TypeTag::Primitive(FieldType::Int),
        "float" | "number" => TypeTag::Primitive(FieldType::Float),
        "string" | "str" => TypeTag::Primitive(FieldType::String),
        "list" | "list[str]" | "list-of-string" => TypeTag::Primitive(FieldType::StringList),
        "nested" | "object" => TypeTag::Nested,
        _ => return None,
    };
    Some(tag)
}

impl SchemaDocument {
    /// Parse a document. YAML is a superset of JSON, so both are accepted.
    pub fn from_yaml_str(source: &str) -> Result<Self, ResolveError> {
        serde_yaml::from_str(source)
            .map_err(|e| ResolveError::schema("<document>", format!("invalid schema document: {e}")))
    }

    /// Map every declared field onto a supported type and build the schema.
    pub fn to_schema(&self) -> Result<ConfigSchema, ResolveError> {
        build_level(&self.fields, "")
    }
}

fn build_level(fields: &[FieldDocument], parent: &str) -> Result<ConfigSchema, ResolveError> {
    let mut builder = ConfigSchema::builder();

    for field in fields {
        let path = if parent.is_empty() {
            field.name.clone()
        } else {
            format!("{parent}.{}", field.name)
        };

        let tag = parse_type_name(&field.type_name).ok_or_else(|| {
            ResolveError::schema(&path, format!("unsupported type `{}`", field.type_name))
        })?;

        builder = match tag {
            TypeTag::Nested => {
                if field.default.is_some() {
                    return Err(ResolveError::schema(
                        &path,
                        "nested fields take their defaults from their children",
                    ));
                }
                builder.nested(field.name.clone(), build_level(&field.fields, &path)?)
            }
            TypeTag::Primitive(field_type) => {
                if !field.fields.is_empty() {
                    return Err(ResolveError::schema(
                        &path,
                        format!("a {} field cannot declare children", field_type.type_name()),
                    ));
                }
                match field.default.as_ref().map(|d| yaml_default(d, &field_type, &path)) {
                    Some(Err(e)) => return Err(e),
                    Some(Ok(Some(default))) => {
                        builder.with_default(field.name.clone(), field_type, default)
                    }
                    Some(Ok(None)) | None => builder.required(field.name.clone(), field_type),
                }
            }
        };
    }

    builder.build().map_err(|e| match e {
        ResolveError::Schema { path, reason } if !parent.is_empty() => {
            ResolveError::schema(format!("{parent}.{path}"), reason)
        }
        other => other,
    })
}

/// Convert a document default. `null` means "no default". String fields
/// accept any scalar.
fn yaml_default(
    value: &serde_yaml::Value,
    field_type: &FieldType,
    path: &str,
) -> Result<Option<Value>, ResolveError> {
    use serde_yaml::Value as Yaml;

    let converted = match (value, field_type) {
        (Yaml::Null, _) => return Ok(None),
        (Yaml::Bool(b), FieldType::String) => Value::Str(b.to_string()),
        (Yaml::Number(n), FieldType::String) => Value::Str(n.to_string()),
        (Yaml::Bool(b), _) => Value::Bool(*b),
        (Yaml::Number(n), _) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Value::Int(i),
            (None, Some(f)) => Value::Float(f),
            _ => return Err(ResolveError::schema(path, format!("default {n} is out of range"))),
        },
        (Yaml::String(s), _) => Value::Str(s.clone()),
        (Yaml::Sequence(items), _) => Value::List(
            items
                .iter()
                .map(|item| match item {
                    Yaml::String(s) => Ok(s.clone()),
                    Yaml::Number(n) => Ok(n.to_string()),
                    Yaml::Bool(b) => Ok(b.to_string()),
                    _ => Err(ResolveError::schema(path, "list defaults must hold scalars")),
                })
                .collect::<Result<_, _>>()?,
        ),
        _ => {
            return Err(ResolveError::schema(
                path,
                "defaults must be scalars or lists of scalars",
            ))
        }
    };
    Ok(Some(converted))
}
