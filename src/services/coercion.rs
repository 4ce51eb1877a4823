//! Conversion of raw literals into declared field types.

use crate::domain::errors::ResolveError;
use crate::domain::models::{FieldType, Value};

const TRUE_LITERALS: [&str; 4] = ["true", "1", "yes", "on"];
const FALSE_LITERALS: [&str; 4] = ["false", "0", "no", "off"];

/// Parse a boolean literal, ignoring case.
pub fn parse_bool(raw: &str) -> Option<bool> {
    let lowered = raw.to_lowercase();
    if TRUE_LITERALS.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSE_LITERALS.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Optional sign followed by decimal digits.
pub fn parse_int(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

/// Decimal or exponential literal. `inf` and `NaN` are not configuration
/// values, and neither is anything that overflows to them.
pub fn parse_float(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Comma-separated list with each element trimmed. Blank input is the empty
/// list.
pub fn split_list(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|item| item.trim().to_string()).collect()
}

/// Coerce a raw string for the field at `path`.
pub fn coerce(raw: &str, field_type: &FieldType, path: &str) -> Result<Value, ResolveError> {
    let expected = field_type.type_name();
    let fail = || ResolveError::coercion(path, raw, expected);

    match field_type {
        FieldType::Bool => parse_bool(raw).map(Value::Bool).ok_or_else(fail),
        FieldType::Int => parse_int(raw).map(Value::Int).ok_or_else(fail),
        FieldType::Float => parse_float(raw).map(Value::Float).ok_or_else(fail),
        FieldType::String => Ok(Value::Str(raw.to_string())),
        FieldType::StringList => Ok(Value::List(split_list(raw))),
        FieldType::Nested(_) => Err(ResolveError::schema(
            path,
            "nested fields resolve through their child schema, not a literal",
        )),
    }
}

/// Coerce a call-site default given as JSON. `null` counts as no value.
///
/// Strings go through the literal rules; other JSON values are taken as-is
/// when they fit the declared type.
pub fn coerce_json(
    value: &serde_json::Value,
    field_type: &FieldType,
    path: &str,
) -> Result<Option<Value>, ResolveError> {
    use serde_json::Value as Json;

    let expected = field_type.type_name();
    let mismatch = || ResolveError::coercion(path, value.to_string(), expected);

    let coerced = match (value, field_type) {
        (Json::Null, _) => return Ok(None),
        (Json::String(s), _) => coerce(s, field_type, path)?,
        (Json::Bool(b), FieldType::Bool) => Value::Bool(*b),
        (Json::Bool(b), FieldType::String) => Value::Str(b.to_string()),
        (Json::Number(n), FieldType::Int) => Value::Int(n.as_i64().ok_or_else(mismatch)?),
        (Json::Number(n), FieldType::Float) => {
            Value::Float(n.as_f64().filter(|f| f.is_finite()).ok_or_else(mismatch)?)
        }
        (Json::Number(n), FieldType::String) => Value::Str(n.to_string()),
        (Json::Number(n), FieldType::Bool) => coerce(&n.to_string(), field_type, path)?,
        (Json::Array(items), FieldType::StringList) => Value::List(
            items
                .iter()
                .map(|item| match item {
                    Json::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        _ => return Err(mismatch()),
    };
    Ok(Some(coerced))
}
