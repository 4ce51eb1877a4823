//! Common test utilities for integration tests
//!
//! Provides shared schemas and snapshot helpers used across multiple
//! integration test files.

use envtree::{ConfigSchema, EnvSnapshot, FieldType};

/// Snapshot from literal pairs.
#[allow(dead_code)]
pub fn snapshot(pairs: &[(&str, &str)]) -> EnvSnapshot {
    EnvSnapshot::from_pairs(pairs.iter().copied())
}

/// Redis-like schema: every field defaulted.
#[allow(dead_code)]
pub fn redis_schema() -> ConfigSchema {
    ConfigSchema::builder()
        .with_default("host", FieldType::String, "localhost")
        .with_default("port", FieldType::Int, 6379)
        .with_default("password", FieldType::String, "")
        .build()
        .expect("redis schema")
}

/// Four nested fields in a chain, `l1.l2.l3.l4`, with a `name` leaf at every
/// level and a `token` leaf inside `l4`. The `name` under `N` nested segments
/// defaults to `depthN`: `name` is `depth0`, `l1.l2.name` is `depth2`.
///
/// With `required_token`, `token` has no default, so none of the nested
/// fields has one either.
#[allow(dead_code)]
pub fn four_level_schema(required_token: bool) -> ConfigSchema {
    let innermost = if required_token {
        ConfigSchema::builder().required("token", FieldType::String)
    } else {
        ConfigSchema::builder().with_default("token", FieldType::String, "default-token")
    };
    let mut schema = innermost.build().expect("innermost schema");

    for level in (1..=4).rev() {
        schema = ConfigSchema::builder()
            .with_default("name", FieldType::String, format!("depth{}", level - 1))
            .nested(format!("l{level}"), schema)
            .build()
            .expect("level schema");
    }
    schema
}
