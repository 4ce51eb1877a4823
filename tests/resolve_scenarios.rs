//! End-to-end resolution scenarios against explicit snapshots.

mod common;

use common::{four_level_schema, redis_schema, snapshot};
use envtree::services::masking::MASK;
use envtree::{
    resolve, resolve_with, to_printable, ConfigSchema, ConfigType, DatabaseConfig, FieldType,
    ResolveError, ResolveOptions, Value,
};
use serde_json::json;

fn redis_options() -> ResolveOptions {
    ResolveOptions::new().with_prefix("REDIS_")
}

#[test]
fn test_redis_from_environment() {
    let env = snapshot(&[
        ("REDIS_HOST", "prod-redis"),
        ("REDIS_PORT", "6380"),
        ("REDIS_PASSWORD", "secret123"),
    ]);
    let config = resolve_with(&redis_schema(), &env, &redis_options()).unwrap();

    assert_eq!(config.get_str("host"), Some("prod-redis"));
    assert_eq!(config.get_int("port"), Some(6380));
    assert_eq!(config.get_str("password"), Some("secret123"));
    assert!(config.extra_fields().is_empty());

    let printable = to_printable(&config);
    assert_eq!(printable["password"], json!("se...23"));
    assert_eq!(printable["host"], json!("prod-redis"));
    assert_eq!(printable["port"], json!(6380));

    // Masking is display-only.
    assert_eq!(config.get_str("password"), Some("secret123"));
}

#[test]
fn test_database_with_nested_pool() {
    let env = snapshot(&[
        ("DB_HOST", "db.internal"),
        ("DB_POOL__MAX_SIZE", "50"),
        ("DB_POOL__TIMEOUT", "60.5"),
    ]);
    let schema = DatabaseConfig::schema().unwrap();
    let config = resolve_with(schema, &env, &ResolveOptions::new().with_prefix("DB_")).unwrap();

    assert_eq!(config.get_path("pool.max_size"), Some(&Value::Int(50)));
    assert_eq!(config.get_path("pool.timeout"), Some(&Value::Float(60.5)));
    assert_eq!(config.get_path("pool.min_size"), Some(&Value::Int(1)));
    assert_eq!(config.get_path("pool.pre_ping"), Some(&Value::Bool(true)));
    assert!(config.extra_fields().is_empty());

    let typed = DatabaseConfig::from_resolved(&config).unwrap();
    assert_eq!(typed.pool.max_size, 50);
    assert!((typed.pool.timeout - 60.5).abs() < f64::EPSILON);
}

#[test]
fn test_call_site_default_without_environment() {
    let config = resolve_with(
        &redis_schema(),
        &snapshot(&[]),
        &redis_options().with_default("port", 9999),
    )
    .unwrap();
    assert_eq!(config.get_int("port"), Some(9999));
    assert_eq!(config.get_str("host"), Some("localhost"));
}

#[test]
fn test_unknown_key_is_captured() {
    let env = snapshot(&[("REDIS_CUSTOM_OPTION", "value")]);
    let config = resolve_with(&redis_schema(), &env, &redis_options()).unwrap();
    assert_eq!(config.extra_fields().len(), 1);
    assert_eq!(config.extra("custom_option"), Some("value"));
    assert_eq!(config.extra("CUSTOM_OPTION"), Some("value"));
}

#[test]
fn test_bad_port_literal() {
    let env = snapshot(&[("REDIS_PORT", "abc")]);
    let err = resolve_with(&redis_schema(), &env, &redis_options()).unwrap_err();

    assert!(matches!(err, ResolveError::Coercion { ref path, ref raw, .. } if path == "port" && raw == "abc"));
    let message = err.to_string();
    assert!(message.contains("port"));
    assert!(message.contains("\"abc\""));
}

#[test]
fn test_defaults_when_prefix_is_empty_of_keys() {
    let env = snapshot(&[("OTHER_HOST", "ignored"), ("PATH", "/usr/bin")]);
    let config = resolve_with(&redis_schema(), &env, &redis_options()).unwrap();

    let defaults = redis_schema().default_config().unwrap();
    assert_eq!(config, defaults);
    assert!(config.extra_fields().is_empty());
}

#[test]
fn test_four_levels_with_default_depth() {
    let env = snapshot(&[
        ("APP_L1__L2__L3__NAME", "third"),
        ("APP_L1__L2__L3__L4__TOKEN", "unreachable"),
    ]);
    let config = resolve_with(
        &four_level_schema(false),
        &env,
        &ResolveOptions::new().with_prefix("APP_").with_max_depth(3),
    )
    .unwrap();

    assert_eq!(config.get_path("l1.l2.l3.name"), Some(&Value::Str("third".into())));
    // `l4` sits past the limit: declared default, and its keys belong to it.
    assert_eq!(
        config.get_path("l1.l2.l3.l4.token"),
        Some(&Value::Str("default-token".into()))
    );
    assert_eq!(config.extra("l1__l2__l3__l4__token"), None);
    assert!(config.extra_fields().is_empty());
}

#[test]
fn test_four_levels_required_past_limit() {
    let err = resolve_with(
        &four_level_schema(true),
        &snapshot(&[("APP_L1__L2__L3__L4__TOKEN", "t")]),
        &ResolveOptions::new().with_prefix("APP_").with_max_depth(3),
    )
    .unwrap_err();

    assert_eq!(
        err,
        ResolveError::DepthExceeded {
            path: "l1.l2.l3.l4".to_string(),
            max_depth: 3,
        }
    );
}

#[test]
fn test_four_levels_within_a_larger_limit() {
    let config = resolve_with(
        &four_level_schema(true),
        &snapshot(&[("APP_L1__L2__L3__L4__TOKEN", "t")]),
        &ResolveOptions::new().with_prefix("APP_").with_max_depth(4),
    )
    .unwrap();
    assert_eq!(config.get_path("l1.l2.l3.l4.token"), Some(&Value::Str("t".into())));
    assert!(config.extra_fields().is_empty());
}

#[test]
fn test_max_depth_one_descends_first_level_only() {
    let env = snapshot(&[("APP_L1__NAME", "first"), ("APP_L1__L2__NAME", "second")]);
    let config = resolve_with(
        &four_level_schema(false),
        &env,
        &ResolveOptions::new().with_prefix("APP_").with_max_depth(1),
    )
    .unwrap();

    assert_eq!(config.get_path("l1.name"), Some(&Value::Str("first".into())));
    assert_eq!(config.get_path("l1.l2.name"), Some(&Value::Str("depth2".into())));
    assert!(config.extra_fields().is_empty());
}

#[test]
fn test_doubled_separator_tells_nesting_from_flat_names() {
    let schema = ConfigSchema::builder()
        .with_default("pool_size", FieldType::Int, 1)
        .nested(
            "pool",
            ConfigSchema::builder()
                .with_default("size", FieldType::Int, 2)
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();
    let env = snapshot(&[("DB_POOL_SIZE", "10"), ("DB_POOL__SIZE", "20")]);
    let config = resolve_with(&schema, &env, &ResolveOptions::new().with_prefix("DB_")).unwrap();

    assert_eq!(config.get_int("pool_size"), Some(10));
    assert_eq!(config.get_path("pool.size"), Some(&Value::Int(20)));
}

#[test]
fn test_case_insensitive_lookup() {
    let env = snapshot(&[("redis_host", "lower"), ("Redis_Port", "7000")]);
    let config = resolve_with(&redis_schema(), &env, &redis_options()).unwrap();
    assert_eq!(config.get_str("host"), Some("lower"));
    assert_eq!(config.get_int("port"), Some(7000));
}

#[test]
fn test_short_secret_is_fully_masked() {
    let env = snapshot(&[("REDIS_PASSWORD", "abcd")]);
    let config = resolve_with(&redis_schema(), &env, &redis_options()).unwrap();
    assert_eq!(to_printable(&config)["password"], json!(MASK));
}

#[test]
fn test_idempotent_resolution() {
    let env = snapshot(&[
        ("DB_HOST", "h"),
        ("DB_REPLICAS", "a,b"),
        ("DB_POOL__PRE_PING", "off"),
        ("DB_EXTRA_FLAG", "1"),
    ]);
    let schema = DatabaseConfig::schema().unwrap();
    let options = ResolveOptions::new().with_prefix("DB_");

    let first = resolve_with(schema, &env, &options).unwrap();
    let second = resolve_with(schema, &env, &options).unwrap();
    assert_eq!(first, second);
    assert_eq!(to_printable(&first), to_printable(&second));
}

#[test]
fn test_resolve_reads_process_environment() {
    temp_env::with_vars(
        [
            ("ENVTREE_IT_HOST", Some("from-process")),
            ("ENVTREE_IT_SURPRISE", Some("kept")),
        ],
        || {
            let config =
                resolve(&redis_schema(), &ResolveOptions::new().with_prefix("ENVTREE_IT_")).unwrap();
            assert_eq!(config.get_str("host"), Some("from-process"));
            assert_eq!(config.extra("surprise"), Some("kept"));
        },
    );
}
