//! Property tests for coercion, masking and resolution.

mod common;

use common::{redis_schema, snapshot};
use envtree::services::coercion::parse_bool;
use envtree::services::masking::{mask, MASK};
use envtree::{resolve_with, to_printable, ConfigSchema, FieldType, ResolveError, ResolveOptions, Value};
use proptest::prelude::*;

/// Randomly re-case every character of `literal`.
fn any_casing(literal: &'static str) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<bool>(), literal.len()).prop_map(move |upper| {
        literal
            .chars()
            .zip(upper)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

fn flag_schema() -> ConfigSchema {
    ConfigSchema::builder()
        .with_default("enabled", FieldType::Bool, false)
        .build()
        .unwrap()
}

proptest! {
    /// Property: every truthy literal in any casing resolves to `true`
    #[test]
    fn prop_truthy_literals(literal in prop_oneof![
        any_casing("true"), any_casing("1"), any_casing("yes"), any_casing("on")
    ]) {
        let env = snapshot(&[("APP_ENABLED", literal.as_str())]);
        let config = resolve_with(&flag_schema(), &env, &ResolveOptions::new().with_prefix("APP_")).unwrap();
        prop_assert_eq!(config.get_bool("enabled"), Some(true));
    }

    /// Property: every falsy literal in any casing resolves to `false`
    #[test]
    fn prop_falsy_literals(literal in prop_oneof![
        any_casing("false"), any_casing("0"), any_casing("no"), any_casing("off")
    ]) {
        prop_assert_eq!(parse_bool(&literal), Some(false));
    }

    /// Property: anything outside the literal set is a coercion error
    #[test]
    fn prop_other_literals_fail(literal in "[a-zA-Z0-9]{0,8}") {
        let known = ["true", "1", "yes", "on", "false", "0", "no", "off"];
        prop_assume!(!known.contains(&literal.to_lowercase().as_str()));

        let env = snapshot(&[("APP_ENABLED", literal.as_str())]);
        let err = resolve_with(&flag_schema(), &env, &ResolveOptions::new().with_prefix("APP_")).unwrap_err();
        let is_coercion = matches!(err, ResolveError::Coercion { .. });
        prop_assert!(is_coercion);
    }

    /// Property: a mask reveals at most the first two and last two characters
    #[test]
    fn prop_mask_reveals_only_edges(secret in "\\PC{0,40}") {
        let masked = mask(&secret);
        let chars: Vec<char> = secret.chars().collect();
        if chars.len() <= 4 {
            prop_assert_eq!(masked, MASK);
        } else {
            let head: String = chars[..2].iter().collect();
            let tail: String = chars[chars.len() - 2..].iter().collect();
            prop_assert_eq!(masked, format!("{head}...{tail}"));
        }
    }

    /// Property: printing never changes the stored value
    #[test]
    fn prop_printing_keeps_stored_secret(secret in "[a-z0-9]{5,30}") {
        let env = snapshot(&[("REDIS_PASSWORD", secret.as_str())]);
        let config = resolve_with(&redis_schema(), &env, &ResolveOptions::new().with_prefix("REDIS_")).unwrap();

        let printable = to_printable(&config);
        prop_assert_ne!(printable["password"].as_str(), Some(secret.as_str()));
        prop_assert_eq!(config.get("password"), Some(&Value::Str(secret.clone())));
    }

    /// Property: resolution is idempotent and unknown keys never fail it
    #[test]
    fn prop_idempotent_with_unknown_keys(
        unknown in proptest::collection::btree_map("[A-Z][A-Z0-9]{0,10}", "[ -~]{0,12}", 0..6)
    ) {
        let mut pairs: Vec<(String, String)> = unknown
            .iter()
            .map(|(k, v)| (format!("REDIS_X{k}"), v.clone()))
            .collect();
        pairs.push(("REDIS_HOST".to_string(), "h".to_string()));
        let env = envtree::EnvSnapshot::from_pairs(pairs);
        let options = ResolveOptions::new().with_prefix("REDIS_");

        let first = resolve_with(&redis_schema(), &env, &options).unwrap();
        let second = resolve_with(&redis_schema(), &env, &options).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.extra_fields().len(), env.len() - 1);
    }
}
