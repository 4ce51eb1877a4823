//! Capture of environment entries no declared field consumed.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::infrastructure::env::{EnvSnapshot, KeyResolver};

/// Canonical keys a resolution pass accounted for.
///
/// Besides exact field keys, whole scopes are claimed for nested fields the
/// engine did not descend into: their children took declared defaults, so
/// keys under those scopes belong to them and are never extension keys.
#[derive(Debug, Default)]
pub struct ConsumedKeys {
    keys: HashSet<String>,
    scopes: Vec<String>,
}

impl ConsumedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_key(&mut self, key: impl Into<String>) {
        self.keys.insert(key.into());
    }

    /// Claim every key starting with `scope`.
    pub fn insert_scope(&mut self, scope: impl Into<String>) {
        self.scopes.push(scope.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key) || self.scopes.iter().any(|scope| key.starts_with(scope.as_str()))
    }
}

/// Collect every snapshot entry under the top-level prefix that `consumed`
/// does not account for.
///
/// Extension keys are prefix-stripped and lower-cased; values stay raw.
pub fn collect_extras(
    snapshot: &EnvSnapshot,
    keys: &KeyResolver,
    consumed: &ConsumedKeys,
) -> BTreeMap<String, String> {
    let mut extras = BTreeMap::new();

    for (remainder, value) in snapshot.with_prefix(keys.prefix()) {
        if remainder.is_empty() {
            continue;
        }
        let full_key = format!("{}{remainder}", keys.prefix());
        if consumed.contains(&full_key) {
            continue;
        }
        let extension_key = remainder.to_lowercase();
        debug!(key = %extension_key, "captured unrecognized key");
        extras.insert(extension_key, value.to_string());
    }

    extras
}
