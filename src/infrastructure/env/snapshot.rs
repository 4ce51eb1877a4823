//! Point-in-time, case-insensitive view of the process environment.

use std::collections::BTreeMap;
use std::env;

/// Immutable environment snapshot.
///
/// Keys are stored in canonical upper case, so lookups ignore case. A
/// resolution call captures one snapshot up front and never reads the live
/// environment again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    entries: BTreeMap<String, String>,
}

/// Canonical casing for environment keys.
pub fn canonical_key(key: &str) -> String {
    key.to_uppercase()
}

impl EnvSnapshot {
    /// Capture the current process environment. Entries that are not valid
    /// UTF-8 are skipped.
    pub fn capture() -> Self {
        Self::from_pairs(
            env::vars_os()
                .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?))),
        )
    }

    /// Build a snapshot from explicit pairs.
    ///
    /// When two keys differ only by case, the one that sorts last (by its
    /// original spelling) wins, so the outcome never depends on input order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));

        let entries = pairs
            .into_iter()
            .map(|(key, value)| (canonical_key(&key), value))
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&canonical_key(key)).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&canonical_key(key))
    }

    /// Entries whose key starts with `prefix`, yielded as
    /// `(remainder, value)` with the remainder in canonical case.
    pub fn with_prefix<'a>(&'a self, prefix: &str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let prefix = canonical_key(prefix);
        let len = prefix.len();
        self.entries
            .range(prefix.clone()..)
            .take_while(move |(key, _)| key.starts_with(&prefix))
            .map(move |(key, value)| (&key[len..], value.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        let snapshot = EnvSnapshot::from_pairs([("Redis_Host", "prod-redis")]);
        assert_eq!(snapshot.get("REDIS_HOST"), Some("prod-redis"));
        assert_eq!(snapshot.get("redis_host"), Some("prod-redis"));
        assert!(snapshot.contains("rEdIs_HoSt"));
        assert_eq!(snapshot.get("REDIS_PORT"), None);
    }

    #[test]
    fn test_case_collisions_resolve_deterministically() {
        let forward = EnvSnapshot::from_pairs([("APP_X", "upper"), ("app_x", "lower")]);
        let reverse = EnvSnapshot::from_pairs([("app_x", "lower"), ("APP_X", "upper")]);
        assert_eq!(forward, reverse);
        assert_eq!(forward.get("APP_X"), Some("lower"));
    }

    #[test]
    fn test_with_prefix_strips_prefix() {
        let snapshot = EnvSnapshot::from_pairs([
            ("DB_HOST", "db.example.com"),
            ("DB_POOL__MAX_SIZE", "50"),
            ("DBX_OTHER", "skip"),
            ("REDIS_HOST", "skip"),
        ]);
        let entries: Vec<_> = snapshot.with_prefix("db_").collect();
        assert_eq!(
            entries,
            vec![("HOST", "db.example.com"), ("POOL__MAX_SIZE", "50")]
        );
    }

    #[test]
    fn test_empty_prefix_yields_everything() {
        let snapshot = EnvSnapshot::from_pairs([("A", "1"), ("B", "2")]);
        assert_eq!(snapshot.with_prefix("").count(), 2);
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_capture_reads_process_environment() {
        temp_env::with_var("ENVTREE_SNAPSHOT_PROBE", Some("present"), || {
            let snapshot = EnvSnapshot::capture();
            assert_eq!(snapshot.get("envtree_snapshot_probe"), Some("present"));
        });
    }
}
