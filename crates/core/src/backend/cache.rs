//! Concurrent in-memory collection backed by `DashMap`

use dashmap::DashMap;
use regstore_domain::KeyValue;

use super::ports::Cache;

/// In-memory copy of one collection
#[derive(Debug)]
pub struct KvCache {
    name: String,
    entries: DashMap<String, KeyValue>,
}

impl KvCache {
    /// Creates an empty cache pre-sized for `capacity` entries.
    pub fn new<S: Into<String>>(name: S, capacity: usize) -> Self {
        Self { name: name.into(), entries: DashMap::with_capacity(capacity) }
    }

    /// Revision of the cached copy of `key`, used to skip unchanged records
    pub fn mod_revision(&self, key: &str) -> Option<i64> {
        self.entries.get(key).map(|entry| entry.mod_revision)
    }
}

impl Cache for KvCache {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, key: &str) -> Option<KeyValue> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn get_prefix(&self, prefix: &str) -> Vec<KeyValue> {
        let mut kvs: Vec<KeyValue> = self
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.value().clone())
            .collect();
        kvs.sort_by(|a, b| a.key.cmp(&b.key));
        kvs
    }

    fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    fn put(&self, kv: KeyValue) {
        self.entries.insert(kv.key.clone(), kv);
    }

    fn remove(&self, key: &str) -> Option<KeyValue> {
        self.entries.remove(key).map(|(_, kv)| kv)
    }
}

#[cfg(test)]
mod tests {
    use regstore_domain::Value;

    use super::*;

    fn kv(key: &str, rev: i64) -> KeyValue {
        KeyValue {
            key: key.to_string(),
            value: Value::String(format!("v{}", rev)),
            create_revision: 1,
            mod_revision: rev,
            version: rev,
        }
    }

    #[test]
    fn test_put_get_remove() {
        let cache = KvCache::new("instances", 16);
        assert!(cache.is_empty());

        cache.put(kv("/inst/1", 2));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.mod_revision("/inst/1"), Some(2));
        assert_eq!(cache.get("/inst/1").unwrap().value.as_str(), Some("v2"));

        cache.put(kv("/inst/1", 5));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.mod_revision("/inst/1"), Some(5));

        assert!(cache.remove("/inst/1").is_some());
        assert!(cache.remove("/inst/1").is_none());
        assert!(cache.get("/inst/1").is_none());
    }

    #[test]
    fn test_get_prefix_is_sorted_and_scoped() {
        let cache = KvCache::new("instances", 0);
        cache.put(kv("/inst/b", 1));
        cache.put(kv("/inst/a", 1));
        cache.put(kv("/svc/a", 1));

        let keys: Vec<_> = cache.get_prefix("/inst/").into_iter().map(|kv| kv.key).collect();
        assert_eq!(keys, vec!["/inst/a".to_string(), "/inst/b".to_string()]);
        assert_eq!(cache.keys().len(), 3);
        assert_eq!(cache.name(), "instances");
    }
}
