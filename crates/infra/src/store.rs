//! Named-collection store
//!
//! Builds one entity per configured collection and drives their lifecycles
//! together. Whether a collection is cached is decided per collection by
//! [`new_entity`]; callers only see [`KvEntity`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use futures::future::join_all;
use regstore_core::backend::Parser;
use regstore_core::{default_entity, new_entity, BackendContext, EntityConfig, KvEntity, KvStore};
use regstore_domain::{Config, RegistryError, Result};
use tracing::{info, instrument};

/// Entities for every configured collection, keyed by collection name
pub struct Store {
    config: Config,
    kv: Arc<dyn KvStore>,
    entities: BTreeMap<String, KvEntity>,
}

impl Store {
    /// Build entities for `config.store.collections`, parsing values as
    /// raw bytes.
    pub fn new(config: Config, kv: Arc<dyn KvStore>) -> Self {
        Self::with_parsers(config, kv, &HashMap::new())
    }

    /// Like [`Store::new`], with a parser override per collection name.
    pub fn with_parsers(
        config: Config,
        kv: Arc<dyn KvStore>,
        parsers: &HashMap<String, Arc<dyn Parser>>,
    ) -> Self {
        let ctx = BackendContext::new(config.cache.enabled, Arc::clone(&kv));

        let entities = config
            .store
            .collections
            .iter()
            .map(|collection| {
                let mut entity_config =
                    EntityConfig::from_cache_config(collection.prefix.as_str(), &config.cache)
                        .with_init_size(collection.init_size);
                if let Some(parser) = parsers.get(&collection.name) {
                    entity_config = entity_config.with_parser(Arc::clone(parser));
                }
                (collection.name.clone(), new_entity(&collection.name, entity_config, &ctx))
            })
            .collect::<BTreeMap<_, _>>();

        info!(
            collections = entities.len(),
            cached = entities.values().filter(|e| e.is_cached()).count(),
            "Store initialized"
        );

        Self { config, kv, entities }
    }

    /// Configuration the store was built from
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The entity of collection `name`
    pub fn entity(&self, name: &str) -> Option<&KvEntity> {
        self.entities.get(name)
    }

    /// Like [`Store::entity`], failing with `NotFound` for unknown names.
    pub fn require(&self, name: &str) -> Result<&KvEntity> {
        self.entity(name)
            .ok_or_else(|| RegistryError::NotFound(format!("Unknown collection: {}", name)))
    }

    /// Collection names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.entities.keys().map(String::as_str).collect()
    }

    /// Starts every entity's background work
    #[instrument(skip(self))]
    pub async fn run(&self) {
        join_all(self.entities.values().map(|entity| entity.run())).await;
    }

    /// Wait until every entity is ready.
    ///
    /// Returns `false` if any entity was stopped before it became ready.
    pub async fn ready(&self) -> bool {
        let signals: Vec<_> = self.entities.values().map(KvEntity::ready).collect();
        join_all(signals.iter().map(|s| s.wait())).await.into_iter().all(|ready| ready)
    }

    /// Stops every entity's background work
    #[instrument(skip(self))]
    pub async fn stop(&self) {
        join_all(self.entities.values().map(|entity| entity.stop())).await;
        info!("Store stopped");
    }

    /// The process-wide uncached entity, built over this store's backend on
    /// first access.
    pub fn default_entity(&self) -> Arc<KvEntity> {
        default_entity(&self.kv)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("cache_enabled", &self.config.cache.enabled)
            .field("collections", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use regstore_core::backend::json_parser;
    use regstore_core::testing::MockKvStore;
    use regstore_core::{Indexer, SearchRequest};
    use regstore_domain::{CacheConfig, CollectionConfig, StoreConfig};

    use super::*;
    use crate::memory::MemoryKvStore;

    fn config(enabled: bool) -> Config {
        Config {
            cache: CacheConfig { enabled, refresh_interval_seconds: 1, fetch_timeout_seconds: 1 },
            store: StoreConfig {
                collections: vec![
                    CollectionConfig {
                        name: "services".to_string(),
                        prefix: "/svc/".to_string(),
                        init_size: 10,
                    },
                    CollectionConfig {
                        name: "schemas".to_string(),
                        prefix: "/schema/".to_string(),
                        init_size: 0,
                    },
                ],
            },
        }
    }

    #[test]
    fn test_entities_follow_collection_config() {
        let store = Store::new(config(true), Arc::new(MemoryKvStore::new()));

        assert_eq!(store.names(), vec!["schemas", "services"]);
        assert!(store.entity("services").map(KvEntity::is_cached).unwrap_or(false));
        assert!(!store.entity("schemas").map(KvEntity::is_cached).unwrap_or(true));
        assert!(store.entity("unknown").is_none());
        assert!(matches!(store.require("unknown"), Err(RegistryError::NotFound(_))));
    }

    #[test]
    fn test_cache_disabled_builds_no_cachers() {
        let store = Store::new(config(false), Arc::new(MemoryKvStore::new()));
        assert!(store.names().iter().all(|name| !store.require(name).unwrap().is_cached()));
    }

    #[tokio::test]
    async fn test_lifecycle_with_parser_override() {
        let kv = Arc::new(MemoryKvStore::new());
        kv.put("/svc/orders", r#"{"version":"1.0"}"#).await;

        let parsers = HashMap::from([("services".to_string(), json_parser())]);
        let store = Store::with_parsers(config(true), kv, &parsers);

        store.run().await;
        let ready = tokio::time::timeout(Duration::from_secs(2), store.ready()).await;
        assert_eq!(ready.ok(), Some(true));

        let response =
            store.require("services").unwrap().search(&SearchRequest::key("/svc/orders")).await;
        let response = response.unwrap();
        let json = response.first().and_then(|kv| kv.value.as_json()).cloned();
        assert_eq!(json, Some(serde_json::json!({"version": "1.0"})));

        store.stop().await;
    }

    #[tokio::test]
    async fn test_ready_is_false_after_stop_without_run() {
        let store = Store::new(config(true), Arc::new(MemoryKvStore::new()));

        store.stop().await;
        let ready = tokio::time::timeout(Duration::from_secs(2), store.ready()).await;
        assert_eq!(ready.ok(), Some(false));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_ready_is_false_when_stopped_while_backend_fails() {
        let kv = Arc::new(MockKvStore::new());
        kv.fail_with(Some(RegistryError::Storage("unreachable".to_string())));
        let store = Store::new(config(true), kv);

        store.run().await;
        let pending = tokio::time::timeout(Duration::from_millis(100), store.ready()).await;
        assert!(pending.is_err(), "a failing backend must keep the store pending");

        store.stop().await;
        let ready = tokio::time::timeout(Duration::from_secs(2), store.ready()).await;
        assert_eq!(ready.ok(), Some(false));
    }
}
