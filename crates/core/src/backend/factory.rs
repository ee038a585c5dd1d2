//! Construction policy for named entities

use std::sync::Arc;

use tracing::{debug, info};

use super::cacher::KvCacher;
use super::config::{BackendContext, EntityConfig};
use super::entity::KvEntity;
use super::indexer::{CacheIndexer, CommonIndexer};
use super::ports::Cacher;

/// Builds the entity for collection `name`.
///
/// A collection is cached only when caching is enabled for the process and
/// its `init_size` is positive. It then gets a [`KvCacher`] and an indexer
/// answering from that cacher's memory. Every other combination, including
/// an `init_size` of zero with caching enabled, gets a [`CommonIndexer`] that
/// reads through to the store. Construction never fails.
pub fn new_entity(name: &str, config: EntityConfig, ctx: &BackendContext) -> KvEntity {
    if ctx.enable_cache && config.init_size > 0 {
        debug!(collection = name, key = %config.key, init_size = config.init_size, "Building cached entity");
        let key = config.key.clone();
        let cacher = Arc::new(KvCacher::new(name, config, Arc::clone(&ctx.store)));
        let indexer = Arc::new(CacheIndexer::new(key, cacher.cache()));
        return KvEntity::with_cacher(cacher, indexer);
    }

    info!(
        collection = name,
        cache_enabled = ctx.enable_cache,
        init_size = config.init_size,
        "Collection will not be cached; lookups read through to the store"
    );
    KvEntity::new(Arc::new(CommonIndexer::new(config.key, config.parser, Arc::clone(&ctx.store))))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::backend::ports::{Cache, Indexer, KvStore, SearchRequest};
    use crate::testing::MockKvStore;

    fn ctx(enable_cache: bool, store: &Arc<MockKvStore>) -> BackendContext {
        BackendContext::new(enable_cache, Arc::clone(store) as Arc<dyn KvStore>)
    }

    #[test]
    fn test_cache_enabled_with_init_size_builds_cacher() {
        let store = Arc::new(MockKvStore::new());
        let entity = new_entity(
            "instances",
            EntityConfig::new("/inst/").with_init_size(100),
            &ctx(true, &store),
        );
        assert!(entity.cacher().is_some());
        assert!(entity.cacher().and_then(|c| c.as_runnable()).is_some());
        assert_eq!(entity.cache().map(|c| c.name().to_string()), Some("instances".to_string()));
    }

    #[test]
    fn test_zero_init_size_opts_out() {
        let store = Arc::new(MockKvStore::new());
        let entity =
            new_entity("instances", EntityConfig::new("/inst/").with_init_size(0), &ctx(true, &store));
        assert!(entity.cacher().is_none());
        assert!(entity.cache().is_none());
        assert!(entity.ready().is_ready());
    }

    #[test]
    fn test_cache_disabled_never_builds_cacher() {
        let store = Arc::new(MockKvStore::new());
        for init_size in [0, 1, 100, usize::MAX] {
            let entity = new_entity(
                "instances",
                EntityConfig::new("/inst/").with_init_size(init_size),
                &ctx(false, &store),
            );
            assert!(entity.cacher().is_none(), "init_size {} must not be cached", init_size);
            assert!(entity.ready().is_ready());
        }
    }

    #[tokio::test]
    async fn test_uncached_entity_reads_through() {
        let store = Arc::new(MockKvStore::new());
        store.put("/inst/1", b"up");
        let entity = new_entity("instances", EntityConfig::new("/inst/"), &ctx(true, &store));

        let response = entity.search(&SearchRequest::key("/inst/1")).await.unwrap();
        assert_eq!(response.count, 1);
        assert_eq!(store.get_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cached_entity_never_reads_store_on_lookup() {
        let store = Arc::new(MockKvStore::new());
        store.put("/inst/1", b"up");
        let entity = new_entity(
            "instances",
            EntityConfig::new("/inst/").with_init_size(10),
            &ctx(true, &store),
        );

        // Not yet populated, so the lookup misses without touching the store
        let response = entity.search(&SearchRequest::key("/inst/1")).await.unwrap();
        assert!(response.is_empty());
        assert_eq!(store.get_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.range_calls.load(Ordering::SeqCst), 0);
    }
}
