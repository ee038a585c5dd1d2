//! Composed cache/index unit for one collection

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use regstore_domain::Result;

use super::ports::{Cache, Cacher, Indexer, Runnable, SearchRequest, SearchResponse};
use super::ready::ReadySignal;

/// One addressable data collection
///
/// Holds an indexer, which every entity has, and an optional cacher. Both are
/// fixed at construction. Lifecycle calls are forwarded to the cacher only
/// when it exposes [`Runnable`]; otherwise they are no-ops and
/// [`KvEntity::ready`] is already resolved, so callers never branch on
/// whether the collection is cached.
#[derive(Clone)]
pub struct KvEntity {
    cacher: Option<Arc<dyn Cacher>>,
    indexer: Arc<dyn Indexer>,
}

impl KvEntity {
    /// An uncached entity
    pub fn new(indexer: Arc<dyn Indexer>) -> Self {
        Self { cacher: None, indexer }
    }

    /// A cached entity; `indexer` is expected to read from `cacher`
    pub fn with_cacher(cacher: Arc<dyn Cacher>, indexer: Arc<dyn Indexer>) -> Self {
        Self { cacher: Some(cacher), indexer }
    }

    /// The cacher, if this entity is cached
    pub fn cacher(&self) -> Option<&Arc<dyn Cacher>> {
        self.cacher.as_ref()
    }

    /// The lookup path every search goes through
    pub fn indexer(&self) -> &Arc<dyn Indexer> {
        &self.indexer
    }

    /// The cacher's in-memory collection, if this entity is cached
    pub fn cache(&self) -> Option<Arc<dyn Cache>> {
        self.cacher.as_ref().map(|cacher| cacher.cache())
    }

    /// Whether a cacher was attached at construction
    pub fn is_cached(&self) -> bool {
        self.cacher.is_some()
    }

    fn runnable(&self) -> Option<&dyn Runnable> {
        self.cacher.as_deref().and_then(|cacher| cacher.as_runnable())
    }

    /// Starts the cacher's background work, if it has any.
    pub async fn run(&self) {
        if let Some(runnable) = self.runnable() {
            runnable.run().await;
        }
    }

    /// Stops the cacher's background work, if it has any.
    pub async fn stop(&self) {
        if let Some(runnable) = self.runnable() {
            runnable.stop().await;
        }
    }

    /// The cacher's readiness, or an already-resolved signal.
    pub fn ready(&self) -> ReadySignal {
        match self.runnable() {
            Some(runnable) => runnable.ready(),
            None => ReadySignal::resolved(),
        }
    }
}

#[async_trait]
impl Indexer for KvEntity {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        self.indexer.search(request).await
    }
}

impl fmt::Debug for KvEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KvEntity")
            .field("cache", &self.cacher.as_ref().map(|c| c.cache().name().to_string()))
            .field("runnable", &self.runnable().is_some())
            .finish()
    }
}
