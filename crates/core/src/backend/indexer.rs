//! Indexer implementations
//!
//! - [`CacheIndexer`] answers from a cacher's in-memory contents and never
//!   touches the store.
//! - [`CommonIndexer`] answers straight from the store, decoding each record
//!   with the collection's parser.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use regstore_domain::{KeyValue, Result};

use super::parser::Parser;
use super::ports::{Cache, Indexer, KvStore, SearchRequest, SearchResponse};

/// Indexer driven by a cache
pub struct CacheIndexer {
    key: String,
    cache: Arc<dyn Cache>,
}

impl CacheIndexer {
    /// Serves queries under `key` from `cache`
    pub fn new<S: Into<String>>(key: S, cache: Arc<dyn Cache>) -> Self {
        Self { key: key.into(), cache }
    }
}

#[async_trait]
impl Indexer for CacheIndexer {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let key = request.resolve_key(&self.key);
        let kvs = if request.is_prefix() {
            self.cache.get_prefix(key)
        } else {
            self.cache.get(key).into_iter().collect()
        };
        Ok(SearchResponse::from_kvs(kvs, request.count_only))
    }
}

impl fmt::Debug for CacheIndexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheIndexer")
            .field("key", &self.key)
            .field("cache", &self.cache.name())
            .finish()
    }
}

/// Indexer that reads through to the store
pub struct CommonIndexer {
    key: String,
    parser: Arc<dyn Parser>,
    store: Arc<dyn KvStore>,
}

impl CommonIndexer {
    /// Serves queries under `key` from `store`, decoding with `parser`
    pub fn new<S: Into<String>>(key: S, parser: Arc<dyn Parser>, store: Arc<dyn KvStore>) -> Self {
        Self { key: key.into(), parser, store }
    }
}

#[async_trait]
impl Indexer for CommonIndexer {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let key = request.resolve_key(&self.key);
        let raws = if request.is_prefix() {
            self.store.range(key).await?
        } else {
            self.store.get(key).await?.into_iter().collect()
        };

        if request.count_only {
            return Ok(SearchResponse::count(raws.len()));
        }

        let kvs = raws
            .iter()
            .map(|raw| Ok(KeyValue::from_raw(raw, self.parser.parse(&raw.value)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(SearchResponse::from_kvs(kvs, false))
    }
}

impl fmt::Debug for CommonIndexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommonIndexer")
            .field("key", &self.key)
            .field("parser", &self.parser)
            .finish()
    }
}
