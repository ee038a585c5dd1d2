//! Port interfaces for the registry storage backend
//!
//! These traits define the boundaries between an entity and the pieces it
//! is composed from: the in-memory cache, the lookup path and the raw data
//! source.

use std::sync::Arc;

use async_trait::async_trait;
use regstore_domain::{KeyValue, RawKeyValue, Result};

use super::ready::ReadySignal;

/// Read/write access to one in-memory collection
pub trait Cache: Send + Sync {
    /// Name of the collection this cache mirrors
    fn name(&self) -> &str;

    /// Number of cached records
    fn len(&self) -> usize;

    /// Whether the cache holds no records
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The record stored under exactly `key`
    fn get(&self, key: &str) -> Option<KeyValue>;

    /// All records whose key starts with `prefix`, ordered by key
    fn get_prefix(&self, prefix: &str) -> Vec<KeyValue>;

    /// Snapshot of every cached key, unordered
    fn keys(&self) -> Vec<String>;

    /// Inserts or replaces the record under `kv.key`
    fn put(&self, kv: KeyValue);

    /// Removes `key`, returning the evicted record
    fn remove(&self, key: &str) -> Option<KeyValue>;
}

/// Owner of an in-memory collection
///
/// Lifecycle support is optional and is not part of this trait. A cacher that
/// runs background work advertises it through [`Cacher::as_runnable`].
pub trait Cacher: Send + Sync {
    /// The collection this cacher populates
    fn cache(&self) -> Arc<dyn Cache>;

    /// Returns the lifecycle capability when this cacher has one.
    fn as_runnable(&self) -> Option<&dyn Runnable> {
        None
    }
}

/// Start/stop/readiness of background work
#[async_trait]
pub trait Runnable: Send + Sync {
    /// Hands off to background work and returns without waiting for it.
    async fn run(&self);

    /// Requests that background work cease and releases its resources.
    ///
    /// Must be safe to call when [`Runnable::run`] was never called.
    async fn stop(&self);

    /// Resolves once the initial population has completed.
    fn ready(&self) -> ReadySignal;
}

/// Key-based lookup and listing over a collection
#[async_trait]
pub trait Indexer: Send + Sync {
    /// Answers `request`; results are ordered by key
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;
}

/// Raw data source the registry persists into
#[async_trait]
pub trait KvStore: Send + Sync {
    /// The record under exactly `key`, if any
    async fn get(&self, key: &str) -> Result<Option<RawKeyValue>>;

    /// All records whose key starts with `prefix`, ordered by key
    async fn range(&self, prefix: &str) -> Result<Vec<RawKeyValue>>;

    /// Current store revision
    async fn revision(&self) -> Result<i64>;
}

/// Query accepted by an [`Indexer`]
///
/// An empty key addresses the indexer's own collection root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    /// Key or prefix; empty means the indexer's root
    pub key: String,
    /// Treat `key` as a prefix
    pub prefix: bool,
    /// Only fill `count`, leave `kvs` empty
    pub count_only: bool,
}

impl SearchRequest {
    /// Exact lookup of a single key
    pub fn key<S: Into<String>>(key: S) -> Self {
        Self { key: key.into(), prefix: false, count_only: false }
    }

    /// Listing of every key under `prefix`
    pub fn prefix<S: Into<String>>(prefix: S) -> Self {
        Self { key: prefix.into(), prefix: true, count_only: false }
    }

    /// Listing of the whole collection
    pub fn all() -> Self {
        Self::prefix("")
    }

    /// Only fill [`SearchResponse::count`]
    pub fn count_only(mut self) -> Self {
        self.count_only = true;
        self
    }

    /// The key to query, falling back to `root` when none was given
    pub fn resolve_key<'a>(&'a self, root: &'a str) -> &'a str {
        if self.key.is_empty() {
            root
        } else {
            &self.key
        }
    }

    /// Whether the resolved query is a prefix listing
    pub fn is_prefix(&self) -> bool {
        self.prefix || self.key.is_empty()
    }
}

/// Result of an [`Indexer`] query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    /// Matching records ordered by key; empty for count-only queries
    pub kvs: Vec<KeyValue>,
    /// Number of matches, filled even for count-only queries
    pub count: usize,
}

impl SearchResponse {
    /// Builds a response from unordered matches.
    pub fn from_kvs(mut kvs: Vec<KeyValue>, count_only: bool) -> Self {
        let count = kvs.len();
        if count_only {
            kvs.clear();
        } else {
            kvs.sort_by(|a, b| a.key.cmp(&b.key));
        }
        Self { kvs, count }
    }

    /// A count-only response
    pub fn count(count: usize) -> Self {
        Self { kvs: Vec::new(), count }
    }

    /// The first match in key order
    pub fn first(&self) -> Option<&KeyValue> {
        self.kvs.first()
    }

    /// Whether nothing matched
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
