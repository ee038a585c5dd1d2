//! Per-entity configuration

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use regstore_domain::constants::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_REFRESH_INTERVAL_SECS};
use regstore_domain::CacheConfig;

use super::parser::{bytes_parser, Parser};
use super::ports::KvStore;

/// Parameters of one named collection
///
/// Handed to [`new_entity`](super::factory::new_entity) by value and never
/// mutated afterwards.
#[derive(Clone)]
pub struct EntityConfig {
    /// Key prefix identifying the collection in the store
    pub key: String,
    /// Decoder applied to every stored value
    pub parser: Arc<dyn Parser>,
    /// Cache pre-size; zero opts the collection out of caching
    pub init_size: usize,
    /// Delay between two cache refresh cycles
    pub refresh_interval: Duration,
    /// Upper bound on a single fetch from the store
    pub fetch_timeout: Duration,
}

impl EntityConfig {
    /// Uncached defaults: bytes parser, init size zero.
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self {
            key: key.into(),
            parser: bytes_parser(),
            init_size: 0,
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }

    /// Takes refresh timing from the process cache configuration.
    pub fn from_cache_config<S: Into<String>>(key: S, cache: &CacheConfig) -> Self {
        Self::new(key)
            .with_refresh_interval(cache.refresh_interval())
            .with_fetch_timeout(cache.fetch_timeout())
    }

    /// Sets the value decoder
    pub fn with_parser(mut self, parser: Arc<dyn Parser>) -> Self {
        self.parser = parser;
        self
    }

    /// Sets the cache pre-size; zero opts out of caching
    pub fn with_init_size(mut self, init_size: usize) -> Self {
        self.init_size = init_size;
        self
    }

    /// Sets the delay between refresh cycles
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Sets the bound on a single store fetch
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

impl fmt::Debug for EntityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityConfig")
            .field("key", &self.key)
            .field("parser", &self.parser)
            .field("init_size", &self.init_size)
            .field("refresh_interval", &self.refresh_interval)
            .field("fetch_timeout", &self.fetch_timeout)
            .finish()
    }
}

/// Process-level inputs to entity construction
#[derive(Clone)]
pub struct BackendContext {
    /// Whether caching is enabled for this process
    pub enable_cache: bool,
    /// Backing store every entity reads from
    pub store: Arc<dyn KvStore>,
}

impl BackendContext {
    /// Bundles the process cache flag with the store
    pub fn new(enable_cache: bool, store: Arc<dyn KvStore>) -> Self {
        Self { enable_cache, store }
    }
}

impl fmt::Debug for BackendContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendContext").field("enable_cache", &self.enable_cache).finish()
    }
}
