//! In-memory port mocks for tests
//!
//! Compiled for this crate's unit tests and, through the `test-utils`
//! feature, for downstream test suites.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use regstore_domain::{RawKeyValue, RegistryError, Result};

use crate::backend::ports::{Cache, Cacher, KvStore};
use crate::backend::KvCache;

#[derive(Debug, Default)]
struct MockState {
    entries: BTreeMap<String, RawKeyValue>,
    revision: i64,
    failure: Option<RegistryError>,
    delay: Option<Duration>,
}

/// Revisioned key/value store with call counters and fault injection
#[derive(Debug, Default)]
pub struct MockKvStore {
    state: Mutex<MockState>,
    /// Number of `get` calls served
    pub get_calls: AtomicUsize,
    /// Number of `range` calls served
    pub range_calls: AtomicUsize,
}

impl MockKvStore {
    /// An empty store at revision zero
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Writes `value`, bumping the revision
    pub fn put(&self, key: &str, value: &[u8]) {
        let mut state = self.state();
        state.revision += 1;
        let revision = state.revision;
        let entry = state.entries.entry(key.to_string()).or_insert_with(|| RawKeyValue {
            key: key.to_string(),
            value: Vec::new(),
            create_revision: revision,
            mod_revision: revision,
            version: 0,
        });
        entry.value = value.to_vec();
        entry.mod_revision = revision;
        entry.version += 1;
    }

    /// Removes `key`; the revision only moves if it existed
    pub fn delete(&self, key: &str) {
        let mut state = self.state();
        if state.entries.remove(key).is_some() {
            state.revision += 1;
        }
    }

    /// Makes every subsequent call fail with `failure` until cleared.
    pub fn fail_with(&self, failure: Option<RegistryError>) {
        self.state().failure = failure;
    }

    /// Delays every subsequent call by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        self.state().delay = Some(delay);
    }

    async fn before_call(&self) -> Result<()> {
        let (delay, failure) = {
            let state = self.state();
            (state.delay, state.failure.clone())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl KvStore for MockKvStore {
    async fn get(&self, key: &str) -> Result<Option<RawKeyValue>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.before_call().await?;
        Ok(self.state().entries.get(key).cloned())
    }

    async fn range(&self, prefix: &str) -> Result<Vec<RawKeyValue>> {
        self.range_calls.fetch_add(1, Ordering::SeqCst);
        self.before_call().await?;
        Ok(self
            .state()
            .entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(_, kv)| kv.clone())
            .collect())
    }

    async fn revision(&self) -> Result<i64> {
        self.before_call().await?;
        Ok(self.state().revision)
    }
}

/// Cacher without lifecycle support
#[derive(Debug)]
pub struct StaticCacher {
    cache: Arc<KvCache>,
}

impl StaticCacher {
    /// A cacher over an empty cache named `name`
    pub fn new(name: &str) -> Self {
        Self { cache: Arc::new(KvCache::new(name, 0)) }
    }
}

impl Cacher for StaticCacher {
    fn cache(&self) -> Arc<dyn Cache> {
        Arc::clone(&self.cache) as Arc<dyn Cache>
    }
}
