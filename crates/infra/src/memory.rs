//! In-process revisioned key/value store
//!
//! Implements the `KvStore` port with the same revision bookkeeping a
//! distributed store keeps: every write bumps the store revision, records
//! carry the revision they were created and last modified at, and `version`
//! counts writes to a key since it was created.

use std::collections::BTreeMap;

use async_trait::async_trait;
use regstore_core::KvStore;
use regstore_domain::{RawKeyValue, Result};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<String, RawKeyValue>,
    revision: i64,
}

/// Revisioned store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    inner: RwLock<Inner>,
}

impl MemoryKvStore {
    /// An empty store at revision zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `value` under `key`, returning the new store revision.
    pub async fn put(&self, key: &str, value: impl Into<Vec<u8>>) -> i64 {
        let mut inner = self.inner.write().await;
        inner.revision += 1;
        let revision = inner.revision;

        let entry = inner.entries.entry(key.to_string()).or_insert_with(|| RawKeyValue {
            key: key.to_string(),
            value: Vec::new(),
            create_revision: revision,
            mod_revision: revision,
            version: 0,
        });
        entry.value = value.into();
        entry.mod_revision = revision;
        entry.version += 1;

        tracing::trace!(key, revision, "put");
        revision
    }

    /// Delete `key`. Returns `true` if it existed; only then does the
    /// revision advance.
    pub async fn delete(&self, key: &str) -> bool {
        let mut inner = self.inner.write().await;
        if inner.entries.remove(key).is_none() {
            return false;
        }
        inner.revision += 1;
        tracing::trace!(key, revision = inner.revision, "delete");
        true
    }

    /// Number of live keys
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    /// Whether no keys are live
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<RawKeyValue>> {
        Ok(self.inner.read().await.entries.get(key).cloned())
    }

    async fn range(&self, prefix: &str) -> Result<Vec<RawKeyValue>> {
        let inner = self.inner.read().await;
        Ok(inner
            .entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(_, v)| v.clone())
            .collect())
    }

    async fn revision(&self) -> Result<i64> {
        Ok(self.inner.read().await.revision)
    }
}
