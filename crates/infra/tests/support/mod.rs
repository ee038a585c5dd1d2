//! Shared test helpers for `regstore-infra` integration tests.

#![allow(dead_code)]

use std::sync::atomic::Ordering;
use std::sync::Arc;

use regstore_core::testing::MockKvStore;

/// Mock store pre-filled with `entries`, one revision per entry
pub fn mock_store(entries: &[(&str, &str)]) -> Arc<MockKvStore> {
    let store = Arc::new(MockKvStore::new());
    for (key, value) in entries {
        store.put(key, value.as_bytes());
    }
    store
}

/// Total reads served by `store`
pub fn reads(store: &MockKvStore) -> usize {
    store.get_calls.load(Ordering::SeqCst) + store.range_calls.load(Ordering::SeqCst)
}
