//! Integration tests for the process-wide default entity

mod support;

use std::sync::{Arc, Barrier};
use std::thread;

use regstore_core::{default_entity, Indexer, KvStore, SearchRequest};
use support::mock_store;

// The default entity is built once per test binary, so every test hands it
// an identical store.
fn fixture() -> Arc<dyn KvStore> {
    mock_store(&[("/config/a", "1"), ("/config/b", "2")])
}

#[test]
fn test_concurrent_callers_share_one_instance() {
    const THREADS: usize = 12;

    let store = fixture();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                default_entity(&store)
            })
        })
        .collect();

    let entities: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(entities.iter().all(|e| Arc::ptr_eq(e, &entities[0])));
    assert!(!entities[0].is_cached());
}

#[tokio::test]
async fn test_default_entity_reads_raw_bytes_from_root() {
    let store = fixture();
    let entity = default_entity(&store);

    entity.run().await;
    assert!(entity.ready().is_ready());

    let response = entity.search(&SearchRequest::prefix("/config/")).await.unwrap();
    assert_eq!(response.count, 2);
    assert_eq!(response.kvs[1].value.as_bytes(), Some(&b"2"[..]));
    entity.stop().await;
}
