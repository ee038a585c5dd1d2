//! # regstore Core
//!
//! Entity composition for the registry storage layer.
//!
//! This crate contains:
//! - Port interfaces (traits) for caches, indexers, lifecycle and the store
//! - The composed entity and its lifecycle dispatch
//! - The construction policy choosing cached vs. uncached backends
//! - The in-memory cacher and both indexer flavours
//!
//! ## Architecture Principles
//! - Only depends on `regstore-domain`
//! - No I/O of its own; the raw data source is the `KvStore` port
//! - Process configuration is passed in explicitly, never read globally

pub mod backend;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export specific items to avoid ambiguity
pub use backend::{
    default_entity, new_entity, BackendContext, Cache, Cacher, EntityConfig, Indexer, KvEntity,
    KvStore, ReadySignal, Runnable, SearchRequest, SearchResponse,
};
