//! Storage backend entities
//!
//! An entity binds one collection's lookup path and, optionally, its
//! in-memory cache into a single object with a uniform lifecycle:
//! - **[`ports`]**: capability traits (`Cache`, `Cacher`, `Indexer`,
//!   `Runnable`, `KvStore`)
//! - **[`entity`]**: the composed [`KvEntity`]
//! - **[`factory`]**: [`new_entity`], which decides cached vs. uncached
//! - **[`default`]**: the process-wide fallback entity

pub mod cache;
pub mod cacher;
pub mod config;
pub mod default;
pub mod entity;
pub mod factory;
pub mod indexer;
pub mod parser;
pub mod ports;
pub mod ready;

// Re-export commonly used types and traits for convenience
pub use cache::KvCache;
pub use cacher::{CacherError, KvCacher, RefreshStats};
pub use config::{BackendContext, EntityConfig};
pub use default::{default_entity, DefaultEntityCell};
pub use entity::KvEntity;
pub use factory::new_entity;
pub use indexer::{CacheIndexer, CommonIndexer};
pub use parser::{
    bytes_parser, json_parser, string_parser, BytesParser, JsonParser, Parser, StringParser,
};
pub use ports::{Cache, Cacher, Indexer, KvStore, Runnable, SearchRequest, SearchResponse};
pub use ready::{ready_pair, ReadyNotifier, ReadySignal};
