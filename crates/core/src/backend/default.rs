//! Process-wide fallback entity
//!
//! Code paths that need a plain key/value lookup without a dedicated
//! collection share one uncached entity rooted at `/`. It is built on first
//! access and lives for the rest of the process.

use std::sync::{Arc, OnceLock};

use regstore_domain::constants::ROOT_KEY;
use tracing::debug;

use super::entity::KvEntity;
use super::indexer::CommonIndexer;
use super::parser::bytes_parser;
use super::ports::KvStore;

static DEFAULT_KV_ENTITY: DefaultEntityCell = DefaultEntityCell::new();

/// Once-initialized holder for a shared entity
///
/// Concurrent first accesses block until the single initializer finishes and
/// then all observe the same instance.
#[derive(Debug, Default)]
pub struct DefaultEntityCell {
    cell: OnceLock<Arc<KvEntity>>,
}

impl DefaultEntityCell {
    /// An empty cell
    pub const fn new() -> Self {
        Self { cell: OnceLock::new() }
    }

    /// Returns the held entity, running `init` if this is the first access.
    pub fn get_or_init<F>(&self, init: F) -> Arc<KvEntity>
    where
        F: FnOnce() -> KvEntity,
    {
        Arc::clone(self.cell.get_or_init(|| Arc::new(init())))
    }

    /// The held entity, without initializing
    pub fn get(&self) -> Option<Arc<KvEntity>> {
        self.cell.get().cloned()
    }

    /// Whether an entity has been built
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// The process-wide uncached entity.
///
/// `store` is only used by the first call; later calls return the entity
/// built then.
pub fn default_entity(store: &Arc<dyn KvStore>) -> Arc<KvEntity> {
    DEFAULT_KV_ENTITY.get_or_init(|| {
        debug!(key = ROOT_KEY, "Initializing default entity");
        KvEntity::new(Arc::new(CommonIndexer::new(ROOT_KEY, bytes_parser(), Arc::clone(store))))
    })
}
