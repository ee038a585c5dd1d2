//! Runnable cacher that mirrors a store prefix into memory.
//!
//! [`KvCacher`] keeps a [`KvCache`] in step with the records under its
//! collection key by periodically listing the prefix from the [`KvStore`]:
//! changed records are re-parsed and upserted, vanished keys are dropped.
//! The readiness signal resolves after the first successful cycle.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use regstore_core::backend::{EntityConfig, KvCacher, KvStore, Runnable};
//!
//! # async fn example(store: Arc<dyn KvStore>) {
//! let cacher = KvCacher::new(
//!     "instances",
//!     EntityConfig::new("/cse-sr/inst/files/").with_init_size(1000),
//!     store,
//! );
//!
//! cacher.run().await;
//! cacher.ready().wait().await;
//! // ... registry serves lookups ...
//! cacher.stop().await;
//! # }
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regstore_domain::constants::DEFAULT_STOP_TIMEOUT_SECS;
use regstore_domain::{KeyValue, RegistryError};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::cache::KvCache;
use super::config::EntityConfig;
use super::parser::Parser;
use super::ports::{Cache, Cacher, KvStore, Runnable};
use super::ready::{ready_pair, ReadyNotifier, ReadySignal};

/// Refresh failures, logged by the loop and retried next period
#[derive(Debug, Error)]
pub enum CacherError {
    /// Listing the prefix took longer than the fetch timeout
    #[error("Fetch timed out after {duration:?}")]
    Timeout {
        /// The fetch timeout that elapsed
        duration: Duration,
    },

    /// The store rejected the listing
    #[error("Store error: {0}")]
    Store(#[from] RegistryError),
}

impl From<CacherError> for RegistryError {
    fn from(err: CacherError) -> Self {
        match err {
            CacherError::Timeout { .. } => RegistryError::Timeout(err.to_string()),
            CacherError::Store(inner) => inner,
        }
    }
}

/// Outcome of one refresh cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStats {
    /// Records listed from the store
    pub fetched: usize,
    /// Records new or changed since the last cycle
    pub upserted: usize,
    /// Cached keys no longer present in the store
    pub removed: usize,
    /// Records whose value the parser rejected
    pub skipped: usize,
}

/// Type alias for task handle to avoid complexity warnings
type TaskHandle = Mutex<Option<JoinHandle<()>>>;

/// Everything the refresh loop needs, detached from the cacher itself
#[derive(Clone)]
struct RefreshContext {
    name: String,
    key: String,
    parser: Arc<dyn Parser>,
    fetch_timeout: Duration,
    store: Arc<dyn KvStore>,
    cache: Arc<KvCache>,
}

impl RefreshContext {
    async fn refresh(&self) -> Result<RefreshStats, CacherError> {
        let raws = tokio::time::timeout(self.fetch_timeout, self.store.range(&self.key))
            .await
            .map_err(|_| CacherError::Timeout { duration: self.fetch_timeout })??;

        let mut stats = RefreshStats { fetched: raws.len(), ..RefreshStats::default() };
        let mut seen = HashSet::with_capacity(raws.len());

        for raw in &raws {
            seen.insert(raw.key.as_str());
            if self.cache.mod_revision(&raw.key) == Some(raw.mod_revision) {
                continue;
            }
            match self.parser.parse(&raw.value) {
                Ok(value) => {
                    self.cache.put(KeyValue::from_raw(raw, value));
                    stats.upserted += 1;
                }
                Err(e) => {
                    warn!(collection = %self.name, key = %raw.key, error = %e, "Skipping unparsable record");
                    stats.skipped += 1;
                }
            }
        }

        for key in self.cache.keys() {
            if !seen.contains(key.as_str()) && self.cache.remove(&key).is_some() {
                stats.removed += 1;
            }
        }

        Ok(stats)
    }
}

/// Cacher with a background refresh loop
pub struct KvCacher {
    name: String,
    config: EntityConfig,
    store: Arc<dyn KvStore>,
    cache: Arc<KvCache>,
    ready: Arc<ReadyNotifier>,
    running: Arc<AtomicBool>,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl KvCacher {
    /// Create a new cacher; nothing is fetched until [`Runnable::run`].
    pub fn new<S: Into<String>>(name: S, config: EntityConfig, store: Arc<dyn KvStore>) -> Self {
        let name = name.into();
        let cache = Arc::new(KvCache::new(name.clone(), config.init_size));
        let (notifier, _signal) = ready_pair();
        Self {
            name,
            config,
            store,
            cache,
            ready: Arc::new(notifier),
            running: Arc::new(AtomicBool::new(false)),
            cancellation_token: CancellationToken::new(),
            task_handle: Mutex::new(None),
        }
    }

    /// Collection name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration this cacher was built with
    pub fn config(&self) -> &EntityConfig {
        &self.config
    }

    /// Check if the refresh loop is running
    ///
    /// True from a successful [`Runnable::run`] until the loop exits.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Runs a single refresh cycle in the caller's task.
    ///
    /// Resolves the readiness signal on success, like a loop cycle does.
    pub async fn refresh_now(&self) -> Result<RefreshStats, CacherError> {
        let stats = self.refresh_context().refresh().await?;
        self.ready.notify();
        Ok(stats)
    }

    fn refresh_context(&self) -> RefreshContext {
        RefreshContext {
            name: self.name.clone(),
            key: self.config.key.clone(),
            parser: Arc::clone(&self.config.parser),
            fetch_timeout: self.config.fetch_timeout,
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
        }
    }

    /// Background refresh loop
    async fn refresh_loop(
        context: RefreshContext,
        interval: Duration,
        ready: Arc<ReadyNotifier>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(collection = %context.name, "Refresh loop cancelled");
                    break;
                }
                result = context.refresh() => match result {
                    Ok(stats) => {
                        if !ready.is_ready() {
                            info!(
                                collection = %context.name,
                                size = context.cache.len(),
                                "Cache initialized"
                            );
                        }
                        ready.notify();
                        debug!(
                            collection = %context.name,
                            fetched = stats.fetched,
                            upserted = stats.upserted,
                            removed = stats.removed,
                            skipped = stats.skipped,
                            "Cache refreshed"
                        );
                    }
                    Err(e) => {
                        warn!(collection = %context.name, error = %e, "Cache refresh failed; keeping last contents");
                    }
                },
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(collection = %context.name, "Refresh loop cancelled");
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }
}

impl Cacher for KvCacher {
    fn cache(&self) -> Arc<dyn Cache> {
        Arc::clone(&self.cache) as Arc<dyn Cache>
    }

    fn as_runnable(&self) -> Option<&dyn Runnable> {
        Some(self)
    }
}

#[async_trait]
impl Runnable for KvCacher {
    #[instrument(skip(self), fields(collection = %self.name))]
    async fn run(&self) {
        let mut handle = self.task_handle.lock().await;
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            warn!("Cacher already running");
            return;
        }
        if self.cancellation_token.is_cancelled() {
            warn!("Cacher was stopped; ignoring run");
            return;
        }

        info!(key = %self.config.key, init_size = self.config.init_size, "Starting cacher");

        let context = self.refresh_context();
        let interval = self.config.refresh_interval;
        let ready = Arc::clone(&self.ready);
        let running = Arc::clone(&self.running);
        let cancel = self.cancellation_token.clone();

        running.store(true, Ordering::SeqCst);
        *handle = Some(tokio::spawn(async move {
            Self::refresh_loop(context, interval, ready, cancel).await;
            running.store(false, Ordering::SeqCst);
        }));
    }

    #[instrument(skip(self), fields(collection = %self.name))]
    async fn stop(&self) {
        self.cancellation_token.cancel();

        let handle = self.task_handle.lock().await.take();
        match handle {
            Some(mut handle) => {
                info!("Stopping cacher");

                let join_timeout = Duration::from_secs(DEFAULT_STOP_TIMEOUT_SECS);
                match tokio::time::timeout(join_timeout, &mut handle).await {
                    Ok(Ok(())) => info!("Cacher stopped"),
                    Ok(Err(e)) => error!(error = %e, "Refresh task failed"),
                    Err(_) => {
                        warn!(timeout_secs = join_timeout.as_secs(), "Refresh task did not stop in time; aborting");
                        handle.abort();
                    }
                }
                self.running.store(false, Ordering::SeqCst);
            }
            None => debug!("Cacher was not running"),
        }

        // The loop is gone for good, so a cache that never filled never will
        if !self.ready.is_ready() {
            debug!("Cacher stopped before becoming ready");
            self.ready.abandon();
        }
    }

    fn ready(&self) -> ReadySignal {
        self.ready.subscribe()
    }
}

/// Ensure the refresh loop is cancelled when dropped
impl Drop for KvCacher {
    fn drop(&mut self) {
        if self.running.load(Ordering::SeqCst) && !self.cancellation_token.is_cancelled() {
            warn!(collection = %self.name, "KvCacher dropped while running; cancelling");
            self.cancellation_token.cancel();
        }
    }
}
