//! # regstore Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Configuration loading (environment, JSON/TOML files)
//! - An in-memory revisioned key/value store
//! - The named-collection [`Store`] facade
//! - Tracing bootstrap
//!
//! ## Architecture
//! - Implements traits defined in `regstore-core`
//! - Depends on `regstore-domain` and `regstore-core`
//! - Contains all "impure" code (I/O, environment, global subscribers)

pub mod config;
pub mod memory;
pub mod store;
pub mod telemetry;

// Re-export commonly used items
pub use memory::MemoryKvStore;
pub use store::Store;
pub use telemetry::{init_tracing, LogFormat};
