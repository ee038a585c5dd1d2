//! # regstore Domain
//!
//! Domain types shared by every regstore crate.
//!
//! This crate contains:
//! - Key/value record types
//! - Error types and Result definitions
//! - Configuration structures
//! - Collection constants
//!
//! ## Architecture
//! - No dependencies on other regstore crates
//! - Only external dependencies allowed
//! - Pure data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
