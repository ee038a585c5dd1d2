//! Error types used throughout the registry storage layer

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for regstore
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum RegistryError {
    /// Configuration missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backing store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Stored value could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation exceeded its deadline
    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for regstore operations
pub type Result<T> = std::result::Result<T, RegistryError>;
