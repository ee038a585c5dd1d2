//! Key/value records exchanged between the store, caches and indexers

use serde::{Deserialize, Serialize};

/// A record as held by the backing store, value still encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawKeyValue {
    pub key: String,
    pub value: Vec<u8>,
    /// Store revision at which the key was created
    pub create_revision: i64,
    /// Store revision of the latest write to the key
    pub mod_revision: i64,
    /// Number of writes since the key was created
    pub version: i64,
}

/// A decoded value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Value {
    /// Undecoded bytes
    Bytes(Vec<u8>),
    /// UTF-8 text
    String(String),
    /// A JSON document
    Json(serde_json::Value),
}

impl Value {
    /// The raw bytes, if this is a bytes value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// The text, if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The document, if this is a JSON value
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }
}

/// A record with its value decoded by a collection's parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: Value,
    pub create_revision: i64,
    pub mod_revision: i64,
    pub version: i64,
}

impl KeyValue {
    /// Pair a raw record's metadata with its decoded value
    pub fn from_raw(raw: &RawKeyValue, value: Value) -> Self {
        Self {
            key: raw.key.clone(),
            value,
            create_revision: raw.create_revision,
            mod_revision: raw.mod_revision,
            version: raw.version,
        }
    }
}
