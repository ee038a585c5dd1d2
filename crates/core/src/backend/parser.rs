//! Value decoders applied to raw store bytes

use std::fmt;
use std::sync::Arc;

use regstore_domain::{RegistryError, Result, Value};

/// Decodes the raw bytes of a stored record
pub trait Parser: Send + Sync + fmt::Debug {
    /// Decodes one stored value
    fn parse(&self, raw: &[u8]) -> Result<Value>;
}

/// Keeps values as opaque bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesParser;

impl Parser for BytesParser {
    fn parse(&self, raw: &[u8]) -> Result<Value> {
        Ok(Value::Bytes(raw.to_vec()))
    }
}

/// Decodes values as UTF-8 text
#[derive(Debug, Clone, Copy, Default)]
pub struct StringParser;

impl Parser for StringParser {
    fn parse(&self, raw: &[u8]) -> Result<Value> {
        String::from_utf8(raw.to_vec())
            .map(Value::String)
            .map_err(|e| RegistryError::Parse(format!("invalid UTF-8: {}", e)))
    }
}

/// Decodes values as JSON documents
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl Parser for JsonParser {
    fn parse(&self, raw: &[u8]) -> Result<Value> {
        serde_json::from_slice(raw)
            .map(Value::Json)
            .map_err(|e| RegistryError::Parse(format!("invalid JSON: {}", e)))
    }
}

/// Shared [`BytesParser`]
pub fn bytes_parser() -> Arc<dyn Parser> {
    Arc::new(BytesParser)
}

/// Shared [`StringParser`]
pub fn string_parser() -> Arc<dyn Parser> {
    Arc::new(StringParser)
}

/// Shared [`JsonParser`]
pub fn json_parser() -> Arc<dyn Parser> {
    Arc::new(JsonParser)
}
