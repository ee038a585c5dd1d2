//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! building a store from it.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use regstore_domain::{RegistryError, StoreConfig};
use regstore_infra::{config, MemoryKvStore, Store};
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> anyhow::Result<PathBuf> {
    let mut temp_file = NamedTempFile::new()?;
    temp_file.write_all(contents.as_bytes())?;
    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path)?;
    Ok(path)
}

#[test]
fn test_load_config_from_json_file() -> anyhow::Result<()> {
    let json_content = r#"{
        "cache": {
            "enabled": false,
            "refresh_interval_seconds": 12,
            "fetch_timeout_seconds": 4
        },
        "store": {
            "collections": [
                { "name": "services", "prefix": "/cse-sr/ms/files/", "init_size": 500 },
                { "name": "instances", "prefix": "/cse-sr/inst/files/", "init_size": 1000 }
            ]
        }
    }"#;
    let path = write_config(json_content, "json")?;

    let config = config::load_from_file(Some(path.clone()))?;

    assert!(!config.cache.enabled);
    assert_eq!(config.cache.refresh_interval_seconds, 12);
    assert_eq!(config.cache.fetch_timeout_seconds, 4);
    assert_eq!(config.store.collections.len(), 2);
    assert_eq!(config.store.collections[0].name, "services");

    std::fs::remove_file(path).ok();
    Ok(())
}

#[test]
fn test_missing_sections_fall_back_to_defaults() -> anyhow::Result<()> {
    let path = write_config("[cache]\nenabled = true\n", "toml")?;

    let config = config::load_from_file(Some(path.clone()))?;
    assert_eq!(config.store, StoreConfig::default());
    assert_eq!(config.cache.refresh_interval_seconds, 30);

    std::fs::remove_file(path).ok();
    Ok(())
}

#[test]
fn test_invalid_file_is_a_config_error() -> anyhow::Result<()> {
    let path = write_config("{ not json", "json")?;

    let err = config::load_from_file(Some(path.clone())).unwrap_err();
    assert!(matches!(err, RegistryError::Config(_)));
    assert!(err.to_string().contains("Invalid JSON format"));

    std::fs::remove_file(path).ok();
    Ok(())
}

#[test]
fn test_loaded_config_drives_store_construction() -> anyhow::Result<()> {
    let toml_content = r#"
[cache]
enabled = true

[[store.collections]]
name = "instances"
prefix = "/cse-sr/inst/files/"
init_size = 1000

[[store.collections]]
name = "schemas"
prefix = "/cse-sr/ms/schemas/"
init_size = 0
"#;
    let path = write_config(toml_content, "toml")?;
    let config = config::load_from_file(Some(path.clone()))?;

    let store = Store::new(config, Arc::new(MemoryKvStore::new()));
    assert_eq!(store.names(), vec!["instances", "schemas"]);
    assert!(store.require("instances")?.is_cached());
    assert!(!store.require("schemas")?.is_cached());

    std::fs::remove_file(path).ok();
    Ok(())
}
