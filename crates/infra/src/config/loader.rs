//! Configuration loader
//!
//! Loads process configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `REGSTORE_CACHE_ENABLED`: Whether collections may be cached (required)
//! - `REGSTORE_CACHE_REFRESH_INTERVAL`: Cache refresh interval in seconds
//! - `REGSTORE_CACHE_FETCH_TIMEOUT`: Store fetch timeout in seconds
//!
//! Collections always come from the defaults when loading from the
//! environment; use a file to customize them.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./regstore.json` or `./regstore.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use regstore_domain::{CacheConfig, Config, RegistryError, Result, StoreConfig};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variable is missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `RegistryError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Like [`load`], but falls back to [`Config::default`] when no source exists.
///
/// Invalid sources are still reported as errors.
pub fn load_or_default() -> Result<Config> {
    if std::env::var("REGSTORE_CACHE_ENABLED").is_err() && probe_config_paths().is_none() {
        tracing::info!("No configuration source found, using defaults");
        return Ok(Config::default());
    }
    load()
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `RegistryError::Config` if `REGSTORE_CACHE_ENABLED` is missing
/// or any variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let enabled = env_var("REGSTORE_CACHE_ENABLED").and_then(|s| {
        parse_bool(&s).ok_or_else(|| {
            RegistryError::Config(format!("Invalid REGSTORE_CACHE_ENABLED value: {}", s))
        })
    })?;

    let defaults = CacheConfig::default();
    let refresh_interval_seconds =
        env_u64("REGSTORE_CACHE_REFRESH_INTERVAL")?.unwrap_or(defaults.refresh_interval_seconds);
    let fetch_timeout_seconds =
        env_u64("REGSTORE_CACHE_FETCH_TIMEOUT")?.unwrap_or(defaults.fetch_timeout_seconds);

    let config = Config {
        cache: CacheConfig { enabled, refresh_interval_seconds, fetch_timeout_seconds },
        store: StoreConfig::default(),
    };
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `RegistryError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(RegistryError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            RegistryError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| RegistryError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| RegistryError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| RegistryError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(RegistryError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Check invariants serde cannot express
///
/// # Errors
/// Returns `RegistryError::Config` for a zero refresh interval or fetch
/// timeout, an empty collection name or prefix, or a duplicate name.
pub fn validate(config: &Config) -> Result<()> {
    if config.cache.refresh_interval_seconds == 0 {
        return Err(RegistryError::Config("Refresh interval must be positive".to_string()));
    }
    if config.cache.fetch_timeout_seconds == 0 {
        return Err(RegistryError::Config("Fetch timeout must be positive".to_string()));
    }

    let mut names = HashSet::new();
    for collection in &config.store.collections {
        if collection.name.is_empty() || collection.prefix.is_empty() {
            return Err(RegistryError::Config(format!(
                "Collection needs a name and a prefix: {:?}",
                collection
            )));
        }
        if !names.insert(collection.name.as_str()) {
            return Err(RegistryError::Config(format!(
                "Duplicate collection name: {}",
                collection.name
            )));
        }
    }
    Ok(())
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidate_files(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidate_files(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidate_files(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("regstore.json"),
        dir.join("regstore.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
    ]
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        RegistryError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Get optional numeric environment variable
fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(s) => s
            .parse::<u64>()
            .map(Some)
            .map_err(|e| RegistryError::Config(format!("Invalid {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

/// Parse a boolean flag
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
