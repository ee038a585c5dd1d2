//! Registry storage constants
//!
//! Key prefixes and default sizing for the collections the registry keeps
//! in its backing store.

// Cache refresh configuration
/// Seconds between cache refresh cycles
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;
/// Bound on a single store listing, in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
/// How long `stop` waits for a refresh task to exit
pub const DEFAULT_STOP_TIMEOUT_SECS: u64 = 5;

/// Key of the catch-all collection served by the default entity
pub const ROOT_KEY: &str = "/";

// Standard collection key prefixes
pub const SERVICE_PREFIX: &str = "/cse-sr/ms/files/";
pub const SERVICE_INDEX_PREFIX: &str = "/cse-sr/ms/indexes/";
pub const SERVICE_ALIAS_PREFIX: &str = "/cse-sr/ms/alias/";
pub const SERVICE_TAG_PREFIX: &str = "/cse-sr/ms/tags/";
pub const SERVICE_RULE_PREFIX: &str = "/cse-sr/ms/rules/";
pub const SCHEMA_PREFIX: &str = "/cse-sr/ms/schemas/";
pub const INSTANCE_PREFIX: &str = "/cse-sr/inst/files/";
pub const LEASE_PREFIX: &str = "/cse-sr/inst/leases/";
pub const DOMAIN_PREFIX: &str = "/cse-sr/domains/";
pub const PROJECT_PREFIX: &str = "/cse-sr/projects/";

/// Standard collections as `(name, prefix, init_size)`.
///
/// Schemas are large and rarely read, so they default to an init size of
/// zero and are never cached.
pub const DEFAULT_COLLECTIONS: &[(&str, &str, usize)] = &[
    ("services", SERVICE_PREFIX, 500),
    ("service_indexes", SERVICE_INDEX_PREFIX, 500),
    ("service_aliases", SERVICE_ALIAS_PREFIX, 100),
    ("service_tags", SERVICE_TAG_PREFIX, 100),
    ("service_rules", SERVICE_RULE_PREFIX, 100),
    ("schemas", SCHEMA_PREFIX, 0),
    ("instances", INSTANCE_PREFIX, 1000),
    ("leases", LEASE_PREFIX, 1000),
    ("domains", DOMAIN_PREFIX, 100),
    ("projects", PROJECT_PREFIX, 100),
];
