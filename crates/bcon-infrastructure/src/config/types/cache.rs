//! Response cache configuration types

use serde::{Deserialize, Serialize};

use crate::constants::*;
use bcon_domain::constants::DEFAULT_CACHE_TTL_SECS;

/// `[cache]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache provider key (`moka`, `redis`, `null`)
    pub provider: String,
    /// Lifetime of a cached response in seconds
    pub ttl_secs: u64,
    /// Maximum number of cached responses
    pub max_entries: u64,
    /// Connection URI for distributed providers, defaults to `production.redis`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_CACHE_PROVIDER.to_string(),
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            uri: None,
        }
    }
}
