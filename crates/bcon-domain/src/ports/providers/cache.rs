//! Cache Provider Port
//!
//! Storage behind the response cache. Entries are opaque JSON strings;
//! the response cache owns the envelope format and key derivation.

use crate::constants::DEFAULT_CACHE_TTL_SECS;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a cache entry is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntryConfig {
    /// Time to live for the entry
    pub ttl: Duration,
}

impl CacheEntryConfig {
    /// Entry with the given TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Entry with a TTL in seconds
    pub fn with_ttl_secs(secs: u64) -> Self {
        Self::with_ttl(Duration::from_secs(secs))
    }
}

impl Default for CacheEntryConfig {
    fn default() -> Self {
        Self::with_ttl_secs(DEFAULT_CACHE_TTL_SECS)
    }
}

/// Entry count snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of live entries
    pub entries: u64,
}

/// Cache storage backend
///
/// # Implementations
///
/// - **moka**: in-process cache with per-entry TTL
/// - **redis**: shared cache for several console instances
/// - **null**: stores nothing
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug {
    /// Get a value, `None` if absent or expired
    async fn get_json(&self, key: &str) -> Result<Option<String>>;

    /// Store a value
    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()>;

    /// Delete a value, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Drop every entry
    async fn clear(&self) -> Result<()>;

    /// Hit/miss counters
    async fn stats(&self) -> Result<CacheStats>;

    /// Identifier of this provider implementation (e.g. "moka", "redis", "null")
    fn provider_name(&self) -> &str;
}
