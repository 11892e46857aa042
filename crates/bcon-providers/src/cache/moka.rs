//! Moka in-memory cache provider
//!
//! Entries live at most the configured TTL; the response cache applies
//! shorter per-entry lifetimes on read.
//!
//! ## Example
//!
//! ```ignore
//! use bcon_providers::cache::MokaCacheProvider;
//! use std::time::Duration;
//!
//! let provider = MokaCacheProvider::with_config(1000, Duration::from_secs(300));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bcon_application::ports::registry::{CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry};
use bcon_domain::constants::DEFAULT_CACHE_TTL_SECS;
use bcon_domain::error::Result;
use bcon_domain::ports::providers::cache::{CacheEntryConfig, CacheProvider, CacheStats};
use moka::future::Cache;

use crate::constants::CACHE_DEFAULT_MAX_ENTRIES;

/// Moka-based in-memory cache provider
#[derive(Clone)]
pub struct MokaCacheProvider {
    cache: Cache<String, Arc<str>>,
    max_entries: u64,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl Default for MokaCacheProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MokaCacheProvider {
    /// Create a provider with default capacity and TTL
    pub fn new() -> Self {
        Self::with_config(
            CACHE_DEFAULT_MAX_ENTRIES,
            Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        )
    }

    /// Create a provider with custom capacity and TTL
    pub fn with_config(max_entries: u64, time_to_live: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(time_to_live)
            .build();

        Self {
            cache,
            max_entries,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Maximum number of entries
    pub fn max_entries(&self) -> u64 {
        self.max_entries
    }
}

#[async_trait]
impl CacheProvider for MokaCacheProvider {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        match self.cache.get(key).await {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(value.to_string()))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    async fn set_json(&self, key: &str, value: &str, _config: CacheEntryConfig) -> Result<()> {
        self.cache.insert(key.to_string(), Arc::from(value)).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn clear(&self) -> Result<()> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        // entry_count is only accurate once pending tasks have run
        self.cache.run_pending_tasks().await;
        Ok(CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
        })
    }

    fn provider_name(&self) -> &str {
        "moka"
    }
}

impl std::fmt::Debug for MokaCacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCacheProvider")
            .field("max_entries", &self.max_entries)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

fn moka_cache_factory(
    config: &CacheProviderConfig,
) -> std::result::Result<Arc<dyn CacheProvider>, String> {
    let ttl = config
        .ttl
        .unwrap_or(Duration::from_secs(DEFAULT_CACHE_TTL_SECS));
    if ttl.is_zero() {
        return Err("cache TTL must be greater than zero".to_string());
    }
    let max_entries = config.max_entries.unwrap_or(CACHE_DEFAULT_MAX_ENTRIES);
    Ok(Arc::new(MokaCacheProvider::with_config(max_entries, ttl)))
}

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static MOKA_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "moka",
    description: "Moka in-memory cache",
    factory: moka_cache_factory,
};
