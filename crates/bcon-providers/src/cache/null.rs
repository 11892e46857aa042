//! Disabled response cache
//!
//! `provider = "null"`, and the storage the plugin registry falls back to
//! when the configured one cannot be built. Every read misses.

use std::sync::Arc;

use async_trait::async_trait;
use bcon_application::ports::registry::{CACHE_PROVIDERS, CacheProviderEntry};
use bcon_domain::error::Result;
use bcon_domain::ports::providers::cache::{CacheEntryConfig, CacheProvider, CacheStats};

/// Storage that keeps nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCacheProvider;

impl NullCacheProvider {
    /// The disabled storage
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheProvider for NullCacheProvider {
    async fn get_json(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set_json(&self, _key: &str, _value: &str, _config: CacheEntryConfig) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        Ok(CacheStats::default())
    }

    fn provider_name(&self) -> &str {
        "null"
    }
}

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static NULL_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "null",
    description: "Caching disabled, every read goes to the agents",
    factory: |_| Ok(Arc::new(NullCacheProvider)),
};
