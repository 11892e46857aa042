//! Cache storage registry
//!
//! Storage behind [`ResponseCache`](crate::ResponseCache). The key comes
//! from `[cache] provider`.

use std::sync::Arc;
use std::time::Duration;

use crate::ports::CacheProvider;

/// What a cache storage factory is given
#[derive(Debug, Clone, Default)]
pub struct CacheProviderConfig {
    /// Provider key (`moka`, `redis`, `null`)
    pub provider: String,
    /// Server URL of a shared cache
    pub url: Option<String>,
    /// Entry bound of a local cache
    pub max_entries: Option<u64>,
    /// Longest lifetime of any entry
    pub ttl: Option<Duration>,
}

impl CacheProviderConfig {
    /// Config for `provider` with every option unset
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Shared cache server
    #[must_use]
    pub fn with_url(self, url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..self
        }
    }

    /// Entry bound
    #[must_use]
    pub fn with_max_entries(self, max_entries: u64) -> Self {
        Self {
            max_entries: Some(max_entries),
            ..self
        }
    }

    /// Longest entry lifetime
    #[must_use]
    pub fn with_ttl(self, ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..self
        }
    }
}

/// One registered cache storage
pub struct CacheProviderEntry {
    /// Configuration key
    pub name: &'static str,
    /// Shown by `bcon plugins`
    pub description: &'static str,
    /// Builds the storage
    pub factory: fn(&CacheProviderConfig) -> Result<Arc<dyn CacheProvider>, String>,
}

#[linkme::distributed_slice]
pub static CACHE_PROVIDERS: [CacheProviderEntry] = [..];

/// Build the storage registered under `config.provider`
pub fn resolve_cache_provider(
    config: &CacheProviderConfig,
) -> Result<Arc<dyn CacheProvider>, String> {
    let key = config.provider.as_str();
    let Some(entry) = CACHE_PROVIDERS
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(key))
    else {
        let available: Vec<&str> = CACHE_PROVIDERS.iter().map(|entry| entry.name).collect();
        return Err(super::unknown_provider("cache", key, &available));
    };
    (entry.factory)(config)
}

/// Registered cache storages as `(name, description)`
pub fn list_cache_providers() -> Vec<(&'static str, &'static str)> {
    CACHE_PROVIDERS
        .iter()
        .map(|entry| (entry.name, entry.description))
        .collect()
}
