//! Response Cache
//!
//! Memoizes read results per (principal, path, query parameters) on top
//! of any [`CacheProvider`]. The cache is best effort: a failing backend
//! turns every lookup into a miss and the value is computed uncached.
//!
//! Concurrent misses on the same key are single-flighted: the first caller
//! computes, the others wait on a per-key lock and then read the stored
//! value. A value computed across an [`invalidate_all`](ResponseCache::invalidate_all)
//! is returned to its caller but never stored.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use bcon_domain::Principal;
use bcon_domain::error::Result;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::ports::{CacheEntryConfig, CacheProvider};

const KEY_PREFIX: &str = "bcon:resp:";

/// Cache key derived from the caller, the logical resource and its parameters
///
/// Parameters are sorted so their order does not matter. The principal's
/// id and its authenticated, active and admin flags are always part of the
/// key: two callers never share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for `principal` reading `path` with `params`
    pub fn new(principal: &Principal, path: &str, params: &[(&str, Option<&str>)]) -> Self {
        let mut params: Vec<_> = params.iter().filter_map(|(k, v)| v.map(|v| (*k, v))).collect();
        params.sort_unstable();

        let flags = [
            principal.is_authenticated(),
            principal.is_active(),
            principal.is_admin(),
        ]
        .map(u8::from);

        let mut hasher = Sha256::new();
        hasher.update(flags);
        for part in [principal.id(), path] {
            hasher.update(part.len().to_le_bytes());
            hasher.update(part.as_bytes());
        }
        for (k, v) in params {
            hasher.update(k.len().to_le_bytes());
            hasher.update(k.as_bytes());
            hasher.update(v.len().to_le_bytes());
            hasher.update(v.as_bytes());
        }
        Self(format!("{KEY_PREFIX}{}", hex::encode(hasher.finalize())))
    }

    /// The storage key
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Per-key lock entry, removed when the computation ends or is dropped
struct InFlight<'a> {
    in_flight: &'a DashMap<String, Arc<Mutex<()>>>,
    key: &'a str,
    lock: Arc<Mutex<()>>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.in_flight
            .remove_if(self.key, |_, held| Arc::ptr_eq(held, &self.lock));
    }
}

#[derive(Serialize, Deserialize)]
struct CacheEnvelope<T> {
    value: T,
    expires_at: DateTime<Utc>,
}

/// Shared per-principal response cache
#[derive(Debug)]
pub struct ResponseCache {
    provider: Arc<dyn CacheProvider>,
    default_ttl: Duration,
    in_flight: DashMap<String, Arc<Mutex<()>>>,
    generation: AtomicU64,
}

impl ResponseCache {
    /// Wrap a cache provider
    pub fn new(provider: Arc<dyn CacheProvider>, default_ttl: Duration) -> Self {
        Self {
            provider,
            default_ttl,
            in_flight: DashMap::new(),
            generation: AtomicU64::new(0),
        }
    }

    /// Name of the backing provider
    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Return the cached value for `key` or compute and store it
    pub async fn get_or_compute<T, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Option<Duration>,
        compute: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.get_or_compute_if(key, ttl, compute, |_| true).await
    }

    /// Like [`get_or_compute`](Self::get_or_compute), storing only values
    /// accepted by `should_store`
    pub async fn get_or_compute_if<T, F, Fut, P>(
        &self,
        key: &CacheKey,
        ttl: Option<Duration>,
        compute: F,
        should_store: P,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
        P: FnOnce(&T) -> bool,
    {
        if let Some(value) = self.lookup(key).await {
            return Ok(value);
        }

        let lock = self
            .in_flight
            .entry(key.as_str().to_string())
            .or_default()
            .clone();
        let _slot = InFlight {
            in_flight: &self.in_flight,
            key: key.as_str(),
            lock: lock.clone(),
        };
        let _guard = lock.lock().await;

        if let Some(value) = self.lookup(key).await {
            return Ok(value);
        }

        let generation = self.generation.load(Ordering::Acquire);
        let value = compute().await?;
        if should_store(&value) && self.generation.load(Ordering::Acquire) == generation {
            self.store(key, &value, ttl.unwrap_or(self.default_ttl))
                .await;
            // invalidated between the check and the write
            if self.generation.load(Ordering::Acquire) != generation
                && let Err(e) = self.provider.delete(key.as_str()).await
            {
                warn!(provider = self.provider_name(), error = %e, "Failed to drop stale cache entry");
            }
        }
        Ok(value)
    }

    /// Keys with a computation in progress
    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    /// Drop every cached response
    pub async fn invalidate_all(&self) -> Result<()> {
        debug!("Invalidating response cache");
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.provider.clear().await
    }

    /// Drop one cached response
    pub async fn invalidate(&self, key: &CacheKey) -> Result<bool> {
        self.provider.delete(key.as_str()).await
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let raw = match self.provider.get_json(key.as_str()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(provider = self.provider_name(), error = %e, "Cache lookup failed, computing uncached");
                return None;
            }
        };

        match serde_json::from_str::<CacheEnvelope<T>>(&raw) {
            Ok(envelope) if envelope.expires_at > Utc::now() => Some(envelope.value),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    async fn store<T: Serialize>(&self, key: &CacheKey, value: &T, ttl: Duration) {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let envelope = CacheEnvelope { value, expires_at };

        let raw = match serde_json::to_string(&envelope) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Response is not cacheable");
                return;
            }
        };
        if let Err(e) = self
            .provider
            .set_json(key.as_str(), &raw, CacheEntryConfig::with_ttl(ttl))
            .await
        {
            warn!(provider = self.provider_name(), error = %e, "Cache store failed");
        }
    }
}
