//! Redis response cache storage
//!
//! Lets several console instances share one response cache. The Redis
//! database is usually the one holding web sessions too, so every key is
//! written under [`REDIS_KEY_PREFIX`] and `clear` only removes that
//! namespace.
//!
//! ```ignore
//! use bcon_providers::cache::RedisCacheProvider;
//!
//! let provider = RedisCacheProvider::new("redis://localhost:6379/3")?;
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bcon_application::ports::registry::{CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry};
use bcon_domain::error::{Error, Result};
use bcon_domain::ports::providers::cache::{CacheEntryConfig, CacheProvider, CacheStats};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};
use tokio::sync::OnceCell;

use crate::constants::{REDIS_DEFAULT_URL, REDIS_KEY_PREFIX, REDIS_SCAN_COUNT};

/// Redis-backed cache storage
#[derive(Clone)]
pub struct RedisCacheProvider {
    client: Client,
    connection: Arc<OnceCell<ConnectionManager>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl RedisCacheProvider {
    /// Storage for the server at `url`
    ///
    /// Only the URL is checked here; the connection is opened on first use.
    pub fn new(url: &str) -> Result<Self> {
        let client = Client::open(url).map_err(|e| redis_error("client setup", e))?;
        Ok(Self {
            client,
            connection: Arc::new(OnceCell::new()),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        self.connection
            .get_or_try_init(|| ConnectionManager::new(self.client.clone()))
            .await
            .cloned()
            .map_err(|e| redis_error("connection", e))
    }

    /// Every key of the namespace, gathered with SCAN
    async fn namespaced_keys(&self, conn: &mut ConnectionManager) -> Result<Vec<String>> {
        let pattern = format!("{REDIS_KEY_PREFIX}*");
        let mut keys = Vec::new();
        let mut cursor = 0_u64;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(REDIS_SCAN_COUNT)
                .query_async(conn)
                .await
                .map_err(|e| redis_error("SCAN", e))?;
            keys.extend(batch);
            if next == 0 {
                return Ok(keys);
            }
            cursor = next;
        }
    }
}

fn namespaced(key: &str) -> String {
    format!("{REDIS_KEY_PREFIX}{key}")
}

fn redis_error(operation: &str, e: RedisError) -> Error {
    Error::Cache {
        message: format!("Redis {operation} failed: {e}"),
    }
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn
            .get(namespaced(key))
            .await
            .map_err(|e| redis_error("GET", e))?;
        if value.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        Ok(value)
    }

    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()> {
        let mut conn = self.connection().await?;
        let key = namespaced(key);
        // EX 0 is rejected by Redis
        match config.ttl.as_secs() {
            0 => conn.set::<_, _, ()>(key, value).await,
            secs => conn.set_ex::<_, _, ()>(key, value, secs).await,
        }
        .map_err(|e| redis_error("SET", e))
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let removed: u64 = conn
            .del(namespaced(key))
            .await
            .map_err(|e| redis_error("DEL", e))?;
        Ok(removed > 0)
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        let keys = self.namespaced_keys(&mut conn).await?;
        if keys.is_empty() {
            return Ok(());
        }
        conn.del::<_, ()>(keys)
            .await
            .map_err(|e| redis_error("DEL", e))
    }

    async fn stats(&self) -> Result<CacheStats> {
        let mut conn = self.connection().await?;
        let entries = u64::try_from(self.namespaced_keys(&mut conn).await?.len()).unwrap_or(u64::MAX);
        Ok(CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
        })
    }

    fn provider_name(&self) -> &str {
        "redis"
    }
}

impl fmt::Debug for RedisCacheProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCacheProvider")
            .field("connected", &self.connection.initialized())
            .finish_non_exhaustive()
    }
}

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static REDIS_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "redis",
    description: "Redis cache shared between console instances",
    factory: |config: &CacheProviderConfig| {
        let url = config.url.as_deref().unwrap_or(REDIS_DEFAULT_URL);
        RedisCacheProvider::new(url)
            .map(|provider| Arc::new(provider) as Arc<dyn CacheProvider>)
            .map_err(|e| e.to_string())
    },
};
