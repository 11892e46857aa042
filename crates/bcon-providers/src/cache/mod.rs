//! Response cache storages
//!
//! | Key | Feature | Scope |
//! |-----|---------|-------|
//! | `null` | always | nothing is kept |
//! | `moka` | `cache-moka` (default) | this process |
//! | `redis` | `cache-redis` | every console sharing the server |

#[cfg(feature = "cache-moka")]
pub mod moka;
pub mod null;
#[cfg(feature = "cache-redis")]
pub mod redis;

#[cfg(feature = "cache-moka")]
pub use moka::MokaCacheProvider;
pub use null::NullCacheProvider;
#[cfg(feature = "cache-redis")]
pub use redis::RedisCacheProvider;

pub use bcon_domain::ports::providers::cache::{CacheEntryConfig, CacheStats};
