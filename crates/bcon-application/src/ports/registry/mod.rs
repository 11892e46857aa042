//! Provider Registry System
//!
//! Compile-time registration of capability implementations. Every
//! capability has one `linkme` distributed slice; providers add entries
//! to it and the infrastructure layer resolves the configured key.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Provider Registration Flow                   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  1. Provider defines:  #[linkme::distributed_slice(PROVIDERS)]  │
//! │                        static ENTRY: AclProviderEntry = ...     │
//! │                              ↓                                  │
//! │  2. Registry declares: #[linkme::distributed_slice]             │
//! │                        pub static PROVIDERS: [Entry] = [..]     │
//! │                              ↓                                  │
//! │  3. Resolver queries:  PROVIDERS.iter()                         │
//! │                              ↓                                  │
//! │  4. Config selects:    "acl = basic" → BasicAcl                 │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Keys are matched case-insensitively.
//!
//! ## Registering a Provider (in bcon-providers)
//!
//! ```ignore
//! use bcon_application::ports::registry::{AclProviderEntry, ACL_PROVIDERS};
//!
//! #[linkme::distributed_slice(ACL_PROVIDERS)]
//! static BASIC_ACL: AclProviderEntry = AclProviderEntry {
//!     name: "basic",
//!     description: "Static admin list and per-user grants",
//!     factory: |config| Ok(Arc::new(BasicAcl::from_config(config)?)),
//! };
//! ```

pub mod acl;
pub mod auth;
pub mod backend;
pub mod cache;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub use acl::{
    ACL_PROVIDERS, AclProviderConfig, AclProviderEntry, list_acl_providers, resolve_acl_provider,
};
pub use auth::{
    AUTH_PROVIDERS, AuthProviderConfig, AuthProviderEntry, list_auth_providers,
    resolve_auth_provider,
};
pub use backend::{
    AgentEndpoint, BACKEND_PROVIDERS, BackendProviderConfig, BackendProviderEntry,
    list_backend_providers, resolve_backend_provider,
};
pub use cache::{
    CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry, list_cache_providers,
    resolve_cache_provider,
};

/// Decode a provider's configuration section
///
/// A missing section (`Value::Null`) yields the provider's defaults.
pub fn decode_settings<T>(settings: &Value) -> Result<T, String>
where
    T: DeserializeOwned + Default,
{
    if settings.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(settings.clone()).map_err(|e| format!("invalid provider settings: {e}"))
}

fn unknown_provider(capability: &str, key: &str, available: &[&str]) -> String {
    format!("Unknown {capability} provider '{key}'. Available providers: {available:?}")
}
