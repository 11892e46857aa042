//! Plugin Registry
//!
//! Resolves the configured key of every capability to exactly one
//! provider instance and keeps it for the lifetime of the process.
//!
//! | Capability | Config key | Mandatory | On failure |
//! |------------|------------|-----------|------------|
//! | auth | `global.auth` | yes | startup aborts |
//! | acl | `global.acl` | no | allow-all no-op |
//! | backend | `global.backend` | yes | startup aborts |
//! | cache | `cache.provider` | no | null cache |
//!
//! Resolution runs under one lock so two callers never build the same
//! capability twice. After startup, reads go through the `OnceLock`
//! slots without locking.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use bcon_application::ports::registry::{
    AclProviderConfig, AuthProviderConfig, BackendProviderConfig, CacheProviderConfig,
    resolve_acl_provider, resolve_auth_provider, resolve_backend_provider, resolve_cache_provider,
};
use bcon_domain::constants::NONE_PROVIDER_KEY;
use bcon_domain::error::{Error, Result};
use bcon_domain::ports::providers::{AclProvider, AuthProvider, BackendClient, CacheProvider};
use bcon_providers::acl::NoneAclProvider;
use bcon_providers::cache::NullCacheProvider;
use serde::Serialize;
use tracing::{error, info, warn};

use super::auth_chain::ChainedAuthProvider;
use crate::config::AppConfig;

/// Capability a plugin implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Authentication
    Auth,
    /// Access control
    Acl,
    /// Backup backend client
    Backend,
    /// Response cache storage
    Cache,
}

impl Capability {
    /// Every capability, in resolution order
    pub const ALL: [Self; 4] = [Self::Auth, Self::Acl, Self::Backend, Self::Cache];

    /// Lower-case name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Acl => "acl",
            Self::Backend => "backend",
            Self::Cache => "cache",
        }
    }

    /// Whether a resolution failure aborts startup
    pub fn is_mandatory(self) -> bool {
        matches!(self, Self::Auth | Self::Backend)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a plugin handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum PluginState {
    /// Not resolved yet
    Unloaded,
    /// Resolved and serving
    Loaded,
    /// Resolution failed; terminal
    Failed(String),
}

/// Resolution record of one capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginHandle {
    /// Capability
    pub capability: Capability,
    /// Configured key, lower-cased
    pub key: String,
    /// Whether failure is fatal
    pub mandatory: bool,
    /// Resolution state
    pub state: PluginState,
    /// Provider actually serving the capability, if any
    pub provider: Option<String>,
}

impl PluginHandle {
    fn unloaded(capability: Capability, key: String) -> Self {
        Self {
            capability,
            key,
            mandatory: capability.is_mandatory(),
            state: PluginState::Unloaded,
            provider: None,
        }
    }

    /// Whether the capability degraded to its no-op implementation
    pub fn is_fallback(&self) -> bool {
        matches!(self.state, PluginState::Failed(_)) && self.provider.is_some()
    }
}

/// Process-wide plugin singletons
pub struct PluginRegistry {
    config: Arc<AppConfig>,
    handles: Mutex<BTreeMap<Capability, PluginHandle>>,
    auth: OnceLock<Arc<dyn AuthProvider>>,
    acl: OnceLock<Arc<dyn AclProvider>>,
    backend: OnceLock<Arc<dyn BackendClient>>,
    cache: OnceLock<Arc<dyn CacheProvider>>,
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("handles", &self.handles())
            .finish_non_exhaustive()
    }
}

impl PluginRegistry {
    /// Registry over a loaded configuration; nothing is resolved yet
    pub fn new(config: Arc<AppConfig>) -> Self {
        let handles = Capability::ALL
            .into_iter()
            .map(|capability| {
                let key = configured_key(&config, capability);
                (capability, PluginHandle::unloaded(capability, key))
            })
            .collect();
        Self {
            config,
            handles: Mutex::new(handles),
            auth: OnceLock::new(),
            acl: OnceLock::new(),
            backend: OnceLock::new(),
            cache: OnceLock::new(),
        }
    }

    /// Resolve every capability, stopping at the first mandatory failure
    pub fn resolve_all(&self) -> Result<()> {
        self.auth()?;
        self.acl()?;
        self.backend()?;
        self.cache()?;
        Ok(())
    }

    /// Snapshot of every handle
    pub fn handles(&self) -> Vec<PluginHandle> {
        self.lock().values().cloned().collect()
    }

    /// Snapshot of one handle
    pub fn handle(&self, capability: Capability) -> Option<PluginHandle> {
        self.lock().get(&capability).cloned()
    }

    /// Authentication provider
    ///
    /// Several configured keys are tried in order through a
    /// [`ChainedAuthProvider`].
    pub fn auth(&self) -> Result<Arc<dyn AuthProvider>> {
        self.resolve(
            &self.auth,
            Capability::Auth,
            |_, config| {
                let providers = config
                    .global
                    .auth
                    .iter()
                    .map(|key| {
                        resolve_auth_provider(
                            &AuthProviderConfig::new(key.as_str())
                                .with_settings(config.auth_settings(key)),
                        )
                    })
                    .collect::<std::result::Result<Vec<_>, String>>()?;
                match <[_; 1]>::try_from(providers) {
                    Ok([single]) => Ok(single),
                    Err(providers) => {
                        Ok(Arc::new(ChainedAuthProvider::new(providers)?) as Arc<dyn AuthProvider>)
                    }
                }
            },
            || None,
        )
    }

    /// ACL provider
    ///
    /// Forced to the allow-all provider when authentication disables login.
    pub fn acl(&self) -> Result<Arc<dyn AclProvider>> {
        let login_disabled = self.auth().is_ok_and(|auth| auth.disables_login());
        if login_disabled && self.acl.get().is_none() {
            let mut handles = self.lock();
            if let Some(handle) = handles.get_mut(&Capability::Acl)
                && handle.key != NONE_PROVIDER_KEY
            {
                info!(configured = %handle.key, "Login disabled, authorization disabled too");
                handle.key = NONE_PROVIDER_KEY.to_string();
            }
        }

        self.resolve(
            &self.acl,
            Capability::Acl,
            |key, config| {
                resolve_acl_provider(
                    &AclProviderConfig::new(key).with_settings(config.acl_settings(key)),
                )
            },
            || Some(Arc::new(NoneAclProvider::new()) as Arc<dyn AclProvider>),
        )
    }

    /// Backend client
    pub fn backend(&self) -> Result<Arc<dyn BackendClient>> {
        self.resolve(
            &self.backend,
            Capability::Backend,
            |key, config| {
                let mut backend = BackendProviderConfig::new(key)
                    .with_standalone(config.global.standalone)
                    .with_settings(config.inventory.clone().unwrap_or_default());
                for agent in config.agent_endpoints() {
                    backend = backend.with_agent(agent);
                }
                resolve_backend_provider(&backend)
            },
            || None,
        )
    }

    /// Response cache storage
    pub fn cache(&self) -> Result<Arc<dyn CacheProvider>> {
        self.resolve(
            &self.cache,
            Capability::Cache,
            |key, config| {
                let mut cache = CacheProviderConfig::new(key)
                    .with_max_entries(config.cache.max_entries)
                    .with_ttl(Duration::from_secs(config.cache.ttl_secs));
                if let Some(url) = config.cache_uri() {
                    cache = cache.with_url(url);
                }
                resolve_cache_provider(&cache)
            },
            || Some(Arc::new(NullCacheProvider::new()) as Arc<dyn CacheProvider>),
        )
    }

    /// Resolve `capability` into `slot` once
    ///
    /// `noop` is the built-in implementation optional capabilities fall
    /// back to; mandatory capabilities pass `|| None`.
    fn resolve<T, B, N>(
        &self,
        slot: &OnceLock<Arc<T>>,
        capability: Capability,
        build: B,
        noop: N,
    ) -> Result<Arc<T>>
    where
        T: ?Sized,
        B: FnOnce(&str, &AppConfig) -> std::result::Result<Arc<T>, String>,
        N: Fn() -> Option<Arc<T>>,
    {
        if let Some(instance) = slot.get() {
            return Ok(Arc::clone(instance));
        }

        let mut handles = self.lock();
        if let Some(instance) = slot.get() {
            return Ok(Arc::clone(instance));
        }
        let handle = handles
            .entry(capability)
            .or_insert_with(|| PluginHandle::unloaded(capability, String::new()));
        let key = handle.key.clone();
        let mandatory = handle.mandatory;

        if let PluginState::Failed(message) = &handle.state {
            return Err(Error::plugin_resolution(
                capability.as_str(),
                key,
                mandatory,
                message.clone(),
            ));
        }

        let outcome = if !mandatory && (key.is_empty() || key == NONE_PROVIDER_KEY) {
            noop().ok_or_else(|| format!("no built-in {capability} implementation"))
        } else {
            build(&key, &self.config)
        };

        let instance = match outcome {
            Ok(instance) => {
                handle.state = PluginState::Loaded;
                handle.provider = Some(if key.is_empty() {
                    NONE_PROVIDER_KEY.to_string()
                } else {
                    key.clone()
                });
                info!(capability = %capability, key = %key, "Plugin loaded");
                instance
            }
            Err(message) if mandatory => {
                error!(capability = %capability, key = %key, error = %message, "Unable to load mandatory plugin");
                handle.state = PluginState::Failed(message.clone());
                return Err(Error::plugin_resolution(
                    capability.as_str(),
                    key,
                    true,
                    message,
                ));
            }
            Err(message) => {
                let Some(instance) = noop() else {
                    handle.state = PluginState::Failed(message.clone());
                    return Err(Error::plugin_resolution(
                        capability.as_str(),
                        key,
                        false,
                        message,
                    ));
                };
                warn!(capability = %capability, key = %key, error = %message, "Unable to load plugin, falling back to '{NONE_PROVIDER_KEY}'");
                handle.state = PluginState::Failed(message);
                handle.provider = Some(NONE_PROVIDER_KEY.to_string());
                instance
            }
        };

        // The lock is held, so the slot is still empty
        let _ = slot.set(Arc::clone(&instance));
        Ok(instance)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<Capability, PluginHandle>> {
        self.handles.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn configured_key(config: &AppConfig, capability: Capability) -> String {
    match capability {
        Capability::Auth => config.global.auth.join(","),
        Capability::Acl => config.global.acl.trim().to_lowercase(),
        Capability::Backend => config.global.backend.trim().to_lowercase(),
        Capability::Cache => config.cache.provider.trim().to_lowercase(),
    }
}
