//! Authentication Provider Registry

use std::sync::Arc;

use serde_json::Value;

use crate::ports::AuthProvider;

/// Configuration for authentication provider creation
#[derive(Debug, Clone, Default)]
pub struct AuthProviderConfig {
    /// Provider key (e.g., "basic", "none")
    pub provider: String,
    /// The provider's own section (`[auth.<key>]`), `Null` when absent
    pub settings: Value,
}

impl AuthProviderConfig {
    /// Create a new config with the given provider key
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            settings: Value::Null,
        }
    }

    /// Attach the provider's configuration section
    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = settings;
        self
    }
}

/// Registry entry for authentication providers
pub struct AuthProviderEntry {
    /// Unique provider key
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instance
    pub factory: fn(&AuthProviderConfig) -> Result<Arc<dyn AuthProvider>, String>,
}

#[linkme::distributed_slice]
pub static AUTH_PROVIDERS: [AuthProviderEntry] = [..];

/// Resolve an authentication provider by key
pub fn resolve_auth_provider(
    config: &AuthProviderConfig,
) -> Result<Arc<dyn AuthProvider>, String> {
    let key = config.provider.as_str();
    match AUTH_PROVIDERS
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(key))
    {
        Some(entry) => (entry.factory)(config),
        None => {
            let available: Vec<&str> = AUTH_PROVIDERS.iter().map(|e| e.name).collect();
            Err(super::unknown_provider("auth", key, &available))
        }
    }
}

/// List all registered authentication providers as (name, description)
pub fn list_auth_providers() -> Vec<(&'static str, &'static str)> {
    AUTH_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
