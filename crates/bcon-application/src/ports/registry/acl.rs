//! ACL Provider Registry

use std::sync::Arc;

use serde_json::Value;

use crate::ports::AclProvider;

/// Configuration for ACL provider creation
#[derive(Debug, Clone, Default)]
pub struct AclProviderConfig {
    /// Provider key (e.g., "basic", "none")
    pub provider: String,
    /// The provider's own section (`[acl.<key>]`), `Null` when absent
    pub settings: Value,
}

impl AclProviderConfig {
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

/// Registry entry for ACL providers
pub struct AclProviderEntry {
    /// Unique provider key
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instance
    pub factory: fn(&AclProviderConfig) -> Result<Arc<dyn AclProvider>, String>,
}

#[linkme::distributed_slice]
pub static ACL_PROVIDERS: [AclProviderEntry] = [..];

/// Resolve an ACL provider by key
pub fn resolve_acl_provider(config: &AclProviderConfig) -> Result<Arc<dyn AclProvider>, String> {
    let key = config.provider.as_str();
    match ACL_PROVIDERS
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(key))
    {
        Some(entry) => (entry.factory)(config),
        None => {
            let available: Vec<&str> = ACL_PROVIDERS.iter().map(|e| e.name).collect();
            Err(super::unknown_provider("acl", key, &available))
        }
    }
}

/// List all registered ACL providers as (name, description)
pub fn list_acl_providers() -> Vec<(&'static str, &'static str)> {
    ACL_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
