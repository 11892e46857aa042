//! Backend Client Registry

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ports::BackendClient;

/// Connection settings for one remote agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentEndpoint {
    /// Agent name, unique
    pub name: String,
    /// Base URL of the agent's HTTP API
    pub url: String,
    /// Upper bound for any single call to this agent
    pub timeout_secs: u64,
    /// Shared secret sent to the agent, if any
    pub password: Option<String>,
}

/// Configuration for backend client creation
#[derive(Debug, Clone, Default)]
pub struct BackendProviderConfig {
    /// Provider key (e.g., "multi", "memory")
    pub provider: String,
    /// Single-agent deployment
    pub standalone: bool,
    /// Configured agents, in configuration order
    pub agents: Vec<AgentEndpoint>,
    /// Provider-specific section (e.g. `[inventory]`), `Null` when absent
    pub settings: Value,
}

impl BackendProviderConfig {
    /// Create a new config with the given provider key
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Set standalone mode
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Add an agent
    pub fn with_agent(mut self, agent: AgentEndpoint) -> Self {
        self.agents.push(agent);
        self
    }

    /// Attach the provider's configuration section
    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = settings;
        self
    }
}

/// Registry entry for backend clients
pub struct BackendProviderEntry {
    /// Unique provider key
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instance
    pub factory: fn(&BackendProviderConfig) -> Result<Arc<dyn BackendClient>, String>,
}

#[linkme::distributed_slice]
pub static BACKEND_PROVIDERS: [BackendProviderEntry] = [..];

/// Resolve a backend client by key
pub fn resolve_backend_provider(
    config: &BackendProviderConfig,
) -> Result<Arc<dyn BackendClient>, String> {
    let key = config.provider.as_str();
    match BACKEND_PROVIDERS
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(key))
    {
        Some(entry) => (entry.factory)(config),
        None => {
            let available: Vec<&str> = BACKEND_PROVIDERS.iter().map(|e| e.name).collect();
            Err(super::unknown_provider("backend", key, &available))
        }
    }
}

/// List all registered backend clients as (name, description)
pub fn list_backend_providers() -> Vec<(&'static str, &'static str)> {
    BACKEND_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
