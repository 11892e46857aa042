//! Main application configuration

use std::collections::BTreeMap;

use bcon_application::ports::registry::AgentEndpoint;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    AgentConfig, CacheConfig, GlobalConfig, LoggingConfig, ProductionConfig, SecurityConfig,
    UiConfig,
};

/// Everything the console reads from its configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `[global]`
    pub global: GlobalConfig,
    /// `[ui]`
    pub ui: UiConfig,
    /// `[security]`
    pub security: SecurityConfig,
    /// `[production]`
    pub production: ProductionConfig,
    /// `[cache]`
    pub cache: CacheConfig,
    /// `[logging]`
    pub logging: LoggingConfig,
    /// `[agents.<name>]`, ordered by name
    pub agents: BTreeMap<String, AgentConfig>,
    /// `[auth.<key>]` provider sections
    pub auth: BTreeMap<String, Value>,
    /// `[acl.<key>]` provider sections
    pub acl: BTreeMap<String, Value>,
    /// `[inventory]` section read by the in-process backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Value>,
}

impl AppConfig {
    /// Configured agents as backend endpoints
    pub fn agent_endpoints(&self) -> Vec<AgentEndpoint> {
        self.agents
            .iter()
            .map(|(name, agent)| AgentEndpoint {
                name: name.clone(),
                url: agent.url.clone(),
                timeout_secs: agent.timeout_secs,
                password: agent.password.clone(),
            })
            .collect()
    }

    /// The `[auth.<key>]` section, `Null` when absent
    pub fn auth_settings(&self, key: &str) -> Value {
        section(&self.auth, key)
    }

    /// The `[acl.<key>]` section, `Null` when absent
    pub fn acl_settings(&self, key: &str) -> Value {
        section(&self.acl, key)
    }

    /// Connection URI of the response cache
    pub fn cache_uri(&self) -> Option<String> {
        self.cache
            .uri
            .clone()
            .filter(|uri| !uri.is_empty())
            .or_else(|| Some(self.production.redis.clone()).filter(|uri| !uri.is_empty()))
    }
}

fn section(sections: &BTreeMap<String, Value>, key: &str) -> Value {
    sections
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map_or(Value::Null, |(_, value)| value.clone())
}
