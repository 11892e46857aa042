//! Remote agent configuration

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_AGENT_TIMEOUT_SECS;

/// One `[agents.<name>]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Base URL of the agent's HTTP API
    pub url: String,
    /// Upper bound for one call to this agent, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Shared secret sent to the agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

fn default_timeout() -> u64 {
    DEFAULT_AGENT_TIMEOUT_SECS
}

impl AgentConfig {
    /// Agent at `url` with the default timeout
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: DEFAULT_AGENT_TIMEOUT_SECS,
            password: None,
        }
    }
}
