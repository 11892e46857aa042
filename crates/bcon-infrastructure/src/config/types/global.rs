//! Console-wide configuration sections
//!
//! `[global]`, `[ui]`, `[security]` and `[production]`, with the defaults
//! the console has always shipped with.

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::*;

/// `[global]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Listening port
    pub port: u16,
    /// Bind address
    pub bind: String,
    /// Serve over TLS
    pub ssl: bool,
    /// Single-agent deployment
    pub standalone: bool,
    /// TLS certificate path
    pub sslcert: String,
    /// TLS key path
    pub sslkey: String,
    /// Configuration format version
    pub version: u8,
    /// Authentication backends, tried in order (`"basic"`, `"basic,none"`
    /// or a list are all accepted)
    #[serde(deserialize_with = "lower_list")]
    pub auth: Vec<String>,
    /// ACL backend
    pub acl: String,
    /// URL prefix the console is mounted under
    pub prefix: String,
    /// Backend client
    pub backend: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            ssl: false,
            standalone: true,
            sslcert: String::new(),
            sslkey: String::new(),
            version: DEFAULT_CONFIG_VERSION,
            auth: vec![DEFAULT_AUTH.to_string()],
            acl: DEFAULT_ACL.to_string(),
            prefix: String::new(),
            backend: DEFAULT_BACKEND.to_string(),
        }
    }
}

impl GlobalConfig {
    /// Whether login is disabled altogether
    pub fn login_disabled(&self) -> bool {
        self.auth.iter().any(|key| key == bcon_domain::constants::NONE_PROVIDER_KEY)
    }
}

/// `[ui]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Page refresh interval in seconds
    pub refresh: u64,
    /// Live-monitor refresh interval in seconds
    pub liverefresh: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh: DEFAULT_UI_REFRESH_SECS,
            liverefresh: DEFAULT_UI_LIVEREFRESH_SECS,
        }
    }
}

/// `[security]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Mark session cookies secure
    pub scookie: bool,
    /// Session signing secret, `"random"` generates one per process
    pub appsecret: String,
    /// Remember-me cookie lifetime in days
    pub cookietime: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            scookie: false,
            appsecret: DEFAULT_APPSECRET.to_string(),
            cookietime: DEFAULT_COOKIETIME_DAYS,
        }
    }
}

/// `[production]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionConfig {
    /// Session storage backend
    pub storage: String,
    /// Redis URL shared by sessions and the response cache
    pub redis: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Comma-separated string or list, trimmed and lower-cased
pub(crate) fn split_lower(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

fn lower_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(raw) => split_lower(&raw),
        OneOrMany::Many(items) => items
            .iter()
            .flat_map(|item| split_lower(item))
            .collect(),
    })
}
