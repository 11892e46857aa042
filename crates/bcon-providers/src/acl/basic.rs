//! Basic ACL provider
//!
//! Grants come from the `[acl.basic]` section:
//!
//! ```toml
//! [acl.basic]
//! admins = ["admin"]
//!
//! [acl.basic.grants]
//! bob = ["c1", "c2"]                  # these clients, on any agent
//! alice = { srv2 = ["c3"] }           # per agent
//! carol = { srv1 = ["*"], "*" = [] }  # all of srv1, nothing elsewhere
//! ```
//!
//! `"*"` as a client name grants every client of the agent; `"*"` as an
//! agent key grants every agent, with its list applying to agents not
//! named explicitly. Users without an entry see nothing.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use bcon_application::ports::registry::{
    ACL_PROVIDERS, AclProviderConfig, AclProviderEntry, decode_settings,
};
use bcon_domain::constants::ACL_WILDCARD;
use bcon_domain::error::Result;
use bcon_domain::ports::providers::AclProvider;
use bcon_domain::{Grant, Principal};
use serde::Deserialize;

/// What one user may see
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UserGrant {
    /// The same clients on every agent
    Clients(Vec<String>),
    /// Clients per agent name
    PerAgent(BTreeMap<String, Vec<String>>),
}

/// `[acl.basic]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BasicAclSettings {
    /// Principals with unrestricted access
    pub admins: BTreeSet<String>,
    /// Per-user grants
    pub grants: BTreeMap<String, UserGrant>,
}

/// Static ACL read from configuration
#[derive(Debug, Clone)]
pub struct BasicAclProvider {
    settings: BasicAclSettings,
}

impl BasicAclProvider {
    /// Create the provider
    pub fn new(settings: BasicAclSettings) -> Self {
        Self { settings }
    }

    fn admin(&self, principal: &Principal) -> bool {
        principal.is_admin() || self.settings.admins.contains(principal.id())
    }

    fn grant_of(&self, principal: &Principal) -> Option<&UserGrant> {
        self.settings.grants.get(principal.id())
    }
}

fn to_grant(names: &[String]) -> Grant {
    if names.iter().any(|n| n == ACL_WILDCARD) {
        Grant::All
    } else {
        Grant::Only(names.to_vec())
    }
}

#[async_trait]
impl AclProvider for BasicAclProvider {
    async fn is_admin(&self, principal: &Principal) -> Result<bool> {
        Ok(self.admin(principal))
    }

    async fn servers(&self, principal: &Principal) -> Result<Grant> {
        if self.admin(principal) {
            return Ok(Grant::All);
        }
        Ok(match self.grant_of(principal) {
            None => Grant::nothing(),
            Some(UserGrant::Clients(_)) => Grant::All,
            Some(UserGrant::PerAgent(agents)) if agents.contains_key(ACL_WILDCARD) => Grant::All,
            Some(UserGrant::PerAgent(agents)) => Grant::Only(agents.keys().cloned().collect()),
        })
    }

    async fn clients(&self, principal: &Principal, agent: Option<&str>) -> Result<Grant> {
        if self.admin(principal) {
            return Ok(Grant::All);
        }
        Ok(match (self.grant_of(principal), agent) {
            (None, _) => Grant::nothing(),
            (Some(UserGrant::Clients(clients)), _) => to_grant(clients),
            (Some(UserGrant::PerAgent(agents)), Some(agent)) => agents
                .get(agent)
                .or_else(|| agents.get(ACL_WILDCARD))
                .map(|clients| to_grant(clients))
                .unwrap_or_else(Grant::nothing),
            // Standalone: one server, every listed client applies to it
            (Some(UserGrant::PerAgent(agents)), None) => {
                let all: Vec<String> = agents.values().flatten().cloned().collect();
                to_grant(&all)
            }
        })
    }

    fn provider_name(&self) -> &str {
        "basic"
    }
}

fn basic_acl_factory(config: &AclProviderConfig) -> std::result::Result<Arc<dyn AclProvider>, String> {
    let settings: BasicAclSettings = decode_settings(&config.settings)?;
    Ok(Arc::new(BasicAclProvider::new(settings)))
}

#[linkme::distributed_slice(ACL_PROVIDERS)]
static BASIC_ACL_PROVIDER: AclProviderEntry = AclProviderEntry {
    name: "basic",
    description: "Static admin list and per-user grants",
    factory: basic_acl_factory,
};
