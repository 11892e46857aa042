//! No-op ACL provider
//!
//! Every principal is an administrator and every query returns
//! [`Grant::All`]. Used when no ACL is configured and as the fallback
//! when the configured one fails to load.

use std::sync::Arc;

use async_trait::async_trait;
use bcon_application::ports::registry::{ACL_PROVIDERS, AclProviderEntry};
use bcon_domain::error::Result;
use bcon_domain::ports::providers::AclProvider;
use bcon_domain::{Grant, Principal};

/// ACL provider that allows everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneAclProvider;

impl NoneAclProvider {
    /// Create a new allow-all provider
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AclProvider for NoneAclProvider {
    async fn is_admin(&self, _principal: &Principal) -> Result<bool> {
        Ok(true)
    }

    async fn servers(&self, _principal: &Principal) -> Result<Grant> {
        Ok(Grant::All)
    }

    async fn clients(&self, _principal: &Principal, _agent: Option<&str>) -> Result<Grant> {
        Ok(Grant::All)
    }

    async fn is_client_allowed(
        &self,
        _principal: &Principal,
        _client: &str,
        _agent: Option<&str>,
    ) -> Result<bool> {
        Ok(true)
    }

    fn provider_name(&self) -> &str {
        "none"
    }
}

#[linkme::distributed_slice(ACL_PROVIDERS)]
static NONE_ACL_PROVIDER: AclProviderEntry = AclProviderEntry {
    name: "none",
    description: "No access control, everyone is an administrator",
    factory: |_config| Ok(Arc::new(NoneAclProvider::new())),
};
