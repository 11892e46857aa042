//! Authorization gate
//!
//! Every console operation passes through [`Authorizer::authorize`] once.
//! ACL provider errors at call time deny access instead of propagating.

use std::sync::Arc;

use bcon_domain::error::{Error, Result};
use bcon_domain::{Grant, Principal};
use tracing::warn;

use crate::ports::AclProvider;

/// Outcome of the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Admin principal, every filter is a no-op
    Admin,
    /// Non-admin principal, results must be filtered
    Restricted,
}

impl Access {
    /// Whether filtering is bypassed
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Central admission check over an [`AclProvider`]
#[derive(Debug, Clone)]
pub struct Authorizer {
    acl: Arc<dyn AclProvider>,
    standalone: bool,
}

impl Authorizer {
    /// Create the gate
    pub fn new(acl: Arc<dyn AclProvider>, standalone: bool) -> Self {
        Self { acl, standalone }
    }

    /// Whether the console runs against a single agent
    pub fn is_standalone(&self) -> bool {
        self.standalone
    }

    /// Name of the underlying ACL provider
    pub fn acl_name(&self) -> &str {
        self.acl.provider_name()
    }

    /// Admit `principal` to an operation scoped to `agent` and `client`
    ///
    /// Fails with `AuthFailure` for principals that are not logged in or
    /// disabled, and with `PermissionDenied` when a non-admin names an
    /// agent or client outside their grants. Agent scoping is ignored in
    /// standalone mode.
    pub async fn authorize(
        &self,
        principal: &Principal,
        agent: Option<&str>,
        client: Option<&str>,
    ) -> Result<Access> {
        if !principal.is_authenticated() {
            return Err(Error::auth_failure(format!(
                "'{}' is not logged in",
                principal.id()
            )));
        }
        if !principal.is_active() {
            return Err(Error::auth_failure(format!(
                "account '{}' is disabled",
                principal.id()
            )));
        }

        if self.is_admin(principal).await {
            return Ok(Access::Admin);
        }

        let agent = self.scope(agent);
        if let Some(agent) = agent
            && !self.servers(principal).await.allows(agent)
        {
            return Err(Error::permission_denied(format!(
                "Sorry, you don't have rights on this server: {agent}"
            )));
        }

        if let Some(client) = client
            && !self.is_client_allowed(principal, client, agent).await
        {
            return Err(Error::permission_denied(format!(
                "Sorry, you don't have rights on this client: {client}"
            )));
        }

        Ok(Access::Restricted)
    }

    /// Admit only administrators
    pub async fn authorize_admin(&self, principal: &Principal, panel: &str) -> Result<()> {
        match self.authorize(principal, None, None).await? {
            Access::Admin => Ok(()),
            Access::Restricted => Err(Error::permission_denied(format!(
                "Sorry, you don't have rights to access the {panel}"
            ))),
        }
    }

    /// Agents visible to the principal
    pub async fn server_grant(&self, principal: &Principal, access: Access) -> Grant {
        match access {
            Access::Admin => Grant::All,
            Access::Restricted => self.servers(principal).await,
        }
    }

    /// Clients of `agent` visible to the principal
    pub async fn client_grant(
        &self,
        principal: &Principal,
        access: Access,
        agent: Option<&str>,
    ) -> Grant {
        if access.is_admin() {
            return Grant::All;
        }
        let agent = self.scope(agent);
        match self.acl.clients(principal, agent).await {
            Ok(grant) => grant,
            Err(e) => {
                warn!(principal = %principal, agent = ?agent, error = %e, "ACL clients query failed, denying");
                Grant::nothing()
            }
        }
    }

    /// Whether the principal may see `client` on `agent`
    pub async fn is_client_allowed(
        &self,
        principal: &Principal,
        client: &str,
        agent: Option<&str>,
    ) -> bool {
        let agent = self.scope(agent);
        self.acl
            .is_client_allowed(principal, client, agent)
            .await
            .unwrap_or_else(|e| {
                warn!(principal = %principal, client, error = %e, "ACL client check failed, denying");
                false
            })
    }

    fn scope<'a>(&self, agent: Option<&'a str>) -> Option<&'a str> {
        if self.standalone { None } else { agent }
    }

    async fn is_admin(&self, principal: &Principal) -> bool {
        self.acl.is_admin(principal).await.unwrap_or_else(|e| {
            warn!(principal = %principal, error = %e, "ACL admin query failed, denying");
            false
        })
    }

    async fn servers(&self, principal: &Principal) -> Grant {
        self.acl.servers(principal).await.unwrap_or_else(|e| {
            warn!(principal = %principal, error = %e, "ACL servers query failed, denying");
            Grant::nothing()
        })
    }
}
