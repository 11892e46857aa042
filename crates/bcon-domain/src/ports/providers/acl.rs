//! ACL Provider Port

use async_trait::async_trait;

use crate::entities::Principal;
use crate::error::Result;
use crate::value_objects::Grant;

/// Access control backend
///
/// If `is_admin` is true for a principal every other query must return
/// [`Grant::All`]. The no-op implementation returns `All` unconditionally.
/// Calls are idempotent and free of side effects within one aggregation.
#[async_trait]
pub trait AclProvider: Send + Sync + std::fmt::Debug {
    /// Whether the principal is an administrator
    async fn is_admin(&self, principal: &Principal) -> Result<bool>;

    /// Agents the principal may see
    async fn servers(&self, principal: &Principal) -> Result<Grant>;

    /// Clients the principal may see on `agent` (`None` in standalone mode)
    async fn clients(&self, principal: &Principal, agent: Option<&str>) -> Result<Grant>;

    /// Whether the principal may see `client` on `agent`
    async fn is_client_allowed(
        &self,
        principal: &Principal,
        client: &str,
        agent: Option<&str>,
    ) -> Result<bool> {
        Ok(self.clients(principal, agent).await?.allows(client))
    }

    /// Identifier of this provider implementation (e.g. "basic", "none")
    fn provider_name(&self) -> &str;
}
