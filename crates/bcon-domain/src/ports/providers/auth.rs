//! Authentication Provider Port

use async_trait::async_trait;

use crate::entities::{Credentials, Principal};
use crate::error::Result;

/// Authentication backend
///
/// Implementations return an authenticated [`Principal`] or
/// [`Error::AuthFailure`](crate::Error::AuthFailure). Any other error is
/// treated as "unauthenticated" by callers.
#[async_trait]
pub trait AuthProvider: Send + Sync + std::fmt::Debug {
    /// Validate credentials
    async fn authenticate(&self, credentials: &Credentials) -> Result<Principal>;

    /// Load a known user without checking credentials (session restore)
    async fn lookup(&self, username: &str) -> Result<Option<Principal>>;

    /// Whether this provider bypasses login entirely
    fn disables_login(&self) -> bool {
        false
    }

    /// Identifier of this provider implementation (e.g. "basic", "none")
    fn provider_name(&self) -> &str;
}
