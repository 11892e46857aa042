//! Login-less authentication
//!
//! Every caller is the anonymous admin principal. Selecting this provider
//! also disables authorization.

use std::sync::Arc;

use async_trait::async_trait;
use bcon_application::ports::registry::{AUTH_PROVIDERS, AuthProviderEntry};
use bcon_domain::error::Result;
use bcon_domain::ports::providers::AuthProvider;
use bcon_domain::{Credentials, Principal};

/// Authentication provider that accepts everyone
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneAuthProvider;

impl NoneAuthProvider {
    /// Create a new login-less provider
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuthProvider for NoneAuthProvider {
    async fn authenticate(&self, _credentials: &Credentials) -> Result<Principal> {
        Ok(Principal::anonymous())
    }

    async fn lookup(&self, _username: &str) -> Result<Option<Principal>> {
        Ok(Some(Principal::anonymous()))
    }

    fn disables_login(&self) -> bool {
        true
    }

    fn provider_name(&self) -> &str {
        "none"
    }
}

#[linkme::distributed_slice(AUTH_PROVIDERS)]
static NONE_AUTH_PROVIDER: AuthProviderEntry = AuthProviderEntry {
    name: "none",
    description: "No login, every caller is an anonymous administrator",
    factory: |_config| Ok(Arc::new(NoneAuthProvider::new())),
};
