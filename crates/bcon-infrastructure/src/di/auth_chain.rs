//! Ordered authentication chain
//!
//! Built when `global.auth` lists several backends. Credentials are
//! offered to each backend in order; the first success wins.

use std::sync::Arc;

use async_trait::async_trait;
use bcon_domain::error::{Error, Result};
use bcon_domain::ports::providers::AuthProvider;
use bcon_domain::{Credentials, Principal};
use tracing::{debug, warn};

/// Several authentication backends tried in order
#[derive(Debug)]
pub struct ChainedAuthProvider {
    providers: Vec<Arc<dyn AuthProvider>>,
    name: String,
}

impl ChainedAuthProvider {
    /// Chain `providers`, in the order given
    pub fn new(providers: Vec<Arc<dyn AuthProvider>>) -> std::result::Result<Self, String> {
        if providers.is_empty() {
            return Err("no authentication backend to chain".to_string());
        }
        let name = providers
            .iter()
            .map(|p| p.provider_name())
            .collect::<Vec<_>>()
            .join(",");
        Ok(Self { providers, name })
    }

    /// Chained backends
    pub fn providers(&self) -> &[Arc<dyn AuthProvider>] {
        &self.providers
    }
}

#[async_trait]
impl AuthProvider for ChainedAuthProvider {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Principal> {
        for provider in &self.providers {
            match provider.authenticate(credentials).await {
                Ok(principal) => {
                    debug!(backend = provider.provider_name(), principal = %principal, "Authenticated");
                    return Ok(principal);
                }
                Err(Error::AuthFailure { .. }) => {}
                Err(e) => {
                    warn!(backend = provider.provider_name(), error = %e, "Authentication backend failed");
                }
            }
        }
        Err(Error::auth_failure("Invalid credentials"))
    }

    async fn lookup(&self, username: &str) -> Result<Option<Principal>> {
        for provider in &self.providers {
            match provider.lookup(username).await {
                Ok(Some(principal)) => return Ok(Some(principal)),
                Ok(None) => {}
                Err(e) => {
                    warn!(backend = provider.provider_name(), error = %e, "User lookup failed");
                }
            }
        }
        Ok(None)
    }

    fn disables_login(&self) -> bool {
        self.providers.iter().any(|p| p.disables_login())
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}
