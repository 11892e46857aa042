//! Basic authentication provider
//!
//! Checks credentials against the `[auth.basic]` users table:
//!
//! ```toml
//! [auth.basic]
//! users = { admin = "admin", bob = "$argon2id$v=19$m=19456,t=2,p=1$..." }
//! disabled = ["bob"]
//! ```
//!
//! A password starting with `$argon2` is verified as an argon2 PHC
//! string; anything else is compared as plain text. Without a users
//! table a single `admin`/`admin` account exists.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use async_trait::async_trait;
use bcon_application::ports::registry::{
    AUTH_PROVIDERS, AuthProviderConfig, AuthProviderEntry, decode_settings,
};
use bcon_domain::error::{Error, Result};
use bcon_domain::ports::providers::AuthProvider;
use bcon_domain::{Credentials, Principal};
use serde::Deserialize;
use tracing::debug;

use crate::constants::{ARGON2_PHC_PREFIX, BASIC_AUTH_DEFAULT_PASSWORD, BASIC_AUTH_DEFAULT_USER};

/// `[auth.basic]` section
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BasicAuthSettings {
    /// User name to password (plain or argon2 PHC)
    pub users: BTreeMap<String, String>,
    /// Accounts that exist but may not use the console
    pub disabled: BTreeSet<String>,
}

#[derive(Clone)]
enum StoredPassword {
    Phc(String),
    Plain(String),
}

impl StoredPassword {
    fn parse(user: &str, raw: String) -> std::result::Result<Self, String> {
        if !raw.starts_with(ARGON2_PHC_PREFIX) {
            return Ok(Self::Plain(raw));
        }
        PasswordHash::new(&raw)
            .map_err(|e| format!("invalid password hash for user '{user}': {e}"))?;
        Ok(Self::Phc(raw))
    }

    fn verify(&self, password: &str) -> bool {
        match self {
            Self::Plain(expected) => expected == password,
            Self::Phc(phc) => PasswordHash::new(phc)
                .map(|hash| {
                    Argon2::default()
                        .verify_password(password.as_bytes(), &hash)
                        .is_ok()
                })
                .unwrap_or(false),
        }
    }
}

/// Users table authentication
#[derive(Clone)]
pub struct BasicAuthProvider {
    users: BTreeMap<String, StoredPassword>,
    disabled: BTreeSet<String>,
}

impl BasicAuthProvider {
    /// Build the provider from its settings section
    pub fn new(settings: BasicAuthSettings) -> std::result::Result<Self, String> {
        let mut raw = settings.users;
        if raw.is_empty() {
            raw.insert(
                BASIC_AUTH_DEFAULT_USER.to_string(),
                BASIC_AUTH_DEFAULT_PASSWORD.to_string(),
            );
        }

        let users = raw
            .into_iter()
            .map(|(user, password)| {
                let stored = StoredPassword::parse(&user, password)?;
                Ok((user, stored))
            })
            .collect::<std::result::Result<_, String>>()?;

        Ok(Self {
            users,
            disabled: settings.disabled,
        })
    }

    /// Number of known accounts
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    fn principal(&self, username: &str) -> Principal {
        Principal::new(username).with_active(!self.disabled.contains(username))
    }
}

#[async_trait]
impl AuthProvider for BasicAuthProvider {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Principal> {
        let username = credentials.username.as_str();
        let verified = self
            .users
            .get(username)
            .is_some_and(|stored| stored.verify(&credentials.password));

        if !verified {
            debug!(user = username, "Basic authentication rejected");
            return Err(Error::auth_failure(format!(
                "invalid credentials for '{username}'"
            )));
        }
        Ok(self.principal(username))
    }

    async fn lookup(&self, username: &str) -> Result<Option<Principal>> {
        Ok(self
            .users
            .contains_key(username)
            .then(|| self.principal(username)))
    }

    fn provider_name(&self) -> &str {
        "basic"
    }
}

impl std::fmt::Debug for BasicAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthProvider")
            .field("users", &self.users.keys().collect::<Vec<_>>())
            .field("disabled", &self.disabled)
            .finish()
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

fn basic_auth_factory(
    config: &AuthProviderConfig,
) -> std::result::Result<Arc<dyn AuthProvider>, String> {
    let settings: BasicAuthSettings = decode_settings(&config.settings)?;
    Ok(Arc::new(BasicAuthProvider::new(settings)?))
}

#[linkme::distributed_slice(AUTH_PROVIDERS)]
static BASIC_AUTH_PROVIDER: AuthProviderEntry = AuthProviderEntry {
    name: "basic",
    description: "Users table from configuration (plain or argon2 passwords)",
    factory: basic_auth_factory,
};
