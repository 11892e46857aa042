//! Principal and credentials

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::ANONYMOUS_PRINCIPAL_ID;

/// The caller on whose behalf ACL filtering is performed
///
/// Created on successful authentication and never mutated afterwards;
/// the builder-style methods consume and return a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    id: String,
    is_admin: bool,
    is_authenticated: bool,
    is_active: bool,
}

impl Principal {
    /// An authenticated, active, non-admin principal
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            is_admin: false,
            is_authenticated: true,
            is_active: true,
        }
    }

    /// The principal used when login is disabled
    ///
    /// Authorization is disabled alongside login, so it is an admin.
    pub fn anonymous() -> Self {
        Self::new(ANONYMOUS_PRINCIPAL_ID).with_admin(true)
    }

    /// A principal that failed to log in
    pub fn unauthenticated<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            is_admin: false,
            is_authenticated: false,
            is_active: false,
        }
    }

    /// Set the admin flag
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Set the active flag
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Opaque identity
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Admin flag as computed at login
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Whether the principal passed authentication
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    /// Whether the account is enabled
    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Login credentials
#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// User name
    pub username: String,
    /// Clear-text password
    pub password: String,
}

impl Credentials {
    /// Build credentials from a user name and password
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
