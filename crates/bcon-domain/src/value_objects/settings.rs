//! Settings surface values

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity of a [`Notification`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// Operation succeeded
    Success,
    /// Operation succeeded with caveats
    Warning,
    /// Operation failed
    Error,
    /// Informational
    Info,
}

/// Message returned by configuration writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity
    pub level: NotificationLevel,
    /// Human readable message
    pub message: String,
}

impl Notification {
    /// Build a notification
    pub fn new<S: Into<String>>(level: NotificationLevel, message: S) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Informational notification
    pub fn info<S: Into<String>>(message: S) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    /// Success notification
    pub fn success<S: Into<String>>(message: S) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    /// Error notification
    pub fn error<S: Into<String>>(message: S) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}

/// Submitted configuration form
///
/// Keys may repeat for multi-valued settings, so this is an ordered list
/// of pairs rather than a map.
pub type ConfigForm = Vec<(String, String)>;

/// Which parser schema a configuration view is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    /// Server configuration (`*_srv` attributes)
    Server,
    /// Client configuration (`*_cli` attributes)
    Client,
}

impl ConfigScope {
    fn suffix(self) -> &'static str {
        match self {
            Self::Server => "srv",
            Self::Client => "cli",
        }
    }

    /// Parser attribute listing the boolean keys
    pub fn boolean_attr(self) -> String {
        format!("boolean_{}", self.suffix())
    }

    /// Parser attribute listing the string keys
    pub fn string_attr(self) -> String {
        format!("string_{}", self.suffix())
    }

    /// Parser attribute listing the integer keys
    pub fn integer_attr(self) -> String {
        format!("integer_{}", self.suffix())
    }

    /// Parser attribute listing the multi-valued keys
    pub fn multi_attr(self) -> String {
        format!("multi_{}", self.suffix())
    }
}

/// Configuration values with the schema metadata needed to edit them
///
/// Everything but `results` is parser metadata passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigView {
    /// Parsed configuration
    pub results: Value,
    /// Boolean keys
    pub boolean: Value,
    /// String keys
    pub string: Value,
    /// Integer keys
    pub integer: Value,
    /// Multi-valued keys
    pub multi: Value,
    /// Documentation per key
    pub server_doc: Value,
    /// Suggested values per key
    pub suggest: Value,
    /// Placeholders per key
    pub placeholders: Value,
    /// Defaults per key
    pub defaults: Value,
}

/// A client as listed in the server's client configuration directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguredClient {
    /// Client name
    pub name: String,
    /// Path of the client's configuration file
    #[serde(default)]
    pub value: Option<String>,
}

/// Options for client deletion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteClientOptions {
    /// Revoke the client's certificate
    #[serde(default)]
    pub revoke: bool,
    /// Delete the client's certificate
    #[serde(default)]
    pub delcert: bool,
}

/// Server capabilities shown on the settings panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingOptions {
    /// Whether certificate revocation is enabled
    pub is_revocation_enabled: bool,
}
