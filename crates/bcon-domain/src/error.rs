//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the backup console
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Resource already exists
    #[error("Conflict: {resource} already exists")]
    Conflict {
        /// The conflicting resource
        resource: String,
    },

    /// Configuration-related error (simple form)
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// Configuration-related error (with source)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A capability implementation could not be resolved from its configured key
    #[error("Failed to resolve {capability} provider '{key}': {message}")]
    PluginResolution {
        /// Capability being resolved (auth, acl, backend, cache)
        capability: String,
        /// Configured key, lower-cased
        key: String,
        /// Whether the capability is required for startup
        mandatory: bool,
        /// Description of the failure
        message: String,
    },

    /// Credentials were rejected or the principal is not logged in
    #[error("Authentication failed: {message}")]
    AuthFailure {
        /// Description of the authentication failure
        message: String,
    },

    /// The principal is not entitled to the requested resource
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// Description of the denied access
        message: String,
    },

    /// A backup agent failed or timed out
    #[error("Upstream failure{}: {message}", agent_scope(.agent))]
    Upstream {
        /// Agent the failure is scoped to, if any
        agent: Option<String>,
        /// Description of the failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The originating request was cancelled
    #[error("Operation cancelled")]
    Cancelled,

    /// Cache operation error
    #[error("Cache error: {message}")]
    Cache {
        /// Description of the cache error
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

fn agent_scope(agent: &Option<String>) -> String {
    agent
        .as_deref()
        .map(|a| format!(" on agent '{a}'"))
        .unwrap_or_default()
}

/// Failure kinds surfaced to the boundary layer
///
/// The HTTP layer maps these to status codes; nothing in the core
/// depends on a transport-specific representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Fatal configuration problem at startup
    Config,
    /// Capability could not be resolved
    PluginResolution,
    /// Credentials rejected
    AuthFailure,
    /// Access refused by the ACL
    PermissionDenied,
    /// Agent or backend I/O failure
    UpstreamFailure,
    /// Resource not found
    NotFound,
    /// Resource already exists
    Conflict,
    /// Malformed input
    InvalidArgument,
    /// Request cancelled by the caller
    Cancelled,
    /// Anything else
    Internal,
}

impl ErrorKind {
    /// Status code used by the HTTP layer for this failure kind
    ///
    /// `NotFound` maps to 403 ("path not found") by console convention.
    pub fn http_status(self) -> u16 {
        match self {
            Self::AuthFailure => 401,
            Self::PermissionDenied | Self::NotFound => 403,
            Self::Conflict => 409,
            Self::InvalidArgument => 400,
            Self::Cancelled => 499,
            Self::Config | Self::PluginResolution | Self::UpstreamFailure | Self::Internal => 500,
        }
    }

    /// Whether a caller may reasonably retry the same request
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::UpstreamFailure | Self::AuthFailure)
    }
}

impl Error {
    /// Classify this error for the boundary layer
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } | Self::Configuration { .. } => ErrorKind::Config,
            Self::PluginResolution { .. } => ErrorKind::PluginResolution,
            Self::AuthFailure { .. } => ErrorKind::AuthFailure,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::Upstream { .. } => ErrorKind::UpstreamFailure,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Io { .. }
            | Self::Json { .. }
            | Self::Cache { .. }
            | Self::Internal { .. }
            | Self::Infrastructure { .. } => ErrorKind::Internal,
        }
    }
}

// Basic error creation methods
impl Error {
    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict<S: Into<String>>(resource: S) -> Self {
        Self::Conflict {
            resource: resource.into(),
        }
    }
}

// Configuration error creation methods
impl Error {
    /// Create a configuration error (simple)
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a plugin resolution error
    pub fn plugin_resolution<C: Into<String>, K: Into<String>, M: Into<String>>(
        capability: C,
        key: K,
        mandatory: bool,
        message: M,
    ) -> Self {
        Self::PluginResolution {
            capability: capability.into(),
            key: key.into(),
            mandatory,
            message: message.into(),
        }
    }
}

// Access control error creation methods
impl Error {
    /// Create an authentication failure
    pub fn auth_failure<S: Into<String>>(message: S) -> Self {
        Self::AuthFailure {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied<S: Into<String>>(message: S) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }
}

// Upstream error creation methods
impl Error {
    /// Create an upstream failure scoped to an agent
    pub fn upstream<S: Into<String>>(agent: Option<&str>, message: S) -> Self {
        Self::Upstream {
            agent: agent.map(str::to_string),
            message: message.into(),
            source: None,
        }
    }

    /// Create an upstream failure with source
    pub fn upstream_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        agent: Option<&str>,
        message: S,
        source: E,
    ) -> Self {
        Self::Upstream {
            agent: agent.map(str::to_string),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Internal and infrastructure error creation methods
impl Error {
    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create an infrastructure error
    pub fn infrastructure<S: Into<String>>(message: S) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: None,
        }
    }
}
