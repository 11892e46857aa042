//! Domain layer constants
//!
//! Contains constants that are part of the domain logic and are used by
//! the application layer. Infrastructure-specific constants remain in
//! `bcon_infrastructure::constants`.

// ============================================================================
// PROVIDER KEY CONSTANTS
// ============================================================================

/// Configured key selecting the built-in no-op implementation of a capability
pub const NONE_PROVIDER_KEY: &str = "none";

/// Identity given to callers when login is disabled
pub const ANONYMOUS_PRINCIPAL_ID: &str = "anonymous";

/// Grant entry meaning "every client on this agent"
pub const ACL_WILDCARD: &str = "*";

// ============================================================================
// CACHE DOMAIN CONSTANTS
// ============================================================================

/// Default lifetime of a cached read (30 minutes)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 1800;

// ============================================================================
// PARSER ATTRIBUTE NAMES
// ============================================================================

/// Documentation strings for every configuration key
pub const PARSER_ATTR_DOC: &str = "doc";

/// Suggested values per key
pub const PARSER_ATTR_VALUES: &str = "values";

/// Placeholder text per key
pub const PARSER_ATTR_PLACEHOLDERS: &str = "placeholders";

/// Default value per key
pub const PARSER_ATTR_DEFAULTS: &str = "defaults";
