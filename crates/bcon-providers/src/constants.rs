//! Provider Constants
//!
//! Constants specific to provider implementations. These are separated from
//! domain constants (which live in bcon-domain) and infrastructure constants.

// ============================================================================
// AUTH PROVIDER CONSTANTS
// ============================================================================

/// User created by the basic provider when no users are configured
pub const BASIC_AUTH_DEFAULT_USER: &str = "admin";

/// Password of the default basic user
pub const BASIC_AUTH_DEFAULT_PASSWORD: &str = "admin";

/// Prefix of argon2 PHC strings
pub const ARGON2_PHC_PREFIX: &str = "$argon2";

// ============================================================================
// CACHE PROVIDER CONSTANTS
// ============================================================================

/// Default maximum number of entries of the in-memory cache
pub const CACHE_DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Redis URL used when neither `[cache] uri` nor `[production] redis` is set
pub const REDIS_DEFAULT_URL: &str = "redis://localhost:6379";

/// Namespace of response cache keys in a Redis database shared with sessions
pub const REDIS_KEY_PREFIX: &str = "bcon:cache:";

/// Keys fetched per SCAN round when clearing the namespace
pub const REDIS_SCAN_COUNT: usize = 200;

// ============================================================================
// AGENT API CONSTANTS
// ============================================================================

/// Upper bound for a single agent call when none is configured
pub const AGENT_DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Agent connect timeout in seconds
pub const AGENT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// HTTP client maximum idle connections per agent
pub const HTTP_MAX_IDLE_PER_HOST: usize = 10;

/// HTTP client idle connection timeout in seconds
pub const HTTP_CLIENT_IDLE_TIMEOUT_SECS: u64 = 90;

/// JSON content type
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Agent API root path segment
pub const AGENT_API_ROOT: &str = "api";

// ============================================================================
// MEMORY BACKEND CONSTANTS
// ============================================================================

/// Server configuration file name used by the memory backend
pub const MEMORY_SERVER_CONF: &str = "burp-server.conf";

/// Client configuration directory used by the memory backend
pub const MEMORY_CLIENTCONFDIR: &str = "/etc/burp/clientconfdir";

/// Idle client state
pub const CLIENT_STATE_IDLE: &str = "idle";

/// Running client state
pub const CLIENT_STATE_RUNNING: &str = "running";
