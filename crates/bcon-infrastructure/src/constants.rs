//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Domain-specific constants are defined in `bcon_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "bcon.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "bcon";

/// Environment variable prefix for configuration (`BCON__GLOBAL__PORT`)
pub const CONFIG_ENV_PREFIX: &str = "BCON";

/// Separator between the prefix, sections and keys of environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Environment variable overriding the log filter
pub const LOG_ENV_VAR: &str = "BCON_LOG";

// ============================================================================
// [global] DEFAULTS
// ============================================================================

/// Default listening port
pub const DEFAULT_PORT: u16 = 5000;

/// Default bind address
pub const DEFAULT_BIND: &str = "::";

/// Default configuration format version
pub const DEFAULT_CONFIG_VERSION: u8 = 1;

/// Default authentication backends
pub const DEFAULT_AUTH: &str = "basic";

/// Default ACL backend
pub const DEFAULT_ACL: &str = "none";

/// Default backend client
pub const DEFAULT_BACKEND: &str = "multi";

/// Prefix value meaning "no prefix"
pub const PREFIX_NONE: &str = "none";

// ============================================================================
// [ui] / [security] DEFAULTS
// ============================================================================

/// Default page refresh interval in seconds
pub const DEFAULT_UI_REFRESH_SECS: u64 = 180;

/// Default live-monitor refresh interval in seconds
pub const DEFAULT_UI_LIVEREFRESH_SECS: u64 = 5;

/// Default application secret marker (generated at startup)
pub const DEFAULT_APPSECRET: &str = "random";

/// Default session cookie lifetime in days
pub const DEFAULT_COOKIETIME_DAYS: u64 = 14;

// ============================================================================
// CACHE AND AGENT DEFAULTS
// ============================================================================

/// Default response cache provider
pub const DEFAULT_CACHE_PROVIDER: &str = "moka";

/// Default maximum number of cached responses
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 10_000;

/// Default upper bound for one agent call in seconds
pub const DEFAULT_AGENT_TIMEOUT_SECS: u64 = 15;

// ============================================================================
// LOGGING DEFAULTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// File name stem of rotated log files
pub const LOG_FILE_STEM: &str = "bcon";

// ============================================================================
// STARTUP
// ============================================================================

/// Process exit code when a mandatory plugin cannot be loaded
pub const EXIT_CODE_PLUGIN_FAILURE: i32 = 2;

/// Process exit code for any other startup failure
pub const EXIT_CODE_STARTUP_FAILURE: i32 = 1;
