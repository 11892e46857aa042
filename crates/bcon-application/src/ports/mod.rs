//! Application Ports
//!
//! - **registry/** - Auto-registration system for capability providers

/// Provider registry for capability resolution by configured key
pub mod registry;

pub use bcon_domain::ports::providers::{
    AclProvider, AuthProvider, BackendClient, CacheEntryConfig, CacheProvider, CacheStats,
};
