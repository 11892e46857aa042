//! Domain Port Interfaces
//!
//! Boundary contracts between the aggregation core and the pluggable
//! capabilities. High-level modules define the traits here; the
//! providers crate implements them and registers the implementations.

/// Capability provider ports
pub mod providers;

pub use providers::{
    AclProvider, AuthProvider, BackendClient, CacheEntryConfig, CacheProvider, CacheStats,
};
