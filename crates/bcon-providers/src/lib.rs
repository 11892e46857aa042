//! # bcon - Provider Implementations
//!
//! Concrete implementations of the capability ports defined in
//! `bcon-domain`. Every provider registers itself into the matching
//! `linkme` slice of `bcon_application::ports::registry`; linking this
//! crate is enough to make them resolvable by key.
//!
//! ## Provider Categories
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Auth | `AuthProvider` | Basic, None |
//! | ACL | `AclProvider` | Basic, None |
//! | Backend | `BackendClient` | Multi (HTTP agents), Memory |
//! | Cache | `CacheProvider` | Moka, Redis, Null |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! bcon-providers = { version = "0.1", default-features = false, features = ["cache-redis"] }
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use bcon_providers::backend::MemoryBackend;
//! use bcon_providers::cache::MokaCacheProvider;
//! ```

pub use bcon_domain::error::{Error, Result};
pub use bcon_domain::ports::providers::{AclProvider, AuthProvider, BackendClient, CacheProvider};

/// Provider-specific constants
pub mod constants;

/// Shared utilities for provider implementations
pub mod utils;

/// Authentication provider implementations
pub mod auth;

/// ACL provider implementations
pub mod acl;

/// Backend client implementations
///
/// Implements `BackendClient` for remote HTTP agents and an in-process
/// inventory.
pub mod backend;

/// Cache provider implementations
///
/// Implements `CacheProvider` trait for caching backends.
pub mod cache;
