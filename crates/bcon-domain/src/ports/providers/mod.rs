//! Capability Provider Ports
//!
//! | Port | Mandatory | Description |
//! |------|-----------|-------------|
//! | [`AuthProvider`] | yes | Turns credentials into a [`Principal`](crate::entities::Principal) |
//! | [`AclProvider`] | no | Answers which agents and clients a principal may see |
//! | [`BackendClient`] | yes | Talks to one or many backup agents |
//! | [`CacheProvider`] | no | Storage behind the response cache |

/// ACL provider port
pub mod acl;
/// Authentication provider port
pub mod auth;
/// Backend client port
pub mod backend;
/// Cache provider port
pub mod cache;

pub use acl::AclProvider;
pub use auth::AuthProvider;
pub use backend::BackendClient;
pub use cache::{CacheEntryConfig, CacheProvider, CacheStats};
