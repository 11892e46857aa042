//! # Domain Layer
//!
//! Core types of the backup console: callers, backup clients, ACL grants,
//! running state and the capability ports implemented by providers.
//!
//! ## Architecture
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`entities`] | Principals and client records |
//! | [`value_objects`] | Grants, running state, reports, settings values |
//! | [`ports`] | Auth, ACL, backend and cache capability traits |
//! | [`error`] | Domain error type and failure kinds |
//! | [`constants`] | Domain constants |
//!
//! The domain layer has no dependency on configuration, transport or
//! provider implementations.

/// Domain-level constants
pub mod constants;
/// Entities with identity
pub mod entities;
/// Domain error types
pub mod error;
/// Capability ports
pub mod ports;
/// Immutable value objects
pub mod value_objects;

pub use entities::*;
pub use error::{Error, ErrorKind, Result};
pub use value_objects::*;
