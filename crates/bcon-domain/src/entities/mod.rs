//! Domain Entities
//!
//! Objects with identity that flow through every console operation.
//!
//! | Entity | Description |
//! |--------|-------------|
//! | [`Principal`] | Authenticated caller on whose behalf filtering happens |
//! | [`ClientRecord`] | A backup client, optionally tagged with its agent |

/// Backup client records
pub mod client;
/// Callers and credentials
pub mod principal;

pub use client::{ClientRecord, ClientStats, ClientStatus};
pub use principal::{Credentials, Principal};
