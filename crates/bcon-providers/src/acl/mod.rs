//! ACL Provider Implementations
//!
//! | Provider | Description |
//! |----------|-------------|
//! | [`BasicAclProvider`] | Static admin list and per-user grants |
//! | [`NoneAclProvider`] | Everyone is an administrator |

pub mod basic;
pub mod none;

pub use basic::{BasicAclProvider, BasicAclSettings, UserGrant};
pub use none::NoneAclProvider;
