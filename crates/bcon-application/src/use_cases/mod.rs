//! Use Cases
//!
//! | Service | Description |
//! |---------|-------------|
//! | [`Authorizer`] | Single admission gate over the ACL provider |
//! | [`Aggregator`] | ACL-filtered fan-out reads across agents |
//! | [`SettingsService`] | Admin-only configuration management |
//! | [`ConsoleService`] | Cached read surface plus settings |

pub mod aggregator;
pub mod authorization;
pub mod console_service;
pub mod settings_service;

pub use aggregator::Aggregator;
pub use authorization::{Access, Authorizer};
pub use console_service::ConsoleService;
pub use settings_service::SettingsService;
