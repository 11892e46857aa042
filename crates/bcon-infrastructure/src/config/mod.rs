//! Configuration
//!
//! Layered loading (defaults, TOML file, environment) into [`AppConfig`]
//! and typed key access through [`TypedConfigStore`].

pub mod loader;
pub mod store;
pub mod types;

pub use loader::ConfigLoader;
pub use store::{ConfigKind, ConfigValue, TypedConfigStore};
pub use types::*;
