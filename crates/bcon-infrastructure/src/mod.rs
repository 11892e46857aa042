//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns that support the application and domain layers.
//!
//! Provider implementations live in `bcon-providers`; this crate decides
//! which of them run.
//!
//! ### Configuration & Wiring
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Layered TOML/env configuration and typed key access |
//! | [`di`] | Plugin registry and application context bootstrap |
//! | [`constants`] | Configuration defaults and exit codes |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |
//! | [`error_ext`] | Context helpers turning foreign errors into domain errors |

pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, ConfigLoader, TypedConfigStore};
pub use di::{AppContext, exit_code, init_app};
pub use error_ext::ErrorContext;
