//! Configuration types module

pub mod agent;
pub mod app;
pub mod cache;
pub mod global;
pub mod logging;

pub use agent::AgentConfig;
pub use app::AppConfig;
pub use cache::CacheConfig;
pub use global::{GlobalConfig, ProductionConfig, SecurityConfig, UiConfig};
pub use logging::{LogFormat, LoggingConfig};
