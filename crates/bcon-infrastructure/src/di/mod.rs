//! Dependency wiring
//!
//! - [`registry`]: resolves configured keys to provider singletons
//! - [`auth_chain`]: several authentication backends behind one provider
//! - [`bootstrap`]: builds the [`AppContext`] passed to every front-end

pub mod auth_chain;
pub mod bootstrap;
pub mod registry;

pub use auth_chain::ChainedAuthProvider;
pub use bootstrap::{AppContext, exit_code, init_app};
pub use registry::{Capability, PluginHandle, PluginRegistry, PluginState};
