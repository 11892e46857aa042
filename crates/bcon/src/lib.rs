//! # bcon
//!
//! A management console core for burp backup infrastructures: one node
//! talks to one or many backup agents, merges their state and shows each
//! caller only the servers and clients they are entitled to.
//!
//! This crate is the public facade. It re-exports the layers and hosts
//! the `bcon` command line front-end.
//!
//! ## Example
//!
//! ```ignore
//! use bcon::infrastructure::{ConfigLoader, init_app};
//! use bcon::domain::Credentials;
//!
//! let context = init_app(ConfigLoader::new().load()?)?;
//! let alice = context.login(&Credentials::new("alice", "secret")).await?;
//! let clients = context.console().list_clients(&alice, None).await?;
//! for warning in &clients.warnings {
//!     eprintln!("{} omitted: {}", warning.agent, warning.message);
//! }
//! ```
//!
//! ## Architecture
//!
//! - `domain` - principals, client records, grants, errors and capability ports
//! - `application` - provider registries, aggregation, settings, response cache
//! - `infrastructure` - configuration, logging, plugin resolution and bootstrap
//! - `providers` - auth, ACL, backend and cache implementations

// Force-link bcon-providers so every provider registers itself
pub extern crate bcon_providers;

pub mod cli;
pub mod run;

pub use bcon_application as application;
pub use bcon_domain as domain;
pub use bcon_infrastructure as infrastructure;
pub use bcon_providers as providers;

pub use cli::{Cli, Command, SettingsCommand};
pub use run::{Session, run};
