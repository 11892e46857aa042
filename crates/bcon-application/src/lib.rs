//! Application Layer - bcon backup console
//!
//! Orchestrates the capability ports defined in `bcon-domain`:
//!
//! - `ports::registry`: compile-time registration tables for auth, ACL,
//!   backend and cache providers
//! - `use_cases::Aggregator`: ACL-filtered fan-out across backup agents
//! - `use_cases::SettingsService`: admin-only configuration management
//! - `use_cases::ConsoleService`: cached read surface used by the front-ends
//! - `response_cache::ResponseCache`: per-principal memoization of reads
//!
//! ## Dependencies
//!
//! This crate depends only on `bcon-domain` and pure libraries. Concrete
//! providers live in `bcon-providers`; configuration and wiring live in
//! `bcon-infrastructure`.

pub mod ports;
pub mod response_cache;
pub mod use_cases;

pub use response_cache::{CacheKey, ResponseCache};
pub use use_cases::*;
