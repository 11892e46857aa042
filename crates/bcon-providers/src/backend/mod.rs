//! Backend Client Implementations
//!
//! | Provider | Description |
//! |----------|-------------|
//! | [`MultiAgentBackend`] | HTTP/JSON client for remote backup agents |
//! | [`MemoryBackend`] | In-process inventory |

pub mod memory;
pub mod multi;

pub use memory::{InventoryAgent, InventoryClient, InventorySettings, MemoryBackend};
pub use multi::MultiAgentBackend;
