//! Running backup state

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::grant::Grant;

/// Clients with a backup currently in progress
///
/// Agents answer with a flat list when asked about one server and with a
/// map keyed by agent when asked about all of them. Both shapes are kept
/// distinct so callers resolve them explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunningState {
    /// Running clients of a single agent
    Flat(Vec<String>),
    /// Running clients keyed by agent name
    PerAgent(BTreeMap<String, Vec<String>>),
}

impl RunningState {
    /// Whether any listed client is running
    pub fn any_running(&self) -> bool {
        match self {
            Self::Flat(clients) => !clients.is_empty(),
            Self::PerAgent(map) => map.values().any(|clients| !clients.is_empty()),
        }
    }

    /// Restrict a flat list to the clients allowed by `grant`
    pub fn filter_flat(clients: Vec<String>, grant: &Grant) -> Vec<String> {
        grant.retain(clients, String::as_str)
    }
}

impl Default for RunningState {
    fn default() -> Self {
        Self::Flat(Vec::new())
    }
}
