//! Backup reports

use serde::{Deserialize, Serialize};

use crate::entities::ClientStats;

/// Statistics of one client in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientReportEntry {
    /// Client name
    pub name: String,
    /// Originating agent; absent in standalone mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// Statistics computed by the backend
    #[serde(flatten)]
    pub stats: ClientStats,
}

/// Number of backups of one client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupCount {
    /// Client name
    pub name: String,
    /// Originating agent; absent in standalone mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// Number of backups
    pub number: u64,
}

/// Report over a set of clients
///
/// The content is produced by the backend only; the console merely
/// chooses which clients are asked about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientsReport {
    /// Per-client statistics
    #[serde(default)]
    pub clients: Vec<ClientReportEntry>,
    /// Per-client backup counts
    #[serde(default)]
    pub backups: Vec<BackupCount>,
}

impl ClientsReport {
    /// Append another agent's report
    pub fn merge(&mut self, other: ClientsReport) {
        self.clients.extend(other.clients);
        self.backups.extend(other.backups);
    }

    /// Tag every entry with the agent that produced it
    #[must_use]
    pub fn with_agent(mut self, agent: &str) -> Self {
        for entry in &mut self.clients {
            entry.agent = Some(agent.to_string());
        }
        for count in &mut self.backups {
            count.agent = Some(agent.to_string());
        }
        self
    }

    /// Names of the clients present in the report
    pub fn client_names(&self) -> impl Iterator<Item = &str> {
        self.clients.iter().map(|c| c.name.as_str())
    }
}
