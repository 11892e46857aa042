//! Backup client records

use serde::{Deserialize, Serialize};

/// File count and size statistics for a client's backups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientStats {
    /// Number of files in the backups
    #[serde(default)]
    pub file_count: u64,
    /// Total size in bytes occupied by all backups
    #[serde(default)]
    pub total_size: u64,
    /// Whether the client is a Windows machine, when known
    #[serde(default)]
    pub is_windows: Option<bool>,
}

/// Current state of a client as reported by its agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientStatus {
    /// idle, running, ...
    pub state: String,
    /// Date of the last backup, or `None` if never backed up
    #[serde(default)]
    pub last: Option<String>,
    /// Phase of the running backup
    #[serde(default)]
    pub phase: Option<String>,
    /// Percentage done of the running backup
    #[serde(default)]
    pub percent: u8,
}

/// A backup client known to an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Client name, unique per agent
    pub name: String,
    /// Originating agent; absent in standalone mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// Populated by report and statistics queries only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<ClientStats>,
    /// Populated by statistics queries only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ClientStatus>,
}

impl ClientRecord {
    /// A bare record with only a name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            agent: None,
            stats: None,
            status: None,
        }
    }

    /// Tag the record with its originating agent
    pub fn with_agent<S: Into<String>>(mut self, agent: S) -> Self {
        self.agent = Some(agent.into());
        self
    }

    /// Attach a status
    pub fn with_status(mut self, status: ClientStatus) -> Self {
        self.status = Some(status);
        self
    }
}
