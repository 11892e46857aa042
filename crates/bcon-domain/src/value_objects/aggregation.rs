//! Multi-agent aggregation results

use serde::{Deserialize, Serialize};

/// An agent omitted from a merged result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentWarning {
    /// Agent name
    pub agent: String,
    /// Failure description
    pub message: String,
}

/// A merged value plus the non-fatal per-agent failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregated<T> {
    /// Merged value over the agents that answered
    pub value: T,
    /// Agents omitted from `value`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AgentWarning>,
}

impl<T> Aggregated<T> {
    /// A complete result
    pub fn complete(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Whether every queried agent answered
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Transform the value, keeping the warnings
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Aggregated<U> {
        Aggregated {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}
