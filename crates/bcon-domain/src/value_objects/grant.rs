//! ACL grants

use serde::{Deserialize, Serialize};

/// What an ACL query allows
///
/// `All` is returned for admins and by the no-op ACL. `Only` carries the
/// explicit names, in grant order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grant {
    /// Unrestricted
    All,
    /// Restricted to the listed names
    Only(Vec<String>),
}

impl Grant {
    /// A grant that allows nothing
    pub fn nothing() -> Self {
        Self::Only(Vec::new())
    }

    /// Whether the grant is unrestricted
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Whether `name` is allowed
    pub fn allows(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.iter().any(|n| n == name),
        }
    }

    /// Keep only the items whose name is allowed, preserving input order
    pub fn retain<T, F>(&self, items: Vec<T>, name_of: F) -> Vec<T>
    where
        F: Fn(&T) -> &str,
    {
        match self {
            Self::All => items,
            Self::Only(_) => items
                .into_iter()
                .filter(|item| self.allows(name_of(item)))
                .collect(),
        }
    }

    /// Resolve the grant against the full list of candidate names
    ///
    /// For `All` the candidates are returned as-is. For `Only` the granted
    /// names are returned in grant order, restricted to known candidates.
    pub fn select(&self, candidates: &[String]) -> Vec<String> {
        match self {
            Self::All => candidates.to_vec(),
            Self::Only(names) => names
                .iter()
                .filter(|n| candidates.contains(n))
                .cloned()
                .collect(),
        }
    }
}

impl From<Vec<String>> for Grant {
    fn from(names: Vec<String>) -> Self {
        Self::Only(names)
    }
}
