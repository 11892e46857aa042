//! Domain Value Objects
//!
//! Immutable values without identity exchanged between the aggregation
//! core, the ACL and the backend agents.
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`RunningState`] | Running backups, flat or keyed by agent |
//! | [`Grant`] | Result of an ACL query: everything or an explicit list |
//! | [`ClientsReport`] | Per-client statistics and backup counts |
//! | [`Aggregated`] | A merged result with the agents that were omitted |
//! | [`Notification`] | Message returned by configuration writes |
//! | [`ConfigView`] | Configuration values plus parser metadata |

/// Multi-agent aggregation results
pub mod aggregation;
/// ACL grants
pub mod grant;
/// Backup reports
pub mod report;
/// Running backup state
pub mod running;
/// Settings surface values
pub mod settings;

pub use aggregation::{Aggregated, AgentWarning};
pub use grant::Grant;
pub use report::{BackupCount, ClientReportEntry, ClientsReport};
pub use running::RunningState;
pub use settings::{
    ConfigForm, ConfigScope, ConfigView, ConfiguredClient, DeleteClientOptions, Notification,
    NotificationLevel, SettingOptions,
};
