//! Backend Client Port
//!
//! The console never talks to a backup server directly; everything goes
//! through a [`BackendClient`]. Agents know nothing about permissions,
//! filtering happens in the aggregation layer.
//!
//! Every method taking `agent: Option<&str>` addresses one agent by name,
//! or the only server when running standalone. Implementations enforce an
//! upper-bound timeout on every agent call and report it as
//! [`Error::Upstream`](crate::Error::Upstream).

use async_trait::async_trait;
use serde_json::Value;

use crate::entities::ClientRecord;
use crate::error::Result;
use crate::value_objects::{
    ClientsReport, ConfigForm, ConfiguredClient, DeleteClientOptions, Notification, RunningState,
};

/// Client for one or many backup agents
#[async_trait]
pub trait BackendClient: Send + Sync + std::fmt::Debug {
    /// Configured agent names, in configuration order; empty when standalone
    fn servers(&self) -> Vec<String>;

    /// All clients of an agent, with their status
    async fn get_all_clients(&self, agent: Option<&str>) -> Result<Vec<ClientRecord>>;

    /// Whether a backup of `client` is in progress
    async fn is_backup_running(&self, client: &str, agent: Option<&str>) -> Result<bool>;

    /// Clients with a backup in progress
    ///
    /// With an agent the answer is [`RunningState::Flat`]; without one a
    /// multi-agent backend answers [`RunningState::PerAgent`].
    async fn is_one_backup_running(&self, agent: Option<&str>) -> Result<RunningState>;

    /// Statistics and backup counts for the listed clients
    async fn get_clients_report(
        &self,
        clients: &[String],
        agent: Option<&str>,
    ) -> Result<ClientsReport>;

    /// Parsed server configuration
    async fn read_server_config(&self, conf: Option<&str>, agent: Option<&str>) -> Result<Value>;

    /// Parsed client configuration
    async fn read_client_config(
        &self,
        client: &str,
        conf: Option<&str>,
        agent: Option<&str>,
    ) -> Result<Value>;

    /// Write the server configuration
    async fn store_server_config(
        &self,
        form: &ConfigForm,
        conf: Option<&str>,
        agent: Option<&str>,
    ) -> Result<Vec<Notification>>;

    /// Write a client configuration, creating it when missing
    async fn store_client_config(
        &self,
        form: &ConfigForm,
        client: &str,
        conf: Option<&str>,
        agent: Option<&str>,
    ) -> Result<Vec<Notification>>;

    /// Clients listed in the server's client configuration directory
    async fn clients_list(&self, agent: Option<&str>) -> Result<Vec<ConfiguredClient>>;

    /// Remove a client's configuration
    async fn delete_client(
        &self,
        client: &str,
        options: DeleteClientOptions,
        agent: Option<&str>,
    ) -> Result<Vec<Notification>>;

    /// Expand a glob path against the server's filesystem
    async fn expand_path(
        &self,
        path: &str,
        source: Option<&str>,
        client: Option<&str>,
        agent: Option<&str>,
    ) -> Result<Vec<String>>;

    /// Parser schema metadata, passed through uninterpreted
    async fn get_parser_attr(&self, attr: &str, agent: Option<&str>) -> Result<Value>;

    /// Whether certificate revocation is enabled
    async fn revocation_enabled(&self, agent: Option<&str>) -> Result<bool>;

    /// Identifier of this provider implementation (e.g. "multi", "memory")
    fn provider_name(&self) -> &str;
}
