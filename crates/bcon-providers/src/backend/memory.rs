//! In-process backend
//!
//! Serves clients, backups and configuration from an inventory held in
//! memory. Useful for demos and tests; writes are kept until the process
//! exits. The inventory comes from the `[inventory]` section:
//!
//! ```toml
//! [inventory]
//! revocation = true
//!
//! [[inventory.agents]]
//! name = "srv1"
//! running = ["c1"]
//! clients = [
//!     { name = "c1", backups = 3, stats = { file_count = 120, total_size = 4096 } },
//!     { name = "c2" },
//! ]
//! ```
//!
//! In standalone mode the top-level `clients`, `running` and `paths`
//! describe the only server and `agents` is ignored.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use bcon_application::ports::registry::{
    BACKEND_PROVIDERS, BackendProviderConfig, BackendProviderEntry, decode_settings,
};
use bcon_domain::error::{Error, Result};
use bcon_domain::ports::providers::BackendClient;
use bcon_domain::{
    BackupCount, ClientRecord, ClientReportEntry, ClientStats, ClientStatus, ClientsReport,
    ConfigForm, ConfiguredClient, DeleteClientOptions, Notification, NotificationLevel,
    RunningState,
};
use dashmap::DashMap;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::constants::{
    CLIENT_STATE_IDLE, CLIENT_STATE_RUNNING, MEMORY_CLIENTCONFDIR, MEMORY_SERVER_CONF,
};

const STANDALONE_KEY: &str = "";

/// One client of the inventory
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InventoryClient {
    /// Client name
    pub name: String,
    /// Statistics of the last backup
    pub stats: ClientStats,
    /// Number of stored backups
    pub backups: u64,
    /// Client configuration
    pub config: Map<String, Value>,
}

/// One agent of the inventory
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InventoryAgent {
    /// Agent name
    pub name: String,
    /// Clients, in listing order
    pub clients: Vec<InventoryClient>,
    /// Clients with a backup in progress
    pub running: Vec<String>,
    /// Paths known to the server's filesystem
    pub paths: Vec<String>,
    /// Every call to this agent fails
    pub offline: bool,
}

/// `[inventory]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InventorySettings {
    /// Standalone clients
    pub clients: Vec<InventoryClient>,
    /// Standalone running clients
    pub running: Vec<String>,
    /// Standalone server paths
    pub paths: Vec<String>,
    /// Agents in multi-agent mode
    pub agents: Vec<InventoryAgent>,
    /// Whether certificate revocation is enabled
    pub revocation: bool,
}

#[derive(Debug, Default)]
struct ServerState {
    clients: Vec<InventoryClient>,
    running: BTreeSet<String>,
    paths: Vec<String>,
    server_config: Map<String, Value>,
    offline: bool,
}

impl ServerState {
    fn from_agent(agent: InventoryAgent) -> Self {
        Self {
            clients: agent.clients,
            running: agent.running.into_iter().collect(),
            paths: agent.paths,
            server_config: Map::new(),
            offline: agent.offline,
        }
    }

    fn client(&self, name: &str) -> Option<&InventoryClient> {
        self.clients.iter().find(|c| c.name == name)
    }

    fn record(&self, client: &InventoryClient) -> ClientRecord {
        let running = self.running.contains(&client.name);
        let status = ClientStatus {
            state: if running {
                CLIENT_STATE_RUNNING
            } else {
                CLIENT_STATE_IDLE
            }
            .to_string(),
            last: None,
            phase: None,
            percent: 0,
        };
        ClientRecord {
            name: client.name.clone(),
            agent: None,
            stats: Some(client.stats.clone()),
            status: Some(status),
        }
    }

    fn running_clients(&self) -> Vec<String> {
        self.clients
            .iter()
            .filter(|c| self.running.contains(&c.name))
            .map(|c| c.name.clone())
            .collect()
    }
}

/// Backend answering from an in-memory inventory
#[derive(Debug)]
pub struct MemoryBackend {
    standalone: bool,
    order: Vec<String>,
    servers: DashMap<String, ServerState>,
    revocation: bool,
}

impl MemoryBackend {
    /// Build the backend
    ///
    /// In multi-agent mode `extra_agents` adds empty servers for names not
    /// present in the inventory.
    pub fn new(settings: InventorySettings, standalone: bool, extra_agents: &[String]) -> Self {
        let servers = DashMap::new();
        let mut order = Vec::new();

        if standalone {
            servers.insert(
                STANDALONE_KEY.to_string(),
                ServerState {
                    clients: settings.clients,
                    running: settings.running.into_iter().collect(),
                    paths: settings.paths,
                    ..Default::default()
                },
            );
        } else {
            for agent in settings.agents {
                order.push(agent.name.clone());
                servers.insert(agent.name.clone(), ServerState::from_agent(agent));
            }
            for name in extra_agents {
                if !servers.contains_key(name) {
                    order.push(name.clone());
                    servers.insert(name.clone(), ServerState::default());
                }
            }
        }

        Self {
            standalone,
            order,
            servers,
            revocation: settings.revocation,
        }
    }

    /// Mark a client as running or idle
    pub fn set_running(&self, client: &str, running: bool, agent: Option<&str>) -> Result<()> {
        self.write(agent, |state| {
            if running {
                state.running.insert(client.to_string());
            } else {
                state.running.remove(client);
            }
            Ok(())
        })
    }

    fn key<'a>(&self, agent: Option<&'a str>) -> Result<&'a str> {
        if self.standalone {
            return Ok(STANDALONE_KEY);
        }
        agent.ok_or_else(|| Error::invalid_argument("an agent is required in multi-agent mode"))
    }

    fn read<T>(&self, agent: Option<&str>, f: impl FnOnce(&ServerState) -> Result<T>) -> Result<T> {
        let key = self.key(agent)?;
        let state = self
            .servers
            .get(key)
            .ok_or_else(|| Error::upstream(agent, "unknown agent"))?;
        if state.offline {
            return Err(Error::upstream(agent, "agent unreachable"));
        }
        f(&state)
    }

    fn write<T>(
        &self,
        agent: Option<&str>,
        f: impl FnOnce(&mut ServerState) -> Result<T>,
    ) -> Result<T> {
        let key = self.key(agent)?;
        let mut state = self
            .servers
            .get_mut(key)
            .ok_or_else(|| Error::upstream(agent, "unknown agent"))?;
        if state.offline {
            return Err(Error::upstream(agent, "agent unreachable"));
        }
        f(&mut state)
    }
}

/// Apply a submitted form to a configuration map
///
/// Repeated keys become lists; a single occurrence stays a string.
fn apply_form(target: &mut Map<String, Value>, form: &ConfigForm) {
    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (key, value) in form {
        grouped.entry(key.as_str()).or_default().push(value.as_str());
    }
    for (key, mut values) in grouped {
        let value = if values.len() == 1 {
            Value::String(values.remove(0).to_string())
        } else {
            json!(values)
        };
        target.insert(key.to_string(), value);
    }
}

/// Shell-style match where `*` stands for any run of characters
fn glob_match(pattern: &str, candidate: &str) -> bool {
    let mut parts = pattern.split('*');
    let Some(first) = parts.next() else {
        return candidate.is_empty();
    };
    let Some(mut rest) = candidate.strip_prefix(first) else {
        return false;
    };
    let parts: Vec<&str> = parts.collect();
    let Some((last, middle)) = parts.split_last() else {
        return rest.is_empty();
    };
    for part in middle {
        match rest.find(part) {
            Some(idx) => rest = &rest[idx + part.len()..],
            None => return false,
        }
    }
    rest.len() >= last.len() && rest.ends_with(last)
}

/// Parser metadata served by the memory backend
fn parser_schema(attr: &str) -> Value {
    match attr {
        "boolean_srv" => json!(["hardlinked_archive", "librsync", "client_can_delete"]),
        "string_srv" => json!(["directory", "ca_conf", "timer_script"]),
        "integer_srv" => json!(["max_children", "max_storage_subdirs"]),
        "multi_srv" => json!(["keep", "timer_arg"]),
        "boolean_cli" => json!(["hardlinked_archive", "librsync", "cross_all_filesystems"]),
        "string_cli" => json!(["password", "dedup_group"]),
        "integer_cli" => json!(["max_file_size"]),
        "multi_cli" => json!(["include", "exclude", "keep"]),
        "doc" => json!({
            "directory": "Directory where backups are stored.",
            "keep": "Number of backups to keep, may be given several times.",
            "include": "Path to back up.",
        }),
        "values" => json!({ "librsync": ["0", "1"] }),
        "placeholders" => json!({ "directory": "/var/spool/burp" }),
        "defaults" => json!({ "max_children": 5, "keep": ["7"] }),
        _ => Value::Null,
    }
}

#[async_trait]
impl BackendClient for MemoryBackend {
    fn servers(&self) -> Vec<String> {
        self.order.clone()
    }

    async fn get_all_clients(&self, agent: Option<&str>) -> Result<Vec<ClientRecord>> {
        self.read(agent, |state| {
            Ok(state.clients.iter().map(|c| state.record(c)).collect())
        })
    }

    async fn is_backup_running(&self, client: &str, agent: Option<&str>) -> Result<bool> {
        self.read(agent, |state| Ok(state.running.contains(client)))
    }

    async fn is_one_backup_running(&self, agent: Option<&str>) -> Result<RunningState> {
        if !self.standalone && agent.is_none() {
            let mut per_agent = BTreeMap::new();
            for name in &self.order {
                let running = self.read(Some(name), |state| Ok(state.running_clients()))?;
                per_agent.insert(name.clone(), running);
            }
            return Ok(RunningState::PerAgent(per_agent));
        }
        self.read(agent, |state| Ok(RunningState::Flat(state.running_clients())))
    }

    async fn get_clients_report(
        &self,
        clients: &[String],
        agent: Option<&str>,
    ) -> Result<ClientsReport> {
        self.read(agent, |state| {
            let mut report = ClientsReport::default();
            for client in clients.iter().filter_map(|name| state.client(name)) {
                report.clients.push(ClientReportEntry {
                    name: client.name.clone(),
                    agent: None,
                    stats: client.stats.clone(),
                });
                report.backups.push(BackupCount {
                    name: client.name.clone(),
                    agent: None,
                    number: client.backups,
                });
            }
            Ok(report)
        })
    }

    async fn read_server_config(&self, conf: Option<&str>, agent: Option<&str>) -> Result<Value> {
        debug!(conf = conf.unwrap_or(MEMORY_SERVER_CONF), "Reading server configuration");
        self.read(agent, |state| Ok(Value::Object(state.server_config.clone())))
    }

    async fn read_client_config(
        &self,
        client: &str,
        _conf: Option<&str>,
        agent: Option<&str>,
    ) -> Result<Value> {
        self.read(agent, |state| {
            state
                .client(client)
                .map(|c| Value::Object(c.config.clone()))
                .ok_or_else(|| Error::not_found(format!("Client '{client}'")))
        })
    }

    async fn store_server_config(
        &self,
        form: &ConfigForm,
        conf: Option<&str>,
        agent: Option<&str>,
    ) -> Result<Vec<Notification>> {
        let conf = conf.unwrap_or(MEMORY_SERVER_CONF).to_string();
        self.write(agent, |state| {
            apply_form(&mut state.server_config, form);
            Ok(vec![Notification::success(format!(
                "Configuration '{conf}' successfully saved"
            ))])
        })
    }

    async fn store_client_config(
        &self,
        form: &ConfigForm,
        client: &str,
        _conf: Option<&str>,
        agent: Option<&str>,
    ) -> Result<Vec<Notification>> {
        self.write(agent, |state| {
            let entry = match state.clients.iter().position(|c| c.name == client) {
                Some(idx) => &mut state.clients[idx],
                None => {
                    state.clients.push(InventoryClient {
                        name: client.to_string(),
                        ..Default::default()
                    });
                    let last = state.clients.len() - 1;
                    &mut state.clients[last]
                }
            };
            apply_form(&mut entry.config, form);
            Ok(vec![Notification::success(format!(
                "Configuration of '{client}' successfully saved"
            ))])
        })
    }

    async fn clients_list(&self, agent: Option<&str>) -> Result<Vec<ConfiguredClient>> {
        self.read(agent, |state| {
            Ok(state
                .clients
                .iter()
                .map(|c| ConfiguredClient {
                    name: c.name.clone(),
                    value: Some(format!("{MEMORY_CLIENTCONFDIR}/{}", c.name)),
                })
                .collect())
        })
    }

    async fn delete_client(
        &self,
        client: &str,
        options: DeleteClientOptions,
        agent: Option<&str>,
    ) -> Result<Vec<Notification>> {
        let revocation = self.revocation;
        self.write(agent, |state| {
            let before = state.clients.len();
            state.clients.retain(|c| c.name != client);
            if state.clients.len() == before {
                return Err(Error::not_found(format!("Client '{client}'")));
            }
            state.running.remove(client);

            let mut notifications = vec![Notification::success(format!(
                "Client '{client}' successfully removed"
            ))];
            if options.revoke && !revocation {
                notifications.push(Notification::new(
                    NotificationLevel::Warning,
                    "Certificate revocation is disabled, nothing revoked",
                ));
            }
            if options.delcert {
                notifications.push(Notification::info(format!(
                    "Certificate of '{client}' removed"
                )));
            }
            Ok(notifications)
        })
    }

    async fn expand_path(
        &self,
        path: &str,
        _source: Option<&str>,
        _client: Option<&str>,
        agent: Option<&str>,
    ) -> Result<Vec<String>> {
        self.read(agent, |state| {
            Ok(state
                .paths
                .iter()
                .filter(|candidate| glob_match(path, candidate))
                .cloned()
                .collect())
        })
    }

    async fn get_parser_attr(&self, attr: &str, agent: Option<&str>) -> Result<Value> {
        self.read(agent, |_| Ok(parser_schema(attr)))
    }

    async fn revocation_enabled(&self, agent: Option<&str>) -> Result<bool> {
        self.read(agent, |_| Ok(self.revocation))
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

fn memory_backend_factory(
    config: &BackendProviderConfig,
) -> std::result::Result<Arc<dyn BackendClient>, String> {
    let settings: InventorySettings = decode_settings(&config.settings)?;
    let extra: Vec<String> = config.agents.iter().map(|a| a.name.clone()).collect();
    Ok(Arc::new(MemoryBackend::new(
        settings,
        config.standalone,
        &extra,
    )))
}

#[linkme::distributed_slice(BACKEND_PROVIDERS)]
static MEMORY_BACKEND: BackendProviderEntry = BackendProviderEntry {
    name: "memory",
    description: "In-process inventory (demos and tests)",
    factory: memory_backend_factory,
};
