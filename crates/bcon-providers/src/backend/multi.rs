//! Remote agent backend
//!
//! Talks to backup agents over their HTTP/JSON API. Every call carries the
//! agent's timeout; transport errors, timeouts and non-success statuses
//! become upstream failures scoped to the agent.
//!
//! ## Agent API
//!
//! | Method | Path | Answer |
//! |--------|------|--------|
//! | GET | `/api/clients` | `[ClientRecord]` |
//! | GET | `/api/clients/{client}/running` | `bool` |
//! | GET | `/api/running` | `[client]` |
//! | POST | `/api/report` | `ClientsReport` for `{"clients": [...]}` |
//! | GET, PUT | `/api/config/server?conf=` | config / `[Notification]` |
//! | GET | `/api/config/clients` | `[ConfiguredClient]` |
//! | GET, PUT, DELETE | `/api/config/clients/{client}` | config / `[Notification]` |
//! | GET | `/api/paths?path=&source=&client=` | `[path]` |
//! | GET | `/api/parser/{attr}` | schema metadata |
//! | GET | `/api/options` | `{"is_revocation_enabled": bool}` |

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bcon_application::ports::registry::{
    AgentEndpoint, BACKEND_PROVIDERS, BackendProviderConfig, BackendProviderEntry,
};
use bcon_domain::error::{Error, Result};
use bcon_domain::ports::providers::BackendClient;
use bcon_domain::{
    ClientRecord, ClientsReport, ConfigForm, ConfiguredClient, DeleteClientOptions, Notification,
    RunningState, SettingOptions,
};
use futures::future::try_join_all;
use reqwest::{Client, Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::constants::{
    AGENT_API_ROOT, AGENT_CONNECT_TIMEOUT_SECS, AGENT_DEFAULT_TIMEOUT_SECS,
    HTTP_CLIENT_IDLE_TIMEOUT_SECS, HTTP_MAX_IDLE_PER_HOST,
};
use crate::utils::HttpResponseUtils;

/// One configured agent
#[derive(Debug, Clone)]
struct Agent {
    name: String,
    base: Url,
    timeout: Duration,
    password: Option<String>,
}

impl Agent {
    fn new(endpoint: &AgentEndpoint) -> std::result::Result<Self, String> {
        let base = Url::parse(&endpoint.url)
            .map_err(|e| format!("invalid URL for agent '{}': {e}", endpoint.name))?;
        if base.cannot_be_a_base() {
            return Err(format!(
                "invalid URL for agent '{}': {} cannot be a base",
                endpoint.name, endpoint.url
            ));
        }
        let timeout_secs = if endpoint.timeout_secs == 0 {
            AGENT_DEFAULT_TIMEOUT_SECS
        } else {
            endpoint.timeout_secs
        };
        Ok(Self {
            name: endpoint.name.clone(),
            base,
            timeout: Duration::from_secs(timeout_secs),
            password: endpoint.password.clone(),
        })
    }

    fn url(&self, segments: &[&str], query: &[(&str, Option<&str>)]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| Error::upstream(Some(&self.name), "agent URL cannot be a base"))?
            .pop_if_empty()
            .push(AGENT_API_ROOT)
            .extend(segments);

        let pairs: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|(k, v)| v.map(|v| (*k, v)))
            .collect();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }
}

/// HTTP client for one or many backup agents
#[derive(Debug, Clone)]
pub struct MultiAgentBackend {
    client: Client,
    agents: Vec<Agent>,
    standalone: bool,
}

impl MultiAgentBackend {
    /// Create the backend
    ///
    /// Standalone mode needs exactly one endpoint; multi-agent mode at
    /// least one, with unique names.
    pub fn new(agents: &[AgentEndpoint], standalone: bool) -> std::result::Result<Self, String> {
        if standalone && agents.len() != 1 {
            return Err(format!(
                "standalone mode needs exactly one agent endpoint, {} configured",
                agents.len()
            ));
        }
        if agents.is_empty() {
            return Err("no agent configured".to_string());
        }
        let mut seen = std::collections::BTreeSet::new();
        for agent in agents {
            if !seen.insert(agent.name.as_str()) {
                return Err(format!("duplicate agent name '{}'", agent.name));
            }
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(AGENT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(HTTP_MAX_IDLE_PER_HOST)
            .pool_idle_timeout(Duration::from_secs(HTTP_CLIENT_IDLE_TIMEOUT_SECS))
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            agents: agents
                .iter()
                .map(Agent::new)
                .collect::<std::result::Result<_, _>>()?,
            standalone,
        })
    }

    fn agent(&self, name: Option<&str>) -> Result<&Agent> {
        if self.standalone {
            return self
                .agents
                .first()
                .ok_or_else(|| Error::internal("standalone backend without agent"));
        }
        let name = name
            .ok_or_else(|| Error::invalid_argument("an agent is required in multi-agent mode"))?;
        self.agents
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| Error::upstream(Some(name), "unknown agent"))
    }

    async fn call<T, B>(
        &self,
        agent: &Agent,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        debug!(agent = %agent.name, %method, path = url.path(), "Agent request");
        let mut request = self
            .client
            .request(method, url)
            .timeout(agent.timeout);
        if let Some(password) = &agent.password {
            request = request.bearer_auth(password);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HttpResponseUtils::transport_error(&agent.name, e))?;
        HttpResponseUtils::check_and_parse(response, &agent.name).await
    }

    async fn get<T: DeserializeOwned>(&self, agent: &Agent, url: Url) -> Result<T> {
        self.call::<T, Value>(agent, Method::GET, url, None).await
    }

    async fn running_on(&self, agent: &Agent) -> Result<Vec<String>> {
        self.get(agent, agent.url(&["running"], &[])?).await
    }
}

#[async_trait]
impl BackendClient for MultiAgentBackend {
    fn servers(&self) -> Vec<String> {
        if self.standalone {
            return Vec::new();
        }
        self.agents.iter().map(|a| a.name.clone()).collect()
    }

    async fn get_all_clients(&self, agent: Option<&str>) -> Result<Vec<ClientRecord>> {
        let agent = self.agent(agent)?;
        self.get(agent, agent.url(&["clients"], &[])?).await
    }

    async fn is_backup_running(&self, client: &str, agent: Option<&str>) -> Result<bool> {
        let agent = self.agent(agent)?;
        self.get(agent, agent.url(&["clients", client, "running"], &[])?)
            .await
    }

    async fn is_one_backup_running(&self, agent: Option<&str>) -> Result<RunningState> {
        if self.standalone || agent.is_some() {
            let agent = self.agent(agent)?;
            return Ok(RunningState::Flat(self.running_on(agent).await?));
        }

        let running = try_join_all(self.agents.iter().map(|agent| async move {
            Ok::<_, Error>((agent.name.clone(), self.running_on(agent).await?))
        }))
        .await?;
        Ok(RunningState::PerAgent(running.into_iter().collect::<BTreeMap<_, _>>()))
    }

    async fn get_clients_report(
        &self,
        clients: &[String],
        agent: Option<&str>,
    ) -> Result<ClientsReport> {
        let agent = self.agent(agent)?;
        let body = json!({ "clients": clients });
        self.call(agent, Method::POST, agent.url(&["report"], &[])?, Some(&body))
            .await
    }

    async fn read_server_config(&self, conf: Option<&str>, agent: Option<&str>) -> Result<Value> {
        let agent = self.agent(agent)?;
        self.get(agent, agent.url(&["config", "server"], &[("conf", conf)])?)
            .await
    }

    async fn read_client_config(
        &self,
        client: &str,
        conf: Option<&str>,
        agent: Option<&str>,
    ) -> Result<Value> {
        let agent = self.agent(agent)?;
        let url = agent.url(&["config", "clients", client], &[("conf", conf)])?;
        self.get(agent, url).await
    }

    async fn store_server_config(
        &self,
        form: &ConfigForm,
        conf: Option<&str>,
        agent: Option<&str>,
    ) -> Result<Vec<Notification>> {
        let agent = self.agent(agent)?;
        let url = agent.url(&["config", "server"], &[("conf", conf)])?;
        self.call(agent, Method::PUT, url, Some(form)).await
    }

    async fn store_client_config(
        &self,
        form: &ConfigForm,
        client: &str,
        conf: Option<&str>,
        agent: Option<&str>,
    ) -> Result<Vec<Notification>> {
        let agent = self.agent(agent)?;
        let url = agent.url(&["config", "clients", client], &[("conf", conf)])?;
        self.call(agent, Method::PUT, url, Some(form)).await
    }

    async fn clients_list(&self, agent: Option<&str>) -> Result<Vec<ConfiguredClient>> {
        let agent = self.agent(agent)?;
        self.get(agent, agent.url(&["config", "clients"], &[])?)
            .await
    }

    async fn delete_client(
        &self,
        client: &str,
        options: DeleteClientOptions,
        agent: Option<&str>,
    ) -> Result<Vec<Notification>> {
        let agent = self.agent(agent)?;
        let flag = |set: bool| if set { "1" } else { "0" };
        let url = agent.url(
            &["config", "clients", client],
            &[
                ("revoke", Some(flag(options.revoke))),
                ("delcert", Some(flag(options.delcert))),
            ],
        )?;
        self.call::<_, Value>(agent, Method::DELETE, url, None).await
    }

    async fn expand_path(
        &self,
        path: &str,
        source: Option<&str>,
        client: Option<&str>,
        agent: Option<&str>,
    ) -> Result<Vec<String>> {
        let agent = self.agent(agent)?;
        let url = agent.url(
            &["paths"],
            &[("path", Some(path)), ("source", source), ("client", client)],
        )?;
        self.get(agent, url).await
    }

    async fn get_parser_attr(&self, attr: &str, agent: Option<&str>) -> Result<Value> {
        let agent = self.agent(agent)?;
        self.get(agent, agent.url(&["parser", attr], &[])?).await
    }

    async fn revocation_enabled(&self, agent: Option<&str>) -> Result<bool> {
        let agent = self.agent(agent)?;
        let options: SettingOptions = self.get(agent, agent.url(&["options"], &[])?).await?;
        Ok(options.is_revocation_enabled)
    }

    fn provider_name(&self) -> &str {
        "multi"
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

fn multi_backend_factory(
    config: &BackendProviderConfig,
) -> std::result::Result<Arc<dyn BackendClient>, String> {
    Ok(Arc::new(MultiAgentBackend::new(
        &config.agents,
        config.standalone,
    )?))
}

#[linkme::distributed_slice(BACKEND_PROVIDERS)]
static MULTI_BACKEND: BackendProviderEntry = BackendProviderEntry {
    name: "multi",
    description: "HTTP/JSON client for remote backup agents",
    factory: multi_backend_factory,
};
