//! Multi-agent aggregation
//!
//! Reads from one or many backup agents, filtered by what the calling
//! principal may see. In multi-agent mode an unscoped read fans out to
//! every visible agent concurrently; an agent that fails is omitted and
//! reported as a warning. A read scoped to one agent returns that agent's
//! failure directly.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use bcon_domain::error::{Error, Result};
use bcon_domain::{
    AgentWarning, Aggregated, ClientRecord, ClientsReport, Principal, RunningState,
};
use futures::{StreamExt, stream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::authorization::{Access, Authorizer};
use crate::ports::BackendClient;

/// ACL-filtered reads across the configured agents
#[derive(Debug, Clone)]
pub struct Aggregator {
    backend: Arc<dyn BackendClient>,
    authorizer: Authorizer,
    cancel: CancellationToken,
}

impl Aggregator {
    /// Create an aggregator over a backend and an authorization gate
    pub fn new(backend: Arc<dyn BackendClient>, authorizer: Authorizer) -> Self {
        Self {
            backend,
            authorizer,
            cancel: CancellationToken::new(),
        }
    }

    /// A copy of this aggregator whose operations stop when `token` is cancelled
    ///
    /// In-flight agent fetches are dropped on cancellation and the
    /// operation fails with [`Error::Cancelled`].
    #[must_use]
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: token,
            ..self.clone()
        }
    }

    /// The authorization gate shared with other services
    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    /// The backend client
    pub fn backend(&self) -> &Arc<dyn BackendClient> {
        &self.backend
    }

    /// Client names visible to the principal, tagged with their agent
    ///
    /// Ordering across agents follows the principal's server grant (or the
    /// configured order for admins); within an agent, the backend's order.
    pub async fn list_clients(
        &self,
        principal: &Principal,
        agent: Option<&str>,
    ) -> Result<Aggregated<Vec<ClientRecord>>> {
        debug!(principal = %principal, agent = ?agent, "list_clients");
        self.collect_clients(principal, agent, false).await
    }

    /// Client records with status and statistics, same filtering as
    /// [`list_clients`](Self::list_clients)
    pub async fn client_stats(
        &self,
        principal: &Principal,
        agent: Option<&str>,
    ) -> Result<Aggregated<Vec<ClientRecord>>> {
        debug!(principal = %principal, agent = ?agent, "client_stats");
        self.collect_clients(principal, agent, true).await
    }

    /// Whether any client visible to the principal is being backed up
    pub async fn is_backup_running(
        &self,
        principal: &Principal,
        agent: Option<&str>,
    ) -> Result<Aggregated<bool>> {
        Ok(self
            .running_clients(principal, agent, None)
            .await?
            .map(|state| state.any_running()))
    }

    /// Visible clients with a backup in progress
    ///
    /// With `client`, answers for that client only; a client outside the
    /// principal's grant reads as not running. Unscoped reads in
    /// multi-agent mode answer [`RunningState::PerAgent`].
    pub async fn running_clients(
        &self,
        principal: &Principal,
        agent: Option<&str>,
        client: Option<&str>,
    ) -> Result<Aggregated<RunningState>> {
        debug!(principal = %principal, agent = ?agent, client = ?client, "running_clients");
        self.guarded(async {
            let access = self.authorizer.authorize(principal, agent, None).await?;
            let agent = self.scope(agent);

            if let Some(client) = client {
                if !access.is_admin()
                    && !self
                        .authorizer
                        .is_client_allowed(principal, client, agent)
                        .await
                {
                    return Ok(Aggregated::complete(RunningState::default()));
                }
                let running = self.backend.is_backup_running(client, agent).await?;
                let clients = if running {
                    vec![client.to_string()]
                } else {
                    Vec::new()
                };
                return Ok(Aggregated::complete(RunningState::Flat(clients)));
            }

            if self.authorizer.is_standalone() || agent.is_some() {
                let state = match self.backend.is_one_backup_running(agent).await? {
                    RunningState::Flat(clients) => {
                        let grant = self.authorizer.client_grant(principal, access, agent).await;
                        RunningState::Flat(RunningState::filter_flat(clients, &grant))
                    }
                    RunningState::PerAgent(map) => {
                        self.filter_per_agent(principal, access, map).await
                    }
                };
                return Ok(Aggregated::complete(state));
            }

            let targets = self.targets(principal, access).await;
            let merged = self
                .fan_out(targets, move |agent| async move {
                    let clients = match self.backend.is_one_backup_running(Some(&agent)).await? {
                        RunningState::Flat(clients) => clients,
                        RunningState::PerAgent(mut map) => map.remove(&agent).unwrap_or_default(),
                    };
                    let grant = self
                        .authorizer
                        .client_grant(principal, access, Some(&agent))
                        .await;
                    Ok(RunningState::filter_flat(clients, &grant))
                })
                .await;
            Ok(merged.map(|per_agent| RunningState::PerAgent(per_agent.into_iter().collect())))
        })
        .await
    }

    /// Backup report over the visible clients
    ///
    /// The client set is restricted first; statistics come from the
    /// backend only. Unscoped reads in multi-agent mode merge the reports
    /// of every visible agent.
    pub async fn report(
        &self,
        principal: &Principal,
        agent: Option<&str>,
    ) -> Result<Aggregated<ClientsReport>> {
        debug!(principal = %principal, agent = ?agent, "report");
        self.guarded(async {
            let access = self.authorizer.authorize(principal, agent, None).await?;
            let agent = self.scope(agent);

            if self.authorizer.is_standalone() || agent.is_some() {
                let report = self.fetch_report(principal, access, agent).await?;
                return Ok(Aggregated::complete(report));
            }

            let targets = self.targets(principal, access).await;
            let merged = self
                .fan_out(targets, move |agent| async move {
                    self.fetch_report(principal, access, Some(&agent)).await
                })
                .await;
            Ok(merged.map(|per_agent| {
                per_agent
                    .into_iter()
                    .fold(ClientsReport::default(), |mut acc, (_, report)| {
                        acc.merge(report);
                        acc
                    })
            }))
        })
        .await
    }

    async fn collect_clients(
        &self,
        principal: &Principal,
        agent: Option<&str>,
        detailed: bool,
    ) -> Result<Aggregated<Vec<ClientRecord>>> {
        self.guarded(async {
            let access = self.authorizer.authorize(principal, agent, None).await?;
            let agent = self.scope(agent);

            if self.authorizer.is_standalone() || agent.is_some() {
                let records = self
                    .fetch_clients(principal, access, agent, detailed)
                    .await?;
                return Ok(Aggregated::complete(records));
            }

            let targets = self.targets(principal, access).await;
            let merged = self
                .fan_out(targets, move |agent| async move {
                    self.fetch_clients(principal, access, Some(&agent), detailed)
                        .await
                })
                .await;
            Ok(merged.map(|per_agent| {
                per_agent
                    .into_iter()
                    .flat_map(|(_, records)| records)
                    .collect()
            }))
        })
        .await
    }

    async fn fetch_clients(
        &self,
        principal: &Principal,
        access: Access,
        agent: Option<&str>,
        detailed: bool,
    ) -> Result<Vec<ClientRecord>> {
        let records = self.backend.get_all_clients(agent).await?;
        let grant = self.authorizer.client_grant(principal, access, agent).await;
        Ok(grant
            .retain(records, |r| r.name.as_str())
            .into_iter()
            .map(|record| {
                let record = if detailed {
                    record
                } else {
                    ClientRecord::new(record.name)
                };
                match agent {
                    Some(agent) => record.with_agent(agent),
                    None => record,
                }
            })
            .collect())
    }

    async fn fetch_report(
        &self,
        principal: &Principal,
        access: Access,
        agent: Option<&str>,
    ) -> Result<ClientsReport> {
        let clients: Vec<String> = self
            .fetch_clients(principal, access, agent, false)
            .await?
            .into_iter()
            .map(|record| record.name)
            .collect();
        let report = self.backend.get_clients_report(&clients, agent).await?;
        Ok(match agent {
            Some(agent) => report.with_agent(agent),
            None => report,
        })
    }

    async fn filter_per_agent(
        &self,
        principal: &Principal,
        access: Access,
        map: BTreeMap<String, Vec<String>>,
    ) -> RunningState {
        let servers = self.authorizer.server_grant(principal, access).await;
        let mut filtered = BTreeMap::new();
        for (agent, clients) in map {
            if !servers.allows(&agent) {
                continue;
            }
            let grant = self
                .authorizer
                .client_grant(principal, access, Some(&agent))
                .await;
            filtered.insert(agent, RunningState::filter_flat(clients, &grant));
        }
        RunningState::PerAgent(filtered)
    }

    /// Agents an unscoped read fans out to
    async fn targets(&self, principal: &Principal, access: Access) -> Vec<String> {
        let configured = self.backend.servers();
        self.authorizer
            .server_grant(principal, access)
            .await
            .select(&configured)
    }

    /// Run `fetch` for every agent concurrently, keeping agent order
    async fn fan_out<T, F, Fut>(&self, agents: Vec<String>, fetch: F) -> Aggregated<Vec<(String, T)>>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let width = agents.len().max(1);
        let results: Vec<(String, Result<T>)> = stream::iter(agents)
            .map(|agent| {
                let fetch = fetch(agent.clone());
                async move { (agent, fetch.await) }
            })
            .buffered(width)
            .collect()
            .await;

        let mut value = Vec::with_capacity(results.len());
        let mut warnings = Vec::new();
        for (agent, result) in results {
            match result {
                Ok(item) => value.push((agent, item)),
                Err(e) => {
                    warn!(agent = %agent, error = %e, "Agent omitted from aggregation");
                    warnings.push(AgentWarning {
                        agent,
                        message: e.to_string(),
                    });
                }
            }
        }
        Aggregated { value, warnings }
    }

    async fn guarded<T, Fut>(&self, operation: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(Error::Cancelled),
            result = operation => result,
        }
    }

    fn scope<'a>(&self, agent: Option<&'a str>) -> Option<&'a str> {
        if self.authorizer.is_standalone() {
            None
        } else {
            agent
        }
    }
}
