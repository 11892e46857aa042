//! Console service
//!
//! The read surface used by the front-ends: aggregation reads, some of
//! them memoized per principal in the [`ResponseCache`], plus the
//! settings service.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bcon_domain::error::Result;
use bcon_domain::{Aggregated, ClientRecord, ClientsReport, Principal, RunningState};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::aggregator::Aggregator;
use super::settings_service::SettingsService;
use crate::response_cache::{CacheKey, ResponseCache};

/// Logical resource paths used in cache keys
mod paths {
    pub const CLIENTS: &str = "clients/all";
    pub const REPORT: &str = "clients/report";
    pub const STATS: &str = "clients/stats";
}

/// Cached reads and settings
#[derive(Debug, Clone)]
pub struct ConsoleService {
    aggregator: Aggregator,
    settings: SettingsService,
    cache: Arc<ResponseCache>,
    ttl: Duration,
}

impl ConsoleService {
    /// Assemble the service
    pub fn new(
        aggregator: Aggregator,
        settings: SettingsService,
        cache: Arc<ResponseCache>,
        ttl: Duration,
    ) -> Self {
        Self {
            aggregator,
            settings,
            cache,
            ttl,
        }
    }

    /// A copy whose reads stop when `token` is cancelled
    #[must_use]
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            aggregator: self.aggregator.with_cancellation(token),
            ..self.clone()
        }
    }

    /// Uncached aggregation reads
    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Admin-only settings operations
    pub fn settings(&self) -> &SettingsService {
        &self.settings
    }

    /// The response cache
    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Cached [`Aggregator::list_clients`]
    pub async fn list_clients(
        &self,
        principal: &Principal,
        agent: Option<&str>,
    ) -> Result<Aggregated<Vec<ClientRecord>>> {
        self.cached(principal, paths::CLIENTS, agent, || {
            self.aggregator.list_clients(principal, agent)
        })
        .await
    }

    /// Cached [`Aggregator::report`]
    pub async fn report(
        &self,
        principal: &Principal,
        agent: Option<&str>,
    ) -> Result<Aggregated<ClientsReport>> {
        self.cached(principal, paths::REPORT, agent, || {
            self.aggregator.report(principal, agent)
        })
        .await
    }

    /// Cached [`Aggregator::client_stats`]
    pub async fn client_stats(
        &self,
        principal: &Principal,
        agent: Option<&str>,
    ) -> Result<Aggregated<Vec<ClientRecord>>> {
        self.cached(principal, paths::STATS, agent, || {
            self.aggregator.client_stats(principal, agent)
        })
        .await
    }

    /// [`Aggregator::running_clients`], never cached
    pub async fn running_clients(
        &self,
        principal: &Principal,
        agent: Option<&str>,
        client: Option<&str>,
    ) -> Result<Aggregated<RunningState>> {
        self.aggregator
            .running_clients(principal, agent, client)
            .await
    }

    /// [`Aggregator::is_backup_running`], never cached
    pub async fn is_backup_running(
        &self,
        principal: &Principal,
        agent: Option<&str>,
    ) -> Result<Aggregated<bool>> {
        self.aggregator.is_backup_running(principal, agent).await
    }

    /// Partial results are returned but never stored
    ///
    /// The principal is authorized before the cache is consulted, so a
    /// cached entry is only ever served to a caller allowed to compute it.
    async fn cached<T, F, Fut>(
        &self,
        principal: &Principal,
        path: &str,
        agent: Option<&str>,
        compute: F,
    ) -> Result<Aggregated<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Aggregated<T>>>,
    {
        self.aggregator
            .authorizer()
            .authorize(principal, agent, None)
            .await?;
        let key = CacheKey::new(principal, path, &[("agent", agent)]);
        self.cache
            .get_or_compute_if(&key, Some(self.ttl), compute, Aggregated::is_complete)
            .await
    }
}
