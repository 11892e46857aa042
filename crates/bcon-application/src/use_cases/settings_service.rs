//! Settings service
//!
//! Administrative access to the backup server's configuration. Every
//! operation is reserved to administrators; every write drops the whole
//! response cache before returning.

use std::sync::Arc;

use bcon_domain::constants::{
    PARSER_ATTR_DEFAULTS, PARSER_ATTR_DOC, PARSER_ATTR_PLACEHOLDERS, PARSER_ATTR_VALUES,
};
use bcon_domain::error::{Error, Result};
use bcon_domain::{
    ConfigForm, ConfigScope, ConfigView, ConfiguredClient, DeleteClientOptions, Notification,
    Principal, SettingOptions,
};
use serde_json::Value;
use tracing::{info, warn};

use super::authorization::Authorizer;
use crate::ports::BackendClient;
use crate::response_cache::ResponseCache;

const SETTINGS_PANEL: &str = "setting panel";

/// Admin-only configuration management
#[derive(Debug, Clone)]
pub struct SettingsService {
    backend: Arc<dyn BackendClient>,
    authorizer: Authorizer,
    cache: Arc<ResponseCache>,
}

impl SettingsService {
    /// Create the service
    pub fn new(
        backend: Arc<dyn BackendClient>,
        authorizer: Authorizer,
        cache: Arc<ResponseCache>,
    ) -> Self {
        Self {
            backend,
            authorizer,
            cache,
        }
    }

    /// Server configuration with its parser metadata
    pub async fn read_server_config(
        &self,
        principal: &Principal,
        conf: Option<&str>,
        agent: Option<&str>,
    ) -> Result<ConfigView> {
        self.admit(principal).await?;
        let results = self.backend.read_server_config(conf, agent).await?;
        self.view(results, ConfigScope::Server, agent).await
    }

    /// Write the server configuration
    pub async fn store_server_config(
        &self,
        principal: &Principal,
        form: &ConfigForm,
        conf: Option<&str>,
        agent: Option<&str>,
    ) -> Result<Vec<Notification>> {
        self.admit(principal).await?;
        let outcome = self.backend.store_server_config(form, conf, agent).await;
        self.invalidate().await;
        outcome
    }

    /// Clients declared in the server's client configuration directory
    pub async fn list_config_clients(
        &self,
        principal: &Principal,
        agent: Option<&str>,
    ) -> Result<Vec<ConfiguredClient>> {
        self.admit(principal).await?;
        self.backend.clients_list(agent).await
    }

    /// Declare a new client with an empty configuration
    pub async fn create_client(
        &self,
        principal: &Principal,
        name: &str,
        agent: Option<&str>,
    ) -> Result<Vec<Notification>> {
        self.admit(principal).await?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_argument("No client name provided"));
        }

        let existing = self.backend.clients_list(agent).await?;
        if existing.iter().any(|client| client.name == name) {
            return Err(Error::conflict(format!("Client '{name}'")));
        }

        let outcome = self
            .backend
            .store_client_config(&ConfigForm::new(), name, None, agent)
            .await;
        self.invalidate().await;

        let mut notifications = outcome?;
        notifications.push(Notification::info(edit_hint(name, agent)));
        info!(client = name, agent = ?agent, "Client created");
        Ok(notifications)
    }

    /// Write a client configuration
    pub async fn store_client_config(
        &self,
        principal: &Principal,
        client: &str,
        form: &ConfigForm,
        conf: Option<&str>,
        agent: Option<&str>,
    ) -> Result<Vec<Notification>> {
        self.admit(principal).await?;
        let outcome = self
            .backend
            .store_client_config(form, client, conf, agent)
            .await;
        self.invalidate().await;
        outcome
    }

    /// Client configuration with its parser metadata
    pub async fn read_client_config(
        &self,
        principal: &Principal,
        client: &str,
        conf: Option<&str>,
        agent: Option<&str>,
    ) -> Result<ConfigView> {
        self.admit(principal).await?;
        let results = self.backend.read_client_config(client, conf, agent).await?;
        self.view(results, ConfigScope::Client, agent).await
    }

    /// Remove a client
    pub async fn delete_client(
        &self,
        principal: &Principal,
        client: &str,
        options: DeleteClientOptions,
        agent: Option<&str>,
    ) -> Result<Vec<Notification>> {
        self.admit(principal).await?;
        let outcome = self.backend.delete_client(client, options, agent).await;
        self.invalidate().await;
        if outcome.is_ok() {
            info!(client, agent = ?agent, revoke = options.revoke, delcert = options.delcert, "Client deleted");
        }
        outcome
    }

    /// Expand a glob path on the server
    pub async fn expand_path(
        &self,
        principal: &Principal,
        path: &str,
        source: Option<&str>,
        client: Option<&str>,
        agent: Option<&str>,
    ) -> Result<Vec<String>> {
        self.admit(principal).await?;
        let paths = self
            .backend
            .expand_path(path, source, client, agent)
            .await?;
        if paths.is_empty() {
            return Err(Error::not_found("Path not found"));
        }
        Ok(paths)
    }

    /// Server capabilities shown on the settings panel
    pub async fn setting_options(
        &self,
        principal: &Principal,
        agent: Option<&str>,
    ) -> Result<SettingOptions> {
        self.admit(principal).await?;
        Ok(SettingOptions {
            is_revocation_enabled: self.backend.revocation_enabled(agent).await?,
        })
    }

    async fn admit(&self, principal: &Principal) -> Result<()> {
        self.authorizer
            .authorize_admin(principal, SETTINGS_PANEL)
            .await
    }

    async fn view(
        &self,
        results: Value,
        scope: ConfigScope,
        agent: Option<&str>,
    ) -> Result<ConfigView> {
        let attr = |name: String| async move { self.backend.get_parser_attr(&name, agent).await };
        Ok(ConfigView {
            results,
            boolean: attr(scope.boolean_attr()).await?,
            string: attr(scope.string_attr()).await?,
            integer: attr(scope.integer_attr()).await?,
            multi: attr(scope.multi_attr()).await?,
            server_doc: attr(PARSER_ATTR_DOC.to_string()).await?,
            suggest: attr(PARSER_ATTR_VALUES.to_string()).await?,
            placeholders: attr(PARSER_ATTR_PLACEHOLDERS.to_string()).await?,
            defaults: attr(PARSER_ATTR_DEFAULTS.to_string()).await?,
        })
    }

    async fn invalidate(&self) {
        if let Err(e) = self.cache.invalidate_all().await {
            warn!(error = %e, "Failed to invalidate response cache");
        }
    }
}

fn edit_hint(client: &str, agent: Option<&str>) -> String {
    match agent {
        Some(agent) => format!("Edit '{client}' configuration on server '{agent}'"),
        None => format!("Edit '{client}' configuration"),
    }
}
