//! Command execution
//!
//! Loads the configuration, builds the application context and runs one
//! command on behalf of the caller. Results are printed as JSON on stdout;
//! diagnostics go to stderr.

use std::collections::BTreeMap;

use bcon_application::ConsoleService;
use bcon_application::ports::registry::{
    list_acl_providers, list_auth_providers, list_backend_providers, list_cache_providers,
};
use bcon_domain::error::{Error, Result};
use bcon_domain::{Aggregated, Credentials, DeleteClientOptions, Principal};
use bcon_infrastructure::constants::EXIT_CODE_STARTUP_FAILURE;
use bcon_infrastructure::logging::init_logging;
use bcon_infrastructure::{AppContext, ConfigLoader, exit_code, init_app};
use serde::Serialize;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::cli::{Cli, Command, SettingsCommand};

/// One caller's view of the console
#[derive(Debug, Clone)]
pub struct Session {
    context: AppContext,
    console: ConsoleService,
    principal: Option<Principal>,
}

impl Session {
    /// Session with no principal yet
    pub fn new(context: AppContext) -> Self {
        let console = context.console().clone();
        Self {
            context,
            console,
            principal: None,
        }
    }

    /// Reads stop once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.console = self.console.with_cancellation(token);
        self
    }

    /// Establish the principal
    ///
    /// Anonymous when login is disabled, otherwise `user` and `password`
    /// must both be given and accepted.
    pub async fn authenticate(&mut self, user: Option<&str>, password: Option<&str>) -> Result<()> {
        let principal = if self.context.login_disabled() {
            Principal::anonymous()
        } else {
            let (Some(user), Some(password)) = (user, password) else {
                return Err(Error::auth_failure("Login required, pass --user and --password"));
            };
            self.context
                .login(&Credentials::new(user, password))
                .await?
        };
        self.principal = Some(principal);
        Ok(())
    }

    /// The authenticated principal, if any
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// The application context
    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Run `command`, restricted to `agent` when given
    pub async fn execute(&self, command: &Command, agent: Option<&str>) -> Result<Value> {
        match command {
            Command::Plugins => Ok(self.plugins()),
            Command::Config { section, key, kind } => {
                let value = self
                    .context
                    .store()
                    .get(key, (*kind).into(), section, None)?;
                Ok(json!({ "section": section, "key": key, "value": value }))
            }
            Command::Clients => {
                let principal = self.require_principal()?;
                aggregated(self.console.list_clients(principal, agent).await?)
            }
            Command::Stats => {
                let principal = self.require_principal()?;
                aggregated(self.console.client_stats(principal, agent).await?)
            }
            Command::Report => {
                let principal = self.require_principal()?;
                aggregated(self.console.report(principal, agent).await?)
            }
            Command::Running { client } => {
                let principal = self.require_principal()?;
                aggregated(
                    self.console
                        .running_clients(principal, agent, client.as_deref())
                        .await?,
                )
            }
            Command::BackupRunning => {
                let principal = self.require_principal()?;
                aggregated(self.console.is_backup_running(principal, agent).await?)
            }
            Command::Settings(settings) => self.settings(settings, agent).await,
        }
    }

    async fn settings(&self, command: &SettingsCommand, agent: Option<&str>) -> Result<Value> {
        let principal = self.require_principal()?;
        let settings = self.console.settings();
        match command {
            SettingsCommand::Server { conf } => to_json(
                &settings
                    .read_server_config(principal, conf.as_deref(), agent)
                    .await?,
            ),
            SettingsCommand::Client { name, conf } => to_json(
                &settings
                    .read_client_config(principal, name, conf.as_deref(), agent)
                    .await?,
            ),
            SettingsCommand::Clients => {
                to_json(&settings.list_config_clients(principal, agent).await?)
            }
            SettingsCommand::Options => to_json(&settings.setting_options(principal, agent).await?),
            SettingsCommand::Create { name } => {
                to_json(&settings.create_client(principal, name, agent).await?)
            }
            SettingsCommand::Delete {
                name,
                revoke,
                delcert,
            } => {
                let options = DeleteClientOptions {
                    revoke: *revoke,
                    delcert: *delcert,
                };
                to_json(
                    &settings
                        .delete_client(principal, name, options, agent)
                        .await?,
                )
            }
            SettingsCommand::Expand {
                path,
                source,
                client,
            } => to_json(
                &settings
                    .expand_path(
                        principal,
                        path,
                        source.as_deref(),
                        client.as_deref(),
                        agent,
                    )
                    .await?,
            ),
        }
    }

    fn plugins(&self) -> Value {
        let registered = |entries: Vec<(&'static str, &'static str)>| {
            entries
                .into_iter()
                .map(|(name, description)| json!({ "name": name, "description": description }))
                .collect::<Vec<_>>()
        };
        let mut providers = BTreeMap::new();
        providers.insert("auth", registered(list_auth_providers()));
        providers.insert("acl", registered(list_acl_providers()));
        providers.insert("backend", registered(list_backend_providers()));
        providers.insert("cache", registered(list_cache_providers()));
        json!({
            "resolved": self.context.registry().handles(),
            "registered": providers,
        })
    }

    fn require_principal(&self) -> Result<&Principal> {
        self.principal
            .as_ref()
            .ok_or_else(|| Error::auth_failure("Not logged in"))
    }
}

/// Run the command line and return the process exit code
pub async fn run(cli: Cli) -> i32 {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = match loader.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return EXIT_CODE_STARTUP_FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Warning: {e}");
    }

    let context = match init_app(config) {
        Ok(context) => context,
        Err(e) => {
            error!(error = %e, "Startup failed");
            eprintln!("Error: {e}");
            return exit_code(&e);
        }
    };

    let token = CancellationToken::new();
    let watcher = tokio::spawn({
        let token = token.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling outstanding agent calls");
                token.cancel();
            }
        }
    });

    let code = match execute_cli(&cli, context, token).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => {
                println!("{text}");
                0
            }
            Err(e) => {
                eprintln!("Error: {e}");
                1
            }
        },
        Err(e) => {
            debug!(error = ?e, "Command failed");
            eprintln!("Error ({}): {e}", e.kind().http_status());
            1
        }
    };
    watcher.abort();
    code
}

async fn execute_cli(cli: &Cli, context: AppContext, token: CancellationToken) -> Result<Value> {
    let mut session = Session::new(context).with_cancellation(token);
    if cli.command.needs_principal() {
        session
            .authenticate(cli.user.as_deref(), cli.password.as_deref())
            .await?;
    }
    session.execute(&cli.command, cli.agent.as_deref()).await
}

/// Value plus the agents that were left out of it
fn aggregated<T: Serialize>(result: Aggregated<T>) -> Result<Value> {
    for warning in &result.warnings {
        warn!(agent = %warning.agent, message = %warning.message, "Agent omitted from result");
    }
    to_json(&result)
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
