//! Composition root
//!
//! Resolves every plugin once and assembles the services front-ends use.
//!
//! ```text
//! AppConfig → PluginRegistry → auth / acl / backend / cache
//!                                  ↓
//!                 Authorizer → Aggregator, SettingsService
//!                                  ↓
//!                 ResponseCache → ConsoleService
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = ConfigLoader::new().load()?;
//! let context = match init_app(config) {
//!     Ok(context) => context,
//!     Err(e) => std::process::exit(exit_code(&e)),
//! };
//! let principal = context.login(&Credentials::new("admin", "admin")).await?;
//! let clients = context.console().list_clients(&principal, None).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use bcon_application::{Aggregator, Authorizer, ConsoleService, ResponseCache, SettingsService};
use bcon_domain::error::{Error, Result};
use bcon_domain::ports::providers::AuthProvider;
use bcon_domain::{Credentials, Principal};
use tracing::{info, warn};

use crate::config::{AppConfig, TypedConfigStore};
use crate::constants::{EXIT_CODE_PLUGIN_FAILURE, EXIT_CODE_STARTUP_FAILURE};
use crate::di::registry::PluginRegistry;
use crate::logging::log_effective_settings;

/// Process-wide context handed to every front-end
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Application configuration
    pub config: Arc<AppConfig>,
    store: Arc<TypedConfigStore>,
    registry: Arc<PluginRegistry>,
    auth: Arc<dyn AuthProvider>,
    console: ConsoleService,
}

impl AppContext {
    /// Typed access to the effective configuration
    pub fn store(&self) -> &TypedConfigStore {
        &self.store
    }

    /// Resolved plugins
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    /// Cached reads and settings
    pub fn console(&self) -> &ConsoleService {
        &self.console
    }

    /// The authentication provider
    pub fn auth(&self) -> &Arc<dyn AuthProvider> {
        &self.auth
    }

    /// Whether callers skip login
    pub fn login_disabled(&self) -> bool {
        self.auth.disables_login()
    }

    /// Authenticate credentials
    ///
    /// Provider errors other than a rejection are reported as a rejection.
    pub async fn login(&self, credentials: &Credentials) -> Result<Principal> {
        match self.auth.authenticate(credentials).await {
            Ok(principal) => {
                info!(principal = %principal, "Login succeeded");
                Ok(principal)
            }
            Err(e @ Error::AuthFailure { .. }) => Err(e),
            Err(e) => {
                warn!(user = %credentials.username, error = %e, "Authentication backend failed");
                Err(Error::auth_failure("Authentication unavailable"))
            }
        }
    }

    /// Principal for an already established session
    ///
    /// Unknown users and provider errors yield an unauthenticated principal.
    pub async fn session_principal(&self, username: &str) -> Principal {
        if self.login_disabled() {
            return Principal::anonymous();
        }
        match self.auth.lookup(username).await {
            Ok(Some(principal)) => principal,
            Ok(None) => Principal::unauthenticated(username),
            Err(e) => {
                warn!(user = username, error = %e, "User lookup failed");
                Principal::unauthenticated(username)
            }
        }
    }
}

/// Build the application context
///
/// Mandatory plugins that cannot be loaded abort here; see [`exit_code`].
pub fn init_app(config: AppConfig) -> Result<AppContext> {
    info!("Initializing bcon context");
    log_effective_settings(&config);

    let config = Arc::new(config);
    let store = Arc::new(TypedConfigStore::from_config(&config)?);
    let registry = Arc::new(PluginRegistry::new(Arc::clone(&config)));

    let auth = registry.auth()?;
    let acl = registry.acl()?;
    let backend = registry.backend()?;
    let cache_provider = registry.cache()?;
    info!(
        auth = auth.provider_name(),
        acl = acl.provider_name(),
        backend = backend.provider_name(),
        cache = cache_provider.provider_name(),
        "Plugins resolved"
    );

    let ttl = Duration::from_secs(config.cache.ttl_secs);
    let authorizer = Authorizer::new(acl, config.global.standalone);
    let aggregator = Aggregator::new(Arc::clone(&backend), authorizer.clone());
    let cache = Arc::new(ResponseCache::new(cache_provider, ttl));
    let settings = SettingsService::new(backend, authorizer, Arc::clone(&cache));
    let console = ConsoleService::new(aggregator, settings, cache, ttl);

    Ok(AppContext {
        config,
        store,
        registry,
        auth,
        console,
    })
}

/// Process exit code for a startup failure
pub fn exit_code(error: &Error) -> i32 {
    match error {
        Error::PluginResolution {
            mandatory: true, ..
        } => EXIT_CODE_PLUGIN_FAILURE,
        _ => EXIT_CODE_STARTUP_FAILURE,
    }
}
