//! Configuration loader
//!
//! Handles loading configuration from various sources including
//! TOML files, environment variables, and default values.

use std::env;
use std::path::{Path, PathBuf};

use bcon_domain::constants::NONE_PROVIDER_KEY;
use bcon_domain::error::{Error, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde_json::Value;
use tracing::warn;

use crate::config::{AppConfig, TypedConfigStore};
use crate::constants::*;
use crate::error_ext::ErrorContext;
use crate::logging::log_config_loaded;

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    #[must_use]
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    #[must_use]
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if exists)
    /// 3. Environment variables with prefix (e.g., `BCON__GLOBAL__PORT`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut app_config: AppConfig = self
            .figment()?
            .extract()
            .config_context("Failed to extract configuration")?;

        normalize_app_config(&mut app_config);
        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Load the merged sources as an untyped store
    ///
    /// Unlike [`load`](Self::load), sections unknown to [`AppConfig`] are
    /// kept.
    pub fn load_store(&self) -> Result<TypedConfigStore> {
        let raw: Value = self
            .figment()?
            .extract()
            .config_context("Failed to extract configuration")?;
        TypedConfigStore::from_value(raw)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).io_context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn figment(&self) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if !config_path.exists() {
                log_config_loaded(config_path, false);
                return Err(Error::config(format!(
                    "Configuration file not found: {}",
                    config_path.display()
                )));
            }
            figment = figment.merge(Toml::file(config_path));
            log_config_loaded(config_path, true);
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        // BCON__GLOBAL__PORT=5001 -> global.port
        let prefix = format!("{}{CONFIG_ENV_SEPARATOR}", self.env_prefix);
        Ok(figment.merge(Env::prefixed(&prefix).split(CONFIG_ENV_SEPARATOR)))
    }

    /// Find default configuration file paths to try
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
            dirs::home_dir().map(|d| {
                d.join(format!(".{DEFAULT_CONFIG_DIR}"))
                    .join(DEFAULT_CONFIG_FILENAME)
            }),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Fix up values the console tolerates but does not use as written
fn normalize_app_config(config: &mut AppConfig) {
    let prefix = config.global.prefix.trim().to_string();
    if prefix.is_empty() || prefix.eq_ignore_ascii_case(PREFIX_NONE) {
        config.global.prefix.clear();
    } else if !prefix.starts_with('/') {
        warn!(prefix = %prefix, "Incorrect prefix, it must start with '/', ignoring it");
        config.global.prefix.clear();
    } else {
        config.global.prefix = prefix;
    }

    config.global.acl = config.global.acl.trim().to_lowercase();
    config.global.backend = config.global.backend.trim().to_lowercase();
    config.cache.provider = config.cache.provider.trim().to_lowercase();
    if config.global.acl.is_empty() {
        config.global.acl = NONE_PROVIDER_KEY.to_string();
    }
}

/// Validate application configuration
fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_global_config(config)?;
    validate_cache_config(config)?;
    validate_agents_config(config)?;
    Ok(())
}

fn validate_global_config(config: &AppConfig) -> Result<()> {
    let global = &config.global;
    if global.port == 0 {
        return Err(Error::config("Server port cannot be 0"));
    }
    if global.ssl && (global.sslcert.is_empty() || global.sslkey.is_empty()) {
        return Err(Error::config(
            "SSL certificate and key paths are required when ssl is enabled",
        ));
    }
    if global.auth.is_empty() {
        return Err(Error::config(
            "At least one authentication backend is required, use \"none\" to disable login",
        ));
    }
    if global.backend.is_empty() {
        return Err(Error::config("No backend configured"));
    }
    Ok(())
}

fn validate_cache_config(config: &AppConfig) -> Result<()> {
    if config.cache.ttl_secs == 0 {
        return Err(Error::config("Cache TTL cannot be 0"));
    }
    Ok(())
}

fn validate_agents_config(config: &AppConfig) -> Result<()> {
    if !config.global.standalone
        && config.global.backend == DEFAULT_BACKEND
        && config.agents.is_empty()
    {
        return Err(Error::config(
            "Multi-agent mode requires at least one [agents.<name>] section",
        ));
    }
    for (name, agent) in &config.agents {
        if agent.url.trim().is_empty() {
            return Err(Error::config(format!("Agent '{name}' has no url")));
        }
    }
    Ok(())
}
