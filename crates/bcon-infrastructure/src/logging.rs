//! Structured logging with tracing
//!
//! One subscriber per process: an [`EnvFilter`] (overridable with
//! `BCON_LOG`) in front of a stderr output and an optional daily-rotated
//! file, both in the configured [`LogFormat`].

use std::ffi::OsStr;
use std::path::Path;

use bcon_domain::error::{Error, Result};
use tracing::{Level, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

pub use crate::config::{LogFormat, LoggingConfig};
use crate::config::AppConfig;
use crate::constants::{LOG_ENV_VAR, LOG_FILE_STEM};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber
///
/// Fails if the level is invalid or a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::from_level(level).into()));

    // stdout carries command output
    let mut outputs = vec![output_layer(config.format, std::io::stderr, true)];
    if let Some(path) = &config.file {
        let appender = tracing_appender::rolling::daily(
            path.parent().unwrap_or_else(|| Path::new(".")),
            path.file_stem().unwrap_or_else(|| OsStr::new(LOG_FILE_STEM)),
        );
        outputs.push(output_layer(config.format, appender, false));
    }

    tracing_subscriber::registry()
        .with(outputs.with_filter(filter))
        .try_init()
        .map_err(|e| Error::infrastructure(format!("Failed to install logger: {e}")))?;

    info!("Logging initialized with level: {}", level);
    Ok(())
}

fn output_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true);
    match format {
        LogFormat::Plain => layer.boxed(),
        LogFormat::Json => layer.json().with_thread_ids(true).boxed(),
    }
}

/// Parse log level string to tracing Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::config(format!(
            "Invalid log level: {level}. Use trace, debug, info, warn, or error"
        ))),
    }
}

/// Log configuration loading status
pub fn log_config_loaded(config_path: &Path, success: bool) {
    if success {
        info!("Configuration loaded from {}", config_path.display());
    } else {
        warn!("Configuration file not found: {}", config_path.display());
    }
}

/// Log every effective setting once at startup
pub fn log_effective_settings(config: &AppConfig) {
    let global = &config.global;
    info!("version: {}", global.version);
    info!("listen port: {}", global.port);
    info!("bind addr: {}", global.bind);
    info!("use ssl: {}", global.ssl);
    info!("standalone: {}", global.standalone);
    info!("sslcert: {}", global.sslcert);
    info!("sslkey: {}", global.sslkey);
    info!("prefix: {}", global.prefix);
    info!("auth: {}", global.auth.join(","));
    info!("acl: {}", global.acl);
    info!("backend: {}", global.backend);
    info!("agents: {}", config.agents.len());
    info!("refresh: {}", config.ui.refresh);
    info!("liverefresh: {}", config.ui.liverefresh);
    info!("secure cookie: {}", config.security.scookie);
    info!("cookietime: {} days", config.security.cookietime);
    info!("cache: {} (ttl {}s)", config.cache.provider, config.cache.ttl_secs);
}
