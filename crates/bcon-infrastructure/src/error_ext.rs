//! Error context helpers
//!
//! Wraps foreign errors (figment, toml, I/O) into the domain [`Error`]
//! while keeping the original error as the source.

use std::fmt::Display;

use bcon_domain::error::{Error, Result};

/// Attach a message to a foreign error and convert it
///
/// ```ignore
/// use bcon_infrastructure::error_ext::ErrorContext;
///
/// let config: AppConfig = figment.extract().config_context("Invalid configuration")?;
/// std::fs::write(&path, text).io_context("Failed to write config file")?;
/// ```
pub trait ErrorContext<T> {
    /// Infrastructure failure
    fn context<C: Display>(self, context: C) -> Result<T>;

    /// File system failure
    fn io_context<C: Display>(self, context: C) -> Result<T>;

    /// Invalid or unreadable configuration, fatal at startup
    fn config_context<C: Display>(self, context: C) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.map_err(|err| Error::Infrastructure {
            message: format!("{context}: {err}"),
            source: Some(Box::new(err)),
        })
    }

    fn io_context<C: Display>(self, context: C) -> Result<T> {
        self.context(format_args!("I/O: {context}"))
    }

    fn config_context<C: Display>(self, context: C) -> Result<T> {
        self.map_err(|err| Error::Configuration {
            message: format!("{context}: {err}"),
            source: Some(Box::new(err)),
        })
    }
}
