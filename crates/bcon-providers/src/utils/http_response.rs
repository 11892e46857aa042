//! HTTP Response Utilities
//!
//! Helper functions for processing HTTP responses from backup agents.
//! These are shared utilities, not ports.

use bcon_domain::error::{Error, Result};
use reqwest::Response;
use serde::de::DeserializeOwned;

/// Format an upstream error for an agent
fn agent_error(agent: &str, context: &str, details: &str) -> Error {
    Error::upstream(Some(agent), format!("{context}: {details}"))
}

/// Utilities for processing HTTP responses
///
/// Provides common response handling patterns used by the agent client.
pub struct HttpResponseUtils;

impl HttpResponseUtils {
    /// Check response status and parse JSON
    ///
    /// Every non-success status is an upstream failure scoped to `agent`.
    pub async fn check_and_parse<T: DeserializeOwned>(response: Response, agent: &str) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let code = status.as_u16();

            return Err(match code {
                401 | 403 => agent_error(agent, "agent rejected credentials", &error_text),
                404 => agent_error(agent, "resource not found on agent", &error_text),
                500..=599 => agent_error(agent, &format!("agent error ({code})"), &error_text),
                _ => agent_error(agent, &format!("request failed ({code})"), &error_text),
            });
        }

        response
            .json()
            .await
            .map_err(|e| agent_error(agent, "response parse failed", &e.to_string()))
    }

    /// Map a transport error to an upstream failure
    pub fn transport_error(agent: &str, error: reqwest::Error) -> Error {
        let message = if error.is_timeout() {
            "request timed out".to_string()
        } else if error.is_connect() {
            "agent unreachable".to_string()
        } else {
            "request failed".to_string()
        };
        Error::upstream_with_source(Some(agent), message, error)
    }
}
