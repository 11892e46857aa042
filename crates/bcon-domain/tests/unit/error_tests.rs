//! Unit tests for domain error types

use bcon_domain::{Error, ErrorKind};

#[test]
fn test_not_found_error() {
    let error = Error::not_found("path");
    match error {
        Error::NotFound { resource } => assert_eq!(resource, "path"),
        _ => panic!("Expected NotFound error"),
    }
}

#[test]
fn test_conflict_error() {
    let error = Error::conflict("client 'c1'");
    assert_eq!(error.to_string(), "Conflict: client 'c1' already exists");
    assert_eq!(error.kind(), ErrorKind::Conflict);
}

#[test]
fn test_upstream_error_is_scoped_to_agent() {
    let error = Error::upstream(Some("srv1"), "connection refused");
    assert_eq!(
        error.to_string(),
        "Upstream failure on agent 'srv1': connection refused"
    );
    match error {
        Error::Upstream { agent, .. } => assert_eq!(agent.as_deref(), Some("srv1")),
        _ => panic!("Expected Upstream error"),
    }
}

#[test]
fn test_upstream_error_without_agent() {
    let error = Error::upstream(None, "timeout");
    assert_eq!(error.to_string(), "Upstream failure: timeout");
}

#[test]
fn test_plugin_resolution_error() {
    let error = Error::plugin_resolution("backend", "nope", true, "unknown key");
    match error {
        Error::PluginResolution {
            capability,
            key,
            mandatory,
            ..
        } => {
            assert_eq!(capability, "backend");
            assert_eq!(key, "nope");
            assert!(mandatory);
        }
        _ => panic!("Expected PluginResolution error"),
    }
}

#[test]
fn test_http_status_mapping() {
    assert_eq!(Error::permission_denied("x").kind().http_status(), 403);
    assert_eq!(Error::not_found("x").kind().http_status(), 403);
    assert_eq!(Error::upstream(None, "x").kind().http_status(), 500);
    assert_eq!(Error::auth_failure("x").kind().http_status(), 401);
    assert_eq!(Error::conflict("x").kind().http_status(), 409);
    assert_eq!(Error::invalid_argument("x").kind().http_status(), 400);
}

#[test]
fn test_retryable_kinds() {
    assert!(Error::upstream(Some("srv1"), "x").kind().is_retryable());
    assert!(!Error::permission_denied("x").kind().is_retryable());
    assert!(!Error::config("x").kind().is_retryable());
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let error: Error = io.into();
    assert!(matches!(error, Error::Io { .. }));
}
