//! Tests for provider registries
//!
//! Uses `extern crate bcon_providers` to force linkme registration of the
//! shipped providers.

extern crate bcon_providers;

use bcon_application::ports::registry::*;
use bcon_domain::{Credentials, Principal};
use serde_json::json;

#[test]
fn test_every_capability_has_providers() {
    let auth: Vec<_> = list_auth_providers().into_iter().map(|(n, _)| n).collect();
    let acl: Vec<_> = list_acl_providers().into_iter().map(|(n, _)| n).collect();
    let backend: Vec<_> = list_backend_providers().into_iter().map(|(n, _)| n).collect();
    let cache: Vec<_> = list_cache_providers().into_iter().map(|(n, _)| n).collect();

    assert!(auth.contains(&"basic") && auth.contains(&"none"), "{auth:?}");
    assert!(acl.contains(&"basic") && acl.contains(&"none"), "{acl:?}");
    assert!(backend.contains(&"multi") && backend.contains(&"memory"), "{backend:?}");
    assert!(cache.contains(&"moka") && cache.contains(&"null"), "{cache:?}");
}

#[test]
fn test_unknown_key_lists_available_providers() {
    let err = resolve_backend_provider(&BackendProviderConfig::new("nope")).unwrap_err();

    assert!(err.contains("Unknown backend provider 'nope'"), "{err}");
    assert!(err.contains("memory"), "{err}");
}

#[test]
fn test_keys_are_case_insensitive() {
    let acl = resolve_acl_provider(&AclProviderConfig::new("NONE")).unwrap();
    assert_eq!(acl.provider_name(), "none");
}

#[tokio::test]
async fn test_none_acl_grants_everything() {
    let acl = resolve_acl_provider(&AclProviderConfig::new("none")).unwrap();
    let p = Principal::new("anyone");

    assert!(acl.is_admin(&p).await.unwrap());
    assert!(acl.clients(&p, Some("srv1")).await.unwrap().is_all());
}

#[tokio::test]
async fn test_basic_auth_from_settings() {
    let config = AuthProviderConfig::new("basic")
        .with_settings(json!({ "users": { "admin": "admin" } }));
    let auth = resolve_auth_provider(&config).unwrap();

    let principal = auth
        .authenticate(&Credentials::new("admin", "admin"))
        .await
        .unwrap();
    assert_eq!(principal.id(), "admin");
    assert!(auth.authenticate(&Credentials::new("admin", "x")).await.is_err());
}

#[tokio::test]
async fn test_null_cache_stores_nothing() {
    let cache = resolve_cache_provider(&CacheProviderConfig::new("null")).unwrap();

    cache
        .set_json("k", "1", bcon_application::ports::CacheEntryConfig::default())
        .await
        .unwrap();
    assert!(cache.get_json("k").await.unwrap().is_none());
}

#[test]
fn test_decode_settings_defaults_on_null() {
    #[derive(Debug, Default, serde::Deserialize, PartialEq)]
    struct Section {
        #[serde(default)]
        value: u32,
    }

    let decoded: Section = decode_settings(&serde_json::Value::Null).unwrap();
    assert_eq!(decoded, Section::default());
    assert!(decode_settings::<Section>(&json!({ "value": "x" })).is_err());
}
