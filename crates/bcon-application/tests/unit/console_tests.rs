//! Tests for the cached console surface

use std::sync::Arc;
use std::sync::atomic::Ordering;

use bcon_domain::{DeleteClientOptions, ErrorKind, Principal};

use crate::test_utils::*;

fn client_names(records: &[bcon_domain::ClientRecord]) -> Vec<String> {
    records.iter().map(|r| r.name.clone()).collect()
}

#[tokio::test]
async fn test_repeated_reads_hit_the_cache() {
    let backend = two_agents();
    let console = console(backend.clone(), alice_on_srv2(), Arc::new(MapCache::default()), false);

    console.list_clients(&admin(), None).await.unwrap();
    let calls = backend.list_calls.load(Ordering::SeqCst);
    console.list_clients(&admin(), None).await.unwrap();

    assert_eq!(backend.list_calls.load(Ordering::SeqCst), calls);
}

#[tokio::test]
async fn test_cache_never_bleeds_between_principals() {
    let console = console(two_agents(), alice_on_srv2(), Arc::new(MapCache::default()), false);

    let admin_view = console.list_clients(&admin(), None).await.unwrap();
    let alice_view = console.list_clients(&alice(), None).await.unwrap();

    assert_eq!(client_names(&admin_view.value), vec!["c1", "c2", "c3"]);
    assert_eq!(client_names(&alice_view.value), vec!["c3"]);

    // Second round served from cache keeps both views apart
    let alice_again = console.list_clients(&alice(), None).await.unwrap();
    assert_eq!(client_names(&alice_again.value), vec!["c3"]);
}

#[tokio::test]
async fn test_create_client_invalidates_cached_list() {
    let console = console(two_agents(), alice_on_srv2(), Arc::new(MapCache::default()), false);

    let before = console.list_clients(&admin(), Some("srv2")).await.unwrap();
    assert_eq!(client_names(&before.value), vec!["c3"]);

    console
        .settings()
        .create_client(&admin(), "c4", Some("srv2"))
        .await
        .unwrap();

    let after = console.list_clients(&admin(), Some("srv2")).await.unwrap();
    assert_eq!(client_names(&after.value), vec!["c3", "c4"]);
}

#[tokio::test]
async fn test_delete_client_invalidates_cached_list() {
    let console = console(two_agents(), alice_on_srv2(), Arc::new(MapCache::default()), false);

    console.list_clients(&admin(), None).await.unwrap();
    console
        .settings()
        .delete_client(&admin(), "c1", DeleteClientOptions::default(), Some("srv1"))
        .await
        .unwrap();

    let after = console.list_clients(&admin(), None).await.unwrap();
    assert_eq!(client_names(&after.value), vec!["c2", "c3"]);
}

#[tokio::test]
async fn test_partial_results_are_not_cached() {
    let backend = two_agents();
    backend.fail_agent("srv1");
    let cache = Arc::new(MapCache::default());
    let console = console(backend, alice_on_srv2(), cache.clone(), false);

    let result = console.list_clients(&admin(), None).await.unwrap();

    assert!(!result.is_complete());
    assert_eq!(cache.len(), 0);
}

#[tokio::test]
async fn test_cache_outage_falls_back_to_uncached() {
    let cache = Arc::new(MapCache::default());
    cache.go_down();
    let console = console(two_agents(), alice_on_srv2(), cache, false);

    let result = console.report(&alice(), None).await.unwrap();

    assert_eq!(result.value.client_names().collect::<Vec<_>>(), vec!["c3"]);
}

#[tokio::test]
async fn test_unauthenticated_principal_not_served_from_cache() {
    let console = console(two_agents(), alice_on_srv2(), Arc::new(MapCache::default()), false);
    console.list_clients(&alice(), None).await.unwrap();

    let err = console
        .list_clients(&Principal::unauthenticated("alice"), None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AuthFailure);
}

#[tokio::test]
async fn test_disabled_account_not_served_from_cache() {
    let console = console(two_agents(), alice_on_srv2(), Arc::new(MapCache::default()), false);
    console.report(&alice(), None).await.unwrap();

    let err = console
        .report(&alice().with_active(false), None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AuthFailure);
}

#[tokio::test]
async fn test_revoked_server_grant_not_served_from_cache() {
    let acl = alice_on_srv2();
    let console = console(two_agents(), acl.clone(), Arc::new(MapCache::default()), false);
    console.client_stats(&alice(), Some("srv2")).await.unwrap();

    acl.break_down();
    let err = console
        .client_stats(&alice(), Some("srv2"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
}
