//! Tests for ACL-filtered multi-agent aggregation

use std::sync::Arc;
use std::time::Duration;

use bcon_domain::{ClientRecord, Error, ErrorKind, Principal, RunningState};
use tokio_util::sync::CancellationToken;

use crate::test_utils::*;

fn names(records: &[ClientRecord]) -> Vec<(&str, Option<&str>)> {
    records
        .iter()
        .map(|r| (r.name.as_str(), r.agent.as_deref()))
        .collect()
}

#[tokio::test]
async fn test_admin_lists_every_agent_in_configured_order() {
    let agg = aggregator(two_agents(), alice_on_srv2(), false);

    let result = agg.list_clients(&admin(), None).await.unwrap();

    assert!(result.is_complete());
    assert_eq!(
        names(&result.value),
        vec![
            ("c1", Some("srv1")),
            ("c2", Some("srv1")),
            ("c3", Some("srv2")),
        ]
    );
}

#[tokio::test]
async fn test_restricted_principal_sees_only_granted_clients() {
    let agg = aggregator(two_agents(), alice_on_srv2(), false);

    let result = agg.list_clients(&alice(), None).await.unwrap();

    assert_eq!(names(&result.value), vec![("c3", Some("srv2"))]);
}

#[tokio::test]
async fn test_unauthorized_explicit_agent_is_denied() {
    let agg = aggregator(two_agents(), alice_on_srv2(), false);

    let err = agg.list_clients(&alice(), Some("srv1")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
}

#[tokio::test]
async fn test_result_is_subset_of_client_grant() {
    let backend = two_agents();
    let acl = Arc::new(
        StaticAcl::new()
            .servers("bob", &["srv1", "srv2"])
            .clients("bob", Some("srv1"), &["c2", "ghost"])
            .clients("bob", Some("srv2"), &[]),
    );
    let agg = aggregator(backend, acl, false);
    let bob = Principal::new("bob");

    for agent in [Some("srv1"), Some("srv2"), None] {
        let result = agg.list_clients(&bob, agent).await.unwrap();
        for record in &result.value {
            assert_eq!(record.name, "c2", "unexpected {record:?} for {agent:?}");
        }
    }
}

#[tokio::test]
async fn test_admin_scoped_agent_is_unfiltered() {
    let agg = aggregator(two_agents(), alice_on_srv2(), false);

    let result = agg.list_clients(&admin(), Some("srv1")).await.unwrap();

    assert_eq!(
        names(&result.value),
        vec![("c1", Some("srv1")), ("c2", Some("srv1"))]
    );
}

#[tokio::test]
async fn test_list_clients_strips_details() {
    let agg = aggregator(two_agents(), alice_on_srv2(), false);

    let listed = agg.list_clients(&admin(), Some("srv2")).await.unwrap();
    let stats = agg.client_stats(&admin(), Some("srv2")).await.unwrap();

    assert!(listed.value[0].stats.is_none());
    assert!(stats.value[0].stats.is_some());
}

#[tokio::test]
async fn test_standalone_ignores_agent_tagging() {
    let backend = Arc::new(FakeBackend::standalone(&["c1", "c2"]));
    let acl = Arc::new(StaticAcl::new().clients("alice", None, &["c2"]));
    let agg = aggregator(backend, acl, true);

    let result = agg.list_clients(&alice(), None).await.unwrap();

    assert_eq!(names(&result.value), vec![("c2", None)]);
}

#[tokio::test]
async fn test_failed_agent_is_omitted_with_warning() {
    let backend = two_agents();
    backend.fail_agent("srv1");
    let agg = aggregator(backend, alice_on_srv2(), false);

    let result = agg.list_clients(&admin(), None).await.unwrap();

    assert_eq!(names(&result.value), vec![("c3", Some("srv2"))]);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].agent, "srv1");
}

#[tokio::test]
async fn test_failed_agent_scoped_request_returns_failure() {
    let backend = two_agents();
    backend.fail_agent("srv1");
    let agg = aggregator(backend, alice_on_srv2(), false);

    let err = agg.list_clients(&admin(), Some("srv1")).await.unwrap_err();

    assert!(matches!(err, Error::Upstream { .. }));
    assert!(err.kind().is_retryable());
}

#[tokio::test]
async fn test_is_backup_running_monotone() {
    let backend = two_agents();
    let agg = aggregator(backend.clone(), alice_on_srv2(), false);

    assert!(!agg.is_backup_running(&alice(), None).await.unwrap().value);

    // Running on an agent alice cannot see does not count
    backend.set_running("srv1", &["c1"]);
    assert!(!agg.is_backup_running(&alice(), None).await.unwrap().value);
    assert!(agg.is_backup_running(&admin(), None).await.unwrap().value);

    backend.set_running("srv2", &["c3"]);
    assert!(agg.is_backup_running(&alice(), None).await.unwrap().value);
}

#[tokio::test]
async fn test_running_clients_per_agent_shape() {
    let backend = two_agents();
    backend.set_running("srv1", &["c2"]);
    backend.set_running("srv2", &["c3"]);
    let agg = aggregator(backend, alice_on_srv2(), false);

    let state = agg.running_clients(&alice(), None, None).await.unwrap().value;

    match state {
        RunningState::PerAgent(map) => {
            assert_eq!(map.len(), 1);
            assert_eq!(map["srv2"], vec!["c3".to_string()]);
        }
        RunningState::Flat(_) => panic!("Expected PerAgent"),
    }
}

#[tokio::test]
async fn test_running_clients_scoped_agent_is_flat() {
    let backend = two_agents();
    backend.set_running("srv1", &["c1", "c2"]);
    let agg = aggregator(backend, alice_on_srv2(), false);

    let state = agg
        .running_clients(&admin(), Some("srv1"), None)
        .await
        .unwrap()
        .value;

    assert_eq!(state, RunningState::Flat(vec!["c1".into(), "c2".into()]));
}

#[tokio::test]
async fn test_running_single_client_outside_grant_reads_idle() {
    let backend = two_agents();
    backend.set_running("srv2", &["c3"]);
    let acl = Arc::new(StaticAcl::new().servers("alice", &["srv2"]));
    let agg = aggregator(backend, acl, false);

    let state = agg
        .running_clients(&alice(), Some("srv2"), Some("c3"))
        .await
        .unwrap()
        .value;

    assert_eq!(state, RunningState::Flat(vec![]));
}

#[tokio::test]
async fn test_report_asks_backend_only_for_visible_clients() {
    let backend = two_agents();
    let agg = aggregator(backend.clone(), alice_on_srv2(), false);

    let report = agg.report(&alice(), Some("srv2")).await.unwrap().value;

    assert_eq!(report.client_names().collect::<Vec<_>>(), vec!["c3"]);
    assert_eq!(report.backups.len(), 1);
}

#[tokio::test]
async fn test_report_denied_for_foreign_agent() {
    let agg = aggregator(two_agents(), alice_on_srv2(), false);

    let err = agg.report(&alice(), Some("srv1")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
}

#[tokio::test]
async fn test_report_merges_agents_for_admin() {
    let agg = aggregator(two_agents(), alice_on_srv2(), false);

    let report = agg.report(&admin(), None).await.unwrap().value;

    assert_eq!(
        report.client_names().collect::<Vec<_>>(),
        vec!["c1", "c2", "c3"]
    );
}

#[tokio::test]
async fn test_acl_failure_fails_closed() {
    let acl = alice_on_srv2();
    acl.break_down();
    let agg = aggregator(two_agents(), acl, false);

    let unscoped = agg.list_clients(&admin(), None).await.unwrap();
    assert!(unscoped.value.is_empty());

    let err = agg.list_clients(&admin(), Some("srv1")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
}

#[tokio::test]
async fn test_unauthenticated_principal_rejected() {
    let agg = aggregator(two_agents(), alice_on_srv2(), false);

    let err = agg
        .list_clients(&Principal::unauthenticated("eve"), None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AuthFailure);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_stops_fan_out() {
    let backend = two_agents();
    backend.set_delay(Duration::from_secs(60));
    let token = CancellationToken::new();
    let agg = aggregator(backend.clone(), alice_on_srv2(), false).with_cancellation(token.clone());

    let canceller = {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        })
    };

    let err = agg.list_clients(&admin(), None).await.unwrap_err();
    canceller.await.unwrap();

    assert!(matches!(err, Error::Cancelled));
}

#[tokio::test]
async fn test_merged_report_tags_each_agent() {
    let backend = Arc::new(FakeBackend::multi(&[("srv1", &["web"]), ("srv2", &["web"])]));
    let agg = aggregator(backend, alice_on_srv2(), false);

    let report = agg.report(&admin(), None).await.unwrap().value;

    let clients: Vec<_> = report
        .clients
        .iter()
        .map(|c| (c.name.as_str(), c.agent.as_deref()))
        .collect();
    assert_eq!(clients, vec![("web", Some("srv1")), ("web", Some("srv2"))]);
    assert!(report.backups.iter().all(|b| b.agent.is_some()));
}

#[tokio::test]
async fn test_standalone_report_is_untagged() {
    let agg = aggregator(Arc::new(FakeBackend::standalone(&["c1"])), alice_on_srv2(), true);

    let report = agg.report(&admin(), None).await.unwrap().value;

    assert_eq!(report.clients[0].agent, None);
}
