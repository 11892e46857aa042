//! Tests for the in-process backend

use bcon_application::ports::registry::{
    AgentEndpoint, BackendProviderConfig, resolve_backend_provider,
};
use bcon_domain::ports::providers::BackendClient;
use bcon_domain::{DeleteClientOptions, ErrorKind, NotificationLevel, RunningState};
use bcon_providers::backend::{InventorySettings, MemoryBackend};
use serde_json::json;

fn multi() -> MemoryBackend {
    let settings: InventorySettings = serde_json::from_value(json!({
        "revocation": false,
        "agents": [
            {
                "name": "srv1",
                "running": ["c2"],
                "paths": ["/etc/burp", "/etc/hosts", "/home"],
                "clients": [
                    { "name": "c1", "backups": 4, "stats": { "file_count": 10, "total_size": 100 } },
                    { "name": "c2" }
                ]
            },
            { "name": "srv2", "clients": [{ "name": "c3" }] },
            { "name": "srv3", "offline": true }
        ]
    }))
    .unwrap();
    MemoryBackend::new(settings, false, &["srv4".to_string()])
}

fn standalone() -> MemoryBackend {
    let settings: InventorySettings = serde_json::from_value(json!({
        "clients": [{ "name": "solo" }],
        "running": ["solo"],
        "revocation": true
    }))
    .unwrap();
    MemoryBackend::new(settings, true, &[])
}

#[tokio::test]
async fn test_servers_follow_inventory_then_endpoints() {
    assert_eq!(multi().servers(), vec!["srv1", "srv2", "srv3", "srv4"]);
    assert!(standalone().servers().is_empty());
}

#[tokio::test]
async fn test_clients_carry_status_and_stats() {
    let backend = multi();

    let clients = backend.get_all_clients(Some("srv1")).await.unwrap();
    let names: Vec<_> = clients.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["c1", "c2"]);
    assert_eq!(clients[0].stats.as_ref().unwrap().file_count, 10);
    assert_eq!(clients[1].status.as_ref().unwrap().state, "running");
    assert!(backend.get_all_clients(Some("srv4")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_agent_is_required_in_multi_mode() {
    let err = multi().get_all_clients(None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn test_offline_and_unknown_agents_are_upstream_failures() {
    let backend = multi();

    let err = backend.get_all_clients(Some("srv3")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    let err = backend.get_all_clients(Some("ghost")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
}

#[tokio::test]
async fn test_running_state_shapes() {
    let backend = standalone();
    assert_eq!(
        backend.is_one_backup_running(None).await.unwrap(),
        RunningState::Flat(vec!["solo".to_string()])
    );

    let backend = multi();
    backend.set_running("c2", false, Some("srv1")).unwrap();
    backend.set_running("c1", true, Some("srv1")).unwrap();
    assert_eq!(
        backend.is_one_backup_running(Some("srv1")).await.unwrap(),
        RunningState::Flat(vec!["c1".to_string()])
    );
    assert!(backend.is_backup_running("c1", Some("srv1")).await.unwrap());
}

#[tokio::test]
async fn test_report_covers_requested_clients_only() {
    let report = multi()
        .get_clients_report(&["c1".to_string(), "ghost".to_string()], Some("srv1"))
        .await
        .unwrap();

    assert_eq!(report.client_names().collect::<Vec<_>>(), vec!["c1"]);
    assert_eq!(report.backups[0].number, 4);
}

#[tokio::test]
async fn test_store_and_delete_client() {
    let backend = standalone();
    let form = vec![
        ("include".to_string(), "/home".to_string()),
        ("include".to_string(), "/etc".to_string()),
    ];

    let notes = backend
        .store_client_config(&form, "new", None, Some("ignored"))
        .await
        .unwrap();
    assert_eq!(notes[0].level, NotificationLevel::Success);
    let config = backend.read_client_config("new", None, None).await.unwrap();
    assert_eq!(config["include"], json!(["/home", "/etc"]));
    assert_eq!(backend.clients_list(None).await.unwrap().len(), 2);

    let notes = backend
        .delete_client("new", DeleteClientOptions { revoke: true, delcert: false }, None)
        .await
        .unwrap();
    assert_eq!(notes.len(), 1);
    let err = backend
        .delete_client("new", DeleteClientOptions::default(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_revoke_without_revocation_warns() {
    let notes = multi()
        .delete_client("c1", DeleteClientOptions { revoke: true, delcert: true }, Some("srv1"))
        .await
        .unwrap();

    let levels: Vec<_> = notes.iter().map(|n| n.level).collect();
    assert_eq!(
        levels,
        vec![NotificationLevel::Success, NotificationLevel::Warning, NotificationLevel::Info]
    );
}

#[tokio::test]
async fn test_expand_path_and_server_config() {
    let backend = multi();

    let paths = backend
        .expand_path("/etc/*", None, None, Some("srv1"))
        .await
        .unwrap();
    assert_eq!(paths, vec!["/etc/burp", "/etc/hosts"]);

    let form = vec![("directory".to_string(), "/srv/burp".to_string())];
    backend
        .store_server_config(&form, None, Some("srv1"))
        .await
        .unwrap();
    let config = backend.read_server_config(None, Some("srv1")).await.unwrap();
    assert_eq!(config["directory"], "/srv/burp");
    assert_eq!(
        backend.get_parser_attr("multi_cli", Some("srv1")).await.unwrap(),
        json!(["include", "exclude", "keep"])
    );
}

#[tokio::test]
async fn test_factory_reads_inventory_section() {
    let config = BackendProviderConfig::new("memory")
        .with_agent(AgentEndpoint {
            name: "extra".to_string(),
            url: "http://unused".to_string(),
            timeout_secs: 5,
            password: None,
        })
        .with_settings(json!({ "agents": [{ "name": "srv1" }] }));
    let backend = resolve_backend_provider(&config).unwrap();

    assert_eq!(backend.provider_name(), "memory");
    assert_eq!(backend.servers(), vec!["srv1", "extra"]);
    assert!(!backend.revocation_enabled(Some("extra")).await.unwrap());
}
