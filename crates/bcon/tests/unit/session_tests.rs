//! Command execution against the in-process backend

use bcon::cli::KindArg;
use bcon::{Command, Session, SettingsCommand};
use bcon_domain::ErrorKind;
use bcon_infrastructure::config::AppConfig;
use bcon_infrastructure::init_app;
use serde_json::{Value, json};

fn multi_agent_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.global.standalone = false;
    config.global.backend = "memory".to_string();
    config.global.auth = vec!["basic".to_string()];
    config.global.acl = "basic".to_string();
    config.auth.insert(
        "basic".to_string(),
        json!({ "users": { "admin": "admin", "alice": "wonderland" } }),
    );
    config.acl.insert(
        "basic".to_string(),
        json!({ "admins": ["admin"], "grants": { "alice": { "srv2": ["c3"] } } }),
    );
    config.inventory = Some(json!({
        "agents": [
            { "name": "srv1", "clients": [{ "name": "c1" }, { "name": "c2" }], "running": ["c2"] },
            { "name": "srv2", "clients": [{ "name": "c3" }] }
        ]
    }));
    config
}

async fn session_as(user: &str, password: &str) -> Session {
    let mut session = Session::new(init_app(multi_agent_config()).unwrap());
    session
        .authenticate(Some(user), Some(password))
        .await
        .unwrap();
    session
}

fn names(output: &Value) -> Vec<&str> {
    output["value"]
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_clients_are_filtered_per_user() {
    let admin = session_as("admin", "admin").await;
    let output = admin.execute(&Command::Clients, None).await.unwrap();
    assert_eq!(names(&output), vec!["c1", "c2", "c3"]);
    assert!(output.get("warnings").is_none());

    let alice = session_as("alice", "wonderland").await;
    let output = alice.execute(&Command::Clients, None).await.unwrap();
    assert_eq!(names(&output), vec!["c3"]);
    assert_eq!(output["value"][0]["agent"], "srv2");
}

#[tokio::test]
async fn test_foreign_agent_is_denied() {
    let alice = session_as("alice", "wonderland").await;
    let err = alice
        .execute(&Command::Clients, Some("srv1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
}

#[tokio::test]
async fn test_backup_running_for_admin() {
    let admin = session_as("admin", "admin").await;
    let output = admin
        .execute(&Command::BackupRunning, Some("srv1"))
        .await
        .unwrap();
    assert_eq!(output["value"], true);
}

#[tokio::test]
async fn test_settings_require_admin() {
    let alice = session_as("alice", "wonderland").await;
    let err = alice
        .execute(&Command::Settings(SettingsCommand::Options), Some("srv2"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
}

#[tokio::test]
async fn test_login_needs_credentials() {
    let mut session = Session::new(init_app(multi_agent_config()).unwrap());
    let err = session.authenticate(Some("admin"), None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthFailure);
    assert!(session.principal().is_none());

    let err = session
        .execute(&Command::Clients, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthFailure);
}

#[tokio::test]
async fn test_plugins_and_config_need_no_login() {
    let session = Session::new(init_app(multi_agent_config()).unwrap());

    let plugins = session.execute(&Command::Plugins, None).await.unwrap();
    let resolved = plugins["resolved"].as_array().unwrap();
    assert_eq!(resolved.len(), 4);
    assert!(
        plugins["registered"]["backend"]
            .as_array()
            .unwrap()
            .iter()
            .any(|entry| entry["name"] == "memory")
    );

    let port = session
        .execute(
            &Command::Config {
                section: "global".to_string(),
                key: "port".to_string(),
                kind: KindArg::Integer,
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(port["value"], 5000);
}
