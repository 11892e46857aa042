//! Shared fixtures

use bcon_infrastructure::config::AppConfig;
use serde_json::json;

/// Two in-process agents, a basic users table and a basic ACL
///
/// `srv1` holds `c1`, `c2`; `srv2` holds `c3`. `alice` may only see `c3`
/// on `srv2`; `admin` is an ACL administrator.
pub const MULTI_AGENT_TOML: &str = r#"
[global]
standalone = false
backend = "memory"
auth = "basic"
acl = "basic"

[auth.basic.users]
admin = "admin"
alice = "wonderland"

[acl.basic]
admins = ["admin"]

[acl.basic.grants]
alice = { srv2 = ["c3"] }

[[inventory.agents]]
name = "srv1"
clients = [{ name = "c1" }, { name = "c2" }]
running = ["c2"]

[[inventory.agents]]
name = "srv2"
clients = [{ name = "c3" }]
"#;

/// Configuration equivalent to [`MULTI_AGENT_TOML`], built in code
pub fn multi_agent_config() -> AppConfig {
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

/// Standalone in-process backend with one client and login disabled
pub fn standalone_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.global.standalone = true;
    config.global.backend = "memory".to_string();
    config.global.auth = vec!["none".to_string()];
    config.inventory = Some(json!({ "clients": [{ "name": "solo" }] }));
    config
}
