//! Tests for ACL providers

use std::collections::BTreeMap;

use bcon_domain::ports::providers::AclProvider;
use bcon_domain::{Grant, Principal};
use bcon_providers::acl::{BasicAclProvider, BasicAclSettings, NoneAclProvider, UserGrant};

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn acl() -> BasicAclProvider {
    let mut grants = BTreeMap::new();
    grants.insert("bob".to_string(), UserGrant::Clients(names(&["c1", "c2"])));
    grants.insert(
        "alice".to_string(),
        UserGrant::PerAgent(BTreeMap::from([("srv2".to_string(), names(&["c3"]))])),
    );
    grants.insert(
        "carol".to_string(),
        UserGrant::PerAgent(BTreeMap::from([
            ("srv1".to_string(), names(&["*"])),
            ("*".to_string(), names(&["c9"])),
        ])),
    );
    BasicAclProvider::new(BasicAclSettings {
        admins: ["root".to_string()].into_iter().collect(),
        grants,
    })
}

#[tokio::test]
async fn test_admins_are_unrestricted() {
    let acl = acl();
    let root = Principal::new("root");

    assert!(acl.is_admin(&root).await.unwrap());
    assert!(acl.servers(&root).await.unwrap().is_all());
    assert!(acl.clients(&root, Some("srv1")).await.unwrap().is_all());
}

#[tokio::test]
async fn test_per_agent_grant() {
    let acl = acl();
    let alice = Principal::new("alice");

    assert!(!acl.is_admin(&alice).await.unwrap());
    assert_eq!(acl.servers(&alice).await.unwrap(), Grant::Only(names(&["srv2"])));
    assert_eq!(
        acl.clients(&alice, Some("srv2")).await.unwrap(),
        Grant::Only(names(&["c3"]))
    );
    assert_eq!(acl.clients(&alice, Some("srv1")).await.unwrap(), Grant::nothing());
    assert!(acl.is_client_allowed(&alice, "c3", Some("srv2")).await.unwrap());
    assert!(!acl.is_client_allowed(&alice, "c1", Some("srv1")).await.unwrap());
}

#[tokio::test]
async fn test_flat_grant_applies_to_every_agent() {
    let acl = acl();
    let bob = Principal::new("bob");

    assert!(acl.servers(&bob).await.unwrap().is_all());
    assert!(acl.is_client_allowed(&bob, "c2", Some("srv7")).await.unwrap());
    assert!(acl.is_client_allowed(&bob, "c1", None).await.unwrap());
}

#[tokio::test]
async fn test_wildcards() {
    let acl = acl();
    let carol = Principal::new("carol");

    assert!(acl.servers(&carol).await.unwrap().is_all());
    assert!(acl.clients(&carol, Some("srv1")).await.unwrap().is_all());
    assert_eq!(
        acl.clients(&carol, Some("srv3")).await.unwrap(),
        Grant::Only(names(&["c9"]))
    );
}

#[tokio::test]
async fn test_unknown_user_sees_nothing() {
    let acl = acl();
    let eve = Principal::new("eve");

    assert_eq!(acl.servers(&eve).await.unwrap(), Grant::nothing());
    assert_eq!(acl.clients(&eve, None).await.unwrap(), Grant::nothing());
}

#[tokio::test]
async fn test_settings_decode_both_grant_shapes() {
    let settings: BasicAclSettings = serde_json::from_value(serde_json::json!({
        "admins": ["root"],
        "grants": { "bob": ["c1"], "alice": { "srv2": ["c3"] } }
    }))
    .unwrap();

    assert_eq!(settings.grants["bob"], UserGrant::Clients(names(&["c1"])));
    assert!(matches!(settings.grants["alice"], UserGrant::PerAgent(_)));
}

#[tokio::test]
async fn test_none_acl_allows_everything() {
    let acl = NoneAclProvider::new();
    let p = Principal::new("anyone");

    assert!(acl.is_admin(&p).await.unwrap());
    assert!(acl.servers(&p).await.unwrap().is_all());
    assert!(acl.is_client_allowed(&p, "c1", Some("srv1")).await.unwrap());
}
