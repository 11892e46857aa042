//! Unit tests for principals and credentials

use bcon_domain::constants::ANONYMOUS_PRINCIPAL_ID;
use bcon_domain::{Credentials, Principal};

#[test]
fn test_new_principal_is_active_non_admin() {
    let p = Principal::new("alice");
    assert_eq!(p.id(), "alice");
    assert!(p.is_authenticated());
    assert!(p.is_active());
    assert!(!p.is_admin());
}

#[test]
fn test_anonymous_principal_is_admin() {
    let p = Principal::anonymous();
    assert_eq!(p.id(), ANONYMOUS_PRINCIPAL_ID);
    assert!(p.is_admin());
    assert!(p.is_authenticated());
}

#[test]
fn test_unauthenticated_principal() {
    let p = Principal::unauthenticated("mallory");
    assert!(!p.is_authenticated());
    assert!(!p.is_active());
}

#[test]
fn test_builder_does_not_touch_identity() {
    let p = Principal::new("bob").with_admin(true).with_active(false);
    assert_eq!(p.to_string(), "bob");
    assert!(p.is_admin());
    assert!(!p.is_active());
}

#[test]
fn test_credentials_debug_redacts_password() {
    let creds = Credentials::new("alice", "s3cret");
    let debug = format!("{creds:?}");
    assert!(debug.contains("alice"));
    assert!(!debug.contains("s3cret"));
}
