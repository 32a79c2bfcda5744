//! Tests for the identity session.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{EphemeralSessionVault, MockAuthGateway, MockSessionVault, VaultError};
use crate::domain::{AuthToken, Role};
use crate::test_support::fixtures::{account, principal};

fn grant(id: &str, role: Role) -> SessionGrant {
    SessionGrant::new(
        account(id, role),
        AuthToken::new(format!("token-{id}")).expect("token"),
    )
}

fn session_with(gateway: MockAuthGateway) -> IdentitySession<EphemeralSessionVault> {
    IdentitySession::restore(EphemeralSessionVault::default(), Arc::new(gateway))
}

#[rstest]
fn restore_without_snapshot_has_no_principal() {
    let session = session_with(MockAuthGateway::new());
    assert!(session.principal().is_none());
    assert_eq!(session.home(), "/login");
    let err = session.require_principal().expect_err("anonymous");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
fn restore_rebuilds_persisted_principal() {
    let admin = principal("a1", Role::Admin);
    let vault = EphemeralSessionVault::holding(PersistedSession::from_principal(&admin));
    let session = IdentitySession::restore(vault, Arc::new(MockAuthGateway::new()));
    assert_eq!(session.principal(), Some(&admin));
    assert_eq!(session.home(), "/admin");
}

#[rstest]
fn restore_discards_malformed_snapshot() {
    let mut snapshot = PersistedSession::from_principal(&principal("u1", Role::User));
    snapshot.email = "not-an-email".into();
    let session = IdentitySession::restore(
        EphemeralSessionVault::holding(snapshot),
        Arc::new(MockAuthGateway::new()),
    );
    assert!(session.principal().is_none());
    assert_eq!(session.vault().load(), Ok(None));
}

#[rstest]
fn restore_treats_unreadable_vault_as_no_session() {
    let mut vault = MockSessionVault::new();
    vault
        .expect_load()
        .return_once(|| Err(VaultError::read("cookie tampered")));
    vault.expect_clear().times(1).return_const(());
    let session = IdentitySession::restore(vault, Arc::new(MockAuthGateway::new()));
    assert!(session.principal().is_none());
}

#[rstest]
#[tokio::test]
async fn sign_in_persists_principal() {
    let mut gateway = MockAuthGateway::new();
    gateway
        .expect_login()
        .withf(|creds| creds.email().as_str() == "u1@example.com")
        .times(1)
        .return_once(|_| Ok(grant("u1", Role::User)));
    let mut session = session_with(gateway);

    let signed_in = session
        .sign_in(" u1@example.com ", "password")
        .await
        .expect("sign in succeeds");

    assert_eq!(signed_in.role(), Role::User);
    assert_eq!(session.home(), "/dashboard");
    let stored = session.vault().load().expect("vault readable").expect("snapshot");
    assert_eq!(stored.token, "token-u1");
}

#[rstest]
#[tokio::test]
async fn sign_in_validates_before_calling_gateway() {
    let mut gateway = MockAuthGateway::new();
    gateway.expect_login().times(0);
    let mut session = session_with(gateway);

    let err = session.sign_in("nope", "").await.expect_err("invalid form");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case(StoreError::unauthorized("Invalid credentials"), ErrorCode::Unauthorized)]
#[case(StoreError::rejected("Invalid credentials"), ErrorCode::Unauthorized)]
#[case(StoreError::not_found("User not found"), ErrorCode::Unauthorized)]
#[case(StoreError::forbidden("Account disabled"), ErrorCode::Unauthorized)]
#[case(StoreError::transport("connection refused"), ErrorCode::ServiceUnavailable)]
#[case(StoreError::decode("missing token"), ErrorCode::InternalError)]
#[tokio::test]
async fn sign_in_failures_keep_taxonomy(#[case] failure: StoreError, #[case] expected: ErrorCode) {
    let mut gateway = MockAuthGateway::new();
    gateway.expect_login().return_once(move |_| Err(failure));
    let mut session = session_with(gateway);

    let err = session
        .sign_in("u1@example.com", "password")
        .await
        .expect_err("sign in fails");
    assert_eq!(err.code(), expected);
    assert!(session.principal().is_none());
}

#[rstest]
#[tokio::test]
async fn sign_up_coerces_role_to_user() {
    let mut gateway = MockAuthGateway::new();
    gateway
        .expect_register()
        .return_once(|_| Ok(grant("n1", Role::Admin)));
    let mut session = session_with(gateway);

    let principal = session
        .sign_up("New Person", "n1@example.com", "secret1")
        .await
        .expect("sign up succeeds");
    assert_eq!(principal.role(), Role::User);
    assert_eq!(session.home(), "/dashboard");
}

#[rstest]
#[case(StoreError::rejected("User already exists"), ErrorCode::InvalidRequest)]
#[case(StoreError::forbidden("registration closed"), ErrorCode::Unauthorized)]
#[case(StoreError::transport("timeout"), ErrorCode::ServiceUnavailable)]
#[tokio::test]
async fn sign_up_failures(#[case] failure: StoreError, #[case] expected: ErrorCode) {
    let mut gateway = MockAuthGateway::new();
    gateway.expect_register().return_once(move |_| Err(failure));
    let mut session = session_with(gateway);

    let err = session
        .sign_up("New Person", "n1@example.com", "secret1")
        .await
        .expect_err("sign up fails");
    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn sign_up_reports_every_invalid_field() {
    let mut gateway = MockAuthGateway::new();
    gateway.expect_register().times(0);
    let mut session = session_with(gateway);

    let err = session.sign_up("", "bad", "123").await.expect_err("invalid");
    let fields = err
        .details()
        .and_then(|d| d.get("fields"))
        .and_then(|f| f.as_array())
        .map(Vec::len);
    assert_eq!(fields, Some(3));
}

#[rstest]
fn sign_out_is_idempotent() {
    let vault =
        EphemeralSessionVault::holding(PersistedSession::from_principal(&principal("u1", Role::User)));
    let mut session = IdentitySession::restore(vault, Arc::new(MockAuthGateway::new()));
    session.sign_out();
    session.sign_out();
    assert!(session.principal().is_none());
    assert_eq!(session.vault().load(), Ok(None));
}

#[rstest]
fn settle_clears_session_on_unauthorized() {
    let vault =
        EphemeralSessionVault::holding(PersistedSession::from_principal(&principal("u1", Role::User)));
    let mut session = IdentitySession::restore(vault, Arc::new(MockAuthGateway::new()));

    let kept: Result<(), Error> = session.settle(Err(Error::forbidden("no")));
    assert!(kept.is_err());
    assert!(session.principal().is_some());

    let dropped: Result<(), Error> = session.settle(Err(Error::unauthorized("expired")));
    assert!(dropped.is_err());
    assert!(session.principal().is_none());
}

#[rstest]
#[tokio::test]
async fn vault_write_failure_is_internal() {
    let mut vault = MockSessionVault::new();
    vault.expect_load().return_once(|| Ok(None));
    vault
        .expect_store()
        .return_once(|_| Err(VaultError::write("cookie too large")));
    let mut gateway = MockAuthGateway::new();
    gateway
        .expect_login()
        .return_once(|_| Ok(grant("u1", Role::User)));
    let mut session = IdentitySession::restore(vault, Arc::new(gateway));

    let err = session
        .sign_in("u1@example.com", "password")
        .await
        .expect_err("persist fails");
    assert_eq!(err.code(), ErrorCode::InternalError);
    assert!(session.principal().is_none());
}
