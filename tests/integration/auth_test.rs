//! Integration tests for anonymous access by token.

use chrono::{Duration, Utc};

use linkgate_auth::{CapabilitySigner, PublicShareCredentials};
use linkgate_core::error::ErrorKind;
use linkgate_entity::share::{
    Grant, PublicShare, ShareAuthentication, SharePermissions, ShareReference, ShareSignature,
};
use linkgate_service::auth::{AuthManagerDeps, PUBLIC_SHARES};
use linkgate_service::{AuthManager, AuthManagerRegistry};

use crate::helpers::{TestApp, ctx, home_file};

async fn protected_share(app: &TestApp, password: &str) -> PublicShare {
    app.shares
        .create(
            &ctx("einstein", &[]),
            &home_file("1", "einstein"),
            &Grant::new(SharePermissions::viewer()).with_password(password),
            "",
            false,
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_password_round_trip() {
    let app = TestApp::new();
    let share = protected_share(&app, "p@ss").await;
    assert!(share.password_protected);

    let ok = app
        .shares
        .authenticate_by_token(&share.token, &ShareAuthentication::Password("p@ss".into()), false)
        .await
        .unwrap();
    assert_eq!(ok.id, share.id);
    assert!(ok.signature.is_none());

    let err = app
        .shares
        .authenticate_by_token(&share.token, &ShareAuthentication::Password("wrong".into()), false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
}

#[tokio::test]
async fn test_protected_share_needs_credentials() {
    let app = TestApp::new();
    let share = protected_share(&app, "p@ss").await;
    for auth in [
        ShareAuthentication::None,
        ShareAuthentication::Password(String::new()),
    ] {
        let err = app
            .shares
            .authenticate_by_token(&share.token, &auth, false)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredentials);
    }
}

#[tokio::test]
async fn test_unprotected_share_opens_without_credentials() {
    let app = TestApp::new();
    let share = app
        .shares
        .create(
            &ctx("einstein", &[]),
            &home_file("1", "einstein"),
            &Grant::new(SharePermissions::viewer()),
            "",
            false,
        )
        .await
        .unwrap();

    let opened = app
        .shares
        .authenticate_by_token(&share.token, &ShareAuthentication::None, true)
        .await
        .unwrap();
    assert_eq!(opened.id, share.id);
    assert!(opened.signature.is_none());
}

#[tokio::test]
async fn test_signature_flow() {
    let app = TestApp::new();
    let share = protected_share(&app, "p@ss").await;

    let signed = app
        .shares
        .authenticate_by_token(&share.token, &ShareAuthentication::Password("p@ss".into()), true)
        .await
        .unwrap();
    let signature = signed.signature.expect("protected share is signed");
    assert!(signature.expiration > Utc::now());

    let reopened = app
        .shares
        .authenticate_by_token(
            &share.token,
            &ShareAuthentication::Signature(signature.clone()),
            false,
        )
        .await
        .unwrap();
    assert_eq!(reopened.id, share.id);

    let mut tampered = signature.clone();
    tampered.expiration += Duration::seconds(60);
    let err = app
        .shares
        .authenticate_by_token(&share.token, &ShareAuthentication::Signature(tampered), false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);

    // Owner-side reads can request a signature too.
    let fetched = app
        .shares
        .get(&ctx("einstein", &[]), &ShareReference::id(share.id), true)
        .await
        .unwrap();
    assert!(fetched.signature.is_some());
}

#[tokio::test]
async fn test_expired_signature_rejected() {
    let app = TestApp::new();
    let share = protected_share(&app, "p@ss").await;
    let hash = app.row(&share.token).share_with.unwrap();

    let past = chrono::DateTime::<Utc>::from_timestamp(Utc::now().timestamp() - 5, 0).unwrap();
    let stale = ShareSignature {
        signature: CapabilitySigner::new(3600).sign(&share.token, &hash, past).unwrap(),
        expiration: past,
    };
    let err = app
        .shares
        .authenticate_by_token(&share.token, &ShareAuthentication::Signature(stale), false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
}

#[tokio::test]
async fn test_password_change_invalidates_signatures() {
    let app = TestApp::new();
    let share = protected_share(&app, "p@ss").await;
    let signature = app
        .shares
        .authenticate_by_token(&share.token, &ShareAuthentication::Password("p@ss".into()), true)
        .await
        .unwrap()
        .signature
        .unwrap();

    let request = linkgate_entity::share::UpdateRequest::new(
        ShareReference::id(share.id),
        linkgate_entity::share::UpdateKind::Password,
    );
    app.shares
        .update(&ctx("einstein", &[]), &request, &Grant::default().with_password("n3w"))
        .await
        .unwrap();

    let err = app
        .shares
        .authenticate_by_token(&share.token, &ShareAuthentication::Signature(signature), false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
}

#[tokio::test]
async fn test_auth_provider_from_registry() {
    let app = TestApp::new();
    let share = protected_share(&app, "p@ss").await;
    let provider = AuthManagerRegistry::new()
        .create(
            PUBLIC_SHARES,
            &AuthManagerDeps {
                shares: app.shares.clone(),
            },
        )
        .unwrap();

    let outcome = provider.authenticate(&share.token, "password|p@ss").await.unwrap();
    assert_eq!(outcome.share.id, share.id);
    let signature = outcome.signature.expect("signed on success");

    let secret = PublicShareCredentials::from(ShareAuthentication::Signature(signature)).to_secret();
    let again = provider.authenticate(&share.token, &secret).await.unwrap();
    assert_eq!(again.share.id, share.id);

    let err = provider
        .authenticate(&share.token, "password|nope")
        .await
        .err()
        .unwrap();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
}
