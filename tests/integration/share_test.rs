//! Integration tests for share create, get, update and revoke.

use std::collections::HashSet;

use chrono::{Duration, Utc};

use linkgate_core::error::ErrorKind;
use linkgate_entity::share::{
    Grant, ShareAuthentication, SharePermissions, ShareReference, UpdateKind, UpdateRequest,
};

use crate::helpers::{TestApp, ctx, home_file};

#[tokio::test]
async fn test_tokens_unique_across_creates() {
    let app = TestApp::new();
    let einstein = ctx("einstein", &[]);
    let mut tokens = HashSet::new();
    for i in 0..50 {
        let share = app
            .shares
            .create(
                &einstein,
                &home_file(&i.to_string(), "einstein"),
                &Grant::new(SharePermissions::viewer()),
                "",
                false,
            )
            .await
            .unwrap();
        assert!(tokens.insert(share.token));
    }
}

#[tokio::test]
async fn test_create_persists_legacy_columns() {
    let app = TestApp::new();
    let marie = ctx("marie", &[]);
    let share = app
        .shares
        .create(
            &marie,
            &home_file("4242", "einstein"),
            &Grant::new(SharePermissions::editor()),
            "for the lab",
            false,
        )
        .await
        .unwrap();

    let row = app.row(&share.token);
    assert_eq!(row.uid_owner, "einstein");
    assert_eq!(row.uid_initiator, "marie");
    assert_eq!(row.item_type, "file");
    assert_eq!(row.fileid_prefix, "eoshome-i01");
    assert_eq!(row.item_source, "4242");
    assert_eq!(row.permissions, 15);
    assert_eq!(row.description, "for the lab");
    assert_eq!(row.expiration, None);
    assert_eq!(share.owner.opaque_id, "einstein");
    assert_eq!(share.creator.opaque_id, "marie");
}

#[tokio::test]
async fn test_zero_expiration_means_never() {
    let app = TestApp::new();
    let einstein = ctx("einstein", &[]);
    let epoch = chrono::DateTime::<Utc>::from_timestamp(0, 0).unwrap();
    let share = app
        .shares
        .create(
            &einstein,
            &home_file("1", "einstein"),
            &Grant::new(SharePermissions::viewer()).with_expiration(epoch),
            "",
            false,
        )
        .await
        .unwrap();
    assert_eq!(share.expiration, None);
    assert!(
        app.shares
            .get(&einstein, &ShareReference::token(share.token), false)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_expired_get_orphans_row() {
    let app = TestApp::new();
    let einstein = ctx("einstein", &[]);
    let grant = Grant::new(SharePermissions::viewer())
        .with_expiration(Utc::now() - Duration::seconds(1));
    let share = app
        .shares
        .create(&einstein, &home_file("1", "einstein"), &grant, "", false)
        .await
        .unwrap();

    let err = app
        .shares
        .get(&einstein, &ShareReference::id(share.id), false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(app.row(&share.token).is_orphan());
}

#[tokio::test]
async fn test_expired_absent_even_without_cleanup() {
    let app = TestApp::with_config(linkgate_core::config::PublicShareConfig {
        driver: "memory".to_string(),
        password_hash_cost: 4,
        enable_expired_shares_cleanup: false,
        ..Default::default()
    });
    let einstein = ctx("einstein", &[]);
    let grant = Grant::new(SharePermissions::viewer())
        .with_expiration(Utc::now() - Duration::seconds(1));
    let share = app
        .shares
        .create(&einstein, &home_file("1", "einstein"), &grant, "", false)
        .await
        .unwrap();

    let reference = ShareReference::token(share.token.clone());
    assert_eq!(
        app.shares.get(&einstein, &reference, false).await.unwrap_err().kind,
        ErrorKind::NotFound
    );
    assert!(app.shares.list(&einstein, &[], false).await.unwrap().is_empty());
    assert_eq!(
        app.shares
            .authenticate_by_token(&share.token, &ShareAuthentication::None, false)
            .await
            .unwrap_err()
            .kind,
        ErrorKind::NotFound
    );
    assert!(!app.row(&share.token).is_orphan());
}

#[tokio::test]
async fn test_revoke_hides_existence_from_strangers() {
    let app = TestApp::new();
    let einstein = ctx("einstein", &[]);
    let richard = ctx("richard", &[]);
    let share = app
        .shares
        .create(
            &einstein,
            &home_file("1", "einstein"),
            &Grant::new(SharePermissions::viewer()),
            "",
            false,
        )
        .await
        .unwrap();
    let reference = ShareReference::token(share.token.clone());

    let err = app.shares.revoke(&richard, &reference).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(app.shares.get(&einstein, &reference, false).await.is_ok());

    app.shares.revoke(&einstein, &reference).await.unwrap();
    let err = app.shares.get(&einstein, &reference, false).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_update_each_field_group() {
    let app = TestApp::new();
    let einstein = ctx("einstein", &[]);
    let share = app
        .shares
        .create(
            &einstein,
            &home_file("1", "einstein"),
            &Grant::new(SharePermissions::viewer()),
            "",
            false,
        )
        .await
        .unwrap();
    let reference = ShareReference::id(share.id);

    let mut rename = UpdateRequest::new(reference.clone(), UpdateKind::DisplayName);
    rename.display_name = "Slides".into();
    let updated = app.shares.update(&einstein, &rename, &Grant::default()).await.unwrap();
    assert_eq!(updated.display_name, "Slides");

    let perms = UpdateRequest::new(reference.clone(), UpdateKind::Permissions);
    let updated = app
        .shares
        .update(&einstein, &perms, &Grant::new(SharePermissions::uploader()))
        .await
        .unwrap();
    assert_eq!(updated.permissions, SharePermissions::uploader());
    assert_eq!(updated.display_name, "Slides");

    let password = UpdateRequest::new(reference.clone(), UpdateKind::Password);
    let updated = app
        .shares
        .update(&einstein, &password, &Grant::default().with_password("hunter2"))
        .await
        .unwrap();
    assert!(updated.password_protected);
    assert!(app.row(&share.token).share_with.unwrap().starts_with("1|"));

    let updated = app
        .shares
        .update(&einstein, &password, &Grant::default().with_password(""))
        .await
        .unwrap();
    assert!(!updated.password_protected);
    assert_eq!(app.row(&share.token).share_with.as_deref(), Some(""));

    let exp = Utc::now() + Duration::days(7);
    let expiration = UpdateRequest::new(reference.clone(), UpdateKind::Expiration);
    let updated = app
        .shares
        .update(&einstein, &expiration, &Grant::default().with_expiration(exp))
        .await
        .unwrap();
    assert_eq!(updated.expiration, Some(exp));

    let mut description = UpdateRequest::new(reference, UpdateKind::Description);
    description.description = "week 3".into();
    let updated = app.shares.update(&einstein, &description, &Grant::default()).await.unwrap();
    assert_eq!(updated.description, "week 3");
    assert_eq!(updated.created_at, share.created_at);
}

#[tokio::test]
async fn test_update_by_stranger_not_found() {
    let app = TestApp::new();
    let einstein = ctx("einstein", &[]);
    let share = app
        .shares
        .create(
            &einstein,
            &home_file("1", "einstein"),
            &Grant::new(SharePermissions::viewer()),
            "",
            false,
        )
        .await
        .unwrap();

    let mut request = UpdateRequest::new(ShareReference::id(share.id), UpdateKind::Description);
    request.description = "mine now".into();
    let err = app
        .shares
        .update(&ctx("richard", &[]), &request, &Grant::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(app.row(&share.token).description, "");
}
